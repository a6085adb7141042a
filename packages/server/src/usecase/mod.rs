//! UseCase layer: one use case per inbound event, plus the read-side use
//! cases backing the HTTP API. Use cases depend only on the domain traits;
//! the binary wires in the concrete infrastructure at startup.

pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod relay_code_change;
pub mod run_code;
pub mod sync_code;

pub use error::{GetRoomDetailError, LeaveError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_code_change::RelayCodeChangeUseCase;
pub use run_code::RunCodeUseCase;
pub use sync_code::SyncCodeUseCase;

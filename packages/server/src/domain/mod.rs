//! Domain layer: value objects, entities, and the interfaces the use case
//! layer depends on. Concrete implementations live in the infrastructure
//! layer (dependency inversion).

pub mod entity;
pub mod error;
pub mod executor;
pub mod pusher;
pub mod registry;
pub mod value_object;

pub use entity::Participant;
pub use error::{EventPushError, ValueError};
pub use executor::{
    CodeExecutor, ExecutionOutcome, ExecutionRequest, OutcomeKind, SupportedLanguage,
};
pub use pusher::{EventPusher, PusherChannel};
pub use registry::SessionRegistry;
pub use value_object::{ClientId, RoomId, Timestamp, Username};

#[cfg(test)]
pub use executor::MockCodeExecutor;

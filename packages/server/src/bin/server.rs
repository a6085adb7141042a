//! Collaborative code room server.
//!
//! Coordinates participants editing a shared program inside rooms and runs
//! submitted C++ in a resource-bounded sandbox, broadcasting the result back
//! to the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dojo-server
//! cargo run --bin dojo-server -- --host 0.0.0.0 --port 3001
//! ```

use std::sync::Arc;

use clap::Parser;

use dojo_server::{
    infrastructure::{
        event_pusher::WebSocketEventPusher, executor::CppExecutor,
        repository::InMemorySessionRegistry,
    },
    ui::Server,
    usecase::{
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RelayCodeChangeUseCase, RunCodeUseCase, SyncCodeUseCase,
    },
};
use dojo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "dojo-server")]
#[command(about = "Collaborative code room server with sandboxed execution", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. EventPusher
    // 3. Executor
    // 4. UseCases
    // 5. Server

    // 1. Create SessionRegistry (in-memory database)
    let registry = Arc::new(InMemorySessionRegistry::new());

    // 2. Create EventPusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create the sandboxed C++ executor
    let cpp_executor = Arc::new(CppExecutor::new());

    // 4. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(registry.clone(), pusher.clone()));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone(), pusher.clone()));
    let relay_code_change_usecase =
        Arc::new(RelayCodeChangeUseCase::new(registry.clone(), pusher.clone()));
    let sync_code_usecase = Arc::new(SyncCodeUseCase::new(pusher.clone()));
    let run_code_usecase = Arc::new(RunCodeUseCase::new(
        registry.clone(),
        pusher.clone(),
        cpp_executor,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry.clone()));

    // 5. Create and run the server
    let server = Server::new(
        join_room_usecase,
        leave_room_usecase,
        relay_code_change_usecase,
        sync_code_usecase,
        run_code_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

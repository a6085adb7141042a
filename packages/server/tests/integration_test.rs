//! Integration tests driving a running server over real WebSocket
//! connections.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

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

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Wire up the full dependency graph and run a server on the given port
/// inside the test runtime.
async fn start_server(port: u16) {
    let registry = Arc::new(InMemorySessionRegistry::new());
    let pusher = Arc::new(WebSocketEventPusher::new());
    let cpp_executor = Arc::new(CppExecutor::new());

    let server = Server::new(
        Arc::new(JoinRoomUseCase::new(registry.clone(), pusher.clone())),
        Arc::new(LeaveRoomUseCase::new(registry.clone(), pusher.clone())),
        Arc::new(RelayCodeChangeUseCase::new(registry.clone(), pusher.clone())),
        Arc::new(SyncCodeUseCase::new(pusher.clone())),
        Arc::new(RunCodeUseCase::new(
            registry.clone(),
            pusher.clone(),
            cpp_executor,
        )),
        Arc::new(GetRoomsUseCase::new(registry.clone())),
        Arc::new(GetRoomDetailUseCase::new(registry.clone())),
    );

    tokio::spawn(async move {
        if let Err(e) = server.run("127.0.0.1".to_string(), port).await {
            panic!("Server error: {e}");
        }
    });

    // Wait until the listener accepts connections
    for _ in 0..50 {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("Server did not start on port {port}");
}

async fn connect_client(port: u16) -> WsClient {
    let (ws, _) = connect_async(format!("ws://127.0.0.1:{port}/ws"))
        .await
        .expect("Failed to connect WebSocket client");
    ws
}

async fn send_event(ws: &mut WsClient, event: Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("Failed to send event");
}

/// Receive the next text frame as JSON, with a timeout guard.
async fn recv_event(ws: &mut WsClient) -> Value {
    let deadline = Duration::from_secs(5);
    tokio::time::timeout(deadline, async {
        loop {
            let msg = ws
                .next()
                .await
                .expect("Connection closed while waiting for event")
                .expect("WebSocket error while waiting for event");
            if let Message::Text(text) = msg {
                return serde_json::from_str::<Value>(&text).expect("Event is not valid JSON");
            }
        }
    })
    .await
    .expect("Timed out waiting for event")
}

/// Assert that no event arrives within the given window.
async fn expect_no_event(ws: &mut WsClient, window: Duration) {
    let result = tokio::time::timeout(window, ws.next()).await;
    assert!(
        result.is_err(),
        "Expected no event, but received: {:?}",
        result
    );
}

fn join_event(room: &str, username: &str) -> Value {
    json!({"type": "join", "roomId": room, "username": username})
}

#[tokio::test]
async fn test_health_endpoint_responds_ok() {
    // テスト項目: ヘルスチェックエンドポイントが ok を返す
    // given (前提条件):
    let port = 18090;
    start_server(port).await;

    // when (操作):
    let response = reqwest::get(format!("http://127.0.0.1:{port}/api/health"))
        .await
        .unwrap();

    // then (期待する結果):
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_join_notifies_room_and_joiner() {
    // テスト項目: join で既存メンバーと参加者本人の両方にメンバーシップが通知される
    // given (前提条件):
    let port = 18091;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    let alice_joined = recv_event(&mut alice).await;
    assert_eq!(alice_joined["type"], "joined");
    assert_eq!(alice_joined["username"], "alice");
    assert_eq!(alice_joined["clients"].as_array().unwrap().len(), 1);
    assert!(!alice_joined["socketId"].as_str().unwrap().is_empty());

    // when (操作): bob が同じ Room に join する
    let mut bob = connect_client(port).await;
    send_event(&mut bob, join_event("room-1", "bob")).await;

    // then (期待する結果): alice と bob の両方が 2 人のメンバーリストを受け取る
    let alice_notification = recv_event(&mut alice).await;
    assert_eq!(alice_notification["type"], "joined");
    assert_eq!(alice_notification["username"], "bob");
    assert_eq!(alice_notification["clients"].as_array().unwrap().len(), 2);

    let bob_joined = recv_event(&mut bob).await;
    assert_eq!(bob_joined["type"], "joined");
    assert_eq!(bob_joined["clients"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_code_change_is_not_echoed_to_sender() {
    // テスト項目: 編集イベントが送信者以外にリレーされ、送信者には返らない
    // given (前提条件):
    let port = 18092;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    recv_event(&mut alice).await; // joined (alice)

    let mut bob = connect_client(port).await;
    send_event(&mut bob, join_event("room-1", "bob")).await;
    recv_event(&mut alice).await; // joined (bob)
    recv_event(&mut bob).await; // joined (bob)

    // when (操作): alice が編集を送る
    send_event(
        &mut alice,
        json!({"type": "code-change", "roomId": "room-1", "code": "int main() {}"}),
    )
    .await;

    // then (期待する結果): bob は受信し、alice には返らない
    let bob_event = recv_event(&mut bob).await;
    assert_eq!(bob_event["type"], "code-change");
    assert_eq!(bob_event["code"], "int main() {}");

    expect_no_event(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_sync_code_reaches_only_the_target() {
    // テスト項目: sync-code が指定された接続だけにリレーされる（ドキュメントハンドオフ）
    // given (前提条件):
    let port = 18093;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    recv_event(&mut alice).await; // joined (alice)

    let mut bob = connect_client(port).await;
    send_event(&mut bob, join_event("room-1", "bob")).await;
    let bob_joined_seen_by_alice = recv_event(&mut alice).await;
    recv_event(&mut bob).await; // joined (bob)

    // 新規参加者の socketId は joined 通知から分かる
    let bob_socket_id = bob_joined_seen_by_alice["socketId"].as_str().unwrap();

    // when (操作): alice がバッファを bob に引き渡す
    send_event(
        &mut alice,
        json!({"type": "sync-code", "socketId": bob_socket_id, "code": "// shared buffer"}),
    )
    .await;

    // then (期待する結果): bob が code-change として受信する
    let bob_event = recv_event(&mut bob).await;
    assert_eq!(bob_event["type"], "code-change");
    assert_eq!(bob_event["code"], "// shared buffer");

    expect_no_event(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_disconnect_notifies_former_room_members() {
    // テスト項目: 切断が元の Room のメンバーに通知される
    // given (前提条件):
    let port = 18094;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    recv_event(&mut alice).await; // joined (alice)

    let mut bob = connect_client(port).await;
    send_event(&mut bob, join_event("room-1", "bob")).await;
    recv_event(&mut alice).await; // joined (bob)
    recv_event(&mut bob).await; // joined (bob)

    // when (操作): bob が切断する
    bob.close(None).await.unwrap();

    // then (期待する結果): alice に disconnected が届く
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "disconnected");
    assert_eq!(event["username"], "bob");
    assert!(!event["socketId"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_code_broadcasts_result_to_whole_room() {
    // テスト項目: 実行結果が要求の送信者を含む Room 全体にブロードキャストされる
    // given (前提条件):
    let port = 18095;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    recv_event(&mut alice).await; // joined (alice)

    let mut bob = connect_client(port).await;
    send_event(&mut bob, join_event("room-1", "bob")).await;
    recv_event(&mut alice).await; // joined (bob)
    recv_event(&mut bob).await; // joined (bob)

    // when (操作): alice が C++ コードの実行を要求する
    let source = "#include <iostream>\nint main() { std::cout << \"42\"; return 0; }";
    send_event(
        &mut alice,
        json!({"type": "run-code", "roomId": "room-1", "code": source, "language": "cpp"}),
    )
    .await;

    // then (期待する結果): alice と bob の両方が同じ実行結果を受け取る
    for ws in [&mut alice, &mut bob] {
        let event = recv_event(ws).await;
        assert_eq!(event["type"], "code-output");
        assert_eq!(event["success"], true);
        assert_eq!(event["resultKind"], "execution-result");
        assert!(event["output"].as_str().unwrap().contains("42"));
    }
}

#[tokio::test]
async fn test_run_code_with_unsupported_language_is_rejected() {
    // テスト項目: 未対応言語の実行要求が unsupported-language として報告される
    // given (前提条件):
    let port = 18096;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    recv_event(&mut alice).await; // joined (alice)

    // when (操作):
    send_event(
        &mut alice,
        json!({"type": "run-code", "roomId": "room-1", "code": "print('hi')", "language": "python"}),
    )
    .await;

    // then (期待する結果):
    let event = recv_event(&mut alice).await;
    assert_eq!(event["type"], "code-output");
    assert_eq!(event["success"], false);
    assert_eq!(event["resultKind"], "unsupported-language");
    assert!(event["output"].as_str().unwrap().contains("python"));
}

#[tokio::test]
async fn test_rooms_endpoint_lists_active_rooms() {
    // テスト項目: Room 一覧 API が参加者のいる Room を返し、未知の Room は 404 になる
    // given (前提条件):
    let port = 18097;
    start_server(port).await;

    let mut alice = connect_client(port).await;
    send_event(&mut alice, join_event("room-1", "alice")).await;
    recv_event(&mut alice).await; // joined (alice)

    // when (操作):
    let rooms: Value = reqwest::get(format!("http://127.0.0.1:{port}/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"], "room-1");
    assert_eq!(rooms[0]["participants"][0], "alice");

    let missing = reqwest::get(format!("http://127.0.0.1:{port}/api/rooms/nowhere"))
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_frame_does_not_break_the_connection() {
    // テスト項目: 不正なフレームが無視され、接続が維持される
    // given (前提条件):
    let port = 18098;
    start_server(port).await;

    let mut alice = connect_client(port).await;

    // when (操作): JSON ですらないフレームと未知のイベントを送る
    send_event(&mut alice, json!({"type": "bogus-event", "whatever": 1})).await;
    alice
        .send(Message::Text("not json at all".into()))
        .await
        .unwrap();

    // then (期待する結果): その後の join が普通に処理される
    send_event(&mut alice, join_event("room-1", "alice")).await;
    let joined = recv_event(&mut alice).await;
    assert_eq!(joined["type"], "joined");
    assert_eq!(joined["username"], "alice");
}

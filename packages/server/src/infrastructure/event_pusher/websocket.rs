//! WebSocket を使った EventPusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - クライアントへのイベント送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。
//!
//! これにより、「WebSocket の生成」と「イベントの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、イベント送信
//!
//! 配送保証は at-most-once です。列挙と送信の間に切断した受信者は
//! 単にイベントを受け取らないだけで、エラーとしては扱いません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, EventPushError, EventPusher, PusherChannel};

/// WebSocket を使った EventPusher 実装
pub struct WebSocketEventPusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ClientId
    /// Value: PusherChannel
    clients: Mutex<HashMap<ClientId, PusherChannel>>,
}

impl WebSocketEventPusher {
    /// 新しい WebSocketEventPusher を作成
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to EventPusher", client_id);
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from EventPusher", client_id);
    }

    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), EventPushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(client_id) {
            sender
                .send(content.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to client '{}'", client_id);
            Ok(())
        } else {
            Err(EventPushError::ClientNotFound(
                client_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), EventPushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push event to client '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted event to client '{}'", target);
                }
            } else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketEventPusher の基本的なイベント送信機能
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信
    // - エラーハンドリング（存在しないクライアント）
    //
    // 【なぜこのテストが必要か】
    // - EventPusher は UseCase から呼ばれる通信層の中核
    // - イベントの送信が正しく行われることを保証する必要がある
    // - 切断済みクライアントがブロードキャストを妨げないことを検証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース
    // 2. push_to の失敗ケース（クライアントが存在しない）
    // 3. broadcast の成功ケース（複数クライアント）
    // 4. broadcast の部分失敗ケース（一部のクライアントが存在しない）
    // ========================================

    fn client_id(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = client_id("alice");
        pusher.register_client(alice.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&alice, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received = rx.recv().await;
        assert_eq!(received, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let nonexistent = client_id("nonexistent");

        // when (操作):
        let result = pusher.push_to(&nonexistent, "Hello").await;

        // then (期待する結果):
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            EventPushError::ClientNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_push_to_unregistered_client_fails() {
        // テスト項目: 登録解除済みのクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = client_id("alice");
        pusher.register_client(alice.clone(), tx).await;
        pusher.unregister_client(&alice).await;

        // when (操作):
        let result = pusher.push_to(&alice, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(EventPushError::ClientNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のクライアントにイベントをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = client_id("alice");
        let bob = client_id("bob");
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // when (操作):
        let targets = vec![alice, bob];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: ブロードキャスト時、一部のクライアントが存在しなくても成功する
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let alice = client_id("alice");
        let nonexistent = client_id("nonexistent");
        pusher.register_client(alice.clone(), tx1).await;

        // when (操作):
        let targets = vec![alice, nonexistent];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果): ブロードキャストは部分失敗を許容
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], "Message").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}

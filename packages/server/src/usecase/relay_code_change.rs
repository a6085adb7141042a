//! UseCase: ドキュメント編集のリレー処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayCodeChangeUseCase::execute() メソッド
//! - 編集イベントのリレー（送信者を除く Room 全体への配送）
//!
//! ### なぜこのテストが必要か
//! - 送信者自身に編集が返らないこと（フィードバックループ防止）を保証
//! - 別 Room のメンバーに編集が漏れないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メンバーの Room での編集リレー
//! - エッジケース：送信者のみの Room（配送対象なし）
//!
//! ### 設計ノート
//!
//! サーバはドキュメントの正本を持ちません。編集はそのままリレーされ、
//! 受信側で最後に適用されたイベントが勝ちます（last-write-wins）。
//! マージ関数を導入する場合もこのユースケースの差し替えで済みます。

use std::sync::Arc;

use crate::domain::{ClientId, EventPusher, RoomId, SessionRegistry};

/// 編集リレーのユースケース
pub struct RelayCodeChangeUseCase {
    /// SessionRegistry（メンバーシップ記録の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl RelayCodeChangeUseCase {
    /// 新しい RelayCodeChangeUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// 編集イベントを送信者以外の Room メンバー全員にリレー
    ///
    /// # Arguments
    ///
    /// * `sender_id` - 編集イベントの送信者（配送から除外）
    /// * `room_id` - 配送先の Room
    /// * `message` - リレーするメッセージ（JSON）
    ///
    /// # Returns
    ///
    /// 配送対象となったクライアント ID リスト（Domain Model）
    pub async fn execute(
        &self,
        sender_id: &ClientId,
        room_id: &RoomId,
        message: &str,
    ) -> Vec<ClientId> {
        let targets: Vec<ClientId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .map(|p| p.id)
            .filter(|id| id != sender_id)
            .collect();

        if let Err(e) = self.pusher.broadcast(targets.clone(), message).await {
            tracing::warn!("Failed to relay code change: {}", e);
        }

        targets
    }
}

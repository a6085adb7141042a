//! UseCase: 参加者の切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 切断処理（メンバーシップ削除、sender の登録解除、通知対象選定）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：切断が元の Room のメンバーだけに通知される
//! - 削除されたレコードが返され、通知の組み立てに使えることを確認
//! - join していない接続の切断が静かに失敗することを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）
//! - 異常系：join せずに切断した接続

use std::sync::Arc;

use crate::domain::{ClientId, EventPusher, Participant, RoomId, SessionRegistry};

use super::error::LeaveError;

/// 切断のユースケース
pub struct LeaveRoomUseCase {
    /// SessionRegistry（メンバーシップ記録の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// 切断を実行
    ///
    /// sender の登録解除はメンバーシップの有無に関わらず行います
    /// （join せずに切断した接続も EventPusher からは消える必要がある）。
    ///
    /// # Arguments
    ///
    /// * `client_id` - 切断した接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 削除されたメンバーシップレコード
    /// * `Err(LeaveError)` - 接続がどの Room にも属していなかった場合
    pub async fn execute(&self, client_id: &ClientId) -> Result<Participant, LeaveError> {
        // 1. EventPusher からクライアントを登録解除
        self.pusher.unregister_client(client_id).await;

        // 2. メンバーシップを削除
        self.registry
            .remove(client_id)
            .await
            .ok_or_else(|| LeaveError::NotJoined(client_id.as_str().to_string()))
    }

    /// 参加者が切断したことを元の Room の残りのメンバーにブロードキャスト
    ///
    /// 切断した本人は既に削除済みのため、members がそのまま通知対象になります。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 切断した参加者が属していた Room
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_left(&self, room_id: &RoomId, message: &str) -> Result<(), String> {
        let targets: Vec<ClientId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .map(|p| p.id)
            .collect();

        self.pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}

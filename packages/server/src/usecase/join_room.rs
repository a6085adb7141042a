//! UseCase: 参加者の Room 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加処理（メンバーシップ登録、参加後のメンバーリスト構築）
//! - joined 通知のブロードキャスト対象選定
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：参加者リストが参加直後の状態を反映する
//! - joined 通知が「新規参加者以外の全メンバー」に届くことを保証
//! - 同一接続からの再 join が上書きになること（冪等性）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空の Room / 既存メンバーのいる Room への参加
//! - エッジケース：同一接続の再 join（部屋の移動）

use std::sync::Arc;

use crate::domain::{
    ClientId, EventPusher, Participant, PusherChannel, RoomId, SessionRegistry,
};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// SessionRegistry（メンバーシップ記録の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// Room 参加を実行
    ///
    /// メンバーシップを記録してから sender を EventPusher に登録します。
    /// 同一接続からの再 join は前のメンバーシップを上書きします。
    ///
    /// # Arguments
    ///
    /// * `participant` - 参加者レコード（Domain Model）
    /// * `sender` - クライアントへのイベント送信用チャンネル
    ///
    /// # Returns
    ///
    /// 参加直後の Room メンバーリスト（新規参加者を含む、ソート済み）
    pub async fn execute(
        &self,
        participant: Participant,
        sender: PusherChannel,
    ) -> Vec<Participant> {
        let client_id = participant.id.clone();
        let room_id = participant.room_id.clone();

        // 1. メンバーシップを記録（再 join は上書き）
        self.registry.join(participant).await;

        // 2. EventPusher にクライアントを登録
        self.pusher.register_client(client_id, sender).await;

        // 3. 参加直後のメンバーリストを返す
        self.registry.members(&room_id).await
    }

    /// 参加者が join したことを新規参加者以外の全メンバーにブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加先の Room
    /// * `new_client_id` - 新規参加した接続の ID（ブロードキャストから除外）
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_joined(
        &self,
        room_id: &RoomId,
        new_client_id: &ClientId,
        message: &str,
    ) -> Result<(), String> {
        let targets: Vec<ClientId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .map(|p| p.id)
            .filter(|id| id != new_client_id)
            .collect();

        self.pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 新規参加者本人にメンバーシップ通知を送る
    ///
    /// 新規参加者はこの通知で自分の接続 ID と現在のメンバーリストを知ります。
    pub async fn notify_joiner(&self, client_id: &ClientId, message: &str) -> Result<(), String> {
        self.pusher
            .push_to(client_id, message)
            .await
            .map_err(|e| e.to_string())
    }
}

//! UseCase: Room 一覧取得処理

use std::sync::Arc;

use crate::domain::{Participant, RoomId, SessionRegistry};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// SessionRegistry（メンバーシップ記録の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者のいる Room とそのメンバーを列挙
    pub async fn execute(&self) -> Vec<(RoomId, Vec<Participant>)> {
        let mut rooms = Vec::new();
        for room_id in self.registry.rooms().await {
            let members = self.registry.members(&room_id).await;
            rooms.push((room_id, members));
        }
        rooms
    }
}

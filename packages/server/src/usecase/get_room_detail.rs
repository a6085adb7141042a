//! UseCase: Room 詳細取得処理

use std::sync::Arc;

use crate::domain::{Participant, RoomId, SessionRegistry};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// SessionRegistry（メンバーシップ記録の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 指定された Room の参加者リストを取得
    ///
    /// Room はメンバーシップから導出されるため、参加者のいない Room と
    /// 存在しない Room は区別されません（どちらも RoomNotFound）。
    pub async fn execute(&self, room_id: String) -> Result<Vec<Participant>, GetRoomDetailError> {
        let room_id =
            RoomId::new(room_id).map_err(|_| GetRoomDetailError::InvalidRoomId)?;

        let members = self.registry.members(&room_id).await;
        if members.is_empty() {
            return Err(GetRoomDetailError::RoomNotFound(
                room_id.as_str().to_string(),
            ));
        }

        Ok(members)
    }
}

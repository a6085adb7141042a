//! InMemory SessionRegistry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 設計ノート
//!
//! Room は独立したエンティティとして保存しません。Room のメンバーシップは
//! 参加者レコードの `room_id` から導出されます。そのため、参加者が 0 人に
//! なった Room は自然に列挙されなくなり、明示的な削除処理は不要です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, Participant, RoomId, SessionRegistry};

/// インメモリ SessionRegistry 実装
///
/// 接続 ID をキーとした参加者レコードを保持し、ドメイン層の
/// SessionRegistry trait を実装します（依存性の逆転）。
pub struct InMemorySessionRegistry {
    /// 接続 ID → 参加者レコード
    participants: Mutex<HashMap<ClientId, Participant>>,
}

impl InMemorySessionRegistry {
    /// 新しい InMemorySessionRegistry を作成
    pub fn new() -> Self {
        Self {
            participants: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn join(&self, participant: Participant) {
        let mut participants = self.participants.lock().await;
        // 同一接続からの再 join は上書き（最後に設定された値が有効）
        participants.insert(participant.id.clone(), participant);
    }

    async fn find(&self, client_id: &ClientId) -> Option<Participant> {
        let participants = self.participants.lock().await;
        participants.get(client_id).cloned()
    }

    async fn members(&self, room_id: &RoomId) -> Vec<Participant> {
        let participants = self.participants.lock().await;
        let mut members: Vec<Participant> = participants
            .values()
            .filter(|p| &p.room_id == room_id)
            .cloned()
            .collect();

        // Sort by connection id for consistent ordering
        members.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

        members
    }

    async fn remove(&self, client_id: &ClientId) -> Option<Participant> {
        let mut participants = self.participants.lock().await;
        participants.remove(client_id)
    }

    async fn rooms(&self) -> Vec<RoomId> {
        let participants = self.participants.lock().await;
        let mut rooms: Vec<RoomId> = participants.values().map(|p| p.room_id.clone()).collect();
        rooms.sort();
        rooms.dedup();
        rooms
    }
}

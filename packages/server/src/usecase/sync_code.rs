//! UseCase: ドキュメントハンドオフ処理
//!
//! 新規参加者へのドキュメント引き渡しです。既存メンバーが sync-code で
//! 指定した単一の接続に向けて、一度だけドキュメントをリレーします。
//!
//! ## 設計ノート
//!
//! 送られるテキストは sync-code の送信側が選んだバッファであり、サーバは
//! その内容が Room の「正しい」ドキュメントかどうかを関知しません。

use std::sync::Arc;

use crate::domain::{ClientId, EventPushError, EventPusher};

/// ドキュメントハンドオフのユースケース
pub struct SyncCodeUseCase {
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
}

impl SyncCodeUseCase {
    /// 新しい SyncCodeUseCase を作成
    pub fn new(pusher: Arc<dyn EventPusher>) -> Self {
        Self { pusher }
    }

    /// ドキュメントを単一の接続にリレー
    ///
    /// 対象が列挙と送信の間に切断していた場合は配送されないだけで、
    /// 呼び出し側は警告ログ以上の対応をしません。
    ///
    /// # Arguments
    ///
    /// * `target_id` - 引き渡し先の接続 ID（Domain Model）
    /// * `message` - リレーするメッセージ（JSON）
    pub async fn execute(
        &self,
        target_id: &ClientId,
        message: &str,
    ) -> Result<(), EventPushError> {
        self.pusher.push_to(target_id, message).await
    }
}

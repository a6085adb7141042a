//! UseCase: コード実行のオーケストレーション
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RunCodeUseCase::dispatch() メソッド
//! - 言語ディスパッチ（対応言語の委譲、未対応言語の即時拒否）
//! - 実行結果の Room 全体（送信者を含む）へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 未対応言語で Sandbox もファイルシステムも触らないことを保証
//! - Executor の結果が改変されずに転送されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：対応言語の実行と結果ブロードキャスト
//! - 異常系：未対応言語の拒否
//!
//! ### 設計ノート
//!
//! 同一 Room での同時実行は直列化しません。連続した 2 つの実行要求は
//! それぞれ独立したワークスペースを持ち、完了順に結果をブロードキャスト
//! します（元実装と同じ挙動の選択）。

use std::sync::Arc;

use crate::domain::{
    ClientId, CodeExecutor, EventPusher, ExecutionOutcome, ExecutionRequest, RoomId,
    SessionRegistry, SupportedLanguage,
};

/// コード実行のユースケース
pub struct RunCodeUseCase {
    /// SessionRegistry（メンバーシップ記録の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// EventPusher（イベント通知の抽象化）
    pusher: Arc<dyn EventPusher>,
    /// C++ パイプライン（実行の抽象化）
    cpp_executor: Arc<dyn CodeExecutor>,
}

impl RunCodeUseCase {
    /// 新しい RunCodeUseCase を作成
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        pusher: Arc<dyn EventPusher>,
        cpp_executor: Arc<dyn CodeExecutor>,
    ) -> Self {
        Self {
            registry,
            pusher,
            cpp_executor,
        }
    }

    /// 実行要求をディスパッチ
    ///
    /// 未対応言語は Sandbox に触れる前に拒否します。対応言語は Executor に
    /// 委譲し、その結果を無改変で返します。
    pub async fn dispatch(&self, request: &ExecutionRequest) -> ExecutionOutcome {
        match SupportedLanguage::from_tag(&request.language) {
            Some(SupportedLanguage::Cpp) => {
                tracing::info!(
                    "Executing {} code for room '{}' ({} bytes)",
                    request.language,
                    request.room_id,
                    request.source.len()
                );
                self.cpp_executor.execute(&request.source).await
            }
            None => {
                tracing::info!("Rejected unsupported language '{}'", request.language);
                ExecutionOutcome::unsupported_language(&request.language)
            }
        }
    }

    /// 実行結果を Room 全体（要求の送信者を含む）にブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `room_id` - 配送先の Room
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_output(&self, room_id: &RoomId, message: &str) -> Result<(), String> {
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

//! Conversion logic between DTOs and domain types.

use crate::domain::{ExecutionOutcome, Participant};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<&Participant> for dto::ClientInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            socket_id: participant.id.as_str().to_string(),
            username: participant.username.as_str().to_string(),
        }
    }
}

impl From<&ExecutionOutcome> for dto::CodeOutputMessage {
    fn from(outcome: &ExecutionOutcome) -> Self {
        Self {
            r#type: dto::EventType::CodeOutput,
            output: outcome.stdout.clone(),
            error: outcome.stderr.clone(),
            success: outcome.success,
            result_kind: outcome.kind.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, RoomId, Timestamp, Username};

    #[test]
    fn test_participant_to_client_info() {
        // テスト項目: ドメインの Participant が ClientInfo DTO に変換される
        // given (前提条件):
        let participant = Participant::new(
            ClientId::new("c1".to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            RoomId::new("room-1".to_string()).unwrap(),
            Timestamp::new(1000),
        );

        // when (操作):
        let info = dto::ClientInfo::from(&participant);

        // then (期待する結果):
        assert_eq!(info.socket_id, "c1");
        assert_eq!(info.username, "alice");
    }

    #[test]
    fn test_execution_outcome_to_code_output_message() {
        // テスト項目: ドメインの ExecutionOutcome が CodeOutputMessage DTO に変換される
        // given (前提条件):
        let outcome = ExecutionOutcome::compilation_error("main.cpp: error".to_string());

        // when (操作):
        let message = dto::CodeOutputMessage::from(&outcome);

        // then (期待する結果):
        assert_eq!(message.r#type, dto::EventType::CodeOutput);
        assert_eq!(message.output, "");
        assert_eq!(message.error, "main.cpp: error");
        assert!(!message.success);
        assert_eq!(message.result_kind, "compilation-error");
    }
}

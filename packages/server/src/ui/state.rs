//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    RelayCodeChangeUseCase, RunCodeUseCase, SyncCodeUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（切断のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// RelayCodeChangeUseCase（編集リレーのユースケース）
    pub relay_code_change_usecase: Arc<RelayCodeChangeUseCase>,
    /// SyncCodeUseCase（ドキュメントハンドオフのユースケース）
    pub sync_code_usecase: Arc<SyncCodeUseCase>,
    /// RunCodeUseCase（コード実行のユースケース）
    pub run_code_usecase: Arc<RunCodeUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

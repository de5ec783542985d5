//! Analytics handler

use axum::extract::State;

use crate::api::{ApiResponse, AppResult};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::{
    PackageOptionRepository, PackageRepository, ReservationRepository, UserRepository,
};
use crate::services::{AnalyticsResponse, AnalyticsService};

/// GET /api/analytics - dashboard aggregates over all reservations
pub async fn dashboard(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<AnalyticsResponse>> {
    let service = AnalyticsService::new(
        ReservationRepository::new(state.get_db()),
        PackageOptionRepository::new(state.get_db()),
        PackageRepository::new(state.get_db()),
        UserRepository::new(state.get_db()),
    );
    let response = service.compute().await?;
    Ok(ApiResponse::success(response))
}

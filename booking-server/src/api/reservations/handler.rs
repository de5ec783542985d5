//! Reservation handlers
//!
//! Status changes go through single conditional updates in the
//! repository, so two admins racing on the same reservation cannot both
//! win. Handlers only decide which transition to attempt.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use shared::client::UserInfo;

use crate::api::{ApiResponse, AppResult};
use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{
    CreateReservationRequest, Package, PackageOption, Reservation, ReservationStatus,
    ReviewRequest, UpdateStatusRequest,
};
use crate::db::repository::{
    DeleteOutcome, PackageOptionRepository, PackageRepository, ReservationFilter,
    ReservationRepository, UserRepository,
};
use crate::services::ReviewService;
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_required_text};
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// Reservation with its display relations eager-expanded
#[derive(Debug, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub booked_by: Option<UserInfo>,
    pub option: Option<PackageOption>,
    pub package: Option<Package>,
}

#[derive(Debug, Serialize)]
pub struct ReservationPage {
    pub reservations: Vec<ReservationDetail>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Join users and the option -> package chain onto reservation rows.
///
/// Loads each table once and joins in memory rather than per-row lookups.
async fn expand(
    state: &ServerState,
    reservations: Vec<Reservation>,
) -> AppResult<Vec<ReservationDetail>> {
    let users: HashMap<String, UserInfo> = UserRepository::new(state.get_db())
        .find_all()
        .await?
        .into_iter()
        .map(|u| {
            let info = u.to_info();
            (info.id.clone(), info)
        })
        .collect();
    let options: HashMap<String, PackageOption> = PackageOptionRepository::new(state.get_db())
        .find_all()
        .await?
        .into_iter()
        .filter_map(|o| Some((o.id.as_ref()?.to_string(), o)))
        .collect();
    let packages: HashMap<String, Package> = PackageRepository::new(state.get_db())
        .find_all()
        .await?
        .into_iter()
        .filter_map(|p| Some((p.id.as_ref()?.to_string(), p)))
        .collect();

    Ok(reservations
        .into_iter()
        .map(|r| {
            let booked_by = users.get(&r.user.to_string()).cloned();
            let option = options.get(&r.package_option.to_string()).cloned();
            let package = option
                .as_ref()
                .and_then(|o| packages.get(&o.package.to_string()).cloned());
            ReservationDetail {
                reservation: r,
                booked_by,
                option,
                package,
            }
        })
        .collect())
}

/// GET /api/reservations - admin listing with optional filters
///
/// Pagination happens in memory; the embedded datastore mishandles
/// LIMIT with mixed record sets.
pub async fn list(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<ReservationPage>> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.parse::<ReservationStatus>()
                .map_err(|e| AppError::validation(e).with_detail("field", "status"))
        })
        .transpose()?;

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    let repo = ReservationRepository::new(state.get_db());
    let all = repo
        .find_all(&ReservationFilter {
            status,
            user_id: query.user_id,
        })
        .await?;
    let total = all.len();

    let page_rows: Vec<Reservation> = all
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    let reservations = expand(&state, page_rows).await?;

    Ok(ApiResponse::success(ReservationPage {
        reservations,
        total,
        page,
        page_size,
    }))
}

/// POST /api/reservations - book an option for the current user
///
/// The option's current price is captured on the new record and never
/// changes afterwards.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<ApiResponse<Reservation>> {
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let now = chrono::Utc::now().timestamp_millis();
    if payload.reservation_datetime <= now {
        return Err(
            AppError::validation("reservation_datetime must be in the future")
                .with_detail("field", "reservation_datetime"),
        );
    }

    let options = PackageOptionRepository::new(state.get_db());
    let option = options
        .find_by_id(&payload.package_option_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OptionNotFound))?;
    let option_id = option
        .id
        .ok_or_else(|| AppError::internal("option record without id"))?;

    let user_id = user
        .id
        .parse()
        .map_err(|_| AppError::invalid_request("invalid user id in token"))?;

    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo
        .create(Reservation {
            id: None,
            user: user_id,
            package_option: option_id,
            reservation_datetime: payload.reservation_datetime,
            address: payload.address.trim().to_string(),
            price_purchased: option.price,
            status: ReservationStatus::Pending,
            review_text: None,
            rating: None,
            sentiment: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(
        "reservation created by {} for {}",
        user.email,
        payload.package_option_id
    );
    Ok(ApiResponse::success(reservation))
}

/// GET /api/reservations/mine - current user's reservations
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<ReservationDetail>>> {
    let repo = ReservationRepository::new(state.get_db());
    let reservations = repo.find_by_user(&user.id).await?;
    Ok(ApiResponse::success(expand(&state, reservations).await?))
}

/// GET /api/reservations/{id} - owner or admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReservationDetail>> {
    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

    // Not-owned reads answer as missing; existence is not disclosed
    if !user.is_admin() && reservation.user.to_string() != user.id {
        return Err(AppError::new(ErrorCode::ReservationNotFound));
    }

    let detail = expand(&state, vec![reservation])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("expansion dropped the reservation"))?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/reservations/{id}/cancel - owner cancels a pending booking
///
/// Narrower than the admin transition: only `pending` may be cancelled here.
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Reservation>> {
    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

    if reservation.user.to_string() != user.id {
        return Err(AppError::new(ErrorCode::ReservationNotFound));
    }

    match reservation.status {
        ReservationStatus::Pending => {
            let updated = repo
                .transition_if(&id, ReservationStatus::Pending, ReservationStatus::Cancelled)
                .await?
                .ok_or_else(|| {
                    AppError::illegal_transition("pending", ReservationStatus::Cancelled.as_str())
                })?;
            tracing::info!("reservation {} cancelled by owner", id);
            Ok(ApiResponse::success(updated))
        }
        other => Err(AppError::illegal_transition(
            other.as_str(),
            ReservationStatus::Cancelled.as_str(),
        )),
    }
}

/// PUT /api/reservations/{id}/status - admin-driven transition
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<Reservation>> {
    let target = payload
        .status
        .parse::<ReservationStatus>()
        .map_err(|e| AppError::validation(e).with_detail("field", "status"))?;

    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
    let current = reservation.status;

    if !current.can_transition_to(target) {
        return Err(AppError::illegal_transition(current.as_str(), target.as_str()));
    }
    // cancelled -> cancelled permits repeated cancellation without a write
    if current == target {
        return Ok(ApiResponse::success(reservation));
    }

    let updated = repo
        .transition_if(&id, current, target)
        .await?
        .ok_or_else(|| {
            // Lost a race with another transition
            AppError::illegal_transition(current.as_str(), target.as_str())
        })?;

    tracing::info!("reservation {} moved {} -> {}", id, current, target);
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/reservations/{id} - admin delete, pending or cancelled only
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let repo = ReservationRepository::new(state.get_db());
    match repo.delete_if_deletable(&id).await? {
        DeleteOutcome::Deleted => {
            tracing::info!("reservation {} deleted", id);
            Ok(ApiResponse::ok())
        }
        DeleteOutcome::Blocked(status) => Err(AppError::new(ErrorCode::ReservationNotDeletable)
            .with_detail("status", status.as_str())),
        DeleteOutcome::NotFound => Err(AppError::new(ErrorCode::ReservationNotFound)),
    }
}

/// POST /api/reservations/{id}/review - owner reviews a completed booking
pub async fn submit_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<ApiResponse<Reservation>> {
    let service = ReviewService::new(
        ReservationRepository::new(state.get_db()),
        state.sentiment(),
    );
    let reservation = service
        .submit(&user.id, &id, &payload.review_text, payload.rating)
        .await?;

    tracing::info!("review stored for reservation {}", id);
    Ok(ApiResponse::success(reservation))
}

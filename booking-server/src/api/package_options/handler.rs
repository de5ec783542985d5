//! Package option handlers

use axum::Json;
use axum::extract::{Path, State};
use rust_decimal::Decimal;

use crate::api::{ApiResponse, AppResult};
use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{CreateOptionRequest, PackageOption, UpdateOptionRequest};
use crate::db::repository::{
    PackageOptionRepository, PackageRepository, ReservationRepository,
};
use crate::services::ReviewSnapshot;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, ErrorCode};

/// GET /api/package-options - all options across packages
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<ApiResponse<Vec<PackageOption>>> {
    let repo = PackageOptionRepository::new(state.get_db());
    let options = repo.find_all().await?;
    Ok(ApiResponse::success(options))
}

/// GET /api/package-options/{id} - one option
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PackageOption>> {
    let repo = PackageOptionRepository::new(state.get_db());
    let option = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OptionNotFound))?;
    Ok(ApiResponse::success(option))
}

/// POST /api/package-options - create an option under an existing package
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<CreateOptionRequest>,
) -> AppResult<ApiResponse<PackageOption>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::OptionInvalidPrice));
    }

    let packages = PackageRepository::new(state.get_db());
    let package = packages
        .find_by_id(&payload.package_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PackageNotFound))?;
    let package_id = package
        .id
        .ok_or_else(|| AppError::internal("package record without id"))?;

    let repo = PackageOptionRepository::new(state.get_db());
    let option = repo
        .create(PackageOption {
            id: None,
            package: package_id,
            name: payload.name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            image: payload.image,
            analysis: None,
            recommendation: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
        .await?;

    Ok(ApiResponse::success(option))
}

/// PUT /api/package-options/{id} - update fields that are present
///
/// Price changes never touch existing reservations; they keep the price
/// captured at booking time.
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOptionRequest>,
) -> AppResult<ApiResponse<PackageOption>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    if let Some(price) = payload.price
        && price < Decimal::ZERO
    {
        return Err(AppError::new(ErrorCode::OptionInvalidPrice));
    }

    let repo = PackageOptionRepository::new(state.get_db());
    let mut option = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OptionNotFound))?;

    if let Some(name) = payload.name {
        option.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        option.description = Some(description);
    }
    if let Some(price) = payload.price {
        option.price = price;
    }
    if let Some(image) = payload.image {
        option.image = Some(image);
    }

    let updated = repo.update(&id, option).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/package-options/{id} - cascades to the option's reservations
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let repo = PackageOptionRepository::new(state.get_db());
    if repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::new(ErrorCode::OptionNotFound));
    }

    let reservations = ReservationRepository::new(state.get_db());
    let removed = reservations.delete_for_option(&id).await?;
    repo.delete(&id).await?;

    tracing::info!("option {} deleted with {} reservations", id, removed);
    Ok(ApiResponse::ok())
}

/// POST /api/package-options/{id}/insights - summarize completed reviews
/// into analysis and recommendation text stored on the option
pub async fn generate_insights(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PackageOption>> {
    let repo = PackageOptionRepository::new(state.get_db());
    let option = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OptionNotFound))?;

    let reservations = ReservationRepository::new(state.get_db());
    let reviews: Vec<ReviewSnapshot> = reservations
        .reviews_for_option(&id)
        .await?
        .into_iter()
        .filter_map(|r| {
            Some(ReviewSnapshot {
                rating: r.rating?,
                text: r.review_text.unwrap_or_default(),
            })
        })
        .collect();

    if reviews.is_empty() {
        return Err(AppError::new(ErrorCode::OptionNoReviews));
    }

    let insights = state
        .sentiment()
        .summarize_reviews(&option.name, &reviews)
        .await?;

    let updated = repo
        .set_insights(&id, &insights.analysis, &insights.recommendation)
        .await?;
    Ok(ApiResponse::success(updated))
}

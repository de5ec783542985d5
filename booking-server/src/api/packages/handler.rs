//! Package catalog handlers
//!
//! Reads are public to authenticated users; writes require the admin role.

use axum::Json;
use axum::extract::{Path, State};

use crate::api::{ApiResponse, AppResult};
use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{
    CreatePackageRequest, Package, PackageWithOptions, UpdatePackageRequest,
};
use crate::db::repository::{
    PackageOptionRepository, PackageRepository, ReservationRepository,
};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, ErrorCode};

/// GET /api/packages - list packages, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Package>>> {
    let repo = PackageRepository::new(state.get_db());
    let mut packages = repo.find_all().await?;
    // Regular users only see active packages
    if !user.is_admin() {
        packages.retain(|p| p.is_active);
    }
    Ok(ApiResponse::success(packages))
}

/// GET /api/packages/{id} - one package with its options
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PackageWithOptions>> {
    let repo = PackageRepository::new(state.get_db());
    let package = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PackageNotFound))?;
    let options = repo.options_for(&id).await?;

    Ok(ApiResponse::success(PackageWithOptions { package, options }))
}

/// POST /api/packages - create a package
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<CreatePackageRequest>,
) -> AppResult<ApiResponse<Package>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;

    let repo = PackageRepository::new(state.get_db());
    let package = repo
        .create(Package {
            id: None,
            name: payload.name.trim().to_string(),
            description: payload.description,
            image: payload.image,
            analysis: None,
            recommendation: None,
            is_active: true,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
        .await?;

    Ok(ApiResponse::success(package))
}

/// PUT /api/packages/{id} - update fields that are present
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePackageRequest>,
) -> AppResult<ApiResponse<Package>> {
    if let Some(name) = payload.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;

    let repo = PackageRepository::new(state.get_db());
    let mut package = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PackageNotFound))?;

    if let Some(name) = payload.name {
        package.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        package.description = Some(description);
    }
    if let Some(image) = payload.image {
        package.image = Some(image);
    }
    if let Some(is_active) = payload.is_active {
        package.is_active = is_active;
    }

    let updated = repo.update(&id, package).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/packages/{id} - cascades to options and their reservations
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let repo = PackageRepository::new(state.get_db());
    if repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::new(ErrorCode::PackageNotFound));
    }

    let options = PackageOptionRepository::new(state.get_db());
    let reservations = ReservationRepository::new(state.get_db());
    for option in repo.options_for(&id).await? {
        let Some(option_id) = option.id.map(|oid| oid.to_string()) else {
            continue;
        };
        reservations.delete_for_option(&option_id).await?;
        options.delete(&option_id).await?;
    }

    repo.delete(&id).await?;
    tracing::info!("package {} deleted with its options", id);
    Ok(ApiResponse::ok())
}

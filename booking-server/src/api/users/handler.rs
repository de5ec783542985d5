//! User management handlers

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use shared::client::UserInfo;

use crate::api::{ApiResponse, AppResult};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UserPage {
    pub users: Vec<UserInfo>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// GET /api/users - list accounts, newest first
///
/// Pagination happens in memory; the embedded datastore mishandles
/// LIMIT with mixed record sets, and account counts stay small.
pub async fn list(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<UserPage>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    let repo = UserRepository::new(state.get_db());
    let all = repo.find_all().await?;
    let total = all.len();

    let users = all
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(|u| u.to_info())
        .collect();

    Ok(ApiResponse::success(UserPage {
        users,
        total,
        page,
        page_size,
    }))
}

/// GET /api/users/{id} - one account
pub async fn get_by_id(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(user.to_info()))
}

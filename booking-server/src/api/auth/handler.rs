//! Authentication handlers

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

use crate::api::{ApiResponse, AppResult};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::AppError;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_password, validate_required_text,
};

/// Minimum time every login attempt takes, masking user-lookup timing
const LOGIN_DELAY: Duration = Duration::from_millis(500);

/// POST /api/auth/register - create an account with the "user" role
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<ApiResponse<UserInfo>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let repo = UserRepository::new(state.get_db());
    let user = User::new(payload.name.trim(), &payload.email, &payload.password, "user")?;
    let created = repo.create(user).await?;

    tracing::info!("registered account {}", created.email);
    Ok(ApiResponse::success(created.to_info()))
}

/// POST /api/auth/login - exchange credentials for a token
///
/// Always takes at least [`LOGIN_DELAY`] and answers every failure with
/// the same message, so responses leak nothing about which part failed.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let started = std::time::Instant::now();
    let result = try_login(&state, &payload).await;
    if let Some(remaining) = LOGIN_DELAY.checked_sub(started.elapsed()) {
        tokio::time::sleep(remaining).await;
    }
    result.map(ApiResponse::success)
}

async fn try_login(state: &ServerState, payload: &LoginRequest) -> AppResult<LoginResponse> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| {
            security_log!(auth_failure, "login for unknown email");
            AppError::invalid_credentials()
        })?;

    if !user.verify_password(&payload.password) {
        security_log!(auth_failure, "bad password for {}", user.email);
        return Err(AppError::invalid_credentials());
    }
    if !user.is_active {
        security_log!(auth_failure, "login for disabled account {}", user.email);
        return Err(AppError::invalid_credentials());
    }

    let info = user.to_info();
    let token = state
        .get_jwt_service()
        .generate_token(&info.id, &info.name, &info.email, &info.role)
        .map_err(|e| AppError::internal(format!("token generation failed: {}", e)))?;

    tracing::info!("login succeeded for {}", info.email);
    Ok(LoginResponse { token, user: info })
}

/// GET /api/auth/me - current principal from the presented token
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let account = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::new(shared::ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(account.to_info()))
}

/// POST /api/auth/logout - stateless acknowledgement; clients drop the token
pub async fn logout(user: CurrentUser) -> ApiResponse<()> {
    tracing::info!("logout for {}", user.email);
    ApiResponse::ok()
}

//! Axum extractors for authenticated requests
//!
//! `CurrentUser` validates the bearer token once per request and caches the
//! principal in request extensions. `AdminUser` wraps it with a role check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

use super::jwt::CurrentUser;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse the principal if an earlier layer already validated the token
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                security_log!(auth_failure, "missing Authorization header");
                AppError::not_authenticated()
            })?;

        let token = crate::auth::JwtService::extract_from_header(header).ok_or_else(|| {
            security_log!(auth_failure, "malformed Authorization header");
            AppError::not_authenticated()
        })?;

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(auth_failure, "token validation failed: {}", e);
            match e {
                crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
                other => AppError::invalid_token(other.to_string()),
            }
        })?;

        let user = CurrentUser::from(claims);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Authenticated principal that must hold the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<ServerState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            security_log!(
                permission_denied,
                "user {} attempted admin operation",
                user.id
            );
            return Err(AppError::admin_required());
        }
        Ok(AdminUser(user))
    }
}

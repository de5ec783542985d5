//! API routing module
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - registration, login and session info
//! - [`users`] - admin account listing
//! - [`packages`] - package catalog
//! - [`package_options`] - bookable options and generated insights
//! - [`reservations`] - reservation lifecycle and reviews
//! - [`analytics`] - admin dashboard aggregates
//! - [`upload`] - image upload

pub mod analytics;
pub mod auth;
pub mod health;
pub mod package_options;
pub mod packages;
pub mod reservations;
pub mod upload;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Assemble the full application router
pub fn create_router(state: ServerState) -> Router {
    let uploads_dir = state.config().uploads_dir();

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(packages::router())
        .merge(package_options::router())
        .merge(reservations::router())
        .merge(analytics::router())
        .merge(upload::router())
        .nest_service("/uploads/images", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! Image upload API module (admin only)

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::core::ServerState;

/// Maximum accepted upload size (10 MB)
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload/image", post(handler::upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

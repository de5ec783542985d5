//! Shared types for the booking platform
//!
//! Contains the unified error system ([`error`]) and the client-facing
//! auth DTOs ([`client`]) used by the server and any API consumers.

pub mod client;
pub mod error;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

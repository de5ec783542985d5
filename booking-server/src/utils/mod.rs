//! Utility module - common helpers and re-exported error types
//!
//! # Contents
//!
//! - [`AppError`] / [`ApiResponse`] - unified error and envelope types (from shared::error)
//! - [`logger`] - tracing setup
//! - [`validation`] - input validation helpers

pub mod logger;
pub mod validation;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

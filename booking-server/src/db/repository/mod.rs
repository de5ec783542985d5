//! Repository layer
//!
//! Thin data-access wrappers around the embedded SurrealDB connection.
//! Repositories return [`RepoError`]; domain-specific error codes are
//! attached by the handlers and services that interpret the outcomes.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

pub mod package;
pub mod package_option;
pub mod reservation;
pub mod user;

pub use package::PackageRepository;
pub use package_option::PackageOptionRepository;
pub use reservation::{AnalyticsRow, DeleteOutcome, ReservationFilter, ReservationRepository};
pub use user::UserRepository;

/// Data-access errors
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<surrealdb::Error> for RepoError {
    fn from(e: surrealdb::Error) -> Self {
        let msg = e.to_string();
        if msg.contains("already contains") || msg.contains("unique") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => AppError::new(ErrorCode::NotFound),
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::AlreadyExists, msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!("database error: {}", msg);
                AppError::database(msg)
            }
        }
    }
}

/// Shared handle to the embedded database
#[derive(Clone)]
pub struct BaseRepository {
    pub db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }
}

//! Server configuration
//!
//! Everything comes from the environment with development-friendly
//! defaults. `with_overrides` exists for tests.

use std::path::{Path, PathBuf};

use crate::auth::JwtConfig;
use crate::core::error::{Result, ServerError};
use crate::services::SentimentConfig;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for database, logs and uploads
    pub work_dir: PathBuf,
    /// HTTP listen port
    pub http_port: u16,
    /// JWT settings
    pub jwt: JwtConfig,
    /// "development" | "production"
    pub environment: String,
    /// Sentiment classifier settings
    pub sentiment: SentimentConfig,
    /// Seed administrator email
    pub admin_email: String,
    /// Seed administrator password
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());

        Ok(Self {
            work_dir: PathBuf::from(work_dir),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            sentiment: SentimentConfig::default(),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "change-me-now".to_string()),
        })
    }

    /// Build a configuration with explicit overrides (test helper)
    pub fn with_overrides(work_dir: impl Into<PathBuf>, http_port: u16) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough!".to_string(),
                expiration_minutes: 60,
                issuer: "booking-server".to_string(),
                audience: "booking-clients".to_string(),
            },
            environment: "development".to_string(),
            sentiment: SentimentConfig {
                api_url: "http://127.0.0.1:1".to_string(),
                api_key: String::new(),
                model: "test".to_string(),
                timeout_ms: 1_000,
            },
            admin_email: "admin@example.com".to_string(),
            admin_password: "test-admin-password".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        !self.is_production()
    }

    /// Directory holding the embedded database
    pub fn database_dir(&self) -> PathBuf {
        self.work_dir.join("db")
    }

    /// Directory holding rolling log files
    pub fn logs_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    /// Directory holding uploaded images
    pub fn uploads_dir(&self) -> PathBuf {
        self.work_dir.join("uploads").join("images")
    }

    /// Create the working directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> Result<()> {
        for dir in [
            self.work_dir.as_path(),
            &self.database_dir(),
            &self.logs_dir(),
            &self.uploads_dir(),
        ] {
            create_dir_checked(dir)?;
        }
        Ok(())
    }
}

fn create_dir_checked(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        ServerError::Config(format!("failed to create {}: {}", path.display(), e))
    })
}

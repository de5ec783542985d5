//! Shared server state
//!
//! One `ServerState` is built at startup and cloned into every handler.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::db;
use crate::services::{HttpSentimentService, SentimentClassifier};

#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
    db: Surreal<Db>,
    jwt_service: Arc<JwtService>,
    sentiment: Arc<dyn SentimentClassifier>,
}

impl ServerState {
    /// Open the database, seed the admin account and assemble state
    pub async fn initialize(config: Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir();
        let db = db::connect(db_path.to_str().ok_or_else(|| {
            crate::core::error::ServerError::Config("non-utf8 database path".to_string())
        })?)
        .await?;

        db::ensure_admin(&db, &config.admin_email, &config.admin_password).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sentiment: Arc<dyn SentimentClassifier> =
            Arc::new(HttpSentimentService::new(config.sentiment.clone())?);

        Ok(Self {
            config: Arc::new(config),
            db,
            jwt_service,
            sentiment,
        })
    }

    /// Assemble state from pre-built parts (test helper)
    pub fn with_parts(
        config: Config,
        db: Surreal<Db>,
        sentiment: Arc<dyn SentimentClassifier>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config: Arc::new(config),
            db,
            jwt_service,
            sentiment,
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn sentiment(&self) -> Arc<dyn SentimentClassifier> {
        self.sentiment.clone()
    }
}

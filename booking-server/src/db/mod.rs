//! Database module
//!
//! Embedded SurrealDB (RocksDB backend) with schema definition and
//! startup seeding.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Namespace used by the server
const NAMESPACE: &str = "booking";
/// Database used by the server
const DATABASE: &str = "main";

/// Open the embedded database at the given path and prepare the schema
pub async fn connect(path: &str) -> AppResult<Surreal<Db>> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("failed to select namespace: {}", e)))?;

    define_schema(&db).await?;
    Ok(db)
}

/// Define tables and indexes. Idempotent across restarts.
async fn define_schema(db: &Surreal<Db>) -> AppResult<()> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;
        DEFINE TABLE IF NOT EXISTS package SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS package_option SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS option_package ON TABLE package_option COLUMNS package;
        DEFINE TABLE IF NOT EXISTS reservation SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS reservation_user ON TABLE reservation COLUMNS user;
        DEFINE INDEX IF NOT EXISTS reservation_status ON TABLE reservation COLUMNS status;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("schema definition failed: {}", e)))?;
    Ok(())
}

/// Seed the administrator account when it does not exist yet
pub async fn ensure_admin(db: &Surreal<Db>, email: &str, password: &str) -> AppResult<()> {
    let users = UserRepository::new(db.clone());
    if users.find_by_email(email).await.map_err(AppError::from)?.is_some() {
        return Ok(());
    }

    let admin = User::new("Administrator", email, password, "admin")?;
    users.create(admin).await.map_err(AppError::from)?;
    tracing::info!("seeded administrator account: {}", email);
    Ok(())
}

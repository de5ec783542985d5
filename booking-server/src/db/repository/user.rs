//! User repository

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::User;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a user. Fails with `Duplicate` when the email is taken.
    pub async fn create(&self, user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "email already registered: {}",
                user.email
            )));
        }

        let created: Option<User> = self.base.db.create("user").content(user).await?;
        created.ok_or(RepoError::Database("user insert returned nothing".into()))
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("invalid user id: {}", id)))?;
        let user: Option<User> = self.base.db.select(record_id).await?;
        Ok(user)
    }

    /// All users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut result = self
            .base
            .db
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users)
    }

    /// Total registered accounts
    pub async fn count(&self) -> RepoResult<usize> {
        let users = self.find_all().await?;
        Ok(users.len())
    }
}

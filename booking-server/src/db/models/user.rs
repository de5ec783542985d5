//! User account model

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use shared::client::UserInfo;
use surrealdb::RecordId;

use super::serde_helpers;
use crate::utils::AppError;

/// User account record
///
/// `hash_pass` never leaves the server; API responses use [`UserInfo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub hash_pass: String,
    /// "user" | "admin"
    pub role: String,
    #[serde(default = "serde_helpers::bool_true")]
    pub is_active: bool,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

impl User {
    /// Build a new user record with a freshly hashed password
    pub fn new(name: &str, email: &str, password: &str, role: &str) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            name: name.to_string(),
            email: email.trim().to_lowercase(),
            hash_pass: Self::hash_password(password)?,
            role: role.to_string(),
            is_active: true,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Hash a password with Argon2id and a random salt
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a candidate password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.hash_pass)
            .map(|hash| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Public view of this account
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

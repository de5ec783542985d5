//! Input validation helpers
//!
//! Small, explicit checks shared by the API handlers. Length bounds match
//! the storage schema; validation failures never touch the database.

use crate::utils::AppError;

/// Maximum length for names and titles
pub const MAX_NAME_LEN: usize = 200;
/// Maximum length for free-text descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;
/// Maximum length for a reservation address
pub const MAX_ADDRESS_LEN: usize = 500;
/// Maximum length for review text
pub const MAX_REVIEW_LEN: usize = 2000;
/// Maximum length for an email address (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;
/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;
/// Maximum password length
pub const MAX_PASSWORD_LEN: usize = 128;

/// Validate a required text field: non-empty after trim, bounded length
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)).with_detail("field", field));
    }
    if trimmed.len() > max_len {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an optional text field: bounded length when present
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an email address (pragmatic check, uniqueness enforced by the database)
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation("A valid email address is required")
            .with_detail("field", "email"));
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(AppError::validation("A valid email address is required")
            .with_detail("field", "email"));
    }
    Ok(())
}

/// Validate a password against length bounds
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(shared::ErrorCode::PasswordTooShort));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Validate a review rating: integer in [1, 5]
pub fn validate_rating(rating: i64) -> Result<u8, AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::new(shared::ErrorCode::RatingOutOfRange)
            .with_detail("rating", rating));
    }
    Ok(rating as u8)
}

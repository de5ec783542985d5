//! Unified error codes for the booking platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Reservation errors
//! - 6xxx: Catalog errors (packages, options, uploads)
//! - 9xxx: System errors (incl. 93xx AI collaborator)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailExists = 3002,
    /// Password too short
    PasswordTooShort = 3003,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Status transition not allowed from the current state
    IllegalTransition = 4002,
    /// Reservation cannot be deleted in its current state
    ReservationNotDeletable = 4003,
    /// Review only allowed on completed reservations
    ReviewNotAllowed = 4004,
    /// Rating must be an integer between 1 and 5
    RatingOutOfRange = 4005,
    /// Caller does not own this reservation
    NotReservationOwner = 4006,

    // ==================== 6xxx: Catalog ====================
    /// Package not found
    PackageNotFound = 6001,
    /// Package has options
    PackageHasOptions = 6002,
    /// Package option not found
    OptionNotFound = 6101,
    /// Package option has reservations
    OptionHasReservations = 6102,
    /// Option price is invalid
    OptionInvalidPrice = 6103,
    /// Option has no completed reviews to analyze
    OptionNoReviews = 6104,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Image processing failed
    ImageProcessingFailed = 6507,
    /// File storage failed
    FileStorageFailed = 6508,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 93xx: AI Collaborator ====================
    /// Sentiment service unreachable or errored
    SentimentUnavailable = 9301,
    /// Sentiment service returned a malformed or out-of-enum response
    SentimentInvalidResponse = 9302,
    /// Sentiment service call timed out
    SentimentTimeout = 9303,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::IllegalTransition => "Status transition not allowed",
            ErrorCode::ReservationNotDeletable => {
                "Reservation cannot be deleted in its current state"
            }
            ErrorCode::ReviewNotAllowed => "Reviews are only allowed on completed reservations",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 5",
            ErrorCode::NotReservationOwner => "Reservation does not belong to the caller",

            // Catalog
            ErrorCode::PackageNotFound => "Package not found",
            ErrorCode::PackageHasOptions => "Package has associated options",
            ErrorCode::OptionNotFound => "Package option not found",
            ErrorCode::OptionHasReservations => "Package option has associated reservations",
            ErrorCode::OptionInvalidPrice => "Option price is invalid",
            ErrorCode::OptionNoReviews => "Option has no completed reviews to analyze",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",

            // AI collaborator
            ErrorCode::SentimentUnavailable => "Sentiment service is unavailable",
            ErrorCode::SentimentInvalidResponse => "Sentiment service returned an invalid response",
            ErrorCode::SentimentTimeout => "Sentiment service call timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // User
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailExists),
            3003 => Ok(ErrorCode::PasswordTooShort),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::IllegalTransition),
            4003 => Ok(ErrorCode::ReservationNotDeletable),
            4004 => Ok(ErrorCode::ReviewNotAllowed),
            4005 => Ok(ErrorCode::RatingOutOfRange),
            4006 => Ok(ErrorCode::NotReservationOwner),

            // Catalog
            6001 => Ok(ErrorCode::PackageNotFound),
            6002 => Ok(ErrorCode::PackageHasOptions),
            6101 => Ok(ErrorCode::OptionNotFound),
            6102 => Ok(ErrorCode::OptionHasReservations),
            6103 => Ok(ErrorCode::OptionInvalidPrice),
            6104 => Ok(ErrorCode::OptionNoReviews),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::ImageProcessingFailed),
            6508 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            // AI collaborator
            9301 => Ok(ErrorCode::SentimentUnavailable),
            9302 => Ok(ErrorCode::SentimentInvalidResponse),
            9303 => Ok(ErrorCode::SentimentTimeout),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);

        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);

        assert_eq!(ErrorCode::UserNotFound.code(), 3001);
        assert_eq!(ErrorCode::EmailExists.code(), 3002);

        assert_eq!(ErrorCode::ReservationNotFound.code(), 4001);
        assert_eq!(ErrorCode::IllegalTransition.code(), 4002);
        assert_eq!(ErrorCode::ReservationNotDeletable.code(), 4003);
        assert_eq!(ErrorCode::ReviewNotAllowed.code(), 4004);
        assert_eq!(ErrorCode::RatingOutOfRange.code(), 4005);
        assert_eq!(ErrorCode::NotReservationOwner.code(), 4006);

        assert_eq!(ErrorCode::PackageNotFound.code(), 6001);
        assert_eq!(ErrorCode::OptionNotFound.code(), 6101);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::SentimentUnavailable.code(), 9301);
        assert_eq!(ErrorCode::SentimentInvalidResponse.code(), 9302);
        assert_eq!(ErrorCode::SentimentTimeout.code(), 9303);
    }

    #[test]
    fn test_try_from_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::AdminRequired,
            ErrorCode::ReservationNotFound,
            ErrorCode::IllegalTransition,
            ErrorCode::OptionHasReservations,
            ErrorCode::SentimentUnavailable,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ReservationNotFound).unwrap(),
            "4001"
        );

        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::IllegalTransition);
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::ReservationNotFound.message(),
            "Reservation not found"
        );
        assert_eq!(ErrorCode::RatingOutOfRange.message(), "Rating must be between 1 and 5");
    }
}

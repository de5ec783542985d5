//! Authentication module
//!
//! JWT token issuance/validation and request extractors for the
//! authenticated principal.

pub mod extractor;
pub mod jwt;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

//! Booking Server - package reservation backend
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SurrealDB storage with repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **Services** (`services`): reviews, sentiment classification, analytics
//! - **HTTP API** (`api`): RESTful interface
//!
//! # Module structure
//!
//! ```text
//! booking-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT auth, extractors
//! ├── services/      # reviews, sentiment, analytics
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logging, validation
//! └── db/            # models and repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - tagged events for auth and permission failures
#[macro_export]
macro_rules! security_log {
    ($event:ident, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = stringify!($event),
            $($arg)*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}

/// Load .env, prepare the working directory and start logging
pub fn setup_environment() -> core::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

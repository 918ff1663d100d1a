//! Verdant Store Server - organic products storefront and admin backend
//!
//! # Architecture overview
//!
//! - **Auth** (`auth`): JWT session gate, permission catalog, pure
//!   authorization evaluator, axum middleware
//! - **Database** (`db`): embedded SurrealDB storage, seed routine, legacy
//!   catalog backfill
//! - **HTTP API** (`api`): storefront + admin REST routes
//! - **Activity** (`activity`): fire-and-forget admin activity trail
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT, session gate, evaluator, catalog, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models, repositories, seed, backfill
//! ├── activity/      # admin activity recorder
//! └── utils/         # errors, logging, time
//! ```

pub mod activity;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{Identity, JwtService, RoleTier};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured auth events under the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging; call once at process start
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    init_logger_with_file(Some(&config.log_level), logs_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
                    _             _
__   _____ _ __ __| | __ _ _ __ | |_
\ \ / / _ \ '__/ _` |/ _` | '_ \| __|
 \ V /  __/ | | (_| | (_| | | | | |_
  \_/ \___|_|  \__,_|\__,_|_| |_|\__|
    "#
    );
}

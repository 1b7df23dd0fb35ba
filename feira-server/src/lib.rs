//! Feira Server - content backend for the fair's marketing site
//!
//! # Overview
//!
//! - **Home document** (`content::merge`): partial updates that overwrite,
//!   accumulate or retain each field group
//! - **Galleries** (`content::galleries`): photo galleries with a 40 photo cap
//!   and self-healing of legacy records
//! - **Storage** (`db`): one JSON file per document, written atomically
//! - **Media** (`services::media`): flat uploads directory
//! - **HTTP API** (`api`): axum routes
//!
//! # Module layout
//!
//! ```text
//! feira-server/src/
//! ├── core/          # config, state, server, startup errors
//! ├── content/       # pure merge / mutation engines
//! ├── db/            # JSON file stores and repositories
//! ├── services/      # home, gallery and media services
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, error re-exports
//! ```

pub mod api;
pub mod content;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Load `.env` and start logging from the resulting configuration
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ______     _
   / ____/__  (_)________ _
  / /_  / _ \/ / ___/ __ `/
 / __/ /  __/ / /  / /_/ /
/_/    \___/_/_/   \__,_/
    "#
    );
}

//! # routeguard-log
//!
//! Global `tracing` subscriber setup for services built on routeguard.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), routeguard_log::LogError> {
//!     routeguard_log::auto_init()?;
//!     tracing::info!(port = 8080, "server starting");
//!     Ok(())
//! }
//! ```
//!
//! `auto_init` reads `ROUTEGUARD_LOG` (or `RUST_LOG`) and
//! `ROUTEGUARD_LOG_FORMAT` when set, and otherwise picks the development
//! preset in debug builds and the production preset in release builds.

#![forbid(unsafe_code)]

mod builder;
mod config;
mod error;

pub use builder::LoggerBuilder;
pub use config::{Config, Format};
pub use error::{LogError, LogResult};

/// Initializes from the environment, or a preset matching the build profile.
///
/// # Errors
///
/// See [`init_with`].
pub fn auto_init() -> LogResult<()> {
    let configured =
        std::env::var_os("ROUTEGUARD_LOG").is_some() || std::env::var_os("RUST_LOG").is_some();
    if configured {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initializes with the default configuration.
///
/// # Errors
///
/// See [`init_with`].
pub fn init() -> LogResult<()> {
    init_with(Config::default())
}

/// Initializes with a custom configuration.
///
/// # Errors
///
/// Returns [`LogError::Filter`] for a malformed level directive and
/// [`LogError::AlreadyInitialized`] if a global subscriber is already set.
pub fn init_with(config: Config) -> LogResult<()> {
    LoggerBuilder::from_config(config).build()
}

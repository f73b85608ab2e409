//! Futures trading CLI.
//!
//! Thin binary over `gate-trader`: configuration, logging, and a clap
//! command per orchestrator operation.

pub mod config;
pub mod error;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use logging::init_logging;

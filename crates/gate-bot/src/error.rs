//! Application error types.
//!
//! Trader and API errors surface through `anyhow` in `main`; the only
//! application-level failure of its own is configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

//! Trader error types.

use gate_api::ApiError;
use thiserror::Error;

/// Errors from the trading adapter.
///
/// Validation variants carry concrete numeric guidance in their
/// display strings so callers can surface actionable messages
/// ("minimum 0.001 BTC, about 65 USDT") without re-deriving them.
#[derive(Debug, Error)]
pub enum TraderError {
    /// The symbol has no entry in the contract table, even after a
    /// fresh refresh.
    #[error("unknown symbol: {0}")]
    SymbolNotFound(String),

    /// Requested quantity converts to fewer contracts than the
    /// exchange minimum.
    #[error("order size too small: {guidance}")]
    BelowMinimumSize { guidance: String },

    /// Requested quantity rounds to zero contracts at the symbol's
    /// size precision.
    #[error("order size rounds to zero: {guidance}")]
    ZeroAfterRounding { guidance: String },

    /// Order value is below the exchange's minimum notional.
    #[error("order value too small: {guidance}")]
    BelowMinimumNotional { guidance: String },

    /// A close or protective-order operation found no open position.
    #[error("no open position for {0}")]
    NoOpenPosition(String),

    /// Leverage must be a positive integer.
    #[error("invalid leverage {0}: must be positive")]
    InvalidLeverage(i32),

    /// The ticker returned no usable last price.
    #[error("market price unavailable for {0}")]
    PriceUnavailable(String),

    /// Upstream API failure (transport, auth, decode, rejection).
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type TraderResult<T> = Result<T, TraderError>;

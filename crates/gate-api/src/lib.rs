//! Signed REST client for the exchange's USDT-settled futures API.
//!
//! This crate speaks the exchange's wire format exactly as it comes:
//! symbols in exchange spelling, sizes in signed contract counts,
//! prices as decimal strings. Everything user-facing (canonical
//! symbols, coin quantities) lives one layer up in `gate-trader`.
//!
//! The [`FuturesApi`] trait is the injection seam: production code
//! uses [`HttpFuturesApi`], tests use [`MockFuturesApi`].

pub mod client;
pub mod error;
pub mod mock;
pub mod sign;
pub mod types;

pub use client::{
    market_order, protective_order, BoxFuture, Credentials, FuturesApi, HttpFuturesApi,
    DEFAULT_BASE_URL,
};
pub use error::{ApiError, ApiResult};
pub use mock::MockFuturesApi;
pub use types::{
    Contract, FuturesAccount, FuturesInitialOrder, FuturesOrder, FuturesOrderAck,
    FuturesPriceTrigger, FuturesTicker, MarginMode, PriceTriggeredOrder, RawPosition,
    TriggerOrderAck,
};

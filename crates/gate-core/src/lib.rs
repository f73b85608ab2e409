//! Core domain types for the Gate futures trading adapter.
//!
//! This crate provides the fundamental types used throughout the adapter:
//! - `Price`, `Qty`, `Contracts`: precision-safe numeric types
//! - Symbol normalization between canonical (`BTCUSDT`) and exchange
//!   (`BTC_USDT`) spellings
//! - `PositionSide`, `TimeInForce`: trading enums

pub mod decimal;
pub mod order;
pub mod symbol;

pub use decimal::{Contracts, Price, Qty};
pub use order::{PositionSide, TimeInForce};
pub use symbol::{to_canonical_symbol, to_exchange_symbol};

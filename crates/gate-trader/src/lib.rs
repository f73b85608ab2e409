//! Futures trading adapter.
//!
//! Presents a coin-quantity interface over an exchange whose native
//! unit is the contract. The pieces:
//!
//! - [`cache`]: TTL-cached balance, positions, and symbol specs
//! - [`convert`]: coin quantity to contract size conversion with
//!   minimum-size and rounding guards
//! - [`trader`]: the [`FuturesTrader`] order orchestrator
//! - [`triggers`]: stop-loss / take-profit classification of
//!   conditional orders
//! - [`clock`]: injectable time source for deterministic TTL tests

pub mod cache;
pub mod clock;
pub mod convert;
pub mod error;
pub mod trader;
pub mod triggers;
pub mod types;

pub use cache::MetadataCache;
pub use clock::{Clock, FakeClock, SystemClock};
pub use convert::{check_min_notional, convert_quantity, min_open_amount, ConvertedQuantity, MIN_NOTIONAL_USDT};
pub use error::{TraderError, TraderResult};
pub use trader::{FuturesTrader, OrderResult};
pub use triggers::{classify, TriggerKind};
pub use types::{Balance, CacheEntry, Position, SymbolSpec};

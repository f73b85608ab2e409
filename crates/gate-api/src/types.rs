//! Wire types for the exchange's USDT-settled futures REST API.
//!
//! Monetary and size fields arrive as decimal strings and are parsed
//! defensively by the helpers here: an unparseable field falls back to
//! a documented default rather than failing the whole response.

use gate_core::TimeInForce;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Futures account summary, one per settlement currency.
///
/// Endpoint: GET /futures/{settle}/accounts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesAccount {
    /// Total balance as a decimal string.
    #[serde(default)]
    pub total: String,
    /// Available (not locked in positions/orders) balance.
    #[serde(default)]
    pub available: String,
    /// Unrealized PnL across all positions.
    #[serde(default)]
    pub unrealised_pnl: String,
    /// Settlement currency (e.g. "USDT").
    #[serde(default)]
    pub currency: String,
}

/// Raw position from the exchange.
///
/// Endpoint: GET /futures/{settle}/positions
///
/// `size` is the exchange-native signed contract count: positive for
/// long, negative for short, zero for flat.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPosition {
    /// Contract name in exchange spelling (e.g. "BTC_USDT").
    pub contract: String,
    /// Signed contract count.
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub entry_price: String,
    #[serde(default)]
    pub mark_price: String,
    #[serde(default)]
    pub unrealised_pnl: String,
    #[serde(default)]
    pub leverage: String,
    #[serde(default)]
    pub liq_price: String,
}

impl RawPosition {
    /// Parse a price-like field, defaulting to zero when unparseable.
    pub fn parse_or_zero(field: &str) -> Decimal {
        field.parse().unwrap_or(Decimal::ZERO)
    }
}

/// Per-symbol contract specification.
///
/// Endpoint: GET /futures/{settle}/contracts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Contract {
    /// Contract name in exchange spelling.
    pub name: String,
    /// Coin quantity represented by one contract, as a decimal string.
    /// Empty or unparseable values default to 1 upstream.
    #[serde(default)]
    pub quanto_multiplier: String,
    /// Minimum tradable contract count.
    #[serde(default)]
    pub order_size_min: i64,
    /// Order size rounding increment as a decimal string; its
    /// fractional-digit count defines the size precision.
    #[serde(default)]
    pub order_price_round: String,
}

/// Ticker snapshot for one contract.
///
/// Endpoint: GET /futures/{settle}/tickers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesTicker {
    pub contract: String,
    /// Last traded price as a decimal string.
    #[serde(default)]
    pub last: String,
}

impl FuturesTicker {
    /// Parse the last price; `None` when missing or unparseable.
    pub fn last_price(&self) -> Option<Decimal> {
        self.last.parse().ok().filter(|p: &Decimal| *p > Decimal::ZERO)
    }
}

/// Margin mode for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    Cross,
    Isolated,
}

impl fmt::Display for MarginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cross => write!(f, "cross"),
            Self::Isolated => write!(f, "isolated"),
        }
    }
}

/// Futures order request/response.
///
/// Endpoint: POST /futures/{settle}/orders
///
/// `size` is signed: positive buys, negative sells. Market orders use
/// price "0" with `ioc`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesOrder {
    pub contract: String,
    /// Signed contract size, sent as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    /// Limit price; "0" for market orders.
    pub price: String,
    #[serde(default)]
    pub reduce_only: bool,
    pub tif: TimeInForce,
    /// Client order tag; the exchange requires a "t-" prefix.
    #[serde(default)]
    pub text: String,
}

/// Acknowledgement for a placed or listed order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesOrderAck {
    pub id: i64,
    pub contract: String,
    #[serde(default)]
    pub status: String,
}

/// Initial order embedded in a price-triggered order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesInitialOrder {
    pub contract: String,
    /// Signed contract size; sign opposite the position reduces it.
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    pub price: String,
    pub tif: TimeInForce,
}

/// Trigger condition for a price-triggered order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FuturesPriceTrigger {
    /// 0 = trigger by price.
    #[serde(default)]
    pub strategy_type: i32,
    /// 0 = latest traded price.
    #[serde(default)]
    pub price_type: i32,
    /// Trigger price as a decimal string.
    #[serde(default)]
    pub price: String,
}

/// Price-triggered (conditional) order.
///
/// Endpoints: POST/GET /futures/{settle}/price_orders,
/// DELETE /futures/{settle}/price_orders/{order_id}
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceTriggeredOrder {
    /// Order id; zero in creation requests, assigned by the exchange.
    #[serde(default)]
    pub id: i64,
    pub initial: FuturesInitialOrder,
    pub trigger: FuturesPriceTrigger,
}

impl PriceTriggeredOrder {
    /// Parse the trigger price; `None` when missing or unparseable.
    pub fn trigger_price(&self) -> Option<Decimal> {
        self.trigger
            .price
            .parse()
            .ok()
            .filter(|p: &Decimal| *p > Decimal::ZERO)
    }
}

/// Acknowledgement for a created price-triggered order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriggerOrderAck {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_size_serialized_as_string() {
        let order = FuturesOrder {
            contract: "BTC_USDT".to_string(),
            size: dec!(-5),
            price: "0".to_string(),
            reduce_only: true,
            tif: TimeInForce::Ioc,
            text: "t-gate-bot".to_string(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["size"], "-5");
        assert_eq!(json["tif"], "ioc");
    }

    #[test]
    fn test_ticker_defensive_parse() {
        let ticker = FuturesTicker {
            contract: "BTC_USDT".to_string(),
            last: "not-a-number".to_string(),
        };
        assert!(ticker.last_price().is_none());

        let ticker = FuturesTicker {
            contract: "BTC_USDT".to_string(),
            last: "65000.5".to_string(),
        };
        assert_eq!(ticker.last_price().unwrap(), dec!(65000.5));
    }

    #[test]
    fn test_trigger_price_defensive_parse() {
        let order = PriceTriggeredOrder {
            id: 1,
            initial: FuturesInitialOrder {
                contract: "BTC_USDT".to_string(),
                size: dec!(-1),
                price: "90000".to_string(),
                tif: TimeInForce::Gtc,
            },
            trigger: FuturesPriceTrigger {
                strategy_type: 0,
                price_type: 0,
                price: String::new(),
            },
        };
        assert!(order.trigger_price().is_none());
    }

    #[test]
    fn test_position_deserialize_with_missing_fields() {
        let raw: RawPosition =
            serde_json::from_str(r#"{"contract":"BTC_USDT","size":-3}"#).unwrap();
        assert_eq!(raw.size, -3);
        assert_eq!(RawPosition::parse_or_zero(&raw.entry_price), dec!(0));
    }
}

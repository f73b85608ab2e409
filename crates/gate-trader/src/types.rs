//! Domain types derived from exchange wire records.
//!
//! Wire records (`gate-api`) keep the exchange's spelling and string
//! fields; the types here are what the rest of the adapter works with:
//! parsed decimals, explicit sides, positive quantities.

use chrono::{DateTime, Utc};
use gate_api::{Contract, FuturesAccount, RawPosition};
use gate_core::{to_canonical_symbol, PositionSide, Qty};
use rust_decimal::Decimal;
use tracing::warn;

/// Account balance snapshot in the settlement currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub total: Decimal,
    pub available: Decimal,
    pub unrealised_pnl: Decimal,
}

impl From<&FuturesAccount> for Balance {
    fn from(account: &FuturesAccount) -> Self {
        Self {
            total: RawPosition::parse_or_zero(&account.total),
            available: RawPosition::parse_or_zero(&account.available),
            unrealised_pnl: RawPosition::parse_or_zero(&account.unrealised_pnl),
        }
    }
}

/// An open position in coin terms.
///
/// `coin_qty` is always positive; direction lives in `side`.
#[derive(Debug, Clone)]
pub struct Position {
    /// Canonical symbol ("BTCUSDT").
    pub symbol: String,
    /// Exchange spelling ("BTC_USDT").
    pub contract: String,
    pub side: PositionSide,
    /// Position size in coin units, always positive.
    pub coin_qty: Qty,
    /// Raw contract count, always positive.
    pub contracts: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub unrealised_pnl: Decimal,
    pub leverage: Decimal,
    pub liq_price: Decimal,
}

impl Position {
    /// Build from a raw position and its symbol spec.
    ///
    /// Returns `None` for flat (zero-size) positions. When no spec is
    /// available the raw contract count is used as the coin quantity,
    /// with a diagnostic; the position is never dropped for that.
    pub fn from_raw(raw: &RawPosition, spec: Option<&SymbolSpec>) -> Option<Self> {
        if raw.size == 0 {
            return None;
        }
        let side = if raw.size > 0 {
            PositionSide::Long
        } else {
            PositionSide::Short
        };
        let contracts = Decimal::from(raw.size.unsigned_abs());
        let coin_qty = match spec {
            Some(spec) => Qty::new(contracts * spec.multiplier),
            None => {
                warn!(
                    contract = %raw.contract,
                    "no spec for position, using raw contract count as coin quantity"
                );
                Qty::new(contracts)
            }
        };
        Some(Self {
            symbol: to_canonical_symbol(&raw.contract),
            contract: raw.contract.clone(),
            side,
            coin_qty,
            contracts,
            entry_price: RawPosition::parse_or_zero(&raw.entry_price),
            mark_price: RawPosition::parse_or_zero(&raw.mark_price),
            unrealised_pnl: RawPosition::parse_or_zero(&raw.unrealised_pnl),
            leverage: RawPosition::parse_or_zero(&raw.leverage),
            liq_price: RawPosition::parse_or_zero(&raw.liq_price),
        })
    }
}

/// Per-symbol trading parameters, parsed and defaulted once at cache
/// refresh time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSpec {
    /// Exchange spelling of the contract.
    pub contract: String,
    /// Coin quantity represented by one contract. Always positive;
    /// missing or invalid wire values default to 1.
    pub multiplier: Decimal,
    /// Minimum tradable contract count.
    pub min_contract_size: Decimal,
    /// Order size rounding increment, as reported by the exchange.
    pub rounding_increment: Option<String>,
}

/// Size precision when the exchange omits the rounding increment.
pub const DEFAULT_PRECISION: u32 = 3;

impl SymbolSpec {
    /// Parse one contract record.
    pub fn from_wire(contract: &Contract) -> Self {
        let multiplier = match contract.quanto_multiplier.parse::<Decimal>() {
            Ok(m) if m > Decimal::ZERO => m,
            _ => {
                warn!(
                    contract = %contract.name,
                    raw = %contract.quanto_multiplier,
                    "missing or invalid quanto multiplier, defaulting to 1"
                );
                Decimal::ONE
            }
        };
        let rounding_increment = if contract.order_price_round.is_empty() {
            None
        } else {
            Some(contract.order_price_round.clone())
        };
        Self {
            contract: contract.name.clone(),
            multiplier,
            min_contract_size: Decimal::from(contract.order_size_min),
            rounding_increment,
        }
    }

    /// Contract-count precision: the fractional-digit count of the
    /// rounding increment. No increment reported means the default of
    /// 3; an integer increment means 0.
    pub fn precision(&self) -> u32 {
        match &self.rounding_increment {
            None => DEFAULT_PRECISION,
            Some(increment) => match increment.split_once('.') {
                Some((_, fraction)) => fraction.len() as u32,
                None => 0,
            },
        }
    }
}

/// A cached value with its capture time.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contract(multiplier: &str, min: i64, round: &str) -> Contract {
        Contract {
            name: "BTC_USDT".to_string(),
            quanto_multiplier: multiplier.to_string(),
            order_size_min: min,
            order_price_round: round.to_string(),
        }
    }

    #[test]
    fn test_spec_parses_multiplier() {
        let spec = SymbolSpec::from_wire(&contract("0.0001", 1, "0.01"));
        assert_eq!(spec.multiplier, dec!(0.0001));
        assert_eq!(spec.min_contract_size, dec!(1));
        assert_eq!(spec.precision(), 2);
    }

    #[test]
    fn test_spec_multiplier_defaults_to_one() {
        assert_eq!(SymbolSpec::from_wire(&contract("", 1, "")).multiplier, dec!(1));
        assert_eq!(SymbolSpec::from_wire(&contract("0", 1, "")).multiplier, dec!(1));
        assert_eq!(SymbolSpec::from_wire(&contract("-2", 1, "")).multiplier, dec!(1));
    }

    #[test]
    fn test_precision_defaults_and_integer_increment() {
        assert_eq!(SymbolSpec::from_wire(&contract("1", 1, "")).precision(), 3);
        assert_eq!(SymbolSpec::from_wire(&contract("1", 1, "1")).precision(), 0);
        assert_eq!(SymbolSpec::from_wire(&contract("1", 1, "0.001")).precision(), 3);
    }

    #[test]
    fn test_position_from_raw_short() {
        let raw = RawPosition {
            contract: "ETH_USDT".to_string(),
            size: -20,
            entry_price: "3000".to_string(),
            mark_price: "2900".to_string(),
            unrealised_pnl: "2".to_string(),
            leverage: "10".to_string(),
            liq_price: "4000".to_string(),
        };
        let spec = SymbolSpec {
            contract: "ETH_USDT".to_string(),
            multiplier: dec!(0.01),
            min_contract_size: dec!(1),
            rounding_increment: None,
        };
        let position = Position::from_raw(&raw, Some(&spec)).unwrap();
        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.coin_qty.inner(), dec!(0.2));
        assert_eq!(position.contracts, dec!(20));
        assert_eq!(position.symbol, "ETHUSDT");
    }

    #[test]
    fn test_flat_position_skipped() {
        let raw = RawPosition {
            contract: "BTC_USDT".to_string(),
            size: 0,
            entry_price: String::new(),
            mark_price: String::new(),
            unrealised_pnl: String::new(),
            leverage: String::new(),
            liq_price: String::new(),
        };
        assert!(Position::from_raw(&raw, None).is_none());
    }

    #[test]
    fn test_position_without_spec_uses_contract_count() {
        let raw = RawPosition {
            contract: "XYZ_USDT".to_string(),
            size: 7,
            entry_price: String::new(),
            mark_price: String::new(),
            unrealised_pnl: String::new(),
            leverage: String::new(),
            liq_price: String::new(),
        };
        let position = Position::from_raw(&raw, None).unwrap();
        assert_eq!(position.coin_qty.inner(), dec!(7));
    }
}

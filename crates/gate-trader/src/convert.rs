//! Coin quantity to contract size conversion.
//!
//! The single gate every order-placing operation passes through:
//! divide by the multiplier, check the exchange minimum, round to the
//! symbol's size precision, refuse sizes that round away to nothing.
//! Error guidance strings carry the smallest viable quantity and,
//! when a market price is at hand, its approximate notional.

use crate::error::{TraderError, TraderResult};
use crate::types::SymbolSpec;
use gate_core::{Contracts, Price, Qty};
use rust_decimal::Decimal;

/// Exchange minimum order value in the settlement currency.
pub const MIN_NOTIONAL_USDT: Decimal = Decimal::TEN;

/// A coin quantity converted and rounded to exchange contract terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedQuantity {
    /// Rounded contract count, always positive.
    pub contracts: Contracts,
    /// Fractional digits of the symbol's size precision.
    pub precision: u32,
}

impl ConvertedQuantity {
    /// Fixed-precision wire string.
    pub fn wire(&self) -> String {
        self.contracts.to_wire(self.precision)
    }
}

/// Convert a coin quantity to a tradable contract count.
///
/// `market_price` is only used to enrich error guidance; conversion
/// itself never needs it.
pub fn convert_quantity(
    spec: &SymbolSpec,
    qty: Qty,
    market_price: Option<Price>,
) -> TraderResult<ConvertedQuantity> {
    let contracts = qty.to_contracts(spec.multiplier);
    let precision = spec.precision();

    if spec.min_contract_size > Decimal::ZERO && contracts.inner() < spec.min_contract_size {
        return Err(TraderError::BelowMinimumSize {
            guidance: min_size_guidance(spec, market_price),
        });
    }

    let rounded = contracts.round_dp(precision);
    if rounded.is_zero() {
        return Err(TraderError::ZeroAfterRounding {
            guidance: min_size_guidance(spec, market_price),
        });
    }

    Ok(ConvertedQuantity {
        contracts: rounded,
        precision,
    })
}

/// Smallest tradable contract count: the exchange minimum, or one
/// step of the size precision when no minimum is reported.
pub fn min_contracts(spec: &SymbolSpec) -> Decimal {
    if spec.min_contract_size > Decimal::ZERO {
        spec.min_contract_size
    } else {
        // One unit in the last place of the size precision.
        Decimal::new(1, spec.precision())
    }
}

/// Smallest tradable coin quantity.
pub fn min_coin_qty(spec: &SymbolSpec) -> Qty {
    Qty::from_contracts(Contracts::new(min_contracts(spec)), spec.multiplier)
}

/// Smallest viable opening notional in the settlement currency:
/// the minimum quantity's value floored at the exchange minimum, plus
/// a 10% safety margin. Falls back to a conservative 12 when the spec
/// or price is unavailable.
pub fn min_open_amount(spec: Option<&SymbolSpec>, market_price: Option<Price>) -> Decimal {
    let fallback = Decimal::from(12);
    let (Some(spec), Some(price)) = (spec, market_price) else {
        return fallback;
    };
    if !price.is_positive() {
        return fallback;
    }
    let min_value = min_coin_qty(spec).notional(price);
    let floored = min_value.max(MIN_NOTIONAL_USDT);
    // 10% headroom against price movement between quote and fill.
    floored * Decimal::new(11, 1)
}

/// Reject orders worth less than the exchange minimum.
pub fn check_min_notional(qty: Qty, market_price: Price) -> TraderResult<()> {
    let value = qty.notional(market_price);
    if value < MIN_NOTIONAL_USDT {
        return Err(TraderError::BelowMinimumNotional {
            guidance: format!(
                "order value {:.2} USDT is below the exchange minimum {} USDT",
                value, MIN_NOTIONAL_USDT
            ),
        });
    }
    Ok(())
}

fn min_size_guidance(spec: &SymbolSpec, market_price: Option<Price>) -> String {
    let min_qty = min_coin_qty(spec).inner().normalize();
    match market_price {
        Some(price) if price.is_positive() => {
            let notional = min_qty * price.inner();
            format!("minimum {min_qty} coin (about {notional:.2} USDT)")
        }
        _ => format!("minimum {min_qty} coin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spec(multiplier: Decimal, min: Decimal, round: Option<&str>) -> SymbolSpec {
        SymbolSpec {
            contract: "BTC_USDT".to_string(),
            multiplier,
            min_contract_size: min,
            rounding_increment: round.map(str::to_string),
        }
    }

    #[test]
    fn test_minimum_size_gate() {
        let spec = spec(dec!(0.0001), dec!(1), Some("1"));
        // 0.5 contracts, below the minimum of 1.
        let err = convert_quantity(&spec, Qty::new(dec!(0.00005)), None).unwrap_err();
        assert!(matches!(err, TraderError::BelowMinimumSize { .. }));
        // Exactly 1 contract passes.
        let converted = convert_quantity(&spec, Qty::new(dec!(0.0001)), None).unwrap();
        assert_eq!(converted.contracts.inner(), dec!(1));
        assert_eq!(converted.wire(), "1");
    }

    #[test]
    fn test_zero_after_rounding() {
        // No reported minimum, increment 0.01: 0.004 contracts rounds
        // to 0.00.
        let spec = spec(dec!(1), dec!(0), Some("0.01"));
        let err = convert_quantity(&spec, Qty::new(dec!(0.004)), None).unwrap_err();
        assert!(matches!(err, TraderError::ZeroAfterRounding { .. }));

        let converted = convert_quantity(&spec, Qty::new(dec!(0.006)), None).unwrap();
        assert_eq!(converted.wire(), "0.01");
    }

    #[test]
    fn test_guidance_includes_notional_when_priced() {
        let spec = spec(dec!(0.0001), dec!(10), Some("1"));
        let err = convert_quantity(
            &spec,
            Qty::new(dec!(0.0001)),
            Some(Price::new(dec!(65000))),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("0.001"), "{message}");
        assert!(message.contains("65.00"), "{message}");
    }

    #[test]
    fn test_min_contracts_precision_floor() {
        let spec = spec(dec!(0.01), dec!(0), Some("0.1"));
        assert_eq!(min_contracts(&spec), dec!(0.1));
        assert_eq!(min_coin_qty(&spec).inner(), dec!(0.001));
    }

    #[test]
    fn test_min_open_amount() {
        let spec_small = spec(dec!(0.0001), dec!(1), Some("1"));
        // Min qty worth 6.5 USDT, floored to 10, plus 10%.
        let amount = min_open_amount(Some(&spec_small), Some(Price::new(dec!(65000))));
        assert_eq!(amount, dec!(11.0));

        // Min qty already above the floor: scaled directly.
        let spec_large = spec(dec!(0.01), dec!(1), Some("1"));
        let amount = min_open_amount(Some(&spec_large), Some(Price::new(dec!(65000))));
        assert_eq!(amount, dec!(715.0));

        // No spec or price: conservative fallback.
        assert_eq!(min_open_amount(None, None), dec!(12));
        assert_eq!(min_open_amount(Some(&spec_small), None), dec!(12));
    }

    #[test]
    fn test_check_min_notional() {
        let price = Price::new(dec!(100));
        assert!(check_min_notional(Qty::new(dec!(0.05)), price).is_err());
        assert!(check_min_notional(Qty::new(dec!(0.1)), price).is_ok());
    }
}

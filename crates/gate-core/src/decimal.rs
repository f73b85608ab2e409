//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors critical in financial calculations.
//!
//! Three units exist in this system and must not be mixed silently:
//! - `Price`: settlement-currency price of one coin
//! - `Qty`: coin quantity, the economically meaningful unit
//! - `Contracts`: exchange-native signed contract count

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Price with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Coin quantity with exact decimal precision.
///
/// Always non-negative in the adapter's public interface; position
/// direction is carried separately by `PositionSide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qty(pub Decimal);

impl Qty {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Notional value in settlement currency: quantity * price.
    #[inline]
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }

    /// Convert to a contract count using the symbol's multiplier
    /// (coin quantity represented by one contract).
    ///
    /// The caller guarantees `multiplier` is positive; the metadata
    /// layer defaults invalid multipliers to 1 before they reach here.
    #[inline]
    pub fn to_contracts(&self, multiplier: Decimal) -> Contracts {
        Contracts(self.0 / multiplier)
    }

    /// Inverse of [`Qty::to_contracts`].
    #[inline]
    pub fn from_contracts(contracts: Contracts, multiplier: Decimal) -> Self {
        Self(contracts.0 * multiplier)
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Qty {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Qty {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Exchange-native contract count.
///
/// Signed: the exchange encodes buy as positive size and sell as
/// negative size on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contracts(pub Decimal);

impl Contracts {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Round to the given number of fractional digits.
    #[inline]
    pub fn round_dp(&self, precision: u32) -> Self {
        Self(self
            .0
            .round_dp_with_strategy(precision, RoundingStrategy::MidpointNearestEven))
    }

    /// Fixed-precision decimal string, the exchange's expected wire
    /// format for size fields.
    pub fn to_wire(&self, precision: u32) -> String {
        format!("{:.*}", precision as usize, self.round_dp(precision).0)
    }
}

impl fmt::Display for Contracts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Contracts {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Neg for Contracts {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_qty_to_contracts() {
        let qty = Qty::new(dec!(0.01));
        let contracts = qty.to_contracts(dec!(0.0001));
        assert_eq!(contracts.inner(), dec!(100));
    }

    #[test]
    fn test_contracts_round_trip() {
        let qty = Qty::new(dec!(0.002));
        let multiplier = dec!(0.0001);
        let back = Qty::from_contracts(qty.to_contracts(multiplier), multiplier);
        assert_eq!(back, qty);
    }

    #[test]
    fn test_notional() {
        let qty = Qty::new(dec!(0.5));
        let price = Price::new(dec!(50000));
        assert_eq!(qty.notional(price), dec!(25000));
    }

    #[test]
    fn test_contracts_to_wire_pads_zeros() {
        let contracts = Contracts::new(dec!(1.2));
        assert_eq!(contracts.to_wire(3), "1.200");
    }

    #[test]
    fn test_contracts_to_wire_rounds() {
        let contracts = Contracts::new(dec!(1.23456));
        assert_eq!(contracts.to_wire(2), "1.23");
    }

    #[test]
    fn test_contracts_neg() {
        let contracts = Contracts::new(dec!(5));
        assert_eq!((-contracts).inner(), dec!(-5));
        assert!((-contracts).is_negative());
    }
}

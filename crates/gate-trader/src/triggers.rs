//! Post-hoc classification of price-triggered orders.
//!
//! The exchange does not label conditional orders as stop-loss or
//! take-profit; the distinction is reconstructed from where the
//! trigger price sits relative to the mark price, given the position
//! side. Without both, a size-sign check can still tell that an order
//! is protective (it reduces the position) but not which kind, and
//! with neither the order stays unclassified. Selective cancellation
//! never acts on a guess.

use gate_api::PriceTriggeredOrder;
use gate_core::PositionSide;
use rust_decimal::Decimal;

/// What a price-triggered order is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Triggers on adverse price movement.
    StopLoss,
    /// Triggers on favorable price movement.
    TakeProfit,
    /// Known to reduce the position, direction of protection unknown.
    Protective,
    /// Not enough information to classify.
    Unclassified,
}

impl TriggerKind {
    /// Whether this kind is matched by a stop-loss cancellation.
    pub fn is_stop_loss(&self) -> bool {
        matches!(self, Self::StopLoss)
    }

    /// Whether this kind is matched by a take-profit cancellation.
    pub fn is_take_profit(&self) -> bool {
        matches!(self, Self::TakeProfit)
    }

    /// Whether this order protects the position at all.
    pub fn is_protective(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

/// Classify one conditional order against the current position.
///
/// For a long, a trigger below the mark price is a stop-loss and one
/// above is a take-profit; shorts invert. A trigger sitting exactly on
/// the mark is only called protective. When the mark or trigger price
/// is unknown, the order's size sign is checked against the position
/// side: an order that would reduce the position is protective, one
/// that would grow it (or any order without a known side) stays
/// unclassified.
pub fn classify(
    order: &PriceTriggeredOrder,
    side: Option<PositionSide>,
    mark_price: Option<Decimal>,
) -> TriggerKind {
    let Some(side) = side else {
        return TriggerKind::Unclassified;
    };

    if let (Some(trigger), Some(mark)) = (order.trigger_price(), mark_price) {
        let below = trigger < mark;
        let above = trigger > mark;
        return match side {
            PositionSide::Long if below => TriggerKind::StopLoss,
            PositionSide::Long if above => TriggerKind::TakeProfit,
            PositionSide::Short if above => TriggerKind::StopLoss,
            PositionSide::Short if below => TriggerKind::TakeProfit,
            _ => TriggerKind::Protective,
        };
    }

    // Price information missing: a size opposite the position reduces
    // it, which is all the sign can prove.
    let size = order.initial.size;
    let reduces = match side {
        PositionSide::Long => size < Decimal::ZERO,
        PositionSide::Short => size > Decimal::ZERO,
    };
    if reduces {
        TriggerKind::Protective
    } else {
        TriggerKind::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_api::{FuturesInitialOrder, FuturesPriceTrigger};
    use gate_core::TimeInForce;
    use rust_decimal_macros::dec;

    fn order(size: Decimal, trigger_price: &str) -> PriceTriggeredOrder {
        PriceTriggeredOrder {
            id: 1,
            initial: FuturesInitialOrder {
                contract: "BTC_USDT".to_string(),
                size,
                price: trigger_price.to_string(),
                tif: TimeInForce::Gtc,
            },
            trigger: FuturesPriceTrigger {
                strategy_type: 0,
                price_type: 0,
                price: trigger_price.to_string(),
            },
        }
    }

    #[test]
    fn test_long_classification() {
        let mark = Some(dec!(65000));
        let side = Some(PositionSide::Long);
        assert_eq!(classify(&order(dec!(-1), "60000"), side, mark), TriggerKind::StopLoss);
        assert_eq!(classify(&order(dec!(-1), "70000"), side, mark), TriggerKind::TakeProfit);
    }

    #[test]
    fn test_short_classification_inverts() {
        let mark = Some(dec!(65000));
        let side = Some(PositionSide::Short);
        assert_eq!(classify(&order(dec!(1), "70000"), side, mark), TriggerKind::StopLoss);
        assert_eq!(classify(&order(dec!(1), "60000"), side, mark), TriggerKind::TakeProfit);
    }

    #[test]
    fn test_trigger_on_mark_is_only_protective() {
        let kind = classify(
            &order(dec!(-1), "65000"),
            Some(PositionSide::Long),
            Some(dec!(65000)),
        );
        assert_eq!(kind, TriggerKind::Protective);
    }

    #[test]
    fn test_size_sign_fallback_is_binary() {
        // No mark price: a reducing order is protective, nothing more.
        let kind = classify(&order(dec!(-1), "60000"), Some(PositionSide::Long), None);
        assert_eq!(kind, TriggerKind::Protective);
        // An order growing the position is not protective.
        let kind = classify(&order(dec!(1), "60000"), Some(PositionSide::Long), None);
        assert_eq!(kind, TriggerKind::Unclassified);
    }

    #[test]
    fn test_no_side_is_unclassified() {
        let kind = classify(&order(dec!(-1), "60000"), None, Some(dec!(65000)));
        assert_eq!(kind, TriggerKind::Unclassified);
    }

    #[test]
    fn test_unparseable_trigger_price_falls_back() {
        let kind = classify(&order(dec!(-1), ""), Some(PositionSide::Long), Some(dec!(65000)));
        assert_eq!(kind, TriggerKind::Protective);
    }
}

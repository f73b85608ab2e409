//! Order orchestration over the futures API.
//!
//! `FuturesTrader` is the adapter's public surface: callers speak
//! canonical symbols and coin quantities, it speaks contracts to the
//! exchange. Every order-placing path runs through the conversion
//! gate in [`crate::convert`]; market data and account state come
//! from the [`MetadataCache`].

use crate::cache::MetadataCache;
use crate::clock::Clock;
use crate::convert::{self, ConvertedQuantity};
use crate::error::{TraderError, TraderResult};
use crate::triggers::{classify, TriggerKind};
use crate::types::{Balance, Position, DEFAULT_PRECISION};
use gate_api::{market_order, protective_order, FuturesApi, MarginMode};
use gate_core::{to_exchange_symbol, Contracts, PositionSide, Price, Qty};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client order tag; the exchange requires the "t-" prefix.
const ORDER_TAG: &str = "t-gate-bot";

/// Outcome of a placed order.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order_id: i64,
    /// Exchange spelling of the traded contract.
    pub contract: String,
    pub status: String,
}

/// Futures trading adapter.
pub struct FuturesTrader {
    api: Arc<dyn FuturesApi>,
    cache: MetadataCache,
}

impl FuturesTrader {
    pub fn new(api: Arc<dyn FuturesApi>, clock: Arc<dyn Clock>) -> Self {
        let cache = MetadataCache::new(api.clone(), clock);
        Self { api, cache }
    }

    /// Cached account balance.
    pub async fn balance(&self) -> TraderResult<Balance> {
        self.cache.get_balance().await
    }

    /// Cached open positions.
    pub async fn positions(&self) -> TraderResult<Vec<Position>> {
        self.cache.get_positions().await
    }

    /// Cached position for one symbol, if open.
    pub async fn position(&self, symbol: &str) -> TraderResult<Option<Position>> {
        self.cache.get_position(symbol).await
    }

    /// Last traded price from the ticker.
    pub async fn market_price(&self, symbol: &str) -> TraderResult<Price> {
        let contract = to_exchange_symbol(symbol);
        let ticker = self.api.ticker(&contract).await?;
        ticker
            .last_price()
            .map(Price::new)
            .ok_or(TraderError::PriceUnavailable(contract))
    }

    /// Coin quantity as the exchange's fixed-precision size string.
    pub async fn format_quantity(&self, symbol: &str, qty: Qty) -> TraderResult<String> {
        let contract = to_exchange_symbol(symbol);
        let price = self.market_price(symbol).await.ok();
        let converted = self.convert_for_order(&contract, qty, price).await?;
        Ok(converted.wire())
    }

    /// The single sizing gate for every order-placing path.
    ///
    /// When the spec cannot be resolved the raw coin quantity is
    /// carried as the contract count at the default precision instead
    /// of failing: availability wins over precision, for orders and
    /// [`FuturesTrader::format_quantity`] alike.
    async fn convert_for_order(
        &self,
        contract: &str,
        qty: Qty,
        market_price: Option<Price>,
    ) -> TraderResult<ConvertedQuantity> {
        match self.cache.get_symbol_spec(contract).await {
            Ok(spec) => convert::convert_quantity(&spec, qty, market_price),
            Err(err) => {
                warn!(%contract, error = %err, "no spec, using raw quantity as contract count");
                Ok(ConvertedQuantity {
                    contracts: Contracts::new(qty.inner()).round_dp(DEFAULT_PRECISION),
                    precision: DEFAULT_PRECISION,
                })
            }
        }
    }

    /// Set position leverage. "Already at target" responses from the
    /// exchange count as success.
    pub async fn set_leverage(&self, symbol: &str, leverage: i32) -> TraderResult<()> {
        if leverage <= 0 {
            return Err(TraderError::InvalidLeverage(leverage));
        }
        let contract = to_exchange_symbol(symbol);
        match self.api.update_leverage(&contract, leverage).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_already_in_state() => {
                debug!(%contract, leverage, "leverage already at target");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Set the margin mode. Absorbed as success: already in the target
    /// mode, or the exchange refusing to switch while a position is
    /// open.
    pub async fn set_margin_mode(&self, symbol: &str, mode: MarginMode) -> TraderResult<()> {
        let contract = to_exchange_symbol(symbol);
        match self.api.update_margin_mode(&contract, mode).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_already_in_state() => {
                debug!(%contract, %mode, "margin mode already at target");
                Ok(())
            }
            Err(err) if err.body().contains("position") => {
                warn!(%contract, %mode, error = %err, "margin mode unchanged, position open");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Open (or add to) a position with a market order.
    ///
    /// Resting orders for the symbol are best-effort cancelled first,
    /// leverage is applied, and the quantity must clear both the
    /// contract-size gate and the exchange's minimum notional.
    pub async fn open_position(
        &self,
        symbol: &str,
        side: PositionSide,
        qty: Qty,
        leverage: i32,
    ) -> TraderResult<OrderResult> {
        let contract = to_exchange_symbol(symbol);
        if leverage <= 0 {
            return Err(TraderError::InvalidLeverage(leverage));
        }
        self.cancel_all_best_effort(symbol).await;
        self.set_leverage(symbol, leverage).await?;

        let price = self.market_price(symbol).await?;
        let converted = self.convert_for_order(&contract, qty, Some(price)).await?;
        convert::check_min_notional(qty, price)?;
        let signed = apply_side(converted.contracts, side);

        let order = market_order(contract.clone(), signed.inner(), false, ORDER_TAG);
        let ack = self.api.create_order(&order).await?;
        self.cache.invalidate_positions();
        info!(
            %contract, %side, size = %signed, leverage,
            order_id = ack.id, "opened position"
        );
        Ok(OrderResult {
            order_id: ack.id,
            contract: ack.contract,
            status: ack.status,
        })
    }

    /// Close a position with a reduce-only market order.
    ///
    /// `qty` of `None` or zero closes the whole position, resolved
    /// from the cache; either way the quantity runs through the same
    /// conversion gate as opens. A close-entire flag is never sent;
    /// dual-mode accounts reject it, reduce-only with an explicit size
    /// works on both. On success, remaining resting orders for the
    /// symbol are best-effort cancelled.
    pub async fn close_position(
        &self,
        symbol: &str,
        side: PositionSide,
        qty: Option<Qty>,
    ) -> TraderResult<OrderResult> {
        let contract = to_exchange_symbol(symbol);
        let position = self
            .cache
            .get_position(symbol)
            .await?
            .filter(|p| p.side == side)
            .ok_or_else(|| TraderError::NoOpenPosition(contract.clone()))?;

        let qty = match qty {
            Some(qty) if !qty.is_zero() => qty,
            _ => position.coin_qty,
        };
        let price = self.market_price(symbol).await.ok();
        let ConvertedQuantity { contracts, .. } =
            self.convert_for_order(&contract, qty, price).await?;
        // Closing trades against the position: sell a long, buy a short.
        let signed = apply_side(contracts, side.opposite());

        let order = market_order(contract.clone(), signed.inner(), true, ORDER_TAG);
        let ack = self.api.create_order(&order).await?;
        self.cache.invalidate_positions();
        self.cancel_all_best_effort(symbol).await;
        info!(%contract, size = %signed, order_id = ack.id, "closed position");
        Ok(OrderResult {
            order_id: ack.id,
            contract: ack.contract,
            status: ack.status,
        })
    }

    /// Place a stop-loss at `trigger` covering `qty` of a position on
    /// `side`.
    pub async fn set_stop_loss(
        &self,
        symbol: &str,
        side: PositionSide,
        qty: Qty,
        trigger: Price,
    ) -> TraderResult<i64> {
        self.place_protective(symbol, side, qty, trigger, "stop loss")
            .await
    }

    /// Place a take-profit at `trigger` covering `qty` of a position
    /// on `side`.
    pub async fn set_take_profit(
        &self,
        symbol: &str,
        side: PositionSide,
        qty: Qty,
        trigger: Price,
    ) -> TraderResult<i64> {
        self.place_protective(symbol, side, qty, trigger, "take profit")
            .await
    }

    /// Stop-loss and take-profit share the wire shape: a conditional
    /// order in the position-reducing direction whose initial price
    /// equals the trigger price. The exchange tells them apart by
    /// where the trigger sits. The quantity passes the conversion
    /// gate; no separate notional check applies here.
    async fn place_protective(
        &self,
        symbol: &str,
        side: PositionSide,
        qty: Qty,
        trigger: Price,
        kind: &str,
    ) -> TraderResult<i64> {
        let contract = to_exchange_symbol(symbol);
        let price = self.market_price(symbol).await.ok();
        let converted = self.convert_for_order(&contract, qty, price).await?;
        let signed = apply_side(converted.contracts, side.opposite());

        let trigger_price = trigger.inner().normalize().to_string();
        let order = protective_order(contract.clone(), signed.inner(), &trigger_price);
        let ack = self.api.create_triggered_order(&order).await?;
        info!(%contract, kind, trigger = %trigger_price, size = %signed, order_id = ack.id, "placed trigger order");
        Ok(ack.id)
    }

    /// Cancel all standing and conditional orders for a symbol.
    ///
    /// "Nothing to cancel" responses are absorbed; a failure on one
    /// conditional order is logged and the rest still cancelled.
    pub async fn cancel_all_orders(&self, symbol: &str) -> TraderResult<()> {
        let contract = to_exchange_symbol(symbol);
        match self.api.cancel_orders(&contract).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                debug!(%contract, "no standing orders to cancel");
            }
            Err(err) => return Err(err.into()),
        }

        let triggers = self.api.list_triggered_orders(&contract).await?;
        for order in &triggers {
            self.cancel_trigger(order.id, &contract).await;
        }
        Ok(())
    }

    /// Cancel only the stop-loss conditional orders for a symbol.
    pub async fn cancel_stop_loss_orders(&self, symbol: &str) -> TraderResult<usize> {
        self.cancel_classified(symbol, TriggerKind::is_stop_loss).await
    }

    /// Cancel only the take-profit conditional orders for a symbol.
    pub async fn cancel_take_profit_orders(&self, symbol: &str) -> TraderResult<usize> {
        self.cancel_classified(symbol, TriggerKind::is_take_profit).await
    }

    /// Cancel every protective conditional order for a symbol,
    /// stop-loss or take-profit alike.
    pub async fn cancel_stop_orders(&self, symbol: &str) -> TraderResult<usize> {
        self.cancel_classified(symbol, TriggerKind::is_protective).await
    }

    async fn cancel_classified(
        &self,
        symbol: &str,
        matches: fn(&TriggerKind) -> bool,
    ) -> TraderResult<usize> {
        let contract = to_exchange_symbol(symbol);
        let position = self.cache.get_position(symbol).await?;
        let side = position.as_ref().map(|p| p.side);
        let mark = match position.as_ref().map(|p| p.mark_price) {
            Some(mark) if mark > Decimal::ZERO => Some(mark),
            _ => self.market_price(symbol).await.ok().map(|p| p.inner()),
        };

        let triggers = self.api.list_triggered_orders(&contract).await?;
        let mut cancelled = 0;
        for order in &triggers {
            let kind = classify(order, side, mark);
            if matches(&kind) {
                self.cancel_trigger(order.id, &contract).await;
                cancelled += 1;
            } else {
                debug!(%contract, order_id = order.id, ?kind, "trigger order left in place");
            }
        }
        Ok(cancelled)
    }

    /// Best-effort cancel of one conditional order.
    async fn cancel_trigger(&self, id: i64, contract: &str) {
        match self.api.cancel_triggered_order(id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                debug!(%contract, order_id = id, "trigger order already gone");
            }
            Err(err) => {
                warn!(%contract, order_id = id, error = %err, "failed to cancel trigger order");
            }
        }
    }

    /// Cancel-all wrapper for open/close paths: an empty order book is
    /// the common case, a failure here must not block the trade.
    async fn cancel_all_best_effort(&self, symbol: &str) {
        if let Err(err) = self.cancel_all_orders(symbol).await {
            warn!(symbol, error = %err, "best-effort order cancellation failed");
        }
    }

    /// Exchange minimum order value in the settlement currency.
    pub fn min_notional(&self) -> Decimal {
        convert::MIN_NOTIONAL_USDT
    }

    /// Reject quantities worth less than the exchange minimum at the
    /// current market price.
    pub async fn check_min_notional(&self, symbol: &str, qty: Qty) -> TraderResult<()> {
        let price = self.market_price(symbol).await?;
        convert::check_min_notional(qty, price)
    }

    /// Smallest viable opening notional for a symbol, in the
    /// settlement currency, including the safety margin.
    pub async fn min_open_amount(&self, symbol: &str) -> Decimal {
        let spec = self.cache.get_symbol_spec(symbol).await.ok();
        let price = self.market_price(symbol).await.ok();
        convert::min_open_amount(spec.as_ref(), price)
    }
}

/// Sign a positive contract count for the order direction: buys are
/// positive on the wire, sells negative.
fn apply_side(contracts: Contracts, buy_side: PositionSide) -> Contracts {
    match buy_side {
        PositionSide::Long => contracts,
        PositionSide::Short => -contracts,
    }
}

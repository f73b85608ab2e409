//! Recording mock for the futures API, for use in tests.
//!
//! Holds seeded exchange state behind mutexes and records every
//! mutating call so tests can assert on the exact payloads sent. Each
//! read endpoint keeps a fetch counter for cache-behavior tests, and
//! any endpoint can be armed with an error body.

use crate::client::{BoxFuture, FuturesApi};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    Contract, FuturesAccount, FuturesOrder, FuturesOrderAck, FuturesTicker, MarginMode,
    PriceTriggeredOrder, RawPosition, TriggerOrderAck,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Mock futures API for testing.
#[derive(Debug)]
pub struct MockFuturesApi {
    account: Mutex<FuturesAccount>,
    positions: Mutex<Vec<RawPosition>>,
    contracts: Mutex<Vec<Contract>>,
    /// Contract name to last-price string.
    tickers: Mutex<HashMap<String, String>>,
    /// Open price-triggered orders returned by the list endpoint.
    open_triggers: Mutex<Vec<PriceTriggeredOrder>>,

    /// Recorded order payloads, in call order.
    placed_orders: Mutex<Vec<FuturesOrder>>,
    /// Recorded trigger-order payloads, in call order.
    placed_triggers: Mutex<Vec<PriceTriggeredOrder>>,
    /// Contracts whose standing orders were cancelled.
    cancelled_contracts: Mutex<Vec<String>>,
    /// Ids of cancelled price-triggered orders.
    cancelled_trigger_ids: Mutex<Vec<i64>>,
    /// Recorded (contract, leverage) calls.
    leverage_calls: Mutex<Vec<(String, i32)>>,
    /// Recorded (contract, mode) calls.
    margin_calls: Mutex<Vec<(String, MarginMode)>>,

    account_fetches: AtomicU32,
    position_fetches: AtomicU32,
    contract_fetches: AtomicU32,

    /// Endpoint name to error body; armed endpoints fail with 400.
    errors: Mutex<HashMap<&'static str, String>>,
    next_id: AtomicI64,
}

impl Default for MockFuturesApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFuturesApi {
    pub fn new() -> Self {
        Self {
            account: Mutex::new(FuturesAccount {
                total: "0".to_string(),
                available: "0".to_string(),
                unrealised_pnl: "0".to_string(),
                currency: "USDT".to_string(),
            }),
            positions: Mutex::new(Vec::new()),
            contracts: Mutex::new(Vec::new()),
            tickers: Mutex::new(HashMap::new()),
            open_triggers: Mutex::new(Vec::new()),
            placed_orders: Mutex::new(Vec::new()),
            placed_triggers: Mutex::new(Vec::new()),
            cancelled_contracts: Mutex::new(Vec::new()),
            cancelled_trigger_ids: Mutex::new(Vec::new()),
            leverage_calls: Mutex::new(Vec::new()),
            margin_calls: Mutex::new(Vec::new()),
            account_fetches: AtomicU32::new(0),
            position_fetches: AtomicU32::new(0),
            contract_fetches: AtomicU32::new(0),
            errors: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1000),
        }
    }

    pub fn set_account(&self, account: FuturesAccount) {
        *self.account.lock() = account;
    }

    pub fn set_positions(&self, positions: Vec<RawPosition>) {
        *self.positions.lock() = positions;
    }

    pub fn set_contracts(&self, contracts: Vec<Contract>) {
        *self.contracts.lock() = contracts;
    }

    pub fn set_ticker(&self, contract: &str, last: &str) {
        self.tickers
            .lock()
            .insert(contract.to_string(), last.to_string());
    }

    pub fn set_open_triggers(&self, orders: Vec<PriceTriggeredOrder>) {
        *self.open_triggers.lock() = orders;
    }

    /// Arm one endpoint to fail with the given body until cleared.
    /// Endpoint names: "accounts", "positions", "contracts", "ticker",
    /// "leverage", "margin_mode", "create_order", "cancel_orders",
    /// "create_trigger", "list_triggers", "cancel_trigger".
    pub fn set_error(&self, endpoint: &'static str, body: &str) {
        self.errors.lock().insert(endpoint, body.to_string());
    }

    pub fn clear_error(&self, endpoint: &'static str) {
        self.errors.lock().remove(endpoint);
    }

    pub fn placed_orders(&self) -> Vec<FuturesOrder> {
        self.placed_orders.lock().clone()
    }

    pub fn placed_triggers(&self) -> Vec<PriceTriggeredOrder> {
        self.placed_triggers.lock().clone()
    }

    pub fn cancelled_contracts(&self) -> Vec<String> {
        self.cancelled_contracts.lock().clone()
    }

    pub fn cancelled_trigger_ids(&self) -> Vec<i64> {
        self.cancelled_trigger_ids.lock().clone()
    }

    pub fn leverage_calls(&self) -> Vec<(String, i32)> {
        self.leverage_calls.lock().clone()
    }

    pub fn margin_calls(&self) -> Vec<(String, MarginMode)> {
        self.margin_calls.lock().clone()
    }

    pub fn account_fetch_count(&self) -> u32 {
        self.account_fetches.load(Ordering::SeqCst)
    }

    pub fn position_fetch_count(&self) -> u32 {
        self.position_fetches.load(Ordering::SeqCst)
    }

    pub fn contract_fetch_count(&self) -> u32 {
        self.contract_fetches.load(Ordering::SeqCst)
    }

    fn check(&self, endpoint: &'static str) -> ApiResult<()> {
        match self.errors.lock().get(endpoint) {
            Some(body) => Err(ApiError::Status {
                status: 400,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl FuturesApi for MockFuturesApi {
    fn futures_account(&self) -> BoxFuture<'_, ApiResult<FuturesAccount>> {
        Box::pin(async move {
            self.check("accounts")?;
            self.account_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.account.lock().clone())
        })
    }

    fn positions(&self) -> BoxFuture<'_, ApiResult<Vec<RawPosition>>> {
        Box::pin(async move {
            self.check("positions")?;
            self.position_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.positions.lock().clone())
        })
    }

    fn contracts(&self) -> BoxFuture<'_, ApiResult<Vec<Contract>>> {
        Box::pin(async move {
            self.check("contracts")?;
            self.contract_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.contracts.lock().clone())
        })
    }

    fn ticker<'a>(&'a self, contract: &'a str) -> BoxFuture<'a, ApiResult<FuturesTicker>> {
        Box::pin(async move {
            self.check("ticker")?;
            match self.tickers.lock().get(contract) {
                Some(last) => Ok(FuturesTicker {
                    contract: contract.to_string(),
                    last: last.clone(),
                }),
                None => Err(ApiError::Decode(format!("no ticker returned for {contract}"))),
            }
        })
    }

    fn update_leverage<'a>(
        &'a self,
        contract: &'a str,
        leverage: i32,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.check("leverage")?;
            self.leverage_calls
                .lock()
                .push((contract.to_string(), leverage));
            Ok(())
        })
    }

    fn update_margin_mode<'a>(
        &'a self,
        contract: &'a str,
        mode: MarginMode,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.check("margin_mode")?;
            self.margin_calls.lock().push((contract.to_string(), mode));
            Ok(())
        })
    }

    fn create_order<'a>(
        &'a self,
        order: &'a FuturesOrder,
    ) -> BoxFuture<'a, ApiResult<FuturesOrderAck>> {
        Box::pin(async move {
            self.check("create_order")?;
            self.placed_orders.lock().push(order.clone());
            Ok(FuturesOrderAck {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                contract: order.contract.clone(),
                status: "finished".to_string(),
            })
        })
    }

    fn cancel_orders<'a>(&'a self, contract: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.check("cancel_orders")?;
            self.cancelled_contracts.lock().push(contract.to_string());
            Ok(())
        })
    }

    fn create_triggered_order<'a>(
        &'a self,
        order: &'a PriceTriggeredOrder,
    ) -> BoxFuture<'a, ApiResult<TriggerOrderAck>> {
        Box::pin(async move {
            self.check("create_trigger")?;
            self.placed_triggers.lock().push(order.clone());
            Ok(TriggerOrderAck {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
            })
        })
    }

    fn list_triggered_orders<'a>(
        &'a self,
        contract: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<PriceTriggeredOrder>>> {
        Box::pin(async move {
            self.check("list_triggers")?;
            Ok(self
                .open_triggers
                .lock()
                .iter()
                .filter(|o| o.initial.contract == contract)
                .cloned()
                .collect())
        })
    }

    fn cancel_triggered_order(&self, id: i64) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.check("cancel_trigger")?;
            self.cancelled_trigger_ids.lock().push(id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::market_order;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_records_orders() {
        let mock = MockFuturesApi::new();
        let order = market_order("BTC_USDT", dec!(3), false, "t-test");
        let ack = mock.create_order(&order).await.unwrap();
        assert_eq!(ack.contract, "BTC_USDT");

        let recorded = mock.placed_orders();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].size, dec!(3));
    }

    #[tokio::test]
    async fn test_mock_armed_error() {
        let mock = MockFuturesApi::new();
        mock.set_error("accounts", "service unavailable");
        assert!(mock.futures_account().await.is_err());

        mock.clear_error("accounts");
        assert!(mock.futures_account().await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_counters() {
        let mock = MockFuturesApi::new();
        mock.positions().await.unwrap();
        mock.positions().await.unwrap();
        assert_eq!(mock.position_fetch_count(), 2);
    }
}

//! TTL cache for account metadata.
//!
//! Three independently cached resources: balance, positions, and the
//! symbol spec table. Each sits behind its own lock with its own TTL;
//! a fresh read never touches the network. Concurrent refreshes of a
//! stale entry are not coalesced, the last writer wins.

use crate::clock::Clock;
use crate::error::{TraderError, TraderResult};
use crate::types::{Balance, CacheEntry, Position, SymbolSpec};
use chrono::Duration;
use gate_api::FuturesApi;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Balance and position snapshots stay fresh for 15 seconds.
pub const ACCOUNT_TTL_SECS: i64 = 15;

/// The symbol spec table stays fresh for 5 minutes.
pub const SPEC_TTL_SECS: i64 = 300;

/// Cached account metadata with per-resource TTLs.
pub struct MetadataCache {
    api: Arc<dyn FuturesApi>,
    clock: Arc<dyn Clock>,
    balance: RwLock<Option<CacheEntry<Balance>>>,
    positions: RwLock<Option<CacheEntry<Vec<Position>>>>,
    specs: RwLock<Option<CacheEntry<HashMap<String, SymbolSpec>>>>,
}

impl MetadataCache {
    pub fn new(api: Arc<dyn FuturesApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            balance: RwLock::new(None),
            positions: RwLock::new(None),
            specs: RwLock::new(None),
        }
    }

    /// Account balance, at most 15 seconds old.
    pub async fn get_balance(&self) -> TraderResult<Balance> {
        let now = self.clock.now();
        if let Some(entry) = self.balance.read().as_ref() {
            if entry.is_fresh(now, Duration::seconds(ACCOUNT_TTL_SECS)) {
                return Ok(entry.value.clone());
            }
        }

        let account = self.api.futures_account().await?;
        let balance = Balance::from(&account);
        debug!(total = %balance.total, available = %balance.available, "refreshed balance");
        *self.balance.write() = Some(CacheEntry::new(balance.clone(), now));
        Ok(balance)
    }

    /// Open positions, at most 15 seconds old. Flat positions are
    /// dropped; a position whose spec cannot be resolved is kept with
    /// its raw contract count as coin quantity.
    pub async fn get_positions(&self) -> TraderResult<Vec<Position>> {
        let now = self.clock.now();
        if let Some(entry) = self.positions.read().as_ref() {
            if entry.is_fresh(now, Duration::seconds(ACCOUNT_TTL_SECS)) {
                return Ok(entry.value.clone());
            }
        }

        let raw = self.api.positions().await?;
        let mut positions = Vec::new();
        for raw_position in raw.iter().filter(|p| p.size != 0) {
            let spec = match self.get_symbol_spec(&raw_position.contract).await {
                Ok(spec) => Some(spec),
                Err(err) => {
                    warn!(
                        contract = %raw_position.contract,
                        error = %err,
                        "failed to resolve spec for position"
                    );
                    None
                }
            };
            if let Some(position) = Position::from_raw(raw_position, spec.as_ref()) {
                positions.push(position);
            }
        }
        debug!(count = positions.len(), "refreshed positions");
        *self.positions.write() = Some(CacheEntry::new(positions.clone(), now));
        Ok(positions)
    }

    /// The open position for one symbol, if any. Accepts canonical or
    /// exchange spelling.
    pub async fn get_position(&self, symbol: &str) -> TraderResult<Option<Position>> {
        let contract = gate_core::to_exchange_symbol(symbol);
        let positions = self.get_positions().await?;
        Ok(positions.into_iter().find(|p| p.contract == contract))
    }

    /// Spec for one symbol, from a table at most 5 minutes old. A miss
    /// on a fresh table does not trigger a refetch; the table is
    /// replaced wholesale when stale.
    pub async fn get_symbol_spec(&self, symbol: &str) -> TraderResult<SymbolSpec> {
        let contract = gate_core::to_exchange_symbol(symbol);
        let now = self.clock.now();
        {
            let specs = self.specs.read();
            if let Some(entry) = specs.as_ref() {
                if entry.is_fresh(now, Duration::seconds(SPEC_TTL_SECS)) {
                    return entry
                        .value
                        .get(&contract)
                        .cloned()
                        .ok_or_else(|| TraderError::SymbolNotFound(contract.clone()));
                }
            }
        }

        let contracts = self.api.contracts().await?;
        let table: HashMap<String, SymbolSpec> = contracts
            .iter()
            .map(|c| (c.name.clone(), SymbolSpec::from_wire(c)))
            .collect();
        debug!(count = table.len(), "refreshed symbol spec table");
        let spec = table.get(&contract).cloned();
        *self.specs.write() = Some(CacheEntry::new(table, now));
        spec.ok_or(TraderError::SymbolNotFound(contract))
    }

    /// Drop the cached positions so the next read refetches. Called
    /// after order placement mutates position state.
    pub fn invalidate_positions(&self) {
        *self.positions.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use gate_api::{Contract, MockFuturesApi, RawPosition};
    use rust_decimal_macros::dec;

    fn btc_contract() -> Contract {
        Contract {
            name: "BTC_USDT".to_string(),
            quanto_multiplier: "0.0001".to_string(),
            order_size_min: 1,
            order_price_round: "0.01".to_string(),
        }
    }

    fn setup() -> (Arc<MockFuturesApi>, Arc<FakeClock>, MetadataCache) {
        let api = Arc::new(MockFuturesApi::new());
        let clock = Arc::new(FakeClock::fixed());
        let cache = MetadataCache::new(api.clone(), clock.clone());
        (api, clock, cache)
    }

    #[tokio::test]
    async fn test_balance_served_from_cache_within_ttl() {
        let (api, clock, cache) = setup();
        cache.get_balance().await.unwrap();
        clock.advance(Duration::seconds(14));
        cache.get_balance().await.unwrap();
        assert_eq!(api.account_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_balance_refetched_after_ttl() {
        let (api, clock, cache) = setup();
        cache.get_balance().await.unwrap();
        clock.advance(Duration::seconds(16));
        cache.get_balance().await.unwrap();
        assert_eq!(api.account_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_spec_table_fetched_once_within_ttl() {
        let (api, clock, cache) = setup();
        api.set_contracts(vec![btc_contract()]);

        let spec = cache.get_symbol_spec("BTCUSDT").await.unwrap();
        assert_eq!(spec.multiplier, dec!(0.0001));

        clock.advance(Duration::seconds(299));
        cache.get_symbol_spec("BTC_USDT").await.unwrap();
        assert_eq!(api.contract_fetch_count(), 1);

        clock.advance(Duration::seconds(2));
        cache.get_symbol_spec("BTC_USDT").await.unwrap();
        assert_eq!(api.contract_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_symbol_on_fresh_table() {
        let (api, _clock, cache) = setup();
        api.set_contracts(vec![btc_contract()]);

        let err = cache.get_symbol_spec("DOGEUSDT").await.unwrap_err();
        assert!(matches!(err, TraderError::SymbolNotFound(s) if s == "DOGE_USDT"));
        // The miss does not bypass the fresh table.
        let _ = cache.get_symbol_spec("DOGEUSDT").await;
        assert_eq!(api.contract_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_positions_skip_flat_and_convert() {
        let (api, _clock, cache) = setup();
        api.set_contracts(vec![btc_contract()]);
        api.set_positions(vec![
            RawPosition {
                contract: "BTC_USDT".to_string(),
                size: 100,
                entry_price: "65000".to_string(),
                mark_price: "66000".to_string(),
                unrealised_pnl: "10".to_string(),
                leverage: "10".to_string(),
                liq_price: "60000".to_string(),
            },
            RawPosition {
                contract: "ETH_USDT".to_string(),
                size: 0,
                entry_price: String::new(),
                mark_price: String::new(),
                unrealised_pnl: String::new(),
                leverage: String::new(),
                liq_price: String::new(),
            },
        ]);

        let positions = cache.get_positions().await.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].coin_qty.inner(), dec!(0.01));
        assert_eq!(positions[0].side, gate_core::PositionSide::Long);
    }

    #[tokio::test]
    async fn test_position_kept_when_spec_missing() {
        let (api, _clock, cache) = setup();
        // Contract table lacks the position's symbol.
        api.set_contracts(vec![btc_contract()]);
        api.set_positions(vec![RawPosition {
            contract: "XYZ_USDT".to_string(),
            size: -5,
            entry_price: String::new(),
            mark_price: String::new(),
            unrealised_pnl: String::new(),
            leverage: String::new(),
            liq_price: String::new(),
        }]);

        let positions = cache.get_positions().await.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].coin_qty.inner(), dec!(5));
        assert_eq!(positions[0].side, gate_core::PositionSide::Short);
    }

    #[tokio::test]
    async fn test_invalidate_positions_forces_refetch() {
        let (api, _clock, cache) = setup();
        cache.get_positions().await.unwrap();
        cache.invalidate_positions();
        cache.get_positions().await.unwrap();
        assert_eq!(api.position_fetch_count(), 2);
    }
}

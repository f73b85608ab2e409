//! Futures REST API trait and HTTP implementation.
//!
//! `FuturesApi` is the seam between the trading adapter and the
//! exchange: the adapter holds an `Arc<dyn FuturesApi>`, production
//! wires in [`HttpFuturesApi`], tests wire in the recording mock.

use crate::error::{ApiError, ApiResult};
use crate::sign;
use crate::types::{
    Contract, FuturesAccount, FuturesInitialOrder, FuturesOrder, FuturesOrderAck,
    FuturesPriceTrigger, FuturesTicker, MarginMode, PriceTriggeredOrder, RawPosition,
    TriggerOrderAck,
};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.gateio.ws";

/// Settlement currency for all futures endpoints.
const SETTLE: &str = "usdt";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Exchange futures REST API.
///
/// All symbols are exchange-spelled (`BTC_USDT`); normalization happens
/// in the adapter above this layer. Order-mutating calls are never
/// retried here.
pub trait FuturesApi: Send + Sync {
    /// Account balance summary for the settlement currency.
    fn futures_account(&self) -> BoxFuture<'_, ApiResult<FuturesAccount>>;

    /// All positions, including zero-size ones.
    fn positions(&self) -> BoxFuture<'_, ApiResult<Vec<RawPosition>>>;

    /// The full contract specification table.
    fn contracts(&self) -> BoxFuture<'_, ApiResult<Vec<Contract>>>;

    /// Ticker for one contract.
    fn ticker<'a>(&'a self, contract: &'a str) -> BoxFuture<'a, ApiResult<FuturesTicker>>;

    /// Set position leverage.
    fn update_leverage<'a>(
        &'a self,
        contract: &'a str,
        leverage: i32,
    ) -> BoxFuture<'a, ApiResult<()>>;

    /// Set margin mode (cross or isolated).
    fn update_margin_mode<'a>(
        &'a self,
        contract: &'a str,
        mode: MarginMode,
    ) -> BoxFuture<'a, ApiResult<()>>;

    /// Place a futures order.
    fn create_order<'a>(
        &'a self,
        order: &'a FuturesOrder,
    ) -> BoxFuture<'a, ApiResult<FuturesOrderAck>>;

    /// Cancel all standing orders for a contract.
    fn cancel_orders<'a>(&'a self, contract: &'a str) -> BoxFuture<'a, ApiResult<()>>;

    /// Place a price-triggered order.
    fn create_triggered_order<'a>(
        &'a self,
        order: &'a PriceTriggeredOrder,
    ) -> BoxFuture<'a, ApiResult<TriggerOrderAck>>;

    /// List open (untriggered) price-triggered orders for a contract.
    fn list_triggered_orders<'a>(
        &'a self,
        contract: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<PriceTriggeredOrder>>>;

    /// Cancel one price-triggered order by id.
    fn cancel_triggered_order(&self, id: i64) -> BoxFuture<'_, ApiResult<()>>;
}

/// Credentials for signed requests.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

/// HTTP implementation of [`FuturesApi`].
pub struct HttpFuturesApi {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpFuturesApi {
    /// Create a client against the default host.
    pub fn new(credentials: Credentials) -> ApiResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, credentials)
    }

    /// Create a client against a specific host (testnet, proxy).
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> ApiResult<Self> {
        if credentials.key.is_empty() || credentials.secret.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            credentials,
        })
    }

    /// Issue one signed request and return the raw response body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: Option<String>,
    ) -> ApiResult<String> {
        let body = body.unwrap_or_default();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign::sign_request(
            &self.credentials.secret,
            method.as_str(),
            path,
            query,
            &body,
            timestamp,
        );

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        debug!(method = %method, %url, "exchange request");

        let mut request = self
            .client
            .request(method, &url)
            .header("KEY", &self.credentials.key)
            .header("Timestamp", timestamp.to_string())
            .header("SIGN", signature)
            .header("Content-Type", "application/json");
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Http(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }
        Ok(text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &str) -> ApiResult<T> {
        let text = self.execute(Method::GET, path, query, None).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        body: Option<String>,
    ) -> ApiResult<T> {
        let text = self.execute(Method::POST, path, query, body).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
    }

    async fn post_ignore_body(
        &self,
        path: &str,
        query: &str,
        body: Option<String>,
    ) -> ApiResult<()> {
        self.execute(Method::POST, path, query, body).await.map(|_| ())
    }

    async fn delete_ignore_body(&self, path: &str, query: &str) -> ApiResult<()> {
        self.execute(Method::DELETE, path, query, None)
            .await
            .map(|_| ())
    }
}

impl FuturesApi for HttpFuturesApi {
    fn futures_account(&self) -> BoxFuture<'_, ApiResult<FuturesAccount>> {
        Box::pin(async move {
            self.get(&format!("/api/v4/futures/{SETTLE}/accounts"), "")
                .await
        })
    }

    fn positions(&self) -> BoxFuture<'_, ApiResult<Vec<RawPosition>>> {
        Box::pin(async move {
            self.get(&format!("/api/v4/futures/{SETTLE}/positions"), "")
                .await
        })
    }

    fn contracts(&self) -> BoxFuture<'_, ApiResult<Vec<Contract>>> {
        Box::pin(async move {
            self.get(&format!("/api/v4/futures/{SETTLE}/contracts"), "")
                .await
        })
    }

    fn ticker<'a>(&'a self, contract: &'a str) -> BoxFuture<'a, ApiResult<FuturesTicker>> {
        Box::pin(async move {
            let tickers: Vec<FuturesTicker> = self
                .get(
                    &format!("/api/v4/futures/{SETTLE}/tickers"),
                    &format!("contract={contract}"),
                )
                .await?;
            tickers
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::Decode(format!("no ticker returned for {contract}")))
        })
    }

    fn update_leverage<'a>(
        &'a self,
        contract: &'a str,
        leverage: i32,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            // The exchange sometimes answers this endpoint with an array
            // instead of a single position; only the status code matters.
            self.post_ignore_body(
                &format!("/api/v4/futures/{SETTLE}/positions/{contract}/leverage"),
                &format!("leverage={leverage}"),
                None,
            )
            .await
        })
    }

    fn update_margin_mode<'a>(
        &'a self,
        contract: &'a str,
        mode: MarginMode,
    ) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.post_ignore_body(
                &format!("/api/v4/futures/{SETTLE}/positions/{contract}/margin_mode"),
                &format!("mode={mode}"),
                None,
            )
            .await
        })
    }

    fn create_order<'a>(
        &'a self,
        order: &'a FuturesOrder,
    ) -> BoxFuture<'a, ApiResult<FuturesOrderAck>> {
        Box::pin(async move {
            let body = serde_json::to_string(order)
                .map_err(|e| ApiError::Decode(format!("failed to encode order: {e}")))?;
            self.post(&format!("/api/v4/futures/{SETTLE}/orders"), "", Some(body))
                .await
        })
    }

    fn cancel_orders<'a>(&'a self, contract: &'a str) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            self.delete_ignore_body(
                &format!("/api/v4/futures/{SETTLE}/orders"),
                &format!("contract={contract}"),
            )
            .await
        })
    }

    fn create_triggered_order<'a>(
        &'a self,
        order: &'a PriceTriggeredOrder,
    ) -> BoxFuture<'a, ApiResult<TriggerOrderAck>> {
        Box::pin(async move {
            let body = serde_json::to_string(order)
                .map_err(|e| ApiError::Decode(format!("failed to encode trigger order: {e}")))?;
            self.post(
                &format!("/api/v4/futures/{SETTLE}/price_orders"),
                "",
                Some(body),
            )
            .await
        })
    }

    fn list_triggered_orders<'a>(
        &'a self,
        contract: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<PriceTriggeredOrder>>> {
        Box::pin(async move {
            self.get(
                &format!("/api/v4/futures/{SETTLE}/price_orders"),
                &format!("status=open&contract={contract}"),
            )
            .await
        })
    }

    fn cancel_triggered_order(&self, id: i64) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.delete_ignore_body(&format!("/api/v4/futures/{SETTLE}/price_orders/{id}"), "")
                .await
        })
    }
}

/// Build a market order: price "0", immediate-or-cancel.
pub fn market_order(
    contract: impl Into<String>,
    size: rust_decimal::Decimal,
    reduce_only: bool,
    text: impl Into<String>,
) -> FuturesOrder {
    FuturesOrder {
        contract: contract.into(),
        size,
        price: "0".to_string(),
        reduce_only,
        tif: gate_core::TimeInForce::Ioc,
        text: text.into(),
    }
}

/// Build a price-triggered order whose initial order and trigger share
/// the same price (stop-loss / take-profit shape).
pub fn protective_order(
    contract: impl Into<String>,
    size: rust_decimal::Decimal,
    trigger_price: &str,
) -> PriceTriggeredOrder {
    let contract = contract.into();
    PriceTriggeredOrder {
        id: 0,
        initial: FuturesInitialOrder {
            contract,
            size,
            price: trigger_price.to_string(),
            tif: gate_core::TimeInForce::Gtc,
        },
        trigger: FuturesPriceTrigger {
            strategy_type: 0,
            price_type: 0,
            price: trigger_price.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_credentials_rejected() {
        let result = HttpFuturesApi::new(Credentials {
            key: String::new(),
            secret: "s".to_string(),
        });
        assert!(matches!(result, Err(ApiError::MissingCredentials)));
    }

    #[test]
    fn test_market_order_shape() {
        let order = market_order("BTC_USDT", dec!(-3), true, "t-gate-bot-close");
        assert_eq!(order.price, "0");
        assert_eq!(order.tif, gate_core::TimeInForce::Ioc);
        assert!(order.reduce_only);
        assert_eq!(order.size, dec!(-3));
    }

    #[test]
    fn test_protective_order_shares_price() {
        let order = protective_order("BTC_USDT", dec!(-1), "90000.00000000");
        assert_eq!(order.initial.price, order.trigger.price);
        assert_eq!(order.initial.tif, gate_core::TimeInForce::Gtc);
        assert_eq!(order.trigger.strategy_type, 0);
        assert_eq!(order.trigger.price_type, 0);
    }
}

//! HTTP client for the Ghost Broker indexer API.
//!
//! One method per endpoint. Responses are decoded straight into the
//! `ghost-core` record types; any non-2xx status is an error, including 404.

use crate::error::{ApiError, ApiResult};
use ghost_core::{
    Agent, CalldataResponse, Candle, Commodity, Covenant, Decision, EngineStatus, HealthResponse,
    LeaderboardEntry, LifecycleLog, OracleFeed, Order, OrderBookSnapshot, OrderStatus, Reputation,
    Spread, StakerPosition, TokenStats, Trade, Vault,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the indexer REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the indexer (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    // ------------------------------------------------------------------
    // Agents
    // ------------------------------------------------------------------

    /// Fetch agents, optionally paginated.
    pub async fn agents(&self, limit: Option<u32>, offset: Option<u32>) -> ApiResult<Vec<Agent>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        self.get("/v1/agents", &query).await
    }

    /// Fetch a single agent by token id.
    pub async fn agent(&self, token_id: u64) -> ApiResult<Agent> {
        self.get(&format!("/v1/agents/{token_id}"), &[]).await
    }

    /// Fetch recent decisions for one agent.
    pub async fn agent_decisions(&self, token_id: u64, limit: u32) -> ApiResult<Vec<Decision>> {
        self.get(
            &format!("/v1/agents/{token_id}/decisions"),
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch the lifecycle history for one agent.
    pub async fn agent_lifecycle(&self, token_id: u64) -> ApiResult<LifecycleLog> {
        self.get(&format!("/v1/agents/{token_id}/lifecycle"), &[])
            .await
    }

    /// Fetch one agent's orders, optionally filtered by status.
    pub async fn agent_orders(
        &self,
        token_id: u64,
        status: Option<OrderStatus>,
    ) -> ApiResult<Vec<Order>> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", format!("{status:?}").to_uppercase()));
        }
        self.get(&format!("/v1/agents/{token_id}/orders"), &query)
            .await
    }

    // ------------------------------------------------------------------
    // Market
    // ------------------------------------------------------------------

    /// Fetch orders, optionally filtered by commodity and status.
    pub async fn orders(
        &self,
        commodity: Option<&Commodity>,
        status: Option<OrderStatus>,
    ) -> ApiResult<Vec<Order>> {
        let mut query = Vec::new();
        if let Some(commodity) = commodity {
            query.push(("commodity", commodity.to_string()));
        }
        if let Some(status) = status {
            query.push(("status", format!("{status:?}").to_uppercase()));
        }
        self.get("/v1/market/orders", &query).await
    }

    /// Fetch recent trades, optionally filtered by commodity.
    pub async fn trades(&self, commodity: Option<&Commodity>, limit: u32) -> ApiResult<Vec<Trade>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(commodity) = commodity {
            query.push(("commodity", commodity.to_string()));
        }
        self.get("/v1/market/trades", &query).await
    }

    /// Fetch the aggregated order book for a commodity.
    pub async fn orderbook(&self, commodity: &Commodity) -> ApiResult<OrderBookSnapshot> {
        self.get(
            "/v1/market/orderbook",
            &[("commodity", commodity.to_string())],
        )
        .await
    }

    /// Fetch OHLCV candles for a commodity.
    pub async fn candles(&self, commodity: &Commodity, interval: &str) -> ApiResult<Vec<Candle>> {
        self.get(
            "/v1/market/candles",
            &[
                ("commodity", commodity.to_string()),
                ("interval", interval.to_string()),
            ],
        )
        .await
    }

    /// Fetch the best bid/ask spread for a commodity.
    pub async fn spread(&self, commodity: &Commodity) -> ApiResult<Spread> {
        self.get(
            "/v1/market/spread",
            &[("commodity", commodity.to_string())],
        )
        .await
    }

    // ------------------------------------------------------------------
    // Engine
    // ------------------------------------------------------------------

    /// Fetch match engine status counters.
    pub async fn engine_status(&self) -> ApiResult<EngineStatus> {
        self.get("/v1/engine/status", &[]).await
    }

    /// Fetch recent decisions across all agents.
    pub async fn engine_decisions(&self, limit: u32) -> ApiResult<Vec<Decision>> {
        self.get("/v1/engine/decisions", &[("limit", limit.to_string())])
            .await
    }

    /// Fetch the trades matched in one batch block.
    pub async fn engine_matches(&self, block_number: u64) -> ApiResult<Vec<Trade>> {
        self.get(&format!("/v1/engine/matches/{block_number}"), &[])
            .await
    }

    // ------------------------------------------------------------------
    // Reputation
    // ------------------------------------------------------------------

    /// Fetch the score leaderboard.
    pub async fn leaderboard(&self, limit: u32) -> ApiResult<Vec<LeaderboardEntry>> {
        self.get(
            "/v1/reputation/leaderboard",
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch reputation aggregates for one agent.
    pub async fn reputation(&self, agent_id: u64) -> ApiResult<Reputation> {
        self.get(&format!("/v1/reputation/{agent_id}"), &[]).await
    }

    // ------------------------------------------------------------------
    // Staking
    // ------------------------------------------------------------------

    /// Fetch vault aggregates for one agent.
    pub async fn vault(&self, agent_id: u64) -> ApiResult<Vault> {
        self.get(&format!("/v1/stake/{agent_id}/vault"), &[]).await
    }

    /// Fetch one staker's position in an agent vault.
    pub async fn stake_position(
        &self,
        agent_id: u64,
        address: &str,
    ) -> ApiResult<StakerPosition> {
        self.get(
            &format!("/v1/stake/{agent_id}/position"),
            &[("address", address.to_string())],
        )
        .await
    }

    /// Build deposit calldata for an external wallet to sign.
    pub async fn deposit_calldata(
        &self,
        agent_id: u64,
        amount: &str,
    ) -> ApiResult<CalldataResponse> {
        self.post(
            &format!("/v1/stake/{agent_id}/deposit-calldata"),
            &json!({ "amount": amount }),
        )
        .await
    }

    /// Build withdraw calldata for an external wallet to sign.
    pub async fn withdraw_calldata(
        &self,
        agent_id: u64,
        shares: &str,
    ) -> ApiResult<CalldataResponse> {
        self.post(
            &format!("/v1/stake/{agent_id}/withdraw-calldata"),
            &json!({ "shares": shares }),
        )
        .await
    }

    /// Build reward claim calldata for an external wallet to sign.
    pub async fn claim_calldata(&self, agent_id: u64) -> ApiResult<CalldataResponse> {
        self.post(&format!("/v1/stake/{agent_id}/claim-calldata"), &json!({}))
            .await
    }

    // ------------------------------------------------------------------
    // Partnerships, token, oracle, health
    // ------------------------------------------------------------------

    /// Fetch partnership covenants, optionally filtered by agent.
    pub async fn partnerships(&self, agent_id: Option<u64>) -> ApiResult<Vec<Covenant>> {
        let mut query = Vec::new();
        if let Some(agent_id) = agent_id {
            query.push(("agent_id", agent_id.to_string()));
        }
        self.get("/v1/partnerships", &query).await
    }

    /// Fetch one covenant by id.
    pub async fn partnership(&self, covenant_id: u64) -> ApiResult<Covenant> {
        self.get(&format!("/v1/partnerships/{covenant_id}"), &[])
            .await
    }

    /// Fetch GHOST token supply and burn stats.
    pub async fn token_stats(&self) -> ApiResult<TokenStats> {
        self.get("/v1/token/stats", &[]).await
    }

    /// Fetch all oracle price feeds.
    pub async fn oracle_feeds(&self) -> ApiResult<Vec<OracleFeed>> {
        self.get("/v1/oracle/feeds", &[]).await
    }

    /// Fetch the oracle feed for one commodity.
    pub async fn oracle_feed(&self, commodity: &Commodity) -> ApiResult<OracleFeed> {
        self.get(&format!("/v1/oracle/feeds/{commodity}"), &[])
            .await
    }

    /// Fetch indexer health.
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.get("/health", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}

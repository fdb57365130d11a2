use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::error::FetchError;

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com";

/// CoinGecko caps `per_page` at 250; one page of 100 is the usual request.
pub const DEFAULT_PER_PAGE: u32 = 100;
const MAX_PER_PAGE: u32 = 250;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Current market snapshot for one asset, as returned by `/coins/markets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
}

/// Bulk market snapshot client: one request covers the whole list.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(COINGECKO_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Top assets by market cap, priced in USD.
    pub async fn fetch_markets(&self, per_page: u32) -> Result<Vec<MarketSnapshot>, FetchError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let url = format!("{}/api/v3/coins/markets", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_markets(&body)
    }
}

pub fn parse_markets(body: &str) -> Result<Vec<MarketSnapshot>, FetchError> {
    let snapshots: Vec<MarketSnapshot> = serde_json::from_str(body)?;
    if snapshots.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(snapshots)
}

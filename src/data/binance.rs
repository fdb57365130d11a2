use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::data::error::FetchError;
use crate::data::source::CandleSource;
use crate::data::types::Candle;
use crate::util::{to_exchange_symbol, validate_symbol};

pub const BINANCE_API_BASE: &str = "https://api.binance.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error envelope Binance sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// Public (unauthenticated) Binance spot market-data client.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(BINANCE_API_BASE)
    }

    /// Point the client somewhere else (mirror or local test server).
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CandleSource for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, FetchError> {
        validate_symbol(symbol).map_err(|e| FetchError::InvalidSymbol(e.to_string()))?;

        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();
        let exchange_symbol = to_exchange_symbol(symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", exchange_symbol.as_str()),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }

        parse_klines(&body)
    }
}

/// Map a non-success response to an error.
///
/// Rate-limit and blocked-origin statuses win over the body; any other
/// status carrying Binance's `{code, msg}` envelope becomes [`FetchError::Api`].
pub fn error_from_response(status: u16, body: &str) -> FetchError {
    match FetchError::from_status(status) {
        FetchError::Http { status } => match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(api) => FetchError::Api {
                code: api.code,
                msg: api.msg,
            },
            Err(_) => FetchError::Http { status },
        },
        err => err,
    }
}

/// Parse a `/api/v3/klines` body.
///
/// Each row is `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`;
/// prices and volumes arrive as decimal strings.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>, FetchError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;

    if rows.is_empty() {
        return Err(FetchError::Empty);
    }

    let mut candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).map_err(|e| FetchError::Malformed(format!("row {i}: {e}"))))
        .collect::<Result<Vec<_>, _>>()?;

    candles.sort_by_key(|c| c.time_open);
    Ok(candles)
}

fn parse_row(row: &[Value]) -> Result<Candle, String> {
    if row.len() < 6 {
        return Err(format!("expected at least 6 fields, got {}", row.len()));
    }

    let time_open = row[0]
        .as_u64()
        .ok_or_else(|| format!("open time is not an integer: {}", row[0]))?;

    Ok(Candle {
        time_open,
        open: decimal(&row[1], "open")?,
        high: decimal(&row[2], "high")?,
        low: decimal(&row[3], "low")?,
        close: decimal(&row[4], "close")?,
        volume: decimal(&row[5], "volume")?,
    })
}

fn decimal(value: &Value, field: &str) -> Result<f64, String> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!("invalid {field}: {value}")),
    }
}

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::{Thresholds, TurnoverThresholds};
use crate::data::binance::BINANCE_API_BASE;
use crate::data::coingecko::{COINGECKO_API_BASE, DEFAULT_PER_PAGE};
use crate::data::types::MIN_CANDLES;
use crate::util::{map_timeframe_to_interval, validate_symbol};

/// Major pairs scanned when no settings file is given.
pub const DEFAULT_SYMBOLS: [&str; 20] = [
    "BTC/USDT", "ETH/USDT", "SOL/USDT", "XRP/USDT", "BNB/USDT",
    "DOGE/USDT", "ADA/USDT", "AVAX/USDT", "TRX/USDT", "DOT/USDT",
    "LINK/USDT", "MATIC/USDT", "LTC/USDT", "BCH/USDT", "UNI/USDT",
    "XLM/USDT", "ATOM/USDT", "ETC/USDT", "FIL/USDT", "NEAR/USDT",
];

pub const DEFAULT_TIMEFRAME: &str = "1d";
pub const DEFAULT_LOOKBACK: u32 = 5;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Everything a scan needs. Missing fields in a settings file fall back to
/// the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub symbols: Vec<String>,
    pub timeframe: String,
    pub lookback: u32,
    pub request_delay_ms: u64,
    pub cache_ttl_secs: u64,
    pub exchange_base_url: String,
    pub aggregator_base_url: String,
    pub aggregator_per_page: u32,
    pub thresholds: Thresholds,
    pub turnover_thresholds: TurnoverThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            lookback: DEFAULT_LOOKBACK,
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            exchange_base_url: BINANCE_API_BASE.to_string(),
            aggregator_base_url: COINGECKO_API_BASE.to_string(),
            aggregator_per_page: DEFAULT_PER_PAGE,
            thresholds: Thresholds::default(),
            turnover_thresholds: TurnoverThresholds::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file and validate them.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(raw).context("Failed to parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, or the file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("Symbol list must not be empty");
        }
        for symbol in &self.symbols {
            validate_symbol(symbol)?;
        }
        map_timeframe_to_interval(&self.timeframe)?;
        if (self.lookback as usize) < MIN_CANDLES {
            anyhow::bail!(
                "Lookback must be at least {MIN_CANDLES} candles, got {}",
                self.lookback
            );
        }
        if self.cache_ttl_secs == 0 {
            anyhow::bail!("Cache TTL must be greater than zero");
        }
        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

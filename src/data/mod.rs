pub mod binance;
pub mod coingecko;
pub mod error;
pub mod fetcher;
pub mod parquet;
pub mod source;
pub mod types;

pub use binance::BinanceClient;
pub use coingecko::{CoinGeckoClient, MarketSnapshot};
pub use error::FetchError;
pub use fetcher::{fetch_all, fetch_symbol, FetchPlan, FetchReport, NoProgress, ProgressSink};
pub use self::parquet::{export_metrics_to_parquet, read_metrics_from_parquet};
pub use source::CandleSource;
pub use types::{Candle, CandleSelection, CompletedPair, SymbolSeries};

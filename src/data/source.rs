use crate::data::error::FetchError;
use crate::data::types::Candle;

/// Anything that can hand back recent candles for one `BASE/QUOTE` pair.
///
/// Candles must come back oldest first. Implementations report every
/// failure as a [`FetchError`]; the fetcher decides what to do with it.
#[allow(async_fn_in_trait)]
pub trait CandleSource {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, FetchError>;
}

use std::time::Duration;

use tracing::{debug, warn};

use crate::data::error::FetchError;
use crate::data::source::CandleSource;
use crate::data::types::{SymbolSeries, MIN_CANDLES};

/// Receives `(done, total)` after every symbol attempt.
pub trait ProgressSink {
    fn on_progress(&mut self, done: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn on_progress(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

/// Discards progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _done: usize, _total: usize) {}
}

/// Parameters for one sequential fetch pass.
#[derive(Debug, Clone)]
pub struct FetchPlan<'a> {
    pub symbols: &'a [String],
    pub interval: &'a str,
    pub limit: u32,
    pub request_delay: Duration,
}

/// Outcome of a fetch pass: usable series in fetch order plus counts.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub series: Vec<SymbolSeries>,
    pub attempted: usize,
    pub failed: usize,
    /// How many of the failures were the source refusing our origin.
    pub blocked: usize,
}

impl FetchReport {
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.series.is_empty()
    }
}

/// Fetch one symbol and check it holds enough history to analyze.
pub async fn fetch_symbol<S: CandleSource>(
    source: &S,
    symbol: &str,
    interval: &str,
    limit: u32,
) -> Result<SymbolSeries, FetchError> {
    let candles = source.fetch_candles(symbol, interval, limit).await?;

    if candles.is_empty() {
        return Err(FetchError::Empty);
    }

    if candles.len() < MIN_CANDLES {
        return Err(FetchError::InsufficientHistory {
            got: candles.len(),
            need: MIN_CANDLES,
        });
    }

    Ok(SymbolSeries::new(symbol, interval, candles))
}

/// Fetch every symbol in order, one request at a time.
///
/// Failed symbols are logged and skipped; this never fails as a whole.
/// `progress` is told about every attempt, successful or not.
pub async fn fetch_all<S, P>(source: &S, plan: &FetchPlan<'_>, progress: &mut P) -> FetchReport
where
    S: CandleSource,
    P: ProgressSink + ?Sized,
{
    let total = plan.symbols.len();
    let mut report = FetchReport {
        series: Vec::with_capacity(total),
        ..FetchReport::default()
    };

    for (i, symbol) in plan.symbols.iter().enumerate() {
        if i > 0 && !plan.request_delay.is_zero() {
            tokio::time::sleep(plan.request_delay).await;
        }

        report.attempted += 1;
        match fetch_symbol(source, symbol, plan.interval, plan.limit).await {
            Ok(series) => {
                debug!(symbol = %symbol, candles = series.len(), "fetched candles");
                report.series.push(series);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                report.failed += 1;
                if e.is_blocked() {
                    report.blocked += 1;
                }
            }
        }

        progress.on_progress(i + 1, total);
    }

    report
}

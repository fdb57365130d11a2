use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::analysis::{build_table, classify, Classification, MetricRecord};
use crate::cache::TimedCache;
use crate::config::Settings;
use crate::data::fetcher::{fetch_all, FetchPlan, ProgressSink};
use crate::data::source::CandleSource;
use crate::data::types::CandleSelection;
use crate::util::{interval_period_ms, map_timeframe_to_interval};

/// What a cached scan was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanKey {
    pub symbols: Vec<String>,
    pub timeframe: String,
}

/// One fetch-and-compute pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub table: Vec<MetricRecord>,
    pub fetched_at: DateTime<Utc>,
    pub attempted: usize,
    pub failed: usize,
    pub blocked: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// At least one symbol produced a record.
    Ready,
    /// Nothing could be analyzed. `blocked` is set when the source refused
    /// at least one request because of where it came from.
    NoData { blocked: bool },
}

impl ScanResult {
    pub fn status(&self) -> ScanStatus {
        if self.table.is_empty() {
            ScanStatus::NoData {
                blocked: self.blocked > 0,
            }
        } else {
            ScanStatus::Ready
        }
    }
}

/// Fetches, computes and memoizes the metric table for one settings set.
pub struct Scanner<S> {
    source: S,
    settings: Settings,
    selection: CandleSelection,
    period_ms: u64,
    cache: TimedCache<ScanKey, Arc<ScanResult>>,
}

impl<S: CandleSource> Scanner<S> {
    /// Validates `settings` and normalizes its timeframe to the exchange's
    /// interval code, so fetches and the cache key both use `1d`, not `1D`.
    pub fn new(source: S, mut settings: Settings) -> Result<Self> {
        settings.validate()?;
        settings.timeframe = map_timeframe_to_interval(&settings.timeframe)?;
        let period_ms = interval_period_ms(&settings.timeframe)?;
        let cache = TimedCache::new(settings.cache_ttl());

        Ok(Self {
            source,
            settings,
            selection: CandleSelection::default(),
            period_ms,
            cache,
        })
    }

    pub fn with_selection(mut self, selection: CandleSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &TimedCache<ScanKey, Arc<ScanResult>> {
        &self.cache
    }

    fn key(&self) -> ScanKey {
        ScanKey {
            symbols: self.settings.symbols.clone(),
            timeframe: self.settings.timeframe.clone(),
        }
    }

    /// The metric table, refetched only when the cached one has expired or
    /// was cleared.
    pub async fn scan<P>(&mut self, progress: &mut P) -> Arc<ScanResult>
    where
        P: ProgressSink + ?Sized,
    {
        let key = self.key();
        if let Some(cached) = self.cache.get(&key, Instant::now()) {
            return Arc::clone(cached);
        }

        let result = Arc::new(self.refresh(progress).await);
        self.cache.store(key, Arc::clone(&result), Instant::now());
        result
    }

    /// Runs a full fetch-and-compute pass, bypassing the cache.
    pub async fn refresh<P>(&self, progress: &mut P) -> ScanResult
    where
        P: ProgressSink + ?Sized,
    {
        let plan = FetchPlan {
            symbols: &self.settings.symbols,
            interval: &self.settings.timeframe,
            limit: self.settings.lookback,
            request_delay: self.settings.request_delay(),
        };

        let report = fetch_all(&self.source, &plan, progress).await;
        let table = build_table(&report.series, self.selection, self.period_ms);

        info!(
            attempted = report.attempted,
            failed = report.failed,
            records = table.len(),
            "scan complete"
        );

        ScanResult {
            table,
            fetched_at: Utc::now(),
            attempted: report.attempted,
            failed: report.failed,
            blocked: report.blocked,
        }
    }

    /// Classify a scan with the configured thresholds.
    pub fn classify(&self, result: &ScanResult) -> Classification {
        classify(&result.table, &self.settings.thresholds)
    }

    /// Forget the cached table; the next `scan` refetches.
    pub fn clear(&mut self) {
        self.cache.force_invalidate();
    }
}

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::types::{CandleSelection, CompletedPair, SymbolSeries};
use crate::util::base_asset;

/// Derived day-over-day metrics for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub symbol: String,
    pub asset: String,
    /// Yesterday's close.
    pub price: f64,
    pub price_change_pct: f64,
    pub volume_change_pct: f64,
    pub volatility_pct: f64,
    /// Yesterday's traded volume.
    pub volume: f64,
}

/// Percentage change from `from` to `to`, or 0 when `from` is 0.
pub fn pct_change_or_zero(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

/// Computes a record from an already selected candle pair.
///
/// Returns `None` when yesterday's open or low is zero, since neither price
/// change nor volatility has a meaning then.
pub fn compute_record(symbol: &str, pair: &CompletedPair) -> Option<MetricRecord> {
    let y = &pair.yesterday;
    let d = &pair.day_before;

    if y.open == 0.0 || y.low == 0.0 {
        return None;
    }

    Some(MetricRecord {
        symbol: symbol.to_string(),
        asset: base_asset(symbol).to_string(),
        price: y.close,
        price_change_pct: (y.close - y.open) / y.open * 100.0,
        volume_change_pct: pct_change_or_zero(d.volume, y.volume),
        volatility_pct: (y.high - y.low) / y.low * 100.0,
        volume: y.volume,
    })
}

/// Selects the completed candles of `series` and computes its record.
pub fn compute_metrics(
    series: &SymbolSeries,
    selection: CandleSelection,
    period_ms: u64,
) -> Option<MetricRecord> {
    let pair = series.completed_pair(selection, period_ms)?;
    compute_record(&series.symbol, &pair)
}

/// Builds the metric table in input order, dropping series that cannot be
/// analyzed.
pub fn build_table(
    series: &[SymbolSeries],
    selection: CandleSelection,
    period_ms: u64,
) -> Vec<MetricRecord> {
    series
        .iter()
        .filter_map(|s| {
            let record = compute_metrics(s, selection, period_ms);
            if record.is_none() {
                warn!(symbol = %s.symbol, candles = s.len(), "series not analyzable, skipping");
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Candle;

    fn candle(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle {
            time_open: 0,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn test_pct_change_or_zero() {
        assert_eq!(pct_change_or_zero(1000.0, 1600.0), 60.0);
        assert_eq!(pct_change_or_zero(0.0, 500.0), 0.0);
        assert_eq!(pct_change_or_zero(200.0, 100.0), -50.0);
    }

    #[test]
    fn test_zero_open_or_low_is_skipped() {
        let pair = CompletedPair {
            yesterday: candle(0.0, 1.0, 0.5, 1.0, 10.0),
            day_before: candle(1.0, 1.0, 1.0, 1.0, 10.0),
        };
        assert!(compute_record("X/USDT", &pair).is_none());

        let pair = CompletedPair {
            yesterday: candle(1.0, 1.0, 0.0, 1.0, 10.0),
            day_before: candle(1.0, 1.0, 1.0, 1.0, 10.0),
        };
        assert!(compute_record("X/USDT", &pair).is_none());
    }
}

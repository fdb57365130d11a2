use serde::{Deserialize, Serialize};

/// Minimum number of candles a series needs before it can be analyzed:
/// the still-forming candle plus two completed ones.
pub const MIN_CANDLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time_open: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// How the two completed candles are picked out of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandleSelection {
    /// Treat the last candle as the still-forming one and use the two before it.
    #[default]
    SkipLatest,
    /// Drop trailing candles whose period has not closed at the given
    /// timestamp (ms), then use the last two that remain.
    ClosedBefore(u64),
}

/// Yesterday's candle and the one before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedPair {
    pub yesterday: Candle,
    pub day_before: Candle,
}

/// Candles for one trading pair, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub interval: String,
    pub candles: Vec<Candle>,
}

impl SymbolSeries {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Selects the two most recent completed candles.
    ///
    /// `period_ms` is the candle width, used only by
    /// [`CandleSelection::ClosedBefore`]. Returns `None` when the series does
    /// not hold enough completed candles.
    pub fn completed_pair(&self, selection: CandleSelection, period_ms: u64) -> Option<CompletedPair> {
        let completed: &[Candle] = match selection {
            CandleSelection::SkipLatest => {
                if self.candles.len() < MIN_CANDLES {
                    return None;
                }
                &self.candles[..self.candles.len() - 1]
            }
            CandleSelection::ClosedBefore(now_ms) => {
                let closed = self
                    .candles
                    .iter()
                    .rposition(|c| c.time_open.saturating_add(period_ms) <= now_ms)
                    .map(|idx| idx + 1)
                    .unwrap_or(0);
                &self.candles[..closed]
            }
        };

        match completed {
            [.., day_before, yesterday] => Some(CompletedPair {
                yesterday: *yesterday,
                day_before: *day_before,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: u64 = 86_400_000;

    fn candle(day: u64, close: f64) -> Candle {
        Candle {
            time_open: day * DAY_MS,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    fn series(days: u64) -> SymbolSeries {
        let candles = (0..days).map(|d| candle(d, 100.0 + d as f64)).collect();
        SymbolSeries::new("BTC/USDT", "1d", candles)
    }

    #[test]
    fn test_skip_latest_uses_second_and_third_from_end() {
        let pair = series(5)
            .completed_pair(CandleSelection::SkipLatest, DAY_MS)
            .unwrap();
        assert_eq!(pair.yesterday.close, 103.0);
        assert_eq!(pair.day_before.close, 102.0);
    }

    #[test]
    fn test_skip_latest_needs_three_candles() {
        assert!(series(2)
            .completed_pair(CandleSelection::SkipLatest, DAY_MS)
            .is_none());
        assert!(series(3)
            .completed_pair(CandleSelection::SkipLatest, DAY_MS)
            .is_some());
    }

    #[test]
    fn test_closed_before_keeps_all_when_latest_is_closed() {
        // Day 4 closes at 5 * DAY_MS, so every candle is complete.
        let pair = series(5)
            .completed_pair(CandleSelection::ClosedBefore(5 * DAY_MS), DAY_MS)
            .unwrap();
        assert_eq!(pair.yesterday.close, 104.0);
        assert_eq!(pair.day_before.close, 103.0);
    }

    #[test]
    fn test_closed_before_drops_forming_candle() {
        let pair = series(5)
            .completed_pair(CandleSelection::ClosedBefore(4 * DAY_MS + 1000), DAY_MS)
            .unwrap();
        assert_eq!(pair.yesterday.close, 103.0);
    }

    #[test]
    fn test_closed_before_with_nothing_closed() {
        assert!(series(5)
            .completed_pair(CandleSelection::ClosedBefore(DAY_MS / 2), DAY_MS)
            .is_none());
    }
}

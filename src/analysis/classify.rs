use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::analysis::metrics::MetricRecord;

pub const DEFAULT_VOLUME_SPIKE_PCT: f64 = 50.0;
pub const DEFAULT_QUIET_PRICE_BAND_PCT: f64 = 3.0;
pub const DEFAULT_QUIET_VOLUME_PCT: f64 = 20.0;
pub const DEFAULT_VOLATILITY_PCT: f64 = 5.0;

/// Alert thresholds, all in percent. Every comparison is strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Volume change above this is a spike.
    pub volume_spike_pct: f64,
    /// Absolute price change below this counts as flat.
    pub quiet_price_band_pct: f64,
    /// Volume change above this, with flat price, is quiet accumulation.
    pub quiet_volume_pct: f64,
    /// Intraday high/low spread above this is volatility expansion.
    pub volatility_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            volume_spike_pct: DEFAULT_VOLUME_SPIKE_PCT,
            quiet_price_band_pct: DEFAULT_QUIET_PRICE_BAND_PCT,
            quiet_volume_pct: DEFAULT_QUIET_VOLUME_PCT,
            volatility_pct: DEFAULT_VOLATILITY_PCT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    VolumeSpike,
    QuietAccumulation,
    VolatilityExpansion,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [
        AlertKind::VolumeSpike,
        AlertKind::QuietAccumulation,
        AlertKind::VolatilityExpansion,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::VolumeSpike => "Volume Spike",
            AlertKind::QuietAccumulation => "Quiet Accumulation",
            AlertKind::VolatilityExpansion => "Volatility Expansion",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            AlertKind::VolumeSpike => "volume_spike",
            AlertKind::QuietAccumulation => "quiet_accumulation",
            AlertKind::VolatilityExpansion => "volatility_expansion",
        }
    }

    pub fn matches(&self, record: &MetricRecord, t: &Thresholds) -> bool {
        match self {
            AlertKind::VolumeSpike => record.volume_change_pct > t.volume_spike_pct,
            AlertKind::QuietAccumulation => {
                record.price_change_pct.abs() < t.quiet_price_band_pct
                    && record.volume_change_pct > t.quiet_volume_pct
            }
            AlertKind::VolatilityExpansion => record.volatility_pct > t.volatility_pct,
        }
    }

    /// The metric this view is ranked by.
    pub fn sort_key(&self, record: &MetricRecord) -> f64 {
        match self {
            AlertKind::VolumeSpike | AlertKind::QuietAccumulation => record.volume_change_pct,
            AlertKind::VolatilityExpansion => record.volatility_pct,
        }
    }
}

/// Records matching `kind`, highest sort key first. Ties keep input order.
pub fn filter_view(table: &[MetricRecord], kind: AlertKind, thresholds: &Thresholds) -> Vec<MetricRecord> {
    let mut view: Vec<MetricRecord> = table
        .iter()
        .filter(|r| kind.matches(r, thresholds))
        .cloned()
        .collect();

    // sort_by is stable
    view.sort_by(|a, b| descending(kind.sort_key(a), kind.sort_key(b)));
    view
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// The three alert views over one metric table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub volume_spike: Vec<MetricRecord>,
    pub quiet_accumulation: Vec<MetricRecord>,
    pub volatility_expansion: Vec<MetricRecord>,
}

impl Classification {
    pub fn view(&self, kind: AlertKind) -> &[MetricRecord] {
        match kind {
            AlertKind::VolumeSpike => &self.volume_spike,
            AlertKind::QuietAccumulation => &self.quiet_accumulation,
            AlertKind::VolatilityExpansion => &self.volatility_expansion,
        }
    }

    pub fn is_empty(&self) -> bool {
        AlertKind::ALL.iter().all(|k| self.view(*k).is_empty())
    }
}

pub fn classify(table: &[MetricRecord], thresholds: &Thresholds) -> Classification {
    Classification {
        volume_spike: filter_view(table, AlertKind::VolumeSpike, thresholds),
        quiet_accumulation: filter_view(table, AlertKind::QuietAccumulation, thresholds),
        volatility_expansion: filter_view(table, AlertKind::VolatilityExpansion, thresholds),
    }
}

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data::coingecko::MarketSnapshot;

pub const DEFAULT_MIN_ABS_CHANGE_PCT: f64 = 5.0;
pub const DEFAULT_MIN_TURNOVER: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnoverThresholds {
    /// Absolute 24h price change must exceed this (percent).
    pub min_abs_change_pct: f64,
    /// Volume / market cap must exceed this.
    pub min_turnover: f64,
}

impl Default for TurnoverThresholds {
    fn default() -> Self {
        Self {
            min_abs_change_pct: DEFAULT_MIN_ABS_CHANGE_PCT,
            min_turnover: DEFAULT_MIN_TURNOVER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverRecord {
    pub symbol: String,
    pub name: String,
    /// Missing when the aggregator has no current price.
    pub price: Option<f64>,
    pub change_24h_pct: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub turnover: f64,
}

/// Total volume over market cap. `None` when either figure is missing or
/// the cap is not positive.
pub fn turnover(snapshot: &MarketSnapshot) -> Option<f64> {
    let cap = snapshot.market_cap?;
    let volume = snapshot.total_volume?;
    (cap > 0.0).then(|| volume / cap)
}

pub fn to_record(snapshot: &MarketSnapshot) -> Option<TurnoverRecord> {
    Some(TurnoverRecord {
        symbol: snapshot.symbol.to_uppercase(),
        name: snapshot.name.clone(),
        price: snapshot.current_price,
        change_24h_pct: snapshot.price_change_percentage_24h?,
        market_cap: snapshot.market_cap?,
        total_volume: snapshot.total_volume?,
        turnover: turnover(snapshot)?,
    })
}

/// Assets moving hard on heavy relative volume, highest turnover first.
pub fn high_turnover_movers(
    snapshots: &[MarketSnapshot],
    thresholds: &TurnoverThresholds,
) -> Vec<TurnoverRecord> {
    let mut movers: Vec<TurnoverRecord> = snapshots
        .iter()
        .filter_map(to_record)
        .filter(|r| {
            r.change_24h_pct.abs() > thresholds.min_abs_change_pct
                && r.turnover > thresholds.min_turnover
        })
        .collect();

    movers.sort_by(|a, b| b.turnover.partial_cmp(&a.turnover).unwrap_or(Ordering::Equal));
    movers
}

pub mod classify;
pub mod metrics;
pub mod turnover;

pub use classify::{classify, filter_view, AlertKind, Classification, Thresholds};
pub use metrics::{build_table, compute_metrics, compute_record, MetricRecord};
pub use turnover::{high_turnover_movers, TurnoverRecord, TurnoverThresholds};

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

use crate::analysis::{AlertKind, Classification, MetricRecord, Thresholds, TurnoverRecord, TurnoverThresholds};
use crate::scanner::{ScanResult, ScanStatus};

const NO_DATA_HINT: &str = "The market data source may be blocking this machine's network origin \
(some exchanges refuse whole regions or cloud providers). Retry from an unblocked origin, \
or point exchange_base_url at a reachable mirror.";

/// `60.0` -> `+60.0%`
pub fn fmt_signed_pct(value: f64) -> String {
    format!("{value:+.1}%")
}

/// `3.0` -> `3.0%`
pub fn fmt_pct(value: f64) -> String {
    format!("{value:.1}%")
}

/// `42300.5` -> `$42,300.50`. Prices under 1 keep more precision.
pub fn fmt_price(value: f64) -> String {
    if value.abs() < 1.0 {
        return format!("${value:.4}");
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

#[derive(Tabled)]
struct VolumeSpikeRow {
    #[tabled(rename = "Coin")]
    coin: String,
    #[tabled(rename = "Volume Change")]
    volume_change: String,
    #[tabled(rename = "Price Change")]
    price_change: String,
}

#[derive(Tabled)]
struct QuietAccumulationRow {
    #[tabled(rename = "Coin")]
    coin: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Volume Change")]
    volume_change: String,
    #[tabled(rename = "Price Change")]
    price_change: String,
}

#[derive(Tabled)]
struct VolatilityRow {
    #[tabled(rename = "Coin")]
    coin: String,
    #[tabled(rename = "Daily Range")]
    daily_range: String,
    #[tabled(rename = "Close Change")]
    close_change: String,
}

#[derive(Tabled)]
struct TurnoverRow {
    #[tabled(rename = "Coin")]
    coin: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "24h Change")]
    change_24h: String,
    #[tabled(rename = "Turnover")]
    turnover: String,
}

/// Human-facing table for one view.
fn view_table(kind: AlertKind, records: &[MetricRecord]) -> Table {
    match kind {
        AlertKind::VolumeSpike => Table::new(records.iter().map(|r| VolumeSpikeRow {
            coin: r.asset.clone(),
            volume_change: fmt_signed_pct(r.volume_change_pct),
            price_change: fmt_pct(r.price_change_pct),
        })),
        AlertKind::QuietAccumulation => Table::new(records.iter().map(|r| QuietAccumulationRow {
            coin: r.asset.clone(),
            price: fmt_price(r.price),
            volume_change: fmt_signed_pct(r.volume_change_pct),
            price_change: fmt_pct(r.price_change_pct),
        })),
        AlertKind::VolatilityExpansion => Table::new(records.iter().map(|r| VolatilityRow {
            coin: r.asset.clone(),
            daily_range: fmt_pct(r.volatility_pct),
            close_change: fmt_pct(r.price_change_pct),
        })),
    }
}

fn caption(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::VolumeSpike => "Attention jumped regardless of price direction.",
        AlertKind::QuietAccumulation => {
            "Price stayed flat while volume rose: possible accumulation or distribution."
        }
        AlertKind::VolatilityExpansion => "Wide high/low range: short-term opportunity or risk.",
    }
}

/// Neutral message for a view with no matching coins.
pub fn no_matches_message(kind: AlertKind, t: &Thresholds) -> String {
    match kind {
        AlertKind::VolumeSpike => format!(
            "No coin's volume rose more than {}% yesterday.",
            t.volume_spike_pct
        ),
        AlertKind::QuietAccumulation => format!(
            "No coin moved less than {}% in price while volume rose more than {}%.",
            t.quiet_price_band_pct, t.quiet_volume_pct
        ),
        AlertKind::VolatilityExpansion => format!(
            "No coin had a daily range wider than {}%.",
            t.volatility_pct
        ),
    }
}

/// Message shown when the scan produced no records at all.
pub fn no_data_message(result: &ScanResult) -> String {
    let mut msg = format!(
        "No market data could be analyzed ({} of {} symbols failed).",
        result.failed, result.attempted
    );
    if let ScanStatus::NoData { blocked: true } = result.status() {
        msg.push_str(" The source rejected requests from this origin.");
    }
    msg.push(' ');
    msg.push_str(NO_DATA_HINT);
    msg
}

/// Render one alert view, or its "no matches" message.
pub fn render_view(
    out: &mut dyn Write,
    kind: AlertKind,
    records: &[MetricRecord],
    thresholds: &Thresholds,
) -> Result<()> {
    writeln!(out, "== {} ==", kind.title())?;
    writeln!(out, "{}", caption(kind))?;
    if records.is_empty() {
        writeln!(out, "{}", no_matches_message(kind, thresholds))?;
    } else {
        writeln!(out, "{}", view_table(kind, records))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Render a full scan: header line, then either the no-data explanation or
/// all three views.
pub fn render_scan(
    out: &mut dyn Write,
    result: &ScanResult,
    views: &Classification,
    thresholds: &Thresholds,
) -> Result<()> {
    writeln!(
        out,
        "As of {} UTC: {} of {} symbols analyzed",
        result.fetched_at.format("%Y-%m-%d %H:%M"),
        result.table.len(),
        result.attempted
    )?;
    writeln!(out)?;

    if let ScanStatus::NoData { .. } = result.status() {
        writeln!(out, "{}", no_data_message(result))?;
        return Ok(());
    }

    for kind in AlertKind::ALL {
        render_view(out, kind, views.view(kind), thresholds)?;
    }
    Ok(())
}

pub fn render_turnover(
    out: &mut dyn Write,
    movers: &[TurnoverRecord],
    thresholds: &TurnoverThresholds,
) -> Result<()> {
    writeln!(out, "== High Turnover Movers ==")?;
    if movers.is_empty() {
        writeln!(
            out,
            "No asset moved more than {}% in 24h with turnover above {}.",
            thresholds.min_abs_change_pct, thresholds.min_turnover
        )?;
        return Ok(());
    }

    let rows = movers.iter().map(|m| TurnoverRow {
        coin: m.symbol.clone(),
        price: m.price.map(fmt_price).unwrap_or_else(|| "n/a".to_string()),
        change_24h: fmt_pct(m.change_24h_pct),
        turnover: format!("{:.2}", m.turnover),
    });
    writeln!(out, "{}", Table::new(rows))?;
    Ok(())
}

#[derive(Serialize)]
struct ScanDocument<'a> {
    fetched_at: String,
    attempted: usize,
    failed: usize,
    analyzed: usize,
    table: &'a [MetricRecord],
    volume_spike: &'a [MetricRecord],
    quiet_accumulation: &'a [MetricRecord],
    volatility_expansion: &'a [MetricRecord],
}

/// Write the scan and its views as pretty JSON.
pub fn write_json(out: &mut dyn Write, result: &ScanResult, views: &Classification) -> Result<()> {
    let doc = ScanDocument {
        fetched_at: result.fetched_at.to_rfc3339(),
        attempted: result.attempted,
        failed: result.failed,
        analyzed: result.table.len(),
        table: &result.table,
        volume_spike: &views.volume_spike,
        quiet_accumulation: &views.quiet_accumulation,
        volatility_expansion: &views.volatility_expansion,
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_records_csv(records: &[MetricRecord], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `table.csv` plus one CSV per view into `dir`.
pub fn export_csv(dir: &Path, result: &ScanResult, views: &Classification) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(4);

    let table_path = dir.join("table.csv");
    write_records_csv(&result.table, &table_path)?;
    written.push(table_path);

    for kind in AlertKind::ALL {
        let path = dir.join(format!("{}.csv", kind.slug()));
        write_records_csv(views.view(kind), &path)?;
        written.push(path);
    }

    Ok(written)
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::analysis::high_turnover_movers;
use crate::config::Settings;
use crate::data::{export_metrics_to_parquet, BinanceClient, CoinGeckoClient, NoProgress, ProgressSink};
use crate::report::{export_csv, render_scan, render_turnover, write_json};
use crate::scanner::Scanner;

#[derive(Parser)]
#[command(name = "smart-money")]
#[command(about = "Daily candle scanner for volume spikes, quiet accumulation and volatility expansion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily candles once and print the three alert views
    Scan {
        /// Settings JSON file (defaults are used when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Write table.csv and one CSV per view into this directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Export the metric table to this Parquet file
        #[arg(long)]
        parquet: Option<PathBuf>,
        /// Do not print fetch progress
        #[arg(long)]
        no_progress: bool,
    },
    /// Re-scan every time the cached table expires
    Watch {
        /// Settings JSON file (defaults are used when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Stop after this many scans (runs until interrupted when omitted)
        #[arg(long)]
        iterations: Option<u32>,
        /// Drop the cached table before every scan after the first
        #[arg(long)]
        force_refresh: bool,
        /// Do not print fetch progress
        #[arg(long)]
        no_progress: bool,
    },
    /// One bulk market snapshot, filtered by 24h move and turnover
    Turnover {
        /// Settings JSON file (defaults are used when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Number of assets to request (1-250)
        #[arg(long)]
        per_page: Option<u32>,
    },
}

/// Fetch progress bar on stderr, cleared once every symbol was attempted.
struct BarProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl BarProgress {
    fn new() -> Self {
        Self {
            bar: None,
            hidden: false,
        }
    }

    fn new_bar(&self, total: usize) -> ProgressBar {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        bar.set_length(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Fetching [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar
    }
}

impl ProgressSink for BarProgress {
    fn on_progress(&mut self, done: usize, total: usize) {
        if self.bar.is_none() {
            self.bar = Some(self.new_bar(total));
        }
        if let Some(bar) = &self.bar {
            bar.set_position(done as u64);
        }
        if done >= total {
            if let Some(bar) = self.bar.take() {
                bar.finish_and_clear();
            }
        }
    }
}

fn progress_sink(no_progress: bool) -> Box<dyn ProgressSink> {
    if no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(BarProgress::new())
    }
}

fn build_scanner(settings: Settings) -> Result<Scanner<BinanceClient>> {
    let client = BinanceClient::with_base_url(&settings.exchange_base_url)
        .context("Failed to create exchange client")?;
    Scanner::new(client, settings)
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Scan {
                settings,
                format,
                out,
                parquet,
                no_progress,
            } => {
                let settings = Settings::load(settings.as_deref())?;
                let mut scanner = build_scanner(settings)?;
                let mut progress = progress_sink(no_progress);

                let result = scanner.scan(&mut *progress).await;
                let views = scanner.classify(&result);

                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                match format {
                    OutputFormat::Table => {
                        render_scan(&mut handle, &result, &views, &scanner.settings().thresholds)?
                    }
                    OutputFormat::Json => write_json(&mut handle, &result, &views)?,
                }
                handle.flush()?;

                if let Some(dir) = out {
                    let written = export_csv(&dir, &result, &views)?;
                    info!(files = written.len(), dir = %dir.display(), "exported CSV views");
                }

                if let Some(path) = parquet {
                    export_metrics_to_parquet(&result.table, &path)?;
                    info!(records = result.table.len(), path = %path.display(), "exported metric table");
                }

                Ok(())
            }
            Commands::Watch {
                settings,
                iterations,
                force_refresh,
                no_progress,
            } => {
                let settings = Settings::load(settings.as_deref())?;
                let mut scanner = build_scanner(settings)?;
                let mut progress = progress_sink(no_progress);
                let mut runs = 0u32;

                loop {
                    if force_refresh && runs > 0 {
                        scanner.clear();
                    }

                    let result = scanner.scan(&mut *progress).await;
                    let views = scanner.classify(&result);
                    {
                        let stdout = std::io::stdout();
                        let mut handle = stdout.lock();
                        render_scan(&mut handle, &result, &views, &scanner.settings().thresholds)?;
                        handle.flush()?;
                    }

                    runs += 1;
                    if iterations.is_some_and(|max| runs >= max) {
                        return Ok(());
                    }

                    let wait = scanner.cache().remaining(std::time::Instant::now());
                    info!(wait_secs = wait.as_secs(), "waiting for next refresh");
                    tokio::time::sleep(wait).await;
                }
            }
            Commands::Turnover { settings, per_page } => {
                let settings = Settings::load(settings.as_deref())?;
                let client = CoinGeckoClient::with_base_url(&settings.aggregator_base_url)
                    .context("Failed to create aggregator client")?;

                let per_page = per_page.unwrap_or(settings.aggregator_per_page);
                let snapshots = client
                    .fetch_markets(per_page)
                    .await
                    .context("Failed to fetch market snapshot")?;
                let movers = high_turnover_movers(&snapshots, &settings.turnover_thresholds);
                info!(assets = snapshots.len(), movers = movers.len(), "turnover scan complete");

                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                render_turnover(&mut handle, &movers, &settings.turnover_thresholds)?;
                handle.flush()?;
                Ok(())
            }
        }
    }
}

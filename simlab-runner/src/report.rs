//! Per-job artifact writers.
//!
//! Each completed simulation leaves a directory
//! `{output_dir}/{sim_group}/{sim_id}/` containing:
//! - `portfolio.csv` — the per-bar portfolio time series
//! - `trades.csv` — the executed trade log
//! - `summary.json` — metrics plus the job's config fingerprint

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use simlab_core::domain::{PortfolioHistory, TradeLogEntry};

use crate::metrics::BacktestSummary;

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDoc {
    pub sim_group: String,
    pub sim_id: String,
    pub config_fingerprint: String,
    pub bar_count: usize,
    pub trade_count: usize,
    pub metrics: BacktestSummary,
}

/// Write all artifacts for one job. Returns the job's artifact directory.
pub fn write_artifacts(
    output_dir: &Path,
    summary: &SummaryDoc,
    history: &PortfolioHistory,
    trades: &[TradeLogEntry],
) -> Result<PathBuf> {
    let job_dir = output_dir.join(&summary.sim_group).join(&summary.sim_id);
    fs::create_dir_all(&job_dir)
        .with_context(|| format!("failed to create artifact dir {}", job_dir.display()))?;

    write_portfolio_csv(&job_dir.join("portfolio.csv"), history)?;
    write_trades_csv(&job_dir.join("trades.csv"), trades)?;
    write_summary_json(&job_dir.join("summary.json"), summary)?;

    Ok(job_dir)
}

pub fn write_portfolio_csv(path: &Path, history: &PortfolioHistory) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create portfolio CSV {}", path.display()))?;

    writeln!(file, "date,cash,position,holdings,total_value")?;
    for snap in history.snapshots() {
        writeln!(
            file,
            "{},{:.4},{},{:.4},{:.4}",
            snap.date, snap.cash, snap.position, snap.holdings, snap.total_value
        )?;
    }
    Ok(())
}

pub fn write_trades_csv(path: &Path, trades: &[TradeLogEntry]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    writeln!(file, "date,ticker,action,shares,price")?;
    for trade in trades {
        writeln!(
            file,
            "{},{},{},{},{:.4}",
            trade.date, trade.ticker, trade.action, trade.shares, trade.price
        )?;
    }
    Ok(())
}

pub fn write_summary_json(path: &Path, summary: &SummaryDoc) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write summary JSON {}", path.display()))?;
    Ok(())
}

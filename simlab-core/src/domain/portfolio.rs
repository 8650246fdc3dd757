//! Portfolio snapshots — the per-bar output of the simulation loop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Portfolio state after processing one bar.
///
/// `holdings = position × close`, `total_value = cash + holdings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub position: u64,
    pub cash: f64,
    pub holdings: f64,
    pub total_value: f64,
}

/// Append-only portfolio time series, exactly one snapshot per input bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHistory {
    snapshots: Vec<PortfolioSnapshot>,
}

impl PortfolioHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, snapshot: PortfolioSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[PortfolioSnapshot] {
        &self.snapshots
    }

    pub fn last(&self) -> Option<&PortfolioSnapshot> {
        self.snapshots.last()
    }

    /// Total-value column — the equity curve consumed by metrics.
    pub fn values(&self) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.total_value).collect()
    }
}

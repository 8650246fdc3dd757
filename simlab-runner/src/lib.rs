//! simlab Runner — batch orchestration on top of `simlab-core`.
//!
//! This crate provides:
//! - Batch queue file parsing into declarative job descriptors
//! - A queue manager fanning independent simulations across a bounded
//!   worker pool, with per-job failure isolation and a bounded join
//! - Performance metrics over the portfolio value series
//! - Per-job artifact reporting (portfolio CSV, trade CSV, summary JSON)

pub mod manager;
pub mod metrics;
pub mod queue;
pub mod report;

pub use manager::{BatchReport, JobReport, JobStatus, QueueManager, QueueOptions};
pub use metrics::{BacktestSummary, MetricsConfig};
pub use queue::{QueueConfig, QueueError, SimConfig, SimItem};
pub use report::write_artifacts;

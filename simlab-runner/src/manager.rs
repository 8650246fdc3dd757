//! Queue manager — fans independent simulations across a bounded worker pool.
//!
//! Execution model: every sim in the queue file becomes one task on a rayon
//! pool sized to `max_workers`. Each task builds its own cache, loader,
//! strategy and engine (the on-disk cache file is the only shared resource,
//! serialized by its advisory lock), runs the simulation, computes metrics,
//! writes artifacts, and reports back over an mpsc channel.
//!
//! Failure isolation: a job that fails validation or I/O is recorded as
//! `Failed` in the batch report; the rest of the batch keeps running. The
//! manager's wait on the result channel is bounded by `job_timeout` — if no
//! job reports within that window the remaining jobs are marked `TimedOut`
//! and the manager returns instead of blocking forever.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use simlab_core::data::{
    CacheError, DataError, DataLoader, MarketDataProvider, PersistentLruCache, RemoteProvider,
    DEFAULT_CACHE_CAPACITY,
};
use simlab_core::engine::run_simulation;

use crate::metrics::{BacktestSummary, MetricsConfig};
use crate::queue::{QueueConfig, QueueError, SimItem};
use crate::report::{write_artifacts, SummaryDoc};

/// Everything that can fail inside a single job. Contained to that job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("artifact error: {0}")]
    Artifact(String),
}

/// Terminal state of one job.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Completed {
        summary: BacktestSummary,
        trade_count: usize,
    },
    Failed {
        message: String,
    },
    TimedOut,
}

impl JobStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub sim_id: String,
    #[serde(flatten)]
    pub status: JobStatus,
}

/// Per-batch outcome, in the queue file's sim order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub sim_group: String,
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn completed_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.status.is_completed()).count()
    }

    pub fn all_completed(&self) -> bool {
        self.completed_count() == self.jobs.len()
    }
}

/// Tunables for a batch run.
#[derive(Debug, Clone)]
pub struct QueueOptions {
    /// Worker pool size. `None` uses one worker per logical CPU.
    pub max_workers: Option<usize>,
    /// Directory holding the shared persistent cache.
    pub cache_dir: PathBuf,
    /// Maximum quiet period to wait for the next job result. `None` waits
    /// indefinitely (a hung job then blocks completion).
    pub job_timeout: Option<Duration>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_workers: None,
            cache_dir: PathBuf::from(".cache"),
            job_timeout: None,
        }
    }
}

/// Runs every job in a parsed queue file exactly once.
pub struct QueueManager {
    config: QueueConfig,
    options: QueueOptions,
}

impl QueueManager {
    /// Parse the queue file and prepare a manager. Missing or malformed
    /// files are fatal here, before any simulation work.
    pub fn from_file(path: &Path, options: QueueOptions) -> Result<Self, QueueError> {
        let config = QueueConfig::from_file(path)?;
        Ok(Self { config, options })
    }

    pub fn from_config(config: QueueConfig, options: QueueOptions) -> Self {
        Self { config, options }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Run the whole batch. Blocks until every job has reported or the
    /// bounded wait expires.
    pub fn run_all(&self) -> Result<BatchReport, QueueError> {
        let output_dir = &self.config.output_dir_location;
        std::fs::create_dir_all(output_dir).map_err(|source| QueueError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let workers = self
            .options
            .max_workers
            .unwrap_or_else(rayon::current_num_threads)
            .max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| QueueError::WorkerPool(e.to_string()))?;

        info!(
            sim_group = %self.config.sim_group,
            jobs = self.config.sims.len(),
            workers,
            "starting batch"
        );

        let (tx, rx) = mpsc::channel::<(usize, Result<JobStatus, JobError>)>();

        for (index, sim) in self.config.sims.iter().enumerate() {
            let tx = tx.clone();
            let sim = sim.clone();
            let sim_group = self.config.sim_group.clone();
            let cache_dir = self.options.cache_dir.clone();
            let output_dir = output_dir.clone();

            pool.spawn(move || {
                let outcome = run_job(&sim_group, &sim, &cache_dir, &output_dir);
                // The receiver may have given up after a timeout; a dropped
                // channel is not this job's problem.
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let total = self.config.sims.len();
        let mut statuses: Vec<Option<JobStatus>> = (0..total).map(|_| None).collect();
        let mut received = 0;

        while received < total {
            let message = match self.options.job_timeout {
                Some(timeout) => match rx.recv_timeout(timeout) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => {
                        error!(
                            sim_group = %self.config.sim_group,
                            outstanding = total - received,
                            "no job result within timeout; abandoning remaining jobs"
                        );
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match rx.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };

            let (index, outcome) = message;
            statuses[index] = Some(match outcome {
                Ok(status) => status,
                Err(e) => {
                    error!(sim_id = %self.config.sims[index].sim_id, error = %e, "job failed");
                    JobStatus::Failed {
                        message: e.to_string(),
                    }
                }
            });
            received += 1;
        }

        let jobs = self
            .config
            .sims
            .iter()
            .zip(statuses)
            .map(|(sim, status)| JobReport {
                sim_id: sim.sim_id.clone(),
                status: status.unwrap_or(JobStatus::TimedOut),
            })
            .collect();

        Ok(BatchReport {
            sim_group: self.config.sim_group.clone(),
            jobs,
        })
    }
}

/// Run one job end-to-end, constructing every collaborator worker-locally.
fn run_job(
    sim_group: &str,
    sim: &SimItem,
    cache_dir: &Path,
    output_dir: &Path,
) -> Result<JobStatus, JobError> {
    info!(sim_group, sim_id = %sim.sim_id, "starting");

    let cache = PersistentLruCache::open(cache_dir, DEFAULT_CACHE_CAPACITY)?;
    let provider: Box<dyn MarketDataProvider> = Box::new(RemoteProvider::new());
    let mut loader = DataLoader::new(cache, provider);

    let series = loader.load(&sim.data)?;
    let strategy = sim.strategy.build(&series)?;
    let signals = strategy.generate_signals(&series);

    let engine_config = sim.sim_config.to_engine_config();
    let result = run_simulation(&engine_config, &sim.data.ticker, &series, &signals);

    let summary = BacktestSummary::compute(
        &sim.data.ticker,
        &result.history.values(),
        &MetricsConfig::default(),
    );

    let doc = SummaryDoc {
        sim_group: sim_group.to_string(),
        sim_id: sim.sim_id.clone(),
        config_fingerprint: sim.fingerprint(),
        bar_count: result.history.len(),
        trade_count: result.trades.len(),
        metrics: summary.clone(),
    };
    write_artifacts(output_dir, &doc, &result.history, &result.trades)
        .map_err(|e| JobError::Artifact(format!("{e:#}")))?;

    info!(sim_group, sim_id = %sim.sim_id, trades = result.trades.len(), "completed");
    Ok(JobStatus::Completed {
        summary,
        trade_count: result.trades.len(),
    })
}

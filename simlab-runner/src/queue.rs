//! Batch queue file parsing.
//!
//! A queue file is a JSON document describing a group of independent
//! simulations:
//!
//! ```json
//! {
//!   "sim_group": "example_group",
//!   "output_dir_location": "./out",
//!   "author": "...",
//!   "sims": [
//!     {
//!       "sim_id": "001",
//!       "strategy": {"type": "sma_crossover", "fields": {"short_window": 50, "long_window": 100}},
//!       "data": {"ticker": "AAPL", "start_date": "2020-01-02", "end_date": "2023-01-01", "source": "remote"},
//!       "sim_config": {"initial_cash": 100000, "slippage": 0.01, "commission": 0.001}
//!     }
//!   ]
//! }
//! ```
//!
//! Parsing is strict: a missing file, malformed JSON, or an unknown strategy
//! type is a fatal configuration error raised before any simulation work.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use simlab_core::data::DataRequest;
use simlab_core::engine::EngineConfig;
use simlab_core::strategies::StrategySpec;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue file {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("failed to read queue file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse queue file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Cost and cash parameters of one sim, as written in the queue file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub initial_cash: f64,
    #[serde(default)]
    pub slippage: f64,
    #[serde(default)]
    pub commission: f64,
}

impl SimConfig {
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.initial_cash, self.slippage, self.commission)
    }
}

/// One declarative job: identity, strategy, data request, cost config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimItem {
    pub sim_id: String,
    pub strategy: StrategySpec,
    pub data: DataRequest,
    pub sim_config: SimConfig,
}

impl SimItem {
    /// Content-addressed fingerprint of this job's full configuration,
    /// recorded in its summary artifact so results can be traced back to the
    /// exact config that produced them.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).expect("SimItem serialization cannot fail");
        blake3::hash(&json).to_hex().to_string()
    }
}

/// The parsed queue file: read once, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub sim_group: String,
    pub output_dir_location: PathBuf,
    pub author: String,
    pub sims: Vec<SimItem>,
}

impl QueueConfig {
    pub fn from_file(path: &Path) -> Result<Self, QueueError> {
        if !path.exists() {
            return Err(QueueError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| QueueError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| QueueError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

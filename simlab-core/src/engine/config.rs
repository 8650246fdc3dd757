//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Cost and cash parameters for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Starting cash balance.
    pub initial_cash: f64,
    /// Fractional execution-cost penalty applied to buy fills.
    pub slippage: f64,
    /// Fractional transaction fee applied to both buys and sells.
    pub commission: f64,
}

impl EngineConfig {
    pub fn new(initial_cash: f64, slippage: f64, commission: f64) -> Self {
        Self {
            initial_cash,
            slippage,
            commission,
        }
    }

    /// Frictionless variant with the same starting cash.
    pub fn frictionless(initial_cash: f64) -> Self {
        Self::new(initial_cash, 0.0, 0.0)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: 100_000.0,
            slippage: 0.0,
            commission: 0.0,
        }
    }
}

//! Strategies — pluggable signal generators behind a closed spec enum.
//!
//! Each strategy computes a raw per-bar signal column from the close prices
//! and shifts it forward one bar, so a decision computed at bar i is acted on
//! at bar i+1 and bar 0 never carries a signal.
//!
//! [`StrategySpec`] is the serializable configuration surface: a tagged enum
//! whose tags are the wire names used in batch queue files. Unknown strategy
//! types fail at parse time, not at first use, and [`StrategySpec::build`]
//! rejects series shorter than the strategy's lookback before any simulation
//! work begins.

pub mod buy_and_hold;
pub mod mean_reversion;
pub mod momentum;
pub mod sma_crossover;

use serde::{Deserialize, Serialize};

use crate::data::DataError;
use crate::domain::{PriceSeries, SignalSeries};

pub use buy_and_hold::BuyAndHold;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;
pub use sma_crossover::SmaCrossover;

/// A signal generator over a validated price series.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Minimum number of bars the strategy needs to produce any signal.
    fn min_bars(&self) -> usize;

    /// Produce the signal column, aligned 1:1 with the series.
    fn generate_signals(&self, series: &PriceSeries) -> SignalSeries;
}

/// Closed set of known strategy configurations.
///
/// Wire format (batch queue files):
/// `{"type": "sma_crossover", "fields": {"short_window": 20, "long_window": 50}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "fields", rename_all = "snake_case")]
pub enum StrategySpec {
    SmaCrossover {
        short_window: usize,
        long_window: usize,
    },
    Momentum {
        window: usize,
        threshold: f64,
    },
    MeanReversion {
        window: usize,
        threshold: f64,
    },
    BuyAndHold,
}

impl StrategySpec {
    /// Wire name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SmaCrossover { .. } => "sma_crossover",
            Self::Momentum { .. } => "momentum",
            Self::MeanReversion { .. } => "mean_reversion",
            Self::BuyAndHold => "buy_and_hold",
        }
    }

    /// Construct the strategy, validating the series length against its
    /// lookback requirement.
    pub fn build(&self, series: &PriceSeries) -> Result<Box<dyn Strategy>, DataError> {
        let strategy: Box<dyn Strategy> = match *self {
            Self::SmaCrossover {
                short_window,
                long_window,
            } => Box::new(SmaCrossover::new(short_window, long_window)),
            Self::Momentum { window, threshold } => Box::new(Momentum::new(window, threshold)),
            Self::MeanReversion { window, threshold } => {
                Box::new(MeanReversion::new(window, threshold))
            }
            Self::BuyAndHold => Box::new(BuyAndHold::new()),
        };

        let required = strategy.min_bars();
        if series.len() < required {
            return Err(DataError::InsufficientData {
                required,
                actual: series.len(),
            });
        }
        Ok(strategy)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::domain::PriceSeries;

    pub fn series(closes: &[f64]) -> PriceSeries {
        let dates = (0..closes.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + chrono::Duration::days(i as i64)
            })
            .collect();
        PriceSeries::new(dates, closes.to_vec()).unwrap()
    }
}

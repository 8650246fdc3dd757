//! Domain types: price series, signals, portfolio snapshots, trade log.

pub mod portfolio;
pub mod series;
pub mod signal;
pub mod trade;

pub use portfolio::{PortfolioHistory, PortfolioSnapshot};
pub use series::PriceSeries;
pub use signal::{Signal, SignalSeries};
pub use trade::{TradeAction, TradeLogEntry};

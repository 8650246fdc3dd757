//! simlab Core — domain types, simulation engine, strategies, data pipeline.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (price series, signals, portfolio snapshots, trade log)
//! - Bar-by-bar simulation loop with the long-only buy/sell state machine
//! - Rolling-window indicators (SMA, ROC)
//! - Pluggable strategies behind a closed, serde-tagged spec enum
//! - Data loading (remote chart API or local CSV) through a persistent
//!   disk-backed LRU cache with cross-process locking

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategies;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the worker-pool boundary are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::SignalSeries>();
        require_sync::<domain::SignalSeries>();
        require_send::<domain::PortfolioHistory>();
        require_sync::<domain::PortfolioHistory>();
        require_send::<domain::TradeLogEntry>();
        require_sync::<domain::TradeLogEntry>();

        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::SimResult>();
        require_sync::<engine::SimResult>();

        require_send::<strategies::StrategySpec>();
        require_sync::<strategies::StrategySpec>();

        require_send::<data::DataRequest>();
        require_sync::<data::DataRequest>();
        require_send::<data::PersistentLruCache>();
        require_sync::<data::PersistentLruCache>();
    }
}

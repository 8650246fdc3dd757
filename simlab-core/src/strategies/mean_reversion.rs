//! Mean-reversion strategy.
//!
//! Assumes price reverts to its rolling mean: a close far enough below the
//! moving average is a buy, far enough above it an exit.

use crate::domain::{PriceSeries, Signal, SignalSeries};
use crate::indicators::sma;
use crate::strategies::Strategy;

#[derive(Debug, Clone)]
pub struct MeanReversion {
    window: usize,
    threshold: f64,
}

impl MeanReversion {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &'static str {
        "mean_reversion"
    }

    fn min_bars(&self) -> usize {
        self.window
    }

    fn generate_signals(&self, series: &PriceSeries) -> SignalSeries {
        let mean = sma(series.closes(), self.window);

        let raw = series
            .closes()
            .iter()
            .zip(&mean)
            .map(|(&close, &ma)| {
                if close < ma * (1.0 - self.threshold) {
                    Signal::EnterLong
                } else if close > ma * (1.0 + self.threshold) {
                    Signal::Exit
                } else {
                    Signal::Hold
                }
            })
            .collect();

        SignalSeries::shifted(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::series;

    #[test]
    fn dip_below_mean_enters_long() {
        let prices = series(&[100.0, 100.0, 100.0, 80.0, 81.0]);
        let strategy = MeanReversion::new(3, 0.05);
        let signals = strategy.generate_signals(&prices);
        // sma[3] = (100+100+80)/3 ≈ 93.3; 80 < 93.3 × 0.95 → buy acted on at bar 4.
        assert_eq!(signals.at(4), Some(Signal::EnterLong));
    }

    #[test]
    fn spike_above_mean_exits() {
        let prices = series(&[100.0, 100.0, 100.0, 125.0, 124.0]);
        let strategy = MeanReversion::new(3, 0.05);
        let signals = strategy.generate_signals(&prices);
        // sma[3] = (100+100+125)/3 = 108.3; 125 > 108.3 × 1.05 → exit at bar 4.
        assert_eq!(signals.at(4), Some(Signal::Exit));
    }

    #[test]
    fn price_near_mean_holds() {
        let prices = series(&[100.0, 100.0, 100.0, 101.0, 100.0]);
        let strategy = MeanReversion::new(3, 0.05);
        let signals = strategy.generate_signals(&prices);
        assert_eq!(signals.at(4), Some(Signal::Hold));
    }

    #[test]
    fn warmup_holds() {
        let prices = series(&[100.0, 50.0, 150.0]);
        let strategy = MeanReversion::new(3, 0.05);
        let signals = strategy.generate_signals(&prices);
        // NaN mean compares false both ways → hold.
        assert_eq!(signals.at(1), Some(Signal::Hold));
        assert_eq!(signals.at(2), Some(Signal::Hold));
    }
}

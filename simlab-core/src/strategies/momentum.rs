//! Momentum strategy.
//!
//! Fractional price change over a lookback window; a move beyond the
//! threshold in either direction is read as trend continuation.

use crate::domain::{PriceSeries, Signal, SignalSeries};
use crate::indicators::roc;
use crate::strategies::Strategy;

#[derive(Debug, Clone)]
pub struct Momentum {
    window: usize,
    threshold: f64,
}

impl Momentum {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn min_bars(&self) -> usize {
        self.window
    }

    fn generate_signals(&self, series: &PriceSeries) -> SignalSeries {
        let momentum = roc(series.closes(), self.window);

        let raw = momentum
            .iter()
            .map(|&m| {
                if m > self.threshold {
                    Signal::EnterLong
                } else if m < -self.threshold {
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
    fn strong_move_up_enters_long() {
        let prices = series(&[100.0, 100.0, 110.0, 111.0]);
        let strategy = Momentum::new(2, 0.05);
        let signals = strategy.generate_signals(&prices);
        // roc[2] = 10% > 5% → raw EnterLong at 2 → acted on at bar 3.
        assert_eq!(signals.at(3), Some(Signal::EnterLong));
    }

    #[test]
    fn strong_move_down_exits() {
        let prices = series(&[100.0, 100.0, 89.0, 88.0]);
        let strategy = Momentum::new(2, 0.05);
        let signals = strategy.generate_signals(&prices);
        assert_eq!(signals.at(3), Some(Signal::Exit));
    }

    #[test]
    fn move_within_threshold_holds() {
        let prices = series(&[100.0, 100.0, 101.0, 102.0]);
        let strategy = Momentum::new(2, 0.05);
        let signals = strategy.generate_signals(&prices);
        assert_eq!(signals.at(3), Some(Signal::Hold));
    }

    #[test]
    fn warmup_holds() {
        let prices = series(&[100.0, 120.0, 140.0]);
        let strategy = Momentum::new(2, 0.05);
        let signals = strategy.generate_signals(&prices);
        assert_eq!(signals.at(0), None);
        // Bar 1 acts on roc[0], which is NaN → hold.
        assert_eq!(signals.at(1), Some(Signal::Hold));
    }
}

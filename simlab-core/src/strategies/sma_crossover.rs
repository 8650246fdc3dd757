//! SMA crossover strategy.
//!
//! Compares a short and a long simple moving average of the close. Short
//! above long reads bullish (enter long), short below long reads bearish
//! (exit). Bars where either average is still warming up emit no direction.

use crate::domain::{PriceSeries, Signal, SignalSeries};
use crate::indicators::sma;
use crate::strategies::Strategy;

#[derive(Debug, Clone)]
pub struct SmaCrossover {
    short_window: usize,
    long_window: usize,
}

impl SmaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &'static str {
        "sma_crossover"
    }

    fn min_bars(&self) -> usize {
        self.short_window.max(self.long_window)
    }

    fn generate_signals(&self, series: &PriceSeries) -> SignalSeries {
        let short = sma(series.closes(), self.short_window);
        let long = sma(series.closes(), self.long_window);

        let raw = short
            .iter()
            .zip(&long)
            .map(|(&s, &l)| {
                if s > l {
                    Signal::EnterLong
                } else if s < l {
                    Signal::Exit
                } else {
                    // Equal averages or a still-warming window: no direction.
                    Signal::Hold
                }
            })
            .collect();

        SignalSeries::shifted(raw)
    }
}

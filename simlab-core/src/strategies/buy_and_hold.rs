//! Buy-and-hold strategy: enter on the first tradable bar, never exit.

use crate::domain::{PriceSeries, Signal, SignalSeries};
use crate::strategies::Strategy;

#[derive(Debug, Clone, Default)]
pub struct BuyAndHold;

impl BuyAndHold {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for BuyAndHold {
    fn name(&self) -> &'static str {
        "buy_and_hold"
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn generate_signals(&self, series: &PriceSeries) -> SignalSeries {
        SignalSeries::shifted(vec![Signal::EnterLong; series.len()])
    }
}

//! The simulation loop.

use crate::domain::{
    PortfolioHistory, PortfolioSnapshot, PriceSeries, Signal, SignalSeries, TradeAction,
    TradeLogEntry,
};
use crate::engine::EngineConfig;

/// Output of one simulation run: the per-bar portfolio history and the
/// ordered trade log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimResult {
    pub history: PortfolioHistory,
    pub trades: Vec<TradeLogEntry>,
}

/// Replay the buy/sell state machine over a price/signal table.
///
/// Emits exactly one snapshot per input bar. Position starts flat, cash at
/// `config.initial_cash`; bar 0 never trades. A non-finite close (which a
/// validated [`PriceSeries`] cannot contain, so this path is defensive)
/// carries the previous bar's state forward under the last valid price.
///
/// An empty price series yields an empty result.
pub fn run_simulation(
    config: &EngineConfig,
    ticker: &str,
    series: &PriceSeries,
    signals: &SignalSeries,
) -> SimResult {
    let n = series.len();
    let mut history = PortfolioHistory::with_capacity(n);
    let mut trades = Vec::new();

    if n == 0 {
        return SimResult { history, trades };
    }

    let mut position: u64 = 0;
    let mut cash = config.initial_cash;
    let mut last_price = series.close_at(0);

    history.push(PortfolioSnapshot {
        date: series.date_at(0),
        position,
        cash,
        holdings: 0.0,
        total_value: cash,
    });

    for i in 1..n {
        let raw_price = series.close_at(i);
        let tradable = raw_price.is_finite();
        let price = if tradable {
            last_price = raw_price;
            raw_price
        } else {
            last_price
        };

        if tradable {
            match signals.at(i) {
                Some(Signal::EnterLong) if position == 0 => {
                    let per_share_cost = price * (1.0 + config.slippage + config.commission);
                    let shares = (cash / per_share_cost).floor() as u64;
                    // Insufficient cash for a single share is a silent no-op.
                    if shares > 0 {
                        cash -= shares as f64 * per_share_cost;
                        position = shares;
                        trades.push(TradeLogEntry {
                            date: series.date_at(i),
                            ticker: ticker.to_string(),
                            action: TradeAction::Buy,
                            shares,
                            price,
                        });
                    }
                }
                Some(Signal::Exit) if position > 0 => {
                    let proceeds = position as f64 * price * (1.0 - config.commission);
                    cash += proceeds;
                    trades.push(TradeLogEntry {
                        date: series.date_at(i),
                        ticker: ticker.to_string(),
                        action: TradeAction::Sell,
                        shares: position,
                        price,
                    });
                    position = 0;
                }
                _ => {}
            }
        }

        let holdings = position as f64 * price;
        history.push(PortfolioSnapshot {
            date: series.date_at(i),
            position,
            cash,
            holdings,
            total_value: cash + holdings,
        });
    }

    SimResult { history, trades }
}

//! Performance metrics — pure functions over the portfolio value series.
//!
//! Every metric is a pure function: value series in, scalar out. No
//! dependencies on the queue manager or the engine.

use serde::{Deserialize, Serialize};

/// Annualization and risk-free parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Annual risk-free rate used for excess returns.
    pub risk_free_rate: f64,
    /// Bars per year (252 for daily equity data).
    pub periods_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: 252.0,
        }
    }
}

/// Aggregate summary for a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub ticker: String,
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
}

impl BacktestSummary {
    /// Compute all metrics from the portfolio value series.
    pub fn compute(ticker: &str, values: &[f64], config: &MetricsConfig) -> Self {
        Self {
            ticker: ticker.to_string(),
            total_return: total_return(values),
            sharpe_ratio: sharpe_ratio(values, config.risk_free_rate, config.periods_per_year),
            max_drawdown: max_drawdown(values),
            volatility: volatility(values, config.periods_per_year),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let initial = values[0];
    if initial <= 0.0 {
        return 0.0;
    }
    (values[values.len() - 1] - initial) / initial
}

/// Annualized Sharpe ratio from per-bar returns.
///
/// `mean(excess) / std(excess) × sqrt(periods_per_year)`, with the risk-free
/// rate de-annualized per bar. Zero variance or fewer than two returns ⇒ 0.
pub fn sharpe_ratio(values: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    let returns = bar_returns(values);
    if returns.len() < 2 {
        return 0.0;
    }
    let per_bar_rf = risk_free_rate / periods_per_year;
    let excess: Vec<f64> = returns.iter().map(|r| r - per_bar_rf).collect();
    let std = std_dev(&excess);
    if std < 1e-15 {
        return 0.0;
    }
    (mean(&excess) / std) * periods_per_year.sqrt()
}

/// Maximum drawdown as a negative fraction: min of
/// `(value − running peak) / running peak`.
///
/// Returns 0.0 for constant or monotonically increasing series.
pub fn max_drawdown(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mut peak = values[0];
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized volatility: sample std of per-bar returns × sqrt(periods).
pub fn volatility(values: &[f64], periods_per_year: f64) -> f64 {
    let returns = bar_returns(values);
    if returns.len() < 2 {
        return 0.0;
    }
    std_dev(&returns) * periods_per_year.sqrt()
}

/// Per-bar fractional returns of the value series.
pub fn bar_returns(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }
    values
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Total return ──

    #[test]
    fn total_return_known_series() {
        let values = [100.0, 105.0, 102.0, 108.0, 110.0];
        assert!((total_return(&values) - 0.10).abs() < 1e-10);
    }

    #[test]
    fn total_return_negative() {
        let values = [100_000.0, 95_000.0, 90_000.0];
        assert!((total_return(&values) - (-0.1)).abs() < 1e-10);
    }

    #[test]
    fn total_return_single_value() {
        assert_eq!(total_return(&[100.0]), 0.0);
        assert_eq!(total_return(&[]), 0.0);
    }

    // ── Max drawdown ──

    #[test]
    fn max_drawdown_known_series() {
        let values = [100.0, 105.0, 102.0, 108.0, 110.0];
        let expected = (102.0 - 105.0) / 105.0;
        assert!((max_drawdown(&values) - expected).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_is_negative_fraction() {
        let values = [100.0, 110.0, 90.0, 95.0];
        let expected = (90.0 - 110.0) / 110.0;
        let dd = max_drawdown(&values);
        assert!(dd < 0.0);
        assert!((dd - expected).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_monotonic_is_zero() {
        let values: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        assert_eq!(max_drawdown(&values), 0.0);
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_zero_variance_is_zero() {
        let values = vec![100_000.0; 100];
        assert_eq!(sharpe_ratio(&values, 0.0, 252.0), 0.0);
    }

    #[test]
    fn sharpe_constant_growth_is_zero() {
        // Identical per-bar returns → zero std → guarded to 0, not a blowup.
        let mut values = vec![100_000.0];
        for i in 1..100 {
            values.push(values[i - 1] * 1.001);
        }
        assert_eq!(sharpe_ratio(&values, 0.0, 252.0), 0.0);
    }

    #[test]
    fn sharpe_positive_for_mostly_up_series() {
        let mut values = vec![100_000.0];
        for i in 1..253 {
            let r = if i % 2 == 0 { 1.002 } else { 1.0005 };
            values.push(values[i - 1] * r);
        }
        let s = sharpe_ratio(&values, 0.0, 252.0);
        assert!(s > 1.0, "expected strongly positive Sharpe, got {s}");
    }

    #[test]
    fn sharpe_respects_risk_free_rate() {
        let mut values = vec![100_000.0];
        for i in 1..253 {
            let r = if i % 2 == 0 { 1.002 } else { 1.0005 };
            values.push(values[i - 1] * r);
        }
        let without_rf = sharpe_ratio(&values, 0.0, 252.0);
        let with_rf = sharpe_ratio(&values, 0.05, 252.0);
        assert!(with_rf < without_rf);
    }

    // ── Volatility ──

    #[test]
    fn volatility_constant_is_zero() {
        let values = vec![100_000.0; 50];
        assert_eq!(volatility(&values, 252.0), 0.0);
    }

    #[test]
    fn volatility_positive_for_choppy_series() {
        let values = [100.0, 110.0, 95.0, 108.0, 92.0];
        assert!(volatility(&values, 252.0) > 0.0);
    }

    // ── Returns helper ──

    #[test]
    fn bar_returns_basic() {
        let values = [100.0, 110.0, 104.5];
        let r = bar_returns(&values);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-10);
        assert!((r[1] - (104.5 - 110.0) / 110.0).abs() < 1e-10);
    }

    // ── Aggregate ──

    #[test]
    fn summary_on_known_series() {
        let values = [100.0, 105.0, 102.0, 108.0, 110.0];
        let summary = BacktestSummary::compute("TEST", &values, &MetricsConfig::default());

        assert_eq!(summary.ticker, "TEST");
        assert!((summary.total_return - 0.10).abs() < 1e-10);
        assert!((summary.max_drawdown - (-3.0 / 105.0)).abs() < 1e-10);
        assert!(summary.sharpe_ratio.is_finite());
        assert!(summary.volatility > 0.0);
    }

    #[test]
    fn summary_on_flat_series_is_all_zero() {
        let values = vec![100_000.0; 10];
        let summary = BacktestSummary::compute("TEST", &values, &MetricsConfig::default());
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.volatility, 0.0);
    }
}

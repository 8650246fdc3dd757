//! Rolling-window indicators used by the strategies.
//!
//! All functions return a column aligned 1:1 with the input, with NaN filling
//! the warmup head where the window is not yet populated.

mod roc;
mod sma;

pub use roc::roc;
pub use sma::sma;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

//! Trading signals — per-bar directional instructions emitted by a strategy.

use serde::{Deserialize, Serialize};

/// Directional instruction for one bar.
///
/// `EnterLong` maps to +1, `Exit` to -1, `Hold` to 0 in the classic
/// signal-column encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    EnterLong,
    Exit,
    Hold,
}

/// Signal column aligned 1:1 with a price series.
///
/// `None` means "no signal yet" — the warmup head produced by shifting the
/// raw signal forward one bar. The engine treats it as no-action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSeries(Vec<Option<Signal>>);

impl SignalSeries {
    pub fn new(signals: Vec<Option<Signal>>) -> Self {
        Self(signals)
    }

    /// Shift a raw signal column forward one bar: the decision computed at
    /// bar i is acted on at bar i+1, and bar 0 has no signal.
    pub fn shifted(raw: Vec<Signal>) -> Self {
        if raw.is_empty() {
            return Self(Vec::new());
        }
        let mut shifted = Vec::with_capacity(raw.len());
        shifted.push(None);
        shifted.extend(raw[..raw.len() - 1].iter().copied().map(Some));
        Self(shifted)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Signal at a bar; out-of-range or warmup bars yield `None`.
    pub fn at(&self, index: usize) -> Option<Signal> {
        self.0.get(index).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<Signal>] {
        &self.0
    }
}

use serde::{Deserialize, Serialize};

use common::{round_price, AnnotatedCandle};

use crate::EntryRule;

/// Which entry condition opened the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Prior candle sat fully below its SMA and this one crosses it. Filled at close.
    Breakout,
    /// This candle's range touches the SMA. Filled at the SMA.
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntrySignal {
    pub kind: EntryKind,
    /// Fill price, rounded to 2 decimals.
    pub price: f64,
}

/// Buy when price reaches the moving average from below.
///
/// The current candle must straddle its SMA (`low <= sma < high`). If the previous
/// candle was entirely under its own SMA the fill is at the current close (breakout),
/// otherwise at the SMA itself (touch). Breakout wins when both apply.
#[derive(Debug, Clone, Default)]
pub struct SmaCrossEntry;

impl SmaCrossEntry {
    pub fn new() -> Self {
        Self
    }
}

impl EntryRule for SmaCrossEntry {
    fn name(&self) -> &str {
        "sma-cross"
    }

    fn check(&self, prev: Option<&AnnotatedCandle>, curr: &AnnotatedCandle) -> Option<EntrySignal> {
        let sma = curr.sma?;
        if !curr.straddles_sma() {
            return None;
        }

        if prev.is_some_and(AnnotatedCandle::below_sma) {
            Some(EntrySignal {
                kind: EntryKind::Breakout,
                price: round_price(curr.candle.close),
            })
        } else {
            Some(EntrySignal {
                kind: EntryKind::Touch,
                price: round_price(sma),
            })
        }
    }
}

pub mod config;
pub mod entry;
pub mod indicators;
pub mod presets;

pub use config::{BacktestRequest, PresetConfig, PresetFileConfig, StrategyConfig};
pub use entry::{EntryKind, EntrySignal, SmaCrossEntry};
pub use indicators::{annotate, SmaIndicator};
pub use presets::PresetBook;

use common::AnnotatedCandle;

/// All entry rules must satisfy this trait.
pub trait EntryRule: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Decide whether a flat book opens a position on `curr`.
    ///
    /// `prev` is the candle immediately before `curr` in the full series, whether or
    /// not it has an SMA value. Returns `None` when no entry condition holds.
    fn check(&self, prev: Option<&AnnotatedCandle>, curr: &AnnotatedCandle) -> Option<EntrySignal>;
}

pub mod exits;

pub use exits::{ExitRules, ExitSignal, RiskConfig};

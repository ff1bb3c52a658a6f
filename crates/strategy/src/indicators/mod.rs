pub mod sma;

pub use sma::{annotate, SmaIndicator};

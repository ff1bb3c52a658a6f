use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{round_price, Candle, Position, TradeOutcome};

/// Exit thresholds, both in percent of the entry price (e.g. 3.0 = 3%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Adverse move from entry that closes the position at a loss.
    pub stop_loss_pct: f64,
    /// Favourable move from entry that closes the position at a profit.
    pub take_profit_pct: f64,
}

/// A decision to close the open position on the current candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitSignal {
    pub outcome: TradeOutcome,
    /// Fill price at the threshold level, rounded to 2 decimals.
    pub price: f64,
}

/// Stop-loss / take-profit evaluation against a candle's full range.
///
/// Intra-candle order is unknown, so the path is assumed to be
/// open -> low -> high -> close: when one candle reaches both thresholds the
/// stop-loss wins. Fills happen exactly at the threshold price, not at the
/// candle extreme.
#[derive(Debug, Clone)]
pub struct ExitRules {
    config: RiskConfig,
}

impl ExitRules {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Price at which a stop-loss fills for `entry_price`.
    pub fn stop_loss_price(&self, entry_price: f64) -> f64 {
        round_price(entry_price - entry_price * self.config.stop_loss_pct / 100.0)
    }

    /// Price at which a take-profit fills for `entry_price`.
    pub fn take_profit_price(&self, entry_price: f64) -> f64 {
        round_price(entry_price + entry_price * self.config.take_profit_pct / 100.0)
    }

    /// Check whether `candle` closes `position`. `None` keeps it open.
    pub fn check(&self, position: &Position, candle: &Candle) -> Option<ExitSignal> {
        let entry = position.entry_price;
        let min_change = candle.low - entry;
        let max_change = candle.high - entry;

        // Stop-loss first
        if min_change < 0.0 && (min_change / entry).abs() * 100.0 >= self.config.stop_loss_pct {
            let price = self.stop_loss_price(entry);
            debug!(entry, low = candle.low, price, "Stop-loss reached");
            return Some(ExitSignal {
                outcome: TradeOutcome::Loss,
                price,
            });
        }

        if max_change > 0.0 && (max_change / entry).abs() * 100.0 >= self.config.take_profit_pct {
            let price = self.take_profit_price(entry);
            debug!(entry, high = candle.high, price, "Take-profit reached");
            return Some(ExitSignal {
                outcome: TradeOutcome::Profit,
                price,
            });
        }

        None
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

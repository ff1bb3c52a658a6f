use serde::{Deserialize, Serialize};

use common::{round_price, Trade, TradeOutcome};
use strategy::StrategyConfig;

/// Output of one evaluation, handed to the presentation layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub trades: Vec<Trade>,
    /// Opens and closes counted together.
    pub trades_count: usize,
    /// `+take_profit_pct` per profitable close, `-stop_loss_pct` per losing close.
    pub net_result_pct: f64,
    /// "earned N%" or "lost N%".
    pub result_text: String,
}

impl BacktestReport {
    pub fn from_trades(trades: Vec<Trade>, config: &StrategyConfig) -> Self {
        let wins = count_outcome(&trades, TradeOutcome::Profit) as f64;
        let losses = count_outcome(&trades, TradeOutcome::Loss) as f64;
        // Rounded once; + 0.0 turns -0.0 into 0.0
        let net_result_pct =
            round_price(wins * config.take_profit_pct - losses * config.stop_loss_pct) + 0.0;

        Self {
            trades_count: trades.len(),
            result_text: result_text(net_result_pct),
            net_result_pct,
            trades,
        }
    }

    pub fn empty(config: &StrategyConfig) -> Self {
        Self::from_trades(Vec::new(), config)
    }

    pub fn wins(&self) -> usize {
        count_outcome(&self.trades, TradeOutcome::Profit)
    }

    pub fn losses(&self) -> usize {
        count_outcome(&self.trades, TradeOutcome::Loss)
    }

    /// True when the series ended with a position still open.
    pub fn has_open_position(&self) -> bool {
        self.trades.last().is_some_and(Trade::is_open)
    }
}

fn count_outcome(trades: &[Trade], wanted: TradeOutcome) -> usize {
    trades.iter().filter(|t| t.outcome() == Some(wanted)).count()
}

/// Expects an already rounded total. The sign of a negative total is kept,
/// so a loss reads "lost -3%".
fn result_text(net_result_pct: f64) -> String {
    if net_result_pct >= 0.0 {
        format!("earned {net_result_pct}%")
    } else {
        format!("lost {net_result_pct}%")
    }
}

use tracing::{debug, info};

use common::{AnnotatedCandle, Candle, Position, Result, Trade};
use risk::{ExitRules, RiskConfig};
use strategy::{annotate, EntryRule, SmaCrossEntry, StrategyConfig};

use crate::summary::BacktestReport;
use crate::validate::validate_series;

/// Scan state. At most one position is open at any time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Flat,
    Holding(Position),
}

/// Replays a candle series through an entry rule and the stop-loss / take-profit
/// exits, producing the trade log.
///
/// Candles without an SMA value are skipped entirely. While flat, each candle is
/// offered to the entry rule; while holding, to the exit rules. A candle produces
/// at most one trade, so a position is never opened and closed on the same candle.
pub struct Evaluator<E = SmaCrossEntry> {
    config: StrategyConfig,
    entry: E,
    exits: ExitRules,
}

impl Evaluator<SmaCrossEntry> {
    /// Evaluator with the SMA cross entry. Fails on an invalid config.
    pub fn new(config: StrategyConfig) -> Result<Self> {
        Self::with_entry_rule(config, SmaCrossEntry::new())
    }
}

impl<E: EntryRule> Evaluator<E> {
    pub fn with_entry_rule(config: StrategyConfig, entry: E) -> Result<Self> {
        config.validate()?;
        let exits = ExitRules::new(RiskConfig {
            stop_loss_pct: config.stop_loss_pct,
            take_profit_pct: config.take_profit_pct,
        });
        Ok(Self {
            config,
            entry,
            exits,
        })
    }

    /// Validate, annotate and scan `candles` (oldest first).
    /// An empty series is a valid input and yields an empty report.
    pub fn run(&self, candles: &[Candle]) -> Result<BacktestReport> {
        if candles.is_empty() {
            debug!("Empty candle series, nothing to evaluate");
            return Ok(BacktestReport::empty(&self.config));
        }
        validate_series(candles)?;

        let annotated = annotate(candles, self.config.window);
        let trades = self.scan(&annotated);
        let report = BacktestReport::from_trades(trades, &self.config);

        info!(
            rule = %self.entry.name(),
            candles = candles.len(),
            window = self.config.window,
            trades = report.trades_count,
            wins = report.wins(),
            losses = report.losses(),
            open_at_end = report.has_open_position(),
            net_result_pct = report.net_result_pct,
            "Evaluation finished"
        );
        Ok(report)
    }

    /// Walk an annotated series once, in order, and emit the trade log.
    pub fn scan(&self, annotated: &[AnnotatedCandle]) -> Vec<Trade> {
        let mut trades = Vec::new();
        let mut state = ScanState::Flat;
        let mut prev: Option<&AnnotatedCandle> = None;

        for (index, curr) in annotated.iter().enumerate() {
            if curr.sma.is_some() {
                state = match state {
                    ScanState::Flat => self.try_open(index, prev, curr, &mut trades),
                    ScanState::Holding(position) => {
                        self.try_close(index, position, curr, &mut trades)
                    }
                };
            }
            prev = Some(curr);
        }

        if let ScanState::Holding(position) = state {
            debug!(
                entry_price = position.entry_price,
                entry_index = position.entry_candle_index,
                "Series ended with an open position"
            );
        }
        trades
    }

    fn try_open(
        &self,
        index: usize,
        prev: Option<&AnnotatedCandle>,
        curr: &AnnotatedCandle,
        trades: &mut Vec<Trade>,
    ) -> ScanState {
        let Some(signal) = self.entry.check(prev, curr) else {
            return ScanState::Flat;
        };

        debug!(index, kind = ?signal.kind, price = signal.price, "Open");
        trades.push(Trade::Open {
            entry_price: signal.price,
            candle_index: index,
            timestamp: curr.candle.timestamp,
        });
        ScanState::Holding(Position {
            entry_price: signal.price,
            entry_candle_index: index,
        })
    }

    fn try_close(
        &self,
        index: usize,
        position: Position,
        curr: &AnnotatedCandle,
        trades: &mut Vec<Trade>,
    ) -> ScanState {
        let Some(exit) = self.exits.check(&position, &curr.candle) else {
            return ScanState::Holding(position);
        };

        debug!(index, outcome = %exit.outcome, price = exit.price, "Close");
        trades.push(Trade::Close {
            close_price: exit.price,
            outcome: exit.outcome,
            candle_index: index,
            timestamp: curr.candle.timestamp,
        });
        ScanState::Flat
    }
}

/// Evaluate the SMA cross strategy over `candles` with `config`.
pub fn evaluate(candles: &[Candle], config: &StrategyConfig) -> Result<BacktestReport> {
    Evaluator::new(*config)?.run(candles)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

pub mod backtest;
pub mod binance;
pub mod evaluator;
pub mod summary;
pub mod validate;

pub use backtest::{BacktestOutcome, Backtester, ChartPoint};
pub use binance::BinanceClient;
pub use evaluator::{evaluate, Evaluator};
pub use summary::BacktestReport;
pub use validate::validate_series;

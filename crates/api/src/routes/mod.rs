mod backtest;
mod health;
mod static_files;

pub use backtest::backtest_router;
pub use health::health_router;
pub use static_files::static_router;

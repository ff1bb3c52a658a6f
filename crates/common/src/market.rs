use async_trait::async_trait;

use crate::{Candle, Result};

/// Abstraction over the historical price feed.
///
/// `BinanceClient` in `crates/engine` implements this against the public klines
/// endpoint. Tests substitute fixed series.
///
/// Implementations return candles oldest first. A failed fetch is an `Err`;
/// it must never be reported as an empty series.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch up to `limit` most recent candles of `timeframe` for `pair`.
    async fn historic_candles(
        &self,
        pair: &str,
        timeframe: &str,
        limit: u32,
    ) -> Result<Vec<Candle>>;
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use common::{Candle, MarketDataSource, Result};
use strategy::{BacktestRequest, SmaIndicator};

use crate::evaluator::evaluate;
use crate::summary::BacktestReport;

/// Period of the short average drawn next to the strategy SMA.
pub const FAST_SMA_PERIOD: usize = 2;

/// One candle plus the averages a chart overlays on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma: Option<f64>,
}

/// A finished backtest: the request as run, the trade report and chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    pub request: BacktestRequest,
    pub report: BacktestReport,
    pub chart: Vec<ChartPoint>,
}

/// Fetches history from a `MarketDataSource` and runs the evaluator on it.
#[derive(Clone)]
pub struct Backtester {
    source: Arc<dyn MarketDataSource>,
}

impl Backtester {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// Validate the request, fetch its candles and evaluate them.
    /// Nothing is fetched for an invalid request; a failed fetch is returned as-is.
    pub async fn run(&self, request: BacktestRequest) -> Result<BacktestOutcome> {
        let request = request.normalized()?;

        let candles = self
            .source
            .historic_candles(&request.pair, &request.timeframe, request.candles)
            .await
            .inspect_err(|e| {
                warn!(
                    pair = %request.pair,
                    timeframe = %request.timeframe,
                    error = %e,
                    "Historic data fetch failed"
                );
            })?;

        let report = evaluate(&candles, &request.params)?;
        let chart = chart_series(&candles, request.params.window);

        info!(
            pair = %request.pair,
            timeframe = %request.timeframe,
            candles = candles.len(),
            from = ?candles.first().and_then(Candle::datetime),
            to = ?candles.last().and_then(Candle::datetime),
            trades = report.trades_count,
            result = %report.result_text,
            "Backtest complete"
        );

        Ok(BacktestOutcome {
            request,
            report,
            chart,
        })
    }
}

/// Chart rows for `candles`: OHLC with the fast and the strategy SMA.
pub fn chart_series(candles: &[Candle], window: usize) -> Vec<ChartPoint> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = SmaIndicator::new(FAST_SMA_PERIOD).series(&closes);
    let slow = SmaIndicator::new(window).series(&closes);

    candles
        .iter()
        .zip(fast.into_iter().zip(slow))
        .map(|(c, (sma_fast, sma))| ChartPoint {
            timestamp: c.timestamp,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            sma_fast,
            sma,
        })
        .collect()
}

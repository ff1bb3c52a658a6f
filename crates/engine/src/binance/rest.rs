use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use common::{Candle, Error, MarketDataSource, Result};

/// Public-market REST client for Binance. Only unauthenticated endpoints are used.
pub struct BinanceClient {
    base_url: String,
    http: Client,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn public_get(&self, path: &str, query: &str) -> Result<String> {
        let url = format!("{}{path}?{query}", self.base_url);
        debug!(%url, "Binance GET");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    async fn historic_candles(
        &self,
        pair: &str,
        timeframe: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let query = format!("symbol={pair}&interval={timeframe}&limit={limit}");
        let body = self.public_get("/api/v3/klines", &query).await?;
        let candles = parse_klines(&body)?;
        debug!(pair, timeframe, count = candles.len(), "Klines received");
        Ok(candles)
    }
}

// ─── Response parsing ─────────────────────────────────────────────────────────

/// Parse a klines payload. Each row is
/// `[open_time_ms, "open", "high", "low", "close", "volume", close_time_ms, ...]`;
/// only open time and OHLC are kept, with the time converted to seconds.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            parse_row(row).map_err(|reason| Error::Exchange(format!("kline row {i}: {reason}")))
        })
        .collect()
}

fn parse_row(row: &[Value]) -> std::result::Result<Candle, String> {
    if row.len() < 5 {
        return Err(format!("expected at least 5 fields, got {}", row.len()));
    }
    let open_time_ms = row[0]
        .as_i64()
        .ok_or_else(|| format!("open time is not an integer: {}", row[0]))?;

    Ok(Candle {
        timestamp: open_time_ms / 1000,
        open: price_field(&row[1])?,
        high: price_field(&row[2])?,
        low: price_field(&row[3])?,
        close: price_field(&row[4])?,
    })
}

/// Binance quotes prices as decimal strings; plain numbers are accepted too.
fn price_field(value: &Value) -> std::result::Result<f64, String> {
    match value {
        Value::String(s) => s.parse::<f64>().map_err(|e| format!("bad price '{s}': {e}")),
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("bad price {n}")),
        other => Err(format!("unexpected price value {other}")),
    }
}

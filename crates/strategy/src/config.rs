use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Binance kline intervals accepted by the backtest endpoints.
pub const TIMEFRAMES: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// Largest candle count the klines endpoint returns in one request.
pub const MAX_CANDLES: u32 = 1000;

/// Parameters of one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// SMA window in candles. Must be at least 2.
    pub window: usize,
    /// Take-profit threshold, percent of entry price.
    pub take_profit_pct: f64,
    /// Stop-loss threshold, percent of entry price.
    pub stop_loss_pct: f64,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window < 2 {
            return Err(Error::InvalidConfig(format!(
                "window must be >= 2, got {}",
                self.window
            )));
        }
        if !is_positive(self.take_profit_pct) {
            return Err(Error::InvalidConfig(format!(
                "take_profit_pct must be a positive number, got {}",
                self.take_profit_pct
            )));
        }
        if !is_positive(self.stop_loss_pct) {
            return Err(Error::InvalidConfig(format!(
                "stop_loss_pct must be a positive number, got {}",
                self.stop_loss_pct
            )));
        }
        Ok(())
    }
}

/// Finite and strictly positive. NaN fails.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Everything needed to fetch a series and evaluate the strategy on it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BacktestRequest {
    /// Trading pair, e.g. "BTCUSDT".
    pub pair: String,
    /// Kline interval, e.g. "15m".
    pub timeframe: String,
    /// Number of candles to fetch.
    pub candles: u32,
    pub params: StrategyConfig,
}

impl BacktestRequest {
    /// Uppercase the pair and validate every field. Called before any fetch.
    pub fn normalized(mut self) -> Result<Self> {
        self.pair = self.pair.trim().to_uppercase();
        if self.pair.is_empty() || !self.pair.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidConfig(format!(
                "pair must be a non-empty alphanumeric symbol, got '{}'",
                self.pair
            )));
        }
        if !TIMEFRAMES.contains(&self.timeframe.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "unsupported timeframe '{}'",
                self.timeframe
            )));
        }
        if self.candles == 0 || self.candles > MAX_CANDLES {
            return Err(Error::InvalidConfig(format!(
                "candles must be in 1..={MAX_CANDLES}, got {}",
                self.candles
            )));
        }
        self.params.validate()?;
        Ok(self)
    }
}

/// Top-level presets file (TOML).
///
/// Example `config/presets.toml`:
/// ```toml
/// [[preset]]
/// name = "example"
/// pair = "YFIUSDT"
/// timeframe = "1d"
/// candles = 1000
///
/// [preset.params]
/// window = 50
/// stop_loss_pct = 3.0
/// take_profit_pct = 15.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresetFileConfig {
    #[serde(rename = "preset", default)]
    pub presets: Vec<PresetConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresetConfig {
    /// Name used in `?view=<name>` lookups.
    pub name: String,
    pub pair: String,
    pub timeframe: String,
    pub candles: u32,
    pub params: StrategyConfig,
}

impl PresetConfig {
    pub fn to_request(&self) -> BacktestRequest {
        BacktestRequest {
            pair: self.pair.clone(),
            timeframe: self.timeframe.clone(),
            candles: self.candles,
            params: self.params,
        }
    }
}

impl PresetFileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid presets file: {e}")))
    }

    /// Load from a TOML file. `Ok(None)` when the file does not exist.
    pub fn load(path: &str) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

use std::collections::BTreeMap;

use tracing::info;

use crate::config::{BacktestRequest, PresetFileConfig, StrategyConfig};

/// Name of the preset that is always available.
pub const EXAMPLE_PRESET: &str = "example";

const RANDOM_PAIRS: &[&str] = &["BTCUSDT", "ETHUSDT", "BNBUSDT"];
const RANDOM_TIMEFRAMES: &[&str] = &["5m", "15m", "1h", "4h"];
const RANDOM_CANDLES: &[u32] = &[250, 300, 350, 400, 500, 1000];
const RANDOM_WINDOWS: &[usize] = &[10, 35, 50, 99];

/// Named backtest requests, looked up by the `?view=` query.
#[derive(Debug, Clone)]
pub struct PresetBook {
    presets: BTreeMap<String, BacktestRequest>,
}

impl PresetBook {
    /// Build from a presets file. The built-in example is added when the file lacks one.
    pub fn from_config(file_cfg: &PresetFileConfig) -> Self {
        let mut presets = BTreeMap::new();
        for preset in &file_cfg.presets {
            info!(
                name = %preset.name,
                pair = %preset.pair,
                timeframe = %preset.timeframe,
                "Registered preset"
            );
            presets.insert(preset.name.clone(), preset.to_request());
        }
        presets
            .entry(EXAMPLE_PRESET.to_string())
            .or_insert_with(example_request);
        Self { presets }
    }

    /// Only the built-in example preset.
    pub fn builtin() -> Self {
        Self::from_config(&PresetFileConfig {
            presets: Vec::new(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&BacktestRequest> {
        self.presets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }
}

/// YFIUSDT daily, SMA 50, 3% stop-loss, 15% take-profit.
pub fn example_request() -> BacktestRequest {
    BacktestRequest {
        pair: "YFIUSDT".into(),
        timeframe: "1d".into(),
        candles: 1000,
        params: StrategyConfig {
            window: 50,
            take_profit_pct: 15.0,
            stop_loss_pct: 3.0,
        },
    }
}

/// Draw a request from the fixed pools of pairs, timeframes and parameters.
pub fn random_request(rng: &mut fastrand::Rng) -> BacktestRequest {
    BacktestRequest {
        pair: pick(rng, RANDOM_PAIRS).to_string(),
        timeframe: pick(rng, RANDOM_TIMEFRAMES).to_string(),
        candles: *pick(rng, RANDOM_CANDLES),
        params: StrategyConfig {
            window: *pick(rng, RANDOM_WINDOWS),
            stop_loss_pct: rng.u32(2..=5) as f64,
            take_profit_pct: rng.u32(2..=10) as f64,
        },
    }
}

fn pick<'a, T>(rng: &mut fastrand::Rng, pool: &'a [T]) -> &'a T {
    &pool[rng.usize(..pool.len())]
}

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::Config;
use engine::{Backtester, BinanceClient};
use strategy::{PresetBook, PresetFileConfig};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(addr = %cfg.bind_addr(), binance = %cfg.binance_base_url, "SmaBot starting");

    // ── Presets ───────────────────────────────────────────────────────────────
    let presets = match PresetFileConfig::load(&cfg.presets_path) {
        Ok(Some(file)) => PresetBook::from_config(&file),
        Ok(None) => {
            warn!(path = %cfg.presets_path, "Presets file not found, using built-in example only");
            PresetBook::builtin()
        }
        Err(e) => panic!("Failed to load presets from '{}': {e}", cfg.presets_path),
    };

    // ── Market data ───────────────────────────────────────────────────────────
    let binance = BinanceClient::new(&cfg.binance_base_url)
        .unwrap_or_else(|e| panic!("Failed to build Binance client: {e}"));
    let backtester = Backtester::new(Arc::new(binance));

    // ── HTTP API ──────────────────────────────────────────────────────────────
    let state = api::AppState {
        backtester,
        presets: Arc::new(presets),
    };

    let addr = cfg.bind_addr();
    tokio::select! {
        res = api::serve(state, &addr) => {
            if let Err(e) = res {
                panic!("API server stopped: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting.");
        }
    }
}

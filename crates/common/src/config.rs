/// Process configuration loaded from environment variables at startup.
/// Every variable is optional; unparsable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    // HTTP server
    pub app_host: String,
    pub app_port: u16,

    // Market data
    pub binance_base_url: String,

    // Backtest presets file path
    pub presets_path: String,
}

impl Config {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_BINANCE_BASE_URL: &'static str = "https://api.binance.com";
    pub const DEFAULT_PRESETS_PATH: &'static str = "config/presets.toml";

    /// Load configuration from the environment. Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            app_host: optional_env("APP_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            app_port: optional_env("APP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(Self::DEFAULT_PORT),
            binance_base_url: optional_env("BINANCE_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| Self::DEFAULT_BINANCE_BASE_URL.to_string()),
            presets_path: optional_env("PRESETS_PATH")
                .unwrap_or_else(|| Self::DEFAULT_PRESETS_PATH.to_string()),
        }
    }

    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

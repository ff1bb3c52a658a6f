use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time bucket of historical price action, as produced by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket open time in seconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Check the OHLC shape of a single candle. Returns a human-readable reason on failure.
    pub fn check_shape(&self) -> Result<(), String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err("non-finite price".into());
        }
        if self.low > self.high {
            return Err(format!("low {} above high {}", self.low, self.high));
        }
        for (label, value) in [("open", self.open), ("close", self.close)] {
            if value < self.low || value > self.high {
                return Err(format!(
                    "{label} {value} outside range [{}, {}]",
                    self.low, self.high
                ));
            }
        }
        Ok(())
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// A candle together with the simple moving average of closes ending at it.
/// `sma` is `None` while there is not yet a full window of history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedCandle {
    #[serde(flatten)]
    pub candle: Candle,
    pub sma: Option<f64>,
}

impl AnnotatedCandle {
    /// True when the candle range crosses the average: `low <= sma < high`.
    pub fn straddles_sma(&self) -> bool {
        match self.sma {
            Some(sma) => self.candle.low <= sma && sma < self.candle.high,
            None => false,
        }
    }

    /// True when the whole candle sits strictly below its own average.
    pub fn below_sma(&self) -> bool {
        match self.sma {
            Some(sma) => self.candle.high < sma,
            None => false,
        }
    }
}

/// The single open position tracked during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_price: f64,
    pub entry_candle_index: usize,
}

/// How a closed position ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeOutcome {
    Profit,
    Loss,
}

impl std::fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeOutcome::Profit => write!(f, "profit"),
            TradeOutcome::Loss => write!(f, "loss"),
        }
    }
}

/// One entry in the trade log. Opens and closes strictly alternate, starting with an open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Trade {
    Open {
        entry_price: f64,
        candle_index: usize,
        timestamp: i64,
    },
    Close {
        close_price: f64,
        outcome: TradeOutcome,
        candle_index: usize,
        timestamp: i64,
    },
}

impl Trade {
    pub fn candle_index(&self) -> usize {
        match self {
            Trade::Open { candle_index, .. } | Trade::Close { candle_index, .. } => *candle_index,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Trade::Open { .. })
    }

    pub fn outcome(&self) -> Option<TradeOutcome> {
        match self {
            Trade::Open { .. } => None,
            Trade::Close { outcome, .. } => Some(*outcome),
        }
    }
}

/// Round a price to 2 decimal places (half away from zero).
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

use common::{AnnotatedCandle, Candle};

/// SMA (Simple Moving Average) of closing prices.
///
/// The value at index `i` is the arithmetic mean of the `period` closes ending at `i`
/// (inclusive). The first `period - 1` positions have no value.
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub period: usize,
}

impl SmaIndicator {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Compute the SMA series for a slice of closes (oldest first).
    /// Output has the same length as the input. A zero period yields no values.
    pub fn series(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if self.period == 0 || closes.len() < self.period {
            return out;
        }

        // Running sum: add the close entering the window, drop the one leaving it
        let divisor = self.period as f64;
        let (warmup, rest) = closes.split_at(self.period - 1);
        let mut sum: f64 = warmup.iter().sum();
        for (offset, (&entering, &leaving)) in rest.iter().zip(closes).enumerate() {
            sum += entering;
            out[offset + self.period - 1] = Some(sum / divisor);
            sum -= leaving;
        }
        out
    }
}

/// Attach the `window`-period SMA of closes to every candle, preserving order.
/// The input is left untouched.
pub fn annotate(candles: &[Candle], window: usize) -> Vec<AnnotatedCandle> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let sma = SmaIndicator::new(window).series(&closes);

    candles
        .iter()
        .zip(sma)
        .map(|(candle, sma)| AnnotatedCandle {
            candle: *candle,
            sma,
        })
        .collect()
}

use common::{Candle, Error, Result};

/// Reject series that would produce misleading fills: a candle whose open or close
/// lies outside its range, a non-finite price, or a timestamp that does not strictly
/// increase. The whole series is rejected on the first violation.
pub fn validate_series(candles: &[Candle]) -> Result<()> {
    let mut prev_ts: Option<i64> = None;
    for (index, candle) in candles.iter().enumerate() {
        candle
            .check_shape()
            .map_err(|reason| Error::MalformedCandle { index, reason })?;

        if let Some(prev) = prev_ts {
            if candle.timestamp <= prev {
                return Err(Error::MalformedCandle {
                    index,
                    reason: format!(
                        "timestamp {} does not follow previous {prev}",
                        candle.timestamp
                    ),
                });
            }
        }
        prev_ts = Some(candle.timestamp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordered_valid_series() {
        let candles = vec![
            Candle::new(60, 10.0, 11.0, 9.0, 10.5),
            Candle::new(120, 10.5, 12.0, 10.0, 11.0),
        ];
        assert!(validate_series(&candles).is_ok());
        assert!(validate_series(&[]).is_ok());
    }

    #[test]
    fn rejects_bad_shape_with_index() {
        let candles = vec![
            Candle::new(60, 10.0, 11.0, 9.0, 10.5),
            Candle::new(120, 10.5, 12.0, 10.0, 12.5),
        ];
        match validate_series(&candles) {
            Err(Error::MalformedCandle { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected MalformedCandle, got {other:?}"),
        }
    }

    #[test]
    fn rejects_repeated_timestamp() {
        let candles = vec![
            Candle::new(60, 10.0, 11.0, 9.0, 10.5),
            Candle::new(60, 10.5, 12.0, 10.0, 11.0),
        ];
        assert!(matches!(
            validate_series(&candles),
            Err(Error::MalformedCandle { index: 1, .. })
        ));
    }
}

//! Signal inference from the day's terminal candle.

use crate::config::SIGNAL_HOUR;
use crate::domain::{Direction, PriceBar};

/// Directional bias for the day following `day`, read from its 23:00 candle.
///
/// A bearish candle (close below open) biases long; a bullish candle biases
/// short. Returns `None` when the signal-hour bar is absent or the candle is
/// flat — a zero-delta candle is not tradeable and never defaults to a
/// direction.
pub fn determine_signal(day: &[PriceBar]) -> Option<Direction> {
    let bar = day.iter().find(|b| b.hour == SIGNAL_HOUR)?;
    if bar.close < bar.open {
        Some(Direction::Long)
    } else if bar.close > bar.open {
        Some(Direction::Short)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(hour: u32, open: f64, close: f64) -> PriceBar {
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap();
        PriceBar::new(ts, open, open.max(close), open.min(close), close)
    }

    #[test]
    fn bearish_terminal_candle_means_long() {
        let day = vec![bar(22, 100.0, 101.0), bar(23, 100.0, 95.0)];
        assert_eq!(determine_signal(&day), Some(Direction::Long));
    }

    #[test]
    fn bullish_terminal_candle_means_short() {
        let day = vec![bar(23, 100.0, 104.0)];
        assert_eq!(determine_signal(&day), Some(Direction::Short));
    }

    #[test]
    fn flat_candle_means_no_signal() {
        let day = vec![bar(23, 100.0, 100.0)];
        assert_eq!(determine_signal(&day), None);
    }

    #[test]
    fn missing_signal_hour_means_no_signal() {
        let day = vec![bar(21, 100.0, 95.0), bar(22, 95.0, 90.0)];
        assert_eq!(determine_signal(&day), None);
    }

    #[test]
    fn only_the_signal_hour_candle_is_consulted() {
        // Strongly bullish day overall, but the 23:00 candle is bearish.
        let day = vec![bar(10, 90.0, 110.0), bar(23, 110.0, 109.0)];
        assert_eq!(determine_signal(&day), Some(Direction::Long));
    }
}

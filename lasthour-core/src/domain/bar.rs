//! PriceBar — the fundamental market data unit.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Hourly OHLC bar with calendar fields derived from its timestamp.
///
/// `date` and `hour` come from the naive (timezone-stripped) UTC form of
/// `timestamp`, are assigned once at load time, and never recomputed. Within
/// a date partition at most one bar per hour is expected; duplicate or
/// missing hours propagate unchanged into downstream partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub hour: u32,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// Build a bar from a timestamp and OHLC prices, deriving date and hour.
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        let naive = timestamp.naive_utc();
        Self {
            timestamp,
            date: naive.date(),
            hour: naive.time().hour(),
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if any OHLC field is non-finite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }
}

/// Partition a timestamp-ascending series into chronological per-day slices.
///
/// Dates are derived from the timestamps, so a sorted series has each day's
/// bars contiguous; this is a zero-copy chunking, and each slice is a
/// read-only daily series.
pub fn partition_days(series: &[PriceBar]) -> Vec<&[PriceBar]> {
    let mut days = Vec::new();
    let mut start = 0;
    for i in 1..series.len() {
        if series[i].date != series[start].date {
            days.push(&series[start..i]);
            start = i;
        }
    }
    if !series.is_empty() {
        days.push(&series[start..]);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar_at(day: u32, hour: u32) -> PriceBar {
        let ts = Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap();
        PriceBar::new(ts, 100.0, 101.0, 99.0, 100.5)
    }

    #[test]
    fn derives_date_and_hour_from_timestamp() {
        let bar = bar_at(2, 23);
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bar.hour, 23);
    }

    #[test]
    fn detects_void_bar() {
        let mut bar = bar_at(2, 11);
        assert!(!bar.is_void());
        bar.low = f64::NAN;
        assert!(bar.is_void());
    }

    #[test]
    fn partitions_sorted_series_into_days() {
        let series = vec![bar_at(1, 22), bar_at(1, 23), bar_at(2, 0), bar_at(3, 11)];
        let days = partition_days(&series);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].len(), 2);
        assert_eq!(days[1].len(), 1);
        assert_eq!(days[2].len(), 1);
        assert_eq!(days[2][0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn partitions_empty_series() {
        assert!(partition_days(&[]).is_empty());
    }
}

//! TradeWindow — one simulated trade sliced from a trading day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, PriceBar};

/// A price bar inside a trade window, annotated with entry-relative fields.
///
/// The running delta and return use the bar's close only; intrabar wicks are
/// consulted later by the outcome metrics, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowBar {
    pub bar: PriceBar,
    pub hours_from_entry: i64,
    pub price_delta_from_entry: f64,
    pub return_pct_from_entry: f64,
}

/// A directional trade window: the trade day's bars between the entry and
/// exit hours inclusive, relative to a fixed entry price.
///
/// `entry_price` is the open of the entry-hour bar, fixed at construction
/// and never recomputed. The window owns its bars and is immutable once
/// built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeWindow {
    pub signal_day: NaiveDate,
    pub trade_day: NaiveDate,
    pub direction: Direction,
    pub entry_price: f64,
    pub bars: Vec<WindowBar>,
}

impl TradeWindow {
    /// Slice `day` between `entry_hour` and `exit_hour` inclusive.
    ///
    /// Returns `None` when the day lacks a bar at either boundary hour.
    /// Incomplete trading days are common, not exceptional, so absence is
    /// not an error.
    pub fn build(
        day: &[PriceBar],
        signal_day: NaiveDate,
        direction: Direction,
        entry_hour: u32,
        exit_hour: u32,
    ) -> Option<Self> {
        // First matching row supplies the entry price, even if the hour
        // appears more than once.
        let entry_bar = day.iter().find(|b| b.hour == entry_hour)?;
        day.iter().find(|b| b.hour == exit_hour)?;

        let entry_price = entry_bar.open;
        let bars: Vec<WindowBar> = day
            .iter()
            .filter(|b| b.hour >= entry_hour && b.hour <= exit_hour)
            .map(|b| {
                let delta = direction.delta(entry_price, b.close);
                WindowBar {
                    bar: b.clone(),
                    hours_from_entry: i64::from(b.hour) - i64::from(entry_hour),
                    price_delta_from_entry: delta,
                    return_pct_from_entry: delta / entry_price * 100.0,
                }
            })
            .collect();

        if bars.is_empty() {
            return None;
        }
        let trade_day = bars[0].bar.date;

        Some(Self {
            signal_day,
            trade_day,
            direction,
            entry_price,
            bars,
        })
    }
}

//! Outcome metrics — pure functions over one trade window's bar path.
//!
//! Favorable and adverse extremes consult intrabar wicks (high/low) as well
//! as closes, while the window's running per-bar series is close-only. The
//! asymmetry is deliberate: extremes answer "best/worst possible exit", the
//! running series answers "path so far". It must be preserved exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Direction, TradeWindow};

/// Per-trade extremal and terminal outcome metrics.
///
/// Derived deterministically from one window's bar sequence. `max_return`
/// and `max_drawdown` are clamped non-negative regardless of the price path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub trade_day: NaiveDate,
    pub signal_day: NaiveDate,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub final_return: f64,
    pub final_return_pct: f64,
    pub max_return: f64,
    pub max_return_pct: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub hours_captured: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("trade window for {trade_day} has no bars")]
    EmptyWindow { trade_day: NaiveDate },
}

impl TradeMetrics {
    /// Compute metrics from a window's bar path, dispatching once on its
    /// direction.
    pub fn compute(window: &TradeWindow) -> Result<Self, MetricsError> {
        let last = window.bars.last().ok_or(MetricsError::EmptyWindow {
            trade_day: window.trade_day,
        })?;

        let entry_price = window.entry_price;
        let exit_price = last.bar.close;

        let mut close_max = f64::NEG_INFINITY;
        let mut close_min = f64::INFINITY;
        let mut high_max = f64::NEG_INFINITY;
        let mut low_min = f64::INFINITY;
        for wb in &window.bars {
            close_max = close_max.max(wb.bar.close);
            close_min = close_min.min(wb.bar.close);
            high_max = high_max.max(wb.bar.high);
            low_min = low_min.min(wb.bar.low);
        }

        let (max_return, max_drawdown) = match window.direction {
            Direction::Long => {
                let max_price = close_max.max(high_max);
                let min_price = low_min;
                (
                    (max_price - entry_price).max(0.0),
                    (entry_price - min_price).max(0.0),
                )
            }
            Direction::Short => {
                let min_price = close_min.min(low_min);
                let max_price = close_max.max(high_max);
                (
                    (entry_price - min_price).max(0.0),
                    (max_price - entry_price).max(0.0),
                )
            }
        };

        let final_return = window.direction.delta(entry_price, exit_price);
        let pct = |value: f64| value / entry_price * 100.0;

        Ok(Self {
            trade_day: window.trade_day,
            signal_day: window.signal_day,
            direction: window.direction,
            entry_price,
            exit_price,
            final_return,
            final_return_pct: pct(final_return),
            max_return,
            max_return_pct: pct(max_return),
            max_drawdown,
            max_drawdown_pct: pct(max_drawdown),
            hours_captured: window.bars.len(),
        })
    }
}

/// Per-direction aggregate over the full metrics set.
///
/// Recomputed wholesale each run, never incrementally maintained. A count of
/// zero yields averages of zero rather than a division fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionSummary {
    pub direction: Direction,
    pub trade_count: usize,
    pub sum_final_return: f64,
    pub sum_max_return: f64,
    pub sum_max_drawdown: f64,
    pub avg_final_return: f64,
    pub avg_max_return: f64,
    pub avg_max_drawdown: f64,
}

impl DirectionSummary {
    /// Sums and arithmetic means of one direction's trades within `metrics`.
    pub fn summarize(metrics: &[TradeMetrics], direction: Direction) -> Self {
        let mut count = 0usize;
        let mut sum_final_return = 0.0;
        let mut sum_max_return = 0.0;
        let mut sum_max_drawdown = 0.0;
        for m in metrics.iter().filter(|m| m.direction == direction) {
            count += 1;
            sum_final_return += m.final_return;
            sum_max_return += m.max_return;
            sum_max_drawdown += m.max_drawdown;
        }

        let avg = |sum: f64| if count == 0 { 0.0 } else { sum / count as f64 };

        Self {
            direction,
            trade_count: count,
            sum_final_return,
            sum_max_return,
            sum_max_drawdown,
            avg_final_return: avg(sum_final_return),
            avg_max_return: avg(sum_max_return),
            avg_max_drawdown: avg(sum_max_drawdown),
        }
    }
}

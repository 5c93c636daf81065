//! Lasthour Core — domain types, signal inference, window generation, outcome metrics.
//!
//! This crate contains the heart of the strategy lab:
//! - Domain types (hourly price bars, direction, trade windows)
//! - 23:00-candle signal inference
//! - Trade-window generation over consecutive day pairs
//! - Per-trade outcome metrics and per-direction summaries
//!
//! Everything here is pure: no file I/O, no clocks, no global state. CSV
//! loading and persistence live in `lasthour-runner`.

pub mod config;
pub mod domain;
pub mod generate;
pub mod metrics;
pub mod signal;

pub use config::{ConfigError, WindowConfig, DEFAULT_ENTRY_HOUR, DEFAULT_EXIT_HOUR, SIGNAL_HOUR};
pub use domain::{partition_days, Direction, ParseDirectionError, PriceBar, TradeWindow, WindowBar};
pub use generate::generate_windows;
pub use metrics::{DirectionSummary, MetricsError, TradeMetrics};
pub use signal::determine_signal;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn domain_types_are_send_sync() {
        assert_send::<PriceBar>();
        assert_sync::<PriceBar>();
        assert_send::<Direction>();
        assert_sync::<Direction>();
        assert_send::<TradeWindow>();
        assert_sync::<TradeWindow>();
    }

    #[test]
    fn metrics_types_are_send_sync() {
        assert_send::<TradeMetrics>();
        assert_sync::<TradeMetrics>();
        assert_send::<DirectionSummary>();
        assert_sync::<DirectionSummary>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<WindowConfig>();
        assert_sync::<WindowConfig>();
    }
}

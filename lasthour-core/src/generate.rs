//! Window generation — one signal evaluation per consecutive day pair.

use crate::config::WindowConfig;
use crate::domain::{partition_days, PriceBar, TradeWindow};
use crate::signal::determine_signal;

/// Generate trade windows over a timestamp-ascending price series.
///
/// The series is partitioned into chronological day slices; for each
/// consecutive pair the first day's 23:00 candle is evaluated and, on a
/// Long/Short signal, a window is built from the second day between the
/// configured entry and exit hours. Days without a qualifying signal and
/// trade days missing a boundary-hour bar are skipped silently — they only
/// affect the count of generated windows.
///
/// Pure transformation with no side effects; output is ordered by trade day.
pub fn generate_windows(series: &[PriceBar], config: &WindowConfig) -> Vec<TradeWindow> {
    let days = partition_days(series);
    let mut windows = Vec::new();

    for pair in days.windows(2) {
        let (signal_day, trade_day) = (pair[0], pair[1]);

        let Some(direction) = determine_signal(signal_day) else {
            continue;
        };

        if let Some(window) = TradeWindow::build(
            trade_day,
            signal_day[0].date,
            direction,
            config.entry_hour(),
            config.exit_hour(),
        ) {
            windows.push(window);
        }
    }

    windows
}

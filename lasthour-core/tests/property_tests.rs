//! Property tests for strategy invariants.
//!
//! Uses proptest to verify:
//! 1. Sign convention — per-bar deltas are `close - entry` for Long and
//!    `entry - close` for Short, at every bar of every window
//! 2. Non-negativity — max_return and max_drawdown never go negative,
//!    regardless of direction or price path
//! 3. Flat signal candle — open == close never produces a window
//! 4. Offset monotonicity — hours_from_entry never decreases along a window

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use lasthour_core::{
    determine_signal, generate_windows, Direction, PriceBar, TradeMetrics, TradeWindow,
    WindowConfig, SIGNAL_HOUR,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (50.0..150.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// An hourly bar with a consistent OHLC envelope at the given day/hour.
fn arb_bar(day: u32, hour: u32) -> impl Strategy<Value = PriceBar> {
    (arb_price(), arb_price(), 0.0..2.0_f64, 0.0..2.0_f64).prop_map(
        move |(open, close, up_wick, down_wick)| {
            let ts = Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap();
            PriceBar::new(
                ts,
                open,
                open.max(close) + up_wick,
                open.min(close) - down_wick,
                close,
            )
        },
    )
}

/// A signal day (just its 23:00 bar) followed by a full 11:00-21:00 trade day.
fn arb_day_pair() -> impl Strategy<Value = Vec<PriceBar>> {
    (
        arb_bar(6, SIGNAL_HOUR),
        proptest::collection::vec(arb_price(), 22),
    )
        .prop_map(|(signal_bar, prices)| {
            let mut series = vec![signal_bar];
            for (i, hour) in (11..=21).enumerate() {
                let open = prices[i * 2];
                let close = prices[i * 2 + 1];
                let ts = Utc.with_ymd_and_hms(2024, 5, 7, hour, 0, 0).unwrap();
                series.push(PriceBar::new(
                    ts,
                    open,
                    open.max(close) + 0.5,
                    open.min(close) - 0.5,
                    close,
                ));
            }
            series
        })
}

fn windows_for(series: &[PriceBar]) -> Vec<TradeWindow> {
    generate_windows(series, &WindowConfig::new(11, 21).expect("valid test config"))
}

// ── 1. Sign convention ───────────────────────────────────────────────

proptest! {
    /// Every bar's recorded delta matches the direction's formula exactly.
    #[test]
    fn per_bar_deltas_follow_the_sign_convention(series in arb_day_pair()) {
        for window in windows_for(&series) {
            for wb in &window.bars {
                let expected = match window.direction {
                    Direction::Long => wb.bar.close - window.entry_price,
                    Direction::Short => window.entry_price - wb.bar.close,
                };
                prop_assert!((wb.price_delta_from_entry - expected).abs() < 1e-9);
                let expected_pct = expected / window.entry_price * 100.0;
                prop_assert!((wb.return_pct_from_entry - expected_pct).abs() < 1e-9);
            }
        }
    }

    /// Entry price is the open of the entry-hour bar, untouched by later bars.
    #[test]
    fn entry_price_is_the_entry_bar_open(series in arb_day_pair()) {
        for window in windows_for(&series) {
            let entry_bar = &window.bars[0].bar;
            prop_assert_eq!(entry_bar.hour, 11);
            prop_assert_eq!(window.entry_price, entry_bar.open);
        }
    }
}

// ── 2. Non-negativity of extremes ────────────────────────────────────

proptest! {
    /// max_return >= 0 and max_drawdown >= 0 for every computed metric.
    #[test]
    fn extremes_are_clamped_non_negative(series in arb_day_pair()) {
        for window in windows_for(&series) {
            let m = TradeMetrics::compute(&window).expect("non-empty window");
            prop_assert!(m.max_return >= 0.0);
            prop_assert!(m.max_drawdown >= 0.0);
            prop_assert!((m.max_return_pct >= 0.0) && (m.max_drawdown_pct >= 0.0));
            prop_assert_eq!(m.hours_captured, window.bars.len());
        }
    }

    /// The wick-based extremes bound the close-only running series.
    #[test]
    fn extremes_bound_the_running_series(series in arb_day_pair()) {
        for window in windows_for(&series) {
            let m = TradeMetrics::compute(&window).expect("non-empty window");
            for wb in &window.bars {
                prop_assert!(wb.price_delta_from_entry <= m.max_return + 1e-9);
                prop_assert!(-wb.price_delta_from_entry <= m.max_drawdown + 1e-9);
            }
        }
    }
}

// ── 3. Flat signal candle ────────────────────────────────────────────

proptest! {
    /// A 23:00 candle with open == close generates no window for the pair.
    #[test]
    fn flat_signal_generates_nothing(mut series in arb_day_pair(), price in arb_price()) {
        series[0] = PriceBar::new(
            Utc.with_ymd_and_hms(2024, 5, 6, SIGNAL_HOUR, 0, 0).unwrap(),
            price,
            price + 0.5,
            price - 0.5,
            price,
        );
        prop_assert_eq!(determine_signal(&series[..1]), None);
        prop_assert!(windows_for(&series).is_empty());
    }
}

// ── 4. Offset monotonicity ───────────────────────────────────────────

proptest! {
    /// hours_from_entry is non-decreasing across each window's bar sequence.
    #[test]
    fn offsets_never_decrease(series in arb_day_pair()) {
        for window in windows_for(&series) {
            for pair in window.bars.windows(2) {
                prop_assert!(pair[0].hours_from_entry <= pair[1].hours_from_entry);
            }
        }
    }
}

// ── Worked examples from the strategy definition ─────────────────────

#[test]
fn bearish_candle_then_rising_day_worked_example() {
    // 23:00 open 100 / close 95 -> Long. Next day entry open 101,
    // 21:00 close 103 -> final return 2, ~1.980%.
    let mut series = vec![PriceBar::new(
        Utc.with_ymd_and_hms(2024, 5, 6, 23, 0, 0).unwrap(),
        100.0,
        100.5,
        94.5,
        95.0,
    )];
    for hour in 11..=21 {
        let close = if hour == 21 { 103.0 } else { 101.5 };
        series.push(PriceBar::new(
            Utc.with_ymd_and_hms(2024, 5, 7, hour, 0, 0).unwrap(),
            101.0,
            103.5,
            100.5,
            close,
        ));
    }

    let windows = windows_for(&series);
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].direction, Direction::Long);
    assert_eq!(windows[0].signal_day, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());

    let m = TradeMetrics::compute(&windows[0]).unwrap();
    assert_eq!(m.entry_price, 101.0);
    assert_eq!(m.final_return, 2.0);
    assert!((m.final_return_pct - 1.9801980198019802).abs() < 1e-12);
}

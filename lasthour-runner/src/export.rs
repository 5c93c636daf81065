//! Persistence — trade-window, per-trade-metrics, and summary CSV artifacts.
//!
//! Physical layout under an output directory:
//! - `long/` and `short/` — one CSV per trade window, filename carrying the
//!   trade day, signal day, and direction for traceability
//! - `analysis/long_metrics.csv`, `analysis/short_metrics.csv` — one row per
//!   trade, sorted by trade day; header-only when a direction has no trades
//! - `analysis/summary.csv` — always exactly two rows, one per direction
//!
//! Numeric cells use the shortest round-trip float form, so re-running the
//! pipeline on unchanged input is byte-identical.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use lasthour_core::{Direction, DirectionSummary, TradeMetrics, TradeWindow};

/// File name of the per-direction summary table.
pub const SUMMARY_FILE_NAME: &str = "summary.csv";

/// `trade_{trade_day}_signal_{signal_day}_{direction}.csv`
pub fn window_file_name(window: &TradeWindow) -> String {
    format!(
        "trade_{}_signal_{}_{}.csv",
        window.trade_day, window.signal_day, window.direction
    )
}

/// `long_metrics.csv` / `short_metrics.csv`
pub fn metrics_file_name(direction: Direction) -> String {
    format!("{direction}_metrics.csv")
}

// ─── Trade window CSV ───────────────────────────────────────────────

/// Serialize one trade window: the original bar columns plus the labeling
/// and entry-relative columns.
pub fn window_csv(window: &TradeWindow) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "time",
        "open",
        "high",
        "low",
        "close",
        "signal_day",
        "trade_day",
        "direction",
        "entry_price",
        "hours_from_entry",
        "price_delta_from_entry",
        "return_pct_from_entry",
    ])?;

    for wb in &window.bars {
        wtr.write_record([
            wb.bar.timestamp.to_rfc3339(),
            wb.bar.open.to_string(),
            wb.bar.high.to_string(),
            wb.bar.low.to_string(),
            wb.bar.close.to_string(),
            window.signal_day.to_string(),
            window.trade_day.to_string(),
            window.direction.to_string(),
            window.entry_price.to_string(),
            wb.hours_from_entry.to_string(),
            wb.price_delta_from_entry.to_string(),
            wb.return_pct_from_entry.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Persist each window into the `long/` / `short/` folder keyed by its
/// direction. Returns the number of files written.
pub fn write_trade_windows(windows: &[TradeWindow], output_dir: &Path) -> Result<usize> {
    for direction in Direction::both() {
        let dir = output_dir.join(direction.as_str());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create window dir: {}", dir.display()))?;
    }

    for window in windows {
        let path = output_dir
            .join(window.direction.as_str())
            .join(window_file_name(window));
        let csv = window_csv(window)?;
        std::fs::write(&path, csv)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(windows.len())
}

// ─── Metrics CSV ────────────────────────────────────────────────────

const METRICS_HEADER: [&str; 12] = [
    "trade_day",
    "signal_day",
    "direction",
    "entry_price",
    "exit_price",
    "final_return",
    "final_return_pct",
    "max_return",
    "max_return_pct",
    "max_drawdown",
    "max_drawdown_pct",
    "hours_captured",
];

/// Serialize per-trade metrics sorted by trade day. An empty set still
/// yields the full header row.
pub fn metrics_csv(rows: &[TradeMetrics]) -> Result<String> {
    let mut sorted: Vec<&TradeMetrics> = rows.iter().collect();
    sorted.sort_by_key(|m| m.trade_day);

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(METRICS_HEADER)?;
    for m in sorted {
        wtr.write_record([
            m.trade_day.to_string(),
            m.signal_day.to_string(),
            m.direction.to_string(),
            m.entry_price.to_string(),
            m.exit_price.to_string(),
            m.final_return.to_string(),
            m.final_return_pct.to_string(),
            m.max_return.to_string(),
            m.max_return_pct.to_string(),
            m.max_drawdown.to_string(),
            m.max_drawdown_pct.to_string(),
            m.hours_captured.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Summary CSV ────────────────────────────────────────────────────

/// Serialize the per-direction summary table, one row per direction in the
/// order given (long first by convention).
pub fn summary_csv(summaries: &[DirectionSummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "direction",
        "trade_count",
        "sum_final_return",
        "sum_max_return",
        "sum_max_drawdown",
        "avg_final_return",
        "avg_max_return",
        "avg_max_drawdown",
    ])?;
    for s in summaries {
        wtr.write_record([
            s.direction.to_string(),
            s.trade_count.to_string(),
            s.sum_final_return.to_string(),
            s.sum_max_return.to_string(),
            s.sum_max_drawdown.to_string(),
            s.avg_final_return.to_string(),
            s.avg_max_return.to_string(),
            s.avg_max_drawdown.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write both per-direction metrics files and the two-row summary into
/// `analysis_dir`, creating it if needed.
pub fn write_analysis_outputs(
    long_metrics: &[TradeMetrics],
    short_metrics: &[TradeMetrics],
    analysis_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(analysis_dir)
        .with_context(|| format!("failed to create analysis dir: {}", analysis_dir.display()))?;

    for (direction, rows) in [
        (Direction::Long, long_metrics),
        (Direction::Short, short_metrics),
    ] {
        let path = analysis_dir.join(metrics_file_name(direction));
        std::fs::write(&path, metrics_csv(rows)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let summaries = [
        DirectionSummary::summarize(long_metrics, Direction::Long),
        DirectionSummary::summarize(short_metrics, Direction::Short),
    ];
    let summary_path = analysis_dir.join(SUMMARY_FILE_NAME);
    std::fs::write(&summary_path, summary_csv(&summaries)?)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;

    Ok(summary_path)
}

//! The analyze step — re-read persisted trade windows and compute metrics.
//!
//! Consumes the window CSVs written by [`crate::export`], one direction
//! folder at a time, and rebuilds each `TradeWindow` from its rows. Files
//! are processed in lexicographic order so metrics output is deterministic
//! even before the trade-day sort. A missing direction folder is an empty
//! group, not an error; a window file with zero rows is.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use lasthour_core::{Direction, PriceBar, TradeMetrics, TradeWindow, WindowBar};

use crate::data_loader::parse_timestamp;

/// Columns every persisted window CSV must carry. `time` is required on
/// re-load because bars re-derive their calendar fields from it.
pub const REQUIRED_WINDOW_COLUMNS: [&str; 9] = [
    "time",
    "open",
    "high",
    "low",
    "close",
    "direction",
    "entry_price",
    "trade_day",
    "signal_day",
];

/// Errors from the analyze layer.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("trade window file {path} is empty")]
    EmptyWindow { path: String },

    #[error("missing column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    #[error("line {line} of {path}: {reason}")]
    Parse {
        line: usize,
        path: String,
        reason: String,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to list {path}: {source}")]
    ListDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// All `.csv` files directly under `dir`, lexicographically sorted.
///
/// A missing folder yields an empty list — a direction with no generated
/// windows is a valid, non-error outcome.
pub fn gather_window_files(dir: &Path) -> Result<Vec<PathBuf>, AnalyzeError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| AnalyzeError::ListDir {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AnalyzeError::ListDir {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read one persisted window CSV back into a `TradeWindow`.
///
/// The window's direction, entry price, and day labels come from the first
/// row; per-bar deltas are recomputed from the recorded entry price with the
/// direction's sign convention, which reproduces the persisted values.
pub fn load_trade_window(path: &Path) -> Result<TradeWindow, AnalyzeError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| AnalyzeError::Csv {
        path: display.clone(),
        source,
    })?;
    let headers = reader
        .headers()
        .map_err(|source| AnalyzeError::Csv {
            path: display.clone(),
            source,
        })?
        .clone();

    let column = |name: &'static str| -> Result<usize, AnalyzeError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalyzeError::MissingColumn {
                column: name.to_string(),
                path: display.clone(),
            })
    };
    let time_col = column("time")?;
    let open_col = column("open")?;
    let high_col = column("high")?;
    let low_col = column("low")?;
    let close_col = column("close")?;
    let direction_col = column("direction")?;
    let entry_price_col = column("entry_price")?;
    let trade_day_col = column("trade_day")?;
    let signal_day_col = column("signal_day")?;

    let mut label: Option<(Direction, f64, NaiveDate, NaiveDate)> = None;
    let mut price_bars: Vec<PriceBar> = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|source| AnalyzeError::Csv {
            path: display.clone(),
            source,
        })?;

        let cell = |col: usize, name: &str| -> Result<&str, AnalyzeError> {
            record.get(col).ok_or_else(|| AnalyzeError::Parse {
                line,
                path: display.clone(),
                reason: format!("missing '{name}' cell"),
            })
        };
        let number = |col: usize, name: &str| -> Result<f64, AnalyzeError> {
            let raw = cell(col, name)?;
            raw.trim().parse::<f64>().map_err(|_| AnalyzeError::Parse {
                line,
                path: display.clone(),
                reason: format!("'{raw}' is not a valid {name} value"),
            })
        };
        let date = |col: usize, name: &str| -> Result<NaiveDate, AnalyzeError> {
            let raw = cell(col, name)?;
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AnalyzeError::Parse {
                line,
                path: display.clone(),
                reason: format!("'{raw}' is not a valid {name} date"),
            })
        };

        if label.is_none() {
            let raw_direction = cell(direction_col, "direction")?;
            let direction =
                Direction::from_str(raw_direction.trim()).map_err(|e| AnalyzeError::Parse {
                    line,
                    path: display.clone(),
                    reason: e.to_string(),
                })?;
            label = Some((
                direction,
                number(entry_price_col, "entry_price")?,
                date(trade_day_col, "trade_day")?,
                date(signal_day_col, "signal_day")?,
            ));
        }

        let raw_time = cell(time_col, "time")?;
        let timestamp = parse_timestamp(raw_time).ok_or_else(|| AnalyzeError::Parse {
            line,
            path: display.clone(),
            reason: format!("'{raw_time}' is not a recognized timestamp"),
        })?;

        price_bars.push(PriceBar::new(
            timestamp,
            number(open_col, "open")?,
            number(high_col, "high")?,
            number(low_col, "low")?,
            number(close_col, "close")?,
        ));
    }

    let Some((direction, entry_price, trade_day, signal_day)) = label else {
        return Err(AnalyzeError::EmptyWindow { path: display });
    };

    let entry_hour = price_bars[0].hour;
    let bars = price_bars
        .into_iter()
        .map(|bar| {
            let delta = direction.delta(entry_price, bar.close);
            WindowBar {
                hours_from_entry: i64::from(bar.hour) - i64::from(entry_hour),
                price_delta_from_entry: delta,
                return_pct_from_entry: delta / entry_price * 100.0,
                bar,
            }
        })
        .collect();

    Ok(TradeWindow {
        signal_day,
        trade_day,
        direction,
        entry_price,
        bars,
    })
}

/// Load every window file in `base_dir/{direction}/` and compute its
/// metrics. Each file is self-describing: metrics follow the persisted
/// direction column, not the containing folder.
pub fn analyze_direction(
    base_dir: &Path,
    direction: Direction,
) -> Result<Vec<TradeMetrics>, AnalyzeError> {
    let dir = base_dir.join(direction.as_str());
    let mut metrics = Vec::new();
    for path in gather_window_files(&dir)? {
        let window = load_trade_window(&path)?;
        let m = TradeMetrics::compute(&window).map_err(|_| AnalyzeError::EmptyWindow {
            path: path.display().to_string(),
        })?;
        metrics.push(m);
    }
    Ok(metrics)
}

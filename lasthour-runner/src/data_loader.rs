//! Price-series loading from hourly OHLC CSV exports.
//!
//! Given a CSV with at least `time, open, high, low, close` (extra columns
//! ignored), produces a timestamp-ascending `Vec<PriceBar>` with calendar
//! fields derived at load time. No resampling, gap-filling, or deduplication
//! is performed — duplicate or missing hours propagate unchanged into
//! downstream partitioning.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use lasthour_core::PriceBar;

/// Columns every price CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["time", "open", "high", "low", "close"];

/// Errors from the price-series loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {path}")]
    SourceNotFound { path: String },

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
}

/// Load and normalize an hourly OHLC price CSV.
pub fn load_price_series(path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(LoadError::SourceNotFound { path: display });
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: display.clone(),
        source,
    })?;
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?
        .clone();

    let column = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
                path: display.clone(),
            })
    };
    let time_col = column("time")?;
    let open_col = column("open")?;
    let high_col = column("high")?;
    let low_col = column("low")?;
    let close_col = column("close")?;

    let mut bars = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2; // header occupies line 1
        let record = record.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;

        let cell = |col: usize, name: &str| -> Result<&str, LoadError> {
            record.get(col).ok_or_else(|| LoadError::Parse {
                line,
                path: display.clone(),
                reason: format!("missing '{name}' cell"),
            })
        };
        let price = |col: usize, name: &str| -> Result<f64, LoadError> {
            let raw = cell(col, name)?;
            raw.trim().parse::<f64>().map_err(|_| LoadError::Parse {
                line,
                path: display.clone(),
                reason: format!("'{raw}' is not a valid {name} price"),
            })
        };

        let raw_time = cell(time_col, "time")?;
        let timestamp = parse_timestamp(raw_time).ok_or_else(|| LoadError::Parse {
            line,
            path: display.clone(),
            reason: format!("'{raw_time}' is not a recognized timestamp"),
        })?;

        bars.push(PriceBar::new(
            timestamp,
            price(open_col, "open")?,
            price(high_col, "high")?,
            price(low_col, "low")?,
            price(close_col, "close")?,
        ));
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Parse one `time` cell as an absolute UTC instant.
///
/// Accepts RFC 3339, naive `%Y-%m-%d %H:%M:%S` or `%Y-%m-%dT%H:%M:%S`
/// (assumed UTC), and integer Unix seconds — the forms hourly broker and
/// charting exports actually use.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    None
}

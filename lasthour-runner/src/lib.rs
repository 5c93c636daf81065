//! Lasthour Runner — the pipeline's external collaborators.
//!
//! This crate builds on `lasthour-core` to provide:
//! - CSV price-series loading with column validation
//! - Persistence of trade windows into per-direction folders
//! - The analyze step: re-reading persisted windows and writing per-trade
//!   metrics and per-direction summary CSVs
//! - Distribution-chart rendering (overlaid histograms as SVG)
//!
//! The core stays pure; every file handle opened here is scoped to the
//! operation that opens it.

pub mod analyze;
pub mod chart;
pub mod data_loader;
pub mod export;

pub use analyze::{analyze_direction, gather_window_files, load_trade_window, AnalyzeError};
pub use chart::{write_distribution_charts, ChartError, DEFAULT_BUCKETS, DEFAULT_COLUMNS};
pub use data_loader::{load_price_series, LoadError};
pub use export::{
    metrics_csv, metrics_file_name, summary_csv, window_csv, window_file_name,
    write_analysis_outputs, write_trade_windows, SUMMARY_FILE_NAME,
};

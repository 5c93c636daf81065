//! Distribution charts — overlaid per-direction histograms rendered as SVG.
//!
//! Consumes the merged per-direction metrics files, groups rows by
//! direction, and renders one histogram per requested metric column with a
//! dashed per-group mean marker. Purely presentational: nothing here feeds
//! back into the core. Charts are emitted as standalone SVG markup.

use std::path::{Path, PathBuf};

use thiserror::Error;

use lasthour_core::{Direction, TradeMetrics};

use crate::export::metrics_file_name;

/// Default number of histogram buckets.
pub const DEFAULT_BUCKETS: usize = 40;

/// Metric columns visualized when none are requested.
pub const DEFAULT_COLUMNS: [&str; 2] = ["final_return", "final_return_pct"];

const PLOTTABLE_COLUMNS: [&str; 9] = [
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

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Errors from the chart layer.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no metrics CSVs found in {dir}; run the analyze step first")]
    NoMetricsFound { dir: String },

    #[error("column '{column}' is not a plottable metric")]
    UnknownColumn { column: String },

    #[error("bucket count must be at least 1")]
    InvalidBucketCount,

    #[error("csv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load and merge the per-direction metrics files from `analysis_dir`.
///
/// A direction's file may be absent (its group is simply empty), but at
/// least one of the two must exist.
pub fn load_metrics(analysis_dir: &Path) -> Result<Vec<TradeMetrics>, ChartError> {
    let mut rows = Vec::new();
    let mut found_any = false;

    for direction in Direction::both() {
        let path = analysis_dir.join(metrics_file_name(direction));
        if !path.exists() {
            continue;
        }
        found_any = true;
        let display = path.display().to_string();
        let mut reader = csv::Reader::from_path(&path).map_err(|source| ChartError::Csv {
            path: display.clone(),
            source,
        })?;
        for record in reader.deserialize::<TradeMetrics>() {
            rows.push(record.map_err(|source| ChartError::Csv {
                path: display.clone(),
                source,
            })?);
        }
    }

    if !found_any {
        return Err(ChartError::NoMetricsFound {
            dir: analysis_dir.display().to_string(),
        });
    }
    Ok(rows)
}

fn metric_value(m: &TradeMetrics, column: &str) -> Option<f64> {
    let value = match column {
        "entry_price" => m.entry_price,
        "exit_price" => m.exit_price,
        "final_return" => m.final_return,
        "final_return_pct" => m.final_return_pct,
        "max_return" => m.max_return,
        "max_return_pct" => m.max_return_pct,
        "max_drawdown" => m.max_drawdown,
        "max_drawdown_pct" => m.max_drawdown_pct,
        "hours_captured" => m.hours_captured as f64,
        _ => return None,
    };
    Some(value)
}

fn group_color(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "#1f77b4",
        Direction::Short => "#ff7f0e",
    }
}

/// `final_return_pct` -> `Final Return Pct`
fn title_case(column: &str) -> String {
    column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bucket `values` over `[min_val, max_val]` into `buckets` counts.
fn bucket_counts(values: &[f64], min_val: f64, max_val: f64, buckets: usize) -> Vec<usize> {
    let mut counts = vec![0usize; buckets];
    let range = max_val - min_val;
    for &v in values {
        let frac = if range > 0.0 { (v - min_val) / range } else { 0.0 };
        let bin = ((frac * buckets as f64) as usize).min(buckets - 1);
        counts[bin] += 1;
    }
    counts
}

/// Render one overlaid histogram for `column` as an SVG document.
pub fn render_histogram(
    rows: &[TradeMetrics],
    column: &str,
    buckets: usize,
) -> Result<String, ChartError> {
    if buckets == 0 {
        return Err(ChartError::InvalidBucketCount);
    }
    if !PLOTTABLE_COLUMNS.contains(&column) {
        return Err(ChartError::UnknownColumn {
            column: column.to_string(),
        });
    }

    let title = title_case(column);
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let mut svg = String::with_capacity(8192);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
    ));
    svg.push_str(&format!(
        "  <rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"28\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"20\">Distribution of {title}</text>\n",
        WIDTH / 2.0
    ));

    let groups: Vec<(Direction, Vec<f64>)> = Direction::both()
        .into_iter()
        .map(|d| {
            let values = rows
                .iter()
                .filter(|m| m.direction == d)
                .filter_map(|m| metric_value(m, column))
                .collect();
            (d, values)
        })
        .collect();

    let all_values: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    if all_values.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
             font-size=\"16\" fill=\"#666\">no trades to plot</text>\n",
            WIDTH / 2.0,
            HEIGHT / 2.0
        ));
        svg.push_str("</svg>\n");
        return Ok(svg);
    }

    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;
    for &v in &all_values {
        min_val = min_val.min(v);
        max_val = max_val.max(v);
    }
    if max_val - min_val < f64::EPSILON {
        // All values identical; widen so a single bucket still has width.
        min_val -= 0.5;
        max_val += 0.5;
    }

    let counts_per_group: Vec<(Direction, Vec<usize>, f64)> = groups
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(d, values)| {
            let counts = bucket_counts(values, min_val, max_val, buckets);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (*d, counts, mean)
        })
        .collect();

    let max_count = counts_per_group
        .iter()
        .flat_map(|(_, counts, _)| counts.iter().copied())
        .max()
        .unwrap_or(1)
        .max(1);

    let x_of = |value: f64| MARGIN_LEFT + (value - min_val) / (max_val - min_val) * plot_w;
    let bar_w = plot_w / buckets as f64;

    // Histogram bars, one translucent layer per direction.
    for (direction, counts, _) in &counts_per_group {
        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let h = count as f64 / max_count as f64 * plot_h;
            let x = MARGIN_LEFT + i as f64 * bar_w;
            let y = MARGIN_TOP + plot_h - h;
            svg.push_str(&format!(
                "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{bar_w:.2}\" height=\"{h:.2}\" \
                 fill=\"{}\" fill-opacity=\"0.55\"/>\n",
                group_color(*direction)
            ));
        }
    }

    // Dashed mean markers.
    for (direction, _, mean) in &counts_per_group {
        let x = x_of(*mean);
        svg.push_str(&format!(
            "  <line x1=\"{x:.2}\" y1=\"{MARGIN_TOP}\" x2=\"{x:.2}\" y2=\"{:.2}\" \
             stroke=\"{}\" stroke-width=\"1.5\" stroke-dasharray=\"6,4\"/>\n",
            MARGIN_TOP + plot_h,
            group_color(*direction)
        ));
    }

    // Axes.
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"black\"/>\n",
        MARGIN_TOP + plot_h,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP + plot_h
    ));
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{:.2}\" \
         stroke=\"black\"/>\n",
        MARGIN_TOP + plot_h
    ));
    for (value, anchor) in [
        (min_val, "start"),
        ((min_val + max_val) / 2.0, "middle"),
        (max_val, "end"),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{anchor}\" \
             font-family=\"sans-serif\" font-size=\"12\">{value:.2}</text>\n",
            x_of(value),
            MARGIN_TOP + plot_h + 18.0
        ));
    }
    svg.push_str(&format!(
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"sans-serif\" \
         font-size=\"12\">{max_count}</text>\n",
        MARGIN_LEFT - 8.0,
        MARGIN_TOP + 4.0
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"14\">{title}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 16.0
    ));
    svg.push_str(&format!(
        "  <text x=\"20\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
         font-size=\"14\" transform=\"rotate(-90 20 {:.2})\">Count</text>\n",
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    ));

    // Legend with per-group trade counts.
    let mut legend_y = MARGIN_TOP + 10.0;
    for (direction, values) in &groups {
        if values.is_empty() {
            continue;
        }
        let label = match direction {
            Direction::Long => "Long",
            Direction::Short => "Short",
        };
        let legend_x = MARGIN_LEFT + plot_w - 150.0;
        svg.push_str(&format!(
            "  <rect x=\"{legend_x:.2}\" y=\"{:.2}\" width=\"14\" height=\"14\" fill=\"{}\" \
             fill-opacity=\"0.55\"/>\n",
            legend_y - 11.0,
            group_color(*direction)
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{legend_y:.2}\" font-family=\"sans-serif\" \
             font-size=\"13\">{label} (n={})</text>\n",
            legend_x + 20.0,
            values.len()
        ));
        legend_y += 20.0;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Render one chart per requested column into `output_dir`.
///
/// Returns the written paths, one `{column}_distribution.svg` per column.
pub fn write_distribution_charts(
    analysis_dir: &Path,
    output_dir: &Path,
    columns: &[String],
    buckets: usize,
) -> Result<Vec<PathBuf>, ChartError> {
    let rows = load_metrics(analysis_dir)?;

    std::fs::create_dir_all(output_dir).map_err(|source| ChartError::Write {
        path: output_dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::with_capacity(columns.len());
    for column in columns {
        let svg = render_histogram(&rows, column, buckets)?;
        let path = output_dir.join(format!("{column}_distribution.svg"));
        std::fs::write(&path, svg).map_err(|source| ChartError::Write {
            path: path.display().to_string(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn metrics(direction: Direction, final_return: f64) -> TradeMetrics {
        TradeMetrics {
            trade_day: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            signal_day: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            direction,
            entry_price: 101.0,
            exit_price: 101.0 + final_return,
            final_return,
            final_return_pct: final_return / 101.0 * 100.0,
            max_return: final_return.max(0.0),
            max_return_pct: final_return.max(0.0) / 101.0 * 100.0,
            max_drawdown: (-final_return).max(0.0),
            max_drawdown_pct: (-final_return).max(0.0) / 101.0 * 100.0,
            hours_captured: 11,
        }
    }

    #[test]
    fn histogram_includes_both_groups_and_mean_markers() {
        let rows = vec![
            metrics(Direction::Long, 2.0),
            metrics(Direction::Long, -1.0),
            metrics(Direction::Short, 0.5),
        ];
        let svg = render_histogram(&rows, "final_return", 10).unwrap();
        assert!(svg.contains("Distribution of Final Return"));
        assert!(svg.contains("Long (n=2)"));
        assert!(svg.contains("Short (n=1)"));
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let rows = vec![metrics(Direction::Long, 2.0)];
        assert!(matches!(
            render_histogram(&rows, "sharpe", 10).unwrap_err(),
            ChartError::UnknownColumn { .. }
        ));
    }

    #[test]
    fn zero_buckets_is_rejected() {
        assert!(matches!(
            render_histogram(&[], "final_return", 0).unwrap_err(),
            ChartError::InvalidBucketCount
        ));
    }

    #[test]
    fn no_rows_still_renders_a_document() {
        let svg = render_histogram(&[], "final_return", 40).unwrap();
        assert!(svg.contains("no trades to plot"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn identical_values_do_not_divide_by_zero() {
        let rows = vec![
            metrics(Direction::Long, 1.0),
            metrics(Direction::Long, 1.0),
        ];
        let svg = render_histogram(&rows, "final_return", 40).unwrap();
        assert!(svg.contains("Long (n=2)"));
    }

    #[test]
    fn missing_metrics_dir_is_no_metrics_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_metrics(dir.path()).unwrap_err(),
            ChartError::NoMetricsFound { .. }
        ));
    }
}

//! Lasthour CLI — generate, analyze, and plot commands.
//!
//! Commands:
//! - `generate` — slice hourly price data into per-direction trade-window CSVs
//! - `analyze` — aggregate persisted windows into metrics and summary CSVs
//! - `plot` — render overlaid per-direction histograms for metric columns
//!
//! Configuration or structural errors (bad hours, missing source, missing
//! columns) abort immediately with one descriptive message; successful runs
//! report counts.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lasthour_core::{
    generate_windows, Direction, WindowConfig, DEFAULT_ENTRY_HOUR, DEFAULT_EXIT_HOUR,
};
use lasthour_runner::{
    analyze_direction, load_price_series, write_analysis_outputs, write_distribution_charts,
    write_trade_windows, DEFAULT_BUCKETS,
};

#[derive(Parser)]
#[command(
    name = "lasthour",
    about = "Last-hour signal strategy lab — trade-window generation and outcome analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice hourly OHLC data into trade-window CSVs under long/ and short/.
    Generate {
        /// Path to the hourly OHLC CSV (columns: time, open, high, low, close).
        #[arg(long)]
        data_path: PathBuf,

        /// Folder that receives the long/ and short/ window CSVs.
        #[arg(long, default_value = "windows")]
        output_dir: PathBuf,

        /// Hour (0-23) for entering trades on the day after the signal.
        #[arg(long, default_value_t = DEFAULT_ENTRY_HOUR)]
        entry_hour: u32,

        /// Hour (0-23) at which the recorded window ends. Must be >= entry hour.
        #[arg(long, default_value_t = DEFAULT_EXIT_HOUR)]
        exit_hour: u32,
    },
    /// Aggregate persisted windows into per-trade metrics and summary CSVs.
    Analyze {
        /// Directory containing the long/ and short/ window folders.
        #[arg(long, default_value = "windows")]
        base_dir: PathBuf,

        /// Destination for the metrics and summary CSVs.
        #[arg(long, default_value = "analysis")]
        analysis_dir: PathBuf,
    },
    /// Render overlaid long/short histograms for metric columns.
    Plot {
        /// Directory containing long_metrics.csv and short_metrics.csv.
        #[arg(long, default_value = "analysis")]
        analysis_dir: PathBuf,

        /// Folder to store generated charts.
        #[arg(long, default_value = "analysis/plots")]
        output_dir: PathBuf,

        /// Metric columns to visualize.
        #[arg(long, num_args = 1.., default_values_t = [
            "final_return".to_string(),
            "final_return_pct".to_string(),
        ])]
        columns: Vec<String>,

        /// Number of histogram buckets.
        #[arg(long, default_value_t = DEFAULT_BUCKETS)]
        bins: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            data_path,
            output_dir,
            entry_hour,
            exit_hour,
        } => run_generate(data_path, output_dir, entry_hour, exit_hour),
        Commands::Analyze {
            base_dir,
            analysis_dir,
        } => run_analyze(base_dir, analysis_dir),
        Commands::Plot {
            analysis_dir,
            output_dir,
            columns,
            bins,
        } => run_plot(analysis_dir, output_dir, columns, bins),
    }
}

fn run_generate(
    data_path: PathBuf,
    output_dir: PathBuf,
    entry_hour: u32,
    exit_hour: u32,
) -> Result<()> {
    // Validate the window bounds before touching any input.
    let config = WindowConfig::new(entry_hour, exit_hour)?;

    let series = load_price_series(&data_path)?;
    let windows = generate_windows(&series, &config);
    let count = write_trade_windows(&windows, &output_dir)?;

    println!("Wrote {count} trade window CSVs to {}", output_dir.display());
    Ok(())
}

fn run_analyze(base_dir: PathBuf, analysis_dir: PathBuf) -> Result<()> {
    let long = analyze_direction(&base_dir, Direction::Long)?;
    let short = analyze_direction(&base_dir, Direction::Short)?;
    let summarized = long.len() + short.len();

    write_analysis_outputs(&long, &short, &analysis_dir)?;

    println!(
        "Summarized {summarized} trade windows ({} long, {} short); wrote analysis outputs to {}",
        long.len(),
        short.len(),
        analysis_dir.display()
    );
    Ok(())
}

fn run_plot(
    analysis_dir: PathBuf,
    output_dir: PathBuf,
    columns: Vec<String>,
    bins: usize,
) -> Result<()> {
    let written = write_distribution_charts(&analysis_dir, &output_dir, &columns, bins)?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

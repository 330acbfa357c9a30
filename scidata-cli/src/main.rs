//! SciData CLI: collect hourly space-weather data into one CSV.
//!
//! `scidata <START_DATE> <DURATION>` fetches every source's daily files,
//! aligns them onto `DURATION * 24` hours starting at 00:00 of START_DATE,
//! and writes `DD_MM_YYYY_+DURATION.csv`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scidata_core::config::SourceTable;
use scidata_core::data::{CachedProvider, FetchProgress, HttpProvider, QuietProgress, StdoutProgress};
use scidata_core::timeline::AlignPolicy;
use scidata_runner::{prepare, run_pipeline, save_output, PipelineOptions, PipelineOutput};

#[derive(Parser)]
#[command(
    name = "scidata",
    version,
    about = "Collect hourly space-weather data (ACE SWEPAM, ACE MAG, Moscow magnetometer) into one CSV"
)]
struct Cli {
    /// Start date, DD/MM/YYYY.
    #[arg(required_unless_present = "print_sources")]
    start_date: Option<String>,

    /// Number of days to collect.
    #[arg(required_unless_present = "print_sources", allow_negative_numbers = true)]
    duration: Option<i64>,

    /// Source table (TOML). Defaults to the built-in space-weather sources.
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Directory for the CSV (and report).
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Download directory for daily files.
    #[arg(long, default_value = "downloads")]
    cache_dir: PathBuf,

    /// Keep the files downloaded by this run.
    #[arg(long, default_value_t = false)]
    keep_downloads: bool,

    /// Offline mode: use only files already in the download directory.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Pad hours a source did not deliver with zero rows instead of failing.
    #[arg(long, default_value_t = false)]
    pad_missing: bool,

    /// Write a header line to the CSV.
    #[arg(long, default_value_t = false)]
    header: bool,

    /// Write a JSON run report next to the CSV.
    #[arg(long, default_value_t = false)]
    report: bool,

    /// HTTP timeout per file, in seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Print the source table as TOML and exit.
    #[arg(long, default_value_t = false)]
    print_sources: bool,

    /// More logging (debug).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Less output: warnings only, no per-file progress.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.print_sources {
        return print_sources(cli.sources.as_deref());
    }

    let (Some(start_date), Some(duration)) = (cli.start_date.as_deref(), cli.duration) else {
        bail!("START_DATE and DURATION are required");
    };
    let (request, table) = prepare(start_date, duration, cli.sources.as_deref())?;

    println!(
        "Collecting the data for {} with duration {} day(s) into {}",
        request.start.format("%d/%m/%Y"),
        request.duration_days,
        request.output_file_name()
    );

    let http = HttpProvider::new(Duration::from_secs(cli.timeout_secs))
        .context("failed to build HTTP client")?;
    let provider = CachedProvider::new(http, &cli.cache_dir).offline(cli.offline);
    let progress: &dyn FetchProgress = if cli.quiet {
        &QuietProgress
    } else {
        &StdoutProgress
    };
    let policy = if cli.pad_missing {
        AlignPolicy::PadMissing
    } else {
        AlignPolicy::Strict
    };
    let options = PipelineOptions::default().with_policy(policy);

    let result = run_pipeline(&request, &table, &provider, progress, &options);

    if !cli.keep_downloads {
        let removed = provider.clear_downloads();
        info!(removed, dir = %cli.cache_dir.display(), "cleared downloads");
    }

    let output = result?;
    report_padding(&output);

    let saved = save_output(&output, &cli.output_dir, cli.header, cli.report)?;
    println!("Wrote {} rows to {}", output.rows.len(), saved.csv.display());
    if let Some(report) = &saved.report {
        println!("Report: {}", report.display());
    }

    Ok(())
}

fn report_padding(output: &PipelineOutput) {
    for s in output.sources.iter().filter(|s| s.is_padded()) {
        warn!(
            source = %s.source,
            padded = s.stats.padded,
            fetch_gaps = s.fetch_errors.len(),
            "hours padded with zero rows"
        );
    }
}

fn print_sources(path: Option<&Path>) -> Result<()> {
    let table = match path {
        Some(path) => SourceTable::from_file(path)?,
        None => SourceTable::space_weather(),
    };
    print!("{}", table.to_toml()?);
    Ok(())
}

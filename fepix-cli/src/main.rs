//! Command-line interface for FE-I4B readout processing.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use clap::{Parser, Subcommand, ValueEnum};

use fepix_core::clustering::ClusteringConfig;
use fepix_fei4::{classify_line, HitDiscCnfg, LineKind, DEFAULT_HEADERS_PER_WINDOW};
use fepix_io::{
    load_calibration_json, process_windows_parallel, segment_lines, Pipeline, ProcessedWindow,
    RawLogReader, RunStatistics,
};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    FepixIo(#[from] fepix_io::Error),

    #[error("decode error: {0}")]
    Fei4(#[from] fepix_fei4::Error),

    #[error("core error: {0}")]
    Core(#[from] fepix_core::Error),
}

/// Hardware discriminator configuration selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiscCnfg {
    /// Delayed-hit protocol; codes map to code + 1
    #[value(name = "0")]
    Cnfg0,
    /// Codes map to code + 2
    #[value(name = "1")]
    Cnfg1,
    /// Codes map to code + 3 with small-ToT flagging
    #[value(name = "2")]
    Cnfg2,
}

impl From<DiscCnfg> for HitDiscCnfg {
    fn from(cnfg: DiscCnfg) -> Self {
        match cnfg {
            DiscCnfg::Cnfg0 => HitDiscCnfg::Cnfg0,
            DiscCnfg::Cnfg1 => HitDiscCnfg::Cnfg1,
            DiscCnfg::Cnfg2 => HitDiscCnfg::Cnfg2,
        }
    }
}

/// FE-I4B readout decoder and clustering processor.
#[derive(Parser)]
#[command(name = "fepix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and cluster a raw readout log
    Process {
        /// Input raw log file
        input: PathBuf,

        /// Calibration file (JSON planes a, b, c)
        #[arg(short, long)]
        calibration: PathBuf,

        /// Discriminator configuration the run was taken with
        #[arg(long, value_enum, default_value = "2")]
        hit_disc_cnfg: DiscCnfg,

        /// Data headers per readout window
        #[arg(long, default_value_t = DEFAULT_HEADERS_PER_WINDOW)]
        headers_per_window: u32,

        /// Squared spatial clustering threshold (pixels)
        #[arg(long, default_value_t = 8)]
        spatial_threshold: u32,

        /// Squared temporal clustering threshold (lvl1 units)
        #[arg(long, default_value_t = 9)]
        temporal_threshold: u32,

        /// Segment first, then decode and cluster windows in parallel
        #[arg(long)]
        parallel: bool,

        /// Verbose per-window output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show line-kind statistics of a raw readout log
    Info {
        /// Input raw log file
        input: PathBuf,

        /// Data headers per readout window
        #[arg(long, default_value_t = DEFAULT_HEADERS_PER_WINDOW)]
        headers_per_window: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            calibration,
            hit_disc_cnfg,
            headers_per_window,
            spatial_threshold,
            temporal_threshold,
            parallel,
            verbose,
        } => {
            let config = ClusteringConfig::new()
                .with_spatial_threshold(spatial_threshold)
                .with_temporal_threshold(temporal_threshold);
            let cnfg = HitDiscCnfg::from(hit_disc_cnfg);

            if verbose {
                eprintln!("Processing {}...", input.display());
                eprintln!("HitDiscCnfg: {:?}", cnfg);
                eprintln!("Headers per window: {}", headers_per_window);
                eprintln!("Spatial threshold (squared): {}", spatial_threshold);
                eprintln!("Temporal threshold (squared): {}", temporal_threshold);
            }

            let table = load_calibration_json(&calibration)?;
            let reader = RawLogReader::open(&input)?;

            let (stats, windows, pending) = if parallel {
                let (batches, counters) = segment_lines(reader, headers_per_window)?;
                let windows = process_windows_parallel(&batches, cnfg, &config, &table)?;
                let stats = RunStatistics {
                    segmenter: counters,
                    hits: windows.iter().map(|w| w.hit_count as u64).sum(),
                    clusters: windows.iter().map(|w| w.clusters.len() as u64).sum(),
                    rejected: windows.iter().map(|w| w.rejected as u64).sum(),
                };
                (stats, windows, 0)
            } else {
                let mut pipeline = Pipeline::new(cnfg, headers_per_window, config, table)?;
                let mut windows = Vec::new();
                for line in reader {
                    if let Some(window) = pipeline.process_line(&line?)? {
                        if verbose {
                            report_window(&window);
                        }
                        windows.push(window);
                    }
                }
                (pipeline.statistics(), windows, pipeline.pending_records())
            };

            print_summary(&stats, &windows);
            if verbose && pending > 0 {
                eprintln!(
                    "{} record(s) in an unfinished trailing window were not processed",
                    pending
                );
            }
        }

        Commands::Info {
            input,
            headers_per_window,
        } => {
            let mut headers = 0u64;
            let mut records = 0u64;
            let mut triggers = 0u64;
            let mut channels = 0u64;
            let mut unrecognized = 0u64;
            let mut malformed = 0u64;

            for line in RawLogReader::open(&input)? {
                match classify_line(&line?) {
                    Ok(LineKind::DataHeader) => headers += 1,
                    Ok(LineKind::DataRecord { .. }) => records += 1,
                    Ok(LineKind::TriggerData) => triggers += 1,
                    Ok(LineKind::Channel) => channels += 1,
                    Ok(LineKind::Unrecognized) => unrecognized += 1,
                    Err(_) => malformed += 1,
                }
            }

            println!("Data headers:      {}", headers);
            println!("Data records:      {}", records);
            println!("Trigger words:     {}", triggers);
            println!("Channel markers:   {}", channels);
            println!("Unrecognized:      {}", unrecognized);
            println!("Malformed records: {}", malformed);
            println!(
                "Full windows:      {}",
                headers / u64::from(headers_per_window.max(1))
            );
        }
    }

    Ok(())
}

fn report_window(window: &ProcessedWindow) {
    eprintln!(
        "trigger {}: {} hit(s), {} cluster(s), {} rejected",
        window.trigger_index,
        window.hit_count,
        window.clusters.len(),
        window.rejected
    );
}

fn print_summary(stats: &RunStatistics, windows: &[ProcessedWindow]) {
    println!("Triggers processed:  {}", stats.segmenter.triggers);
    println!("Trigger words seen:  {}", stats.segmenter.trigger_markers);
    println!("Channel markers:     {}", stats.segmenter.channel_markers);
    println!("Data records:        {}", stats.segmenter.data_records);
    println!("Dropped records:     {}", stats.segmenter.dropped_records);
    println!("Rejected hit slots:  {}", stats.rejected);
    println!("Hits:                {}", stats.hits);
    println!("Clusters:            {}", stats.clusters);

    if stats.clusters > 0 {
        println!(
            "Mean cluster size:   {:.2}",
            stats.hits as f64 / stats.clusters as f64
        );
        let largest = windows
            .iter()
            .flat_map(|w| w.clusters.iter().map(fepix_core::Cluster::len))
            .max()
            .unwrap_or(0);
        println!("Largest cluster:     {}", largest);
    }
}

//! netgauge CLI - network probe cycles and transfer time estimates.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use netgauge_lib::prelude::*;
use netgauge_lib::DEFAULT_TICK_INTERVAL;
use netgauge_lib::url::{BASE_URL_ENV, DEFAULT_BASE_URL};
use std::path::PathBuf;

mod commands;
mod display;
mod logging;

#[derive(Parser)]
#[command(name = "netgauge")]
#[command(about = "Network diagnostics: probe cycles and transfer time estimates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and warnings)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run probe cycles against a netgauge backend
    Probe {
        /// Backend base URL
        #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Number of cycles to run
        #[arg(short = 'n', long, default_value = "1")]
        cycles: u32,

        /// Pause between cycles, in seconds
        #[arg(short, long, default_value = "5")]
        interval: u64,

        /// Attempts per retried probe, including the first
        #[arg(long, default_value = "3")]
        attempts: u32,

        /// Per-request timeout in seconds (none by default)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print results and history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate transfer times for a set of files
    Estimate {
        /// Local files to size (contents are never read)
        paths: Vec<PathBuf>,

        /// Synthetic file as NAME:SIZE:UNIT[:MIME], e.g. video.mp4:1.5:GB
        #[arg(short, long = "file", value_name = "NAME:SIZE:UNIT[:MIME]")]
        files: Vec<String>,

        /// JSON estimator configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Download bandwidth in Mbps
        #[arg(long)]
        download: Option<f64>,

        /// Upload bandwidth in Mbps
        #[arg(long)]
        upload: Option<f64>,

        /// Network latency in milliseconds
        #[arg(long)]
        latency: Option<f64>,

        /// Enable compression at the given rate (0-100)
        #[arg(long, value_name = "PERCENT")]
        compression: Option<f64>,

        /// Cloud provider (none, google-drive, aws-s3, onedrive)
        #[arg(long)]
        cloud: Option<CloudProvider>,

        /// Route traffic through a VPN
        #[arg(long)]
        vpn: bool,

        /// Connection type (wifi, ethernet)
        #[arg(long)]
        connection: Option<ConnectionType>,

        /// Transfer type (direct, p2p)
        #[arg(long)]
        transfer: Option<TransferType>,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print simulated bandwidth figures
    Bandwidth {
        /// Download bandwidth in Mbps
        #[arg(long, default_value = "100")]
        download: f64,

        /// Upload bandwidth in Mbps
        #[arg(long, default_value = "20")]
        upload: f64,

        /// Seconds between figures
        #[arg(short, long, default_value_t = DEFAULT_TICK_INTERVAL.as_secs_f64())]
        interval: f64,

        /// Number of figures to print
        #[arg(short = 'n', long, default_value = "10")]
        ticks: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Probe {
            base_url,
            cycles,
            interval,
            attempts,
            timeout,
            json,
        } => {
            commands::probe::probe(
                &base_url, cycles, interval, attempts, timeout, json, cli.quiet,
            )
            .await
        }
        Commands::Estimate {
            paths,
            files,
            config,
            download,
            upload,
            latency,
            compression,
            cloud,
            vpn,
            connection,
            transfer,
            json,
        } => {
            let overrides = commands::estimate::Overrides {
                download,
                upload,
                latency,
                compression,
                cloud,
                vpn,
                connection,
                transfer,
            };
            commands::estimate::estimate(&paths, &files, config.as_deref(), &overrides, json)
        }
        Commands::Bandwidth {
            download,
            upload,
            interval,
            ticks,
        } => commands::bandwidth::bandwidth(download, upload, interval, ticks).await,
    }
}

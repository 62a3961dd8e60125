// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tilecam::Config;

mod cli;

#[derive(Parser)]
#[command(name = "tilecam")]
#[command(about = "Sliding-window dataset and camera tools")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.config/tilecam/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Divide each image in a directory into a set of sub-images
    Divide(cli::DivideArgs),

    /// Take numbered photos, one per press of Enter
    Capture(cli::CaptureArgs),

    /// Scan a frame for a target with a sliding window
    Find(cli::FindArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=tilecam=trace, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Divide(args) => cli::divide_images(&config, args),
        Commands::Capture(args) => cli::capture_photos(&config, args),
        Commands::Find(args) => cli::find_targets(&config, args),
    }
}

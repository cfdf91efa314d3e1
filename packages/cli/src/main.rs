#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for parcel scouting.
//!
//! Every subcommand reads its inputs from the data directory
//! (`PARCEL_SCOUT_DATA_DIR`, default `./data`) unless a flag points at a
//! specific file. Logging goes through
//! [`parcel_scout_cli_utils::init_logger`], so `RUST_LOG=debug` shows
//! per-record decisions without breaking the progress bars.

mod args;
mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parcel_scout_catalog::paths;

use crate::commands::{Context, DistrictsArgs, LookupArgs, MarketArgs, NearbyArgs, ScoreArgs};

#[derive(Parser)]
#[command(
    name = "parcel_scout",
    about = "Proximity scoring and market analysis for land parcels"
)]
struct Cli {
    /// Directory holding the input files [env: PARCEL_SCOUT_DATA_DIR, default: ./data]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog points within a radius of the reference points
    Nearby(NearbyArgs),
    /// Score the nearest mobility and establishment categories
    Score(ScoreArgs),
    /// Summarize real-estate launches near the reference points
    Market(MarketArgs),
    /// Narrow candidate districts by region and demographics
    Districts(DistrictsArgs),
    /// Print the effective points lookup
    Lookup(LookupArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = parcel_scout_cli_utils::init_logger();
    let cli = Cli::parse();

    let ctx = Context {
        data_dir: cli.data_dir.unwrap_or_else(paths::data_dir),
        json: cli.json,
        multi,
    };
    log::debug!("Data directory: {}", ctx.data_dir.display());

    match &cli.command {
        Commands::Nearby(args) => commands::nearby(&ctx, args),
        Commands::Score(args) => commands::score(&ctx, args),
        Commands::Market(args) => commands::market(&ctx, args),
        Commands::Districts(args) => commands::districts(&ctx, args),
        Commands::Lookup(args) => commands::lookup(&ctx, args),
    }
}

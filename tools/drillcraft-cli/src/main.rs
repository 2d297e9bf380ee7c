//! Drillcraft CLI: command-line interface for drill documents.
//!
//! Usage:
//!   drillcraft init <PATH>               Write a sample drill document
//!   drillcraft info <PATH>               Summarize a drill
//!   drillcraft validate <PATH>           Check structure and collisions
//!   drillcraft resolve <PATH> --count C  Print positions at a count
//!   drillcraft play <PATH>               Play the drill in the terminal

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drillcraft_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "drillcraft",
    about = "Formation timeline and geometry tools for drill design",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample drill document
    Init {
        /// Output file
        path: PathBuf,

        /// Drill title
        #[arg(short, long, default_value = "Sample Drill")]
        title: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show drill information
    Info {
        /// Path to the drill document
        path: PathBuf,
    },

    /// Validate a drill and report collisions
    Validate {
        /// Path to the drill document
        path: PathBuf,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every performer's position at a count
    Resolve {
        /// Path to the drill document
        path: PathBuf,

        /// Count to resolve (fractions allowed)
        #[arg(short, long)]
        count: f64,

        /// Print positions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play the drill, printing positions as counts pass
    Play {
        /// Path to the drill document
        path: PathBuf,

        /// Start count
        #[arg(long, default_value = "0")]
        from: f64,

        /// Stop count (defaults to the end of the drill)
        #[arg(long)]
        to: Option<f64>,

        /// Tick rate in Hz (defaults to the configured rate)
        #[arg(long)]
        fps: Option<u32>,

        /// Tempo override in beats per minute
        #[arg(long)]
        bpm: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    drillcraft_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Init { path, title, force } => commands::init::run(path, title, force, &config),
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path, json } => commands::validate::run(path, json),
        Commands::Resolve { path, count, json } => commands::resolve::run(path, count, json),
        Commands::Play {
            path,
            from,
            to,
            fps,
            bpm,
        } => commands::play::run(path, from, to, fps, bpm, &config).await,
    }
}

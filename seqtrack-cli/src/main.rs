use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use seqtrack_core::LayoutStrategy;
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{format_error_with_suggestions, CliError};

#[derive(Parser)]
#[command(name = "seqtrack")]
#[command(about = "SeqTrack - sequence feature track layout and rendering")]
#[command(version)]
#[command(long_about = "
SeqTrack lays out ranged sequence annotations (domains, sites, variants) in
non-overlapping lanes and renders them as a zoomable feature track.

Examples:
  seqtrack render --input features.json --out track.svg --layout non-overlapping
  seqtrack render --input features.json --out zoom.svg --display 40-120 --highlight 50-60
  seqtrack layout --input features.json --layout non-overlapping
  seqtrack config --out seqtrack.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Track options shared by the commands that lay out data
#[derive(Args, Debug, Clone, Default)]
pub struct TrackArgs {
    /// Layout strategy (overrides the configuration file)
    #[arg(long)]
    pub layout: Option<LayoutArg>,

    /// Highlighted range, e.g. '10-20'
    #[arg(long)]
    pub highlight: Option<String>,

    /// Extra track attribute as NAME=VALUE (repeatable), e.g. 'color=#336699'
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub attributes: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a feature collection to SVG
    Render {
        /// Input feature file (JSON array of records)
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Output file (SVG)
        #[arg(short, long, required = true)]
        out: PathBuf,

        #[command(flatten)]
        track: TrackArgs,

        /// Width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Sequence length (defaults to the furthest fragment end)
        #[arg(long)]
        length: Option<u64>,

        /// Visible window, e.g. '40-120'
        #[arg(long)]
        display: Option<String>,

        /// Title drawn above the track
        #[arg(long)]
        title: Option<String>,

        /// Omit the residue ruler
        #[arg(long)]
        no_ruler: bool,

        /// Omit the timestamped footer
        #[arg(long)]
        no_footer: bool,
    },

    /// Print lane assignments as JSON
    Layout {
        /// Input feature file (JSON array of records)
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        track: TrackArgs,
    },

    /// Print or write an example seqtrack.toml
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LayoutArg {
    Stacked,
    NonOverlapping,
}

impl From<LayoutArg> for LayoutStrategy {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Stacked => LayoutStrategy::Stacked,
            LayoutArg::NonOverlapping => LayoutStrategy::NonOverlapping,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    // Execute the requested command
    match cli.command {
        Commands::Render {
            input,
            out,
            track,
            width,
            length,
            display,
            title,
            no_ruler,
            no_footer,
        } => {
            commands::render::execute(
                &config, input, out, track, width, length, display, title, no_ruler, no_footer,
            )?;
        }

        Commands::Layout { input, out, track } => {
            commands::layout::execute(&config, input, out, track)?;
        }

        Commands::Config { out } => {
            commands::config::execute(out)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    if let Err(err) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Warning: logging unavailable: {}", err);
    }

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => eprintln!("Error: {}", format_error_with_suggestions(cli_err)),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

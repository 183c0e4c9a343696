mod config;
mod config_cmd;
mod input;
mod pick_cmd;
mod synth_cmd;
mod terminal_output;
mod verify_cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use selpick_core::Point;
use tracing::debug;

#[derive(Parser)]
#[command(name = "selpick")]
#[command(about = "selpick: short, stable, unique CSS selectors for any element")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.selpick/config.yaml, or $SELPICK_CONFIG_DIR/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a selector for the element a target selector points at
    Synth {
        /// HTML file to load
        #[arg(long)]
        html: PathBuf,
        /// Any selector matching exactly the element of interest
        #[arg(long)]
        target: String,
    },
    /// Right-click a point on a laid-out page and copy the element's selector
    Pick {
        #[arg(long)]
        html: PathBuf,
        /// JSON list of `{selector, rect}` boxes used for hit testing
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Show what a selector matches
    Verify {
        #[arg(long)]
        html: PathBuf,
        #[arg(long)]
        selector: String,
    },
    /// Print the effective configuration
    Config {
        /// Write a config file with every default first, if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = config::resolve_path(cli.config.as_deref());
    let cfg = config::load(&config_path).await?;

    let log_dir = config::log_dir(&cfg);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    logging::init_logger(&log_dir, cfg.log_level());
    debug!(config = %config_path.display(), logs = %log_dir.display(), "selpick starting");

    let ok = match cli.command {
        Commands::Synth { html, target } => synth_cmd::run(&cfg, &html, &target).await?,
        Commands::Pick { html, layout, x, y } => {
            pick_cmd::run(&cfg, &html, &layout, Point::new(x, y)).await?
        }
        Commands::Verify { html, selector } => verify_cmd::run(&html, &selector).await?,
        Commands::Config { init } => {
            config_cmd::run(&cfg, &config_path, init).await?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

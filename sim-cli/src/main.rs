//! SIM CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the computer in the terminal
//! - auto: Run headless rounds against a random stand-in
//! - rules: Print the rules
//! - graph: Print points, edges and triangles

mod auto_cmd;
mod play_cmd;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sim_core::{GameGraph, SessionConfig};

#[derive(Parser)]
#[command(name = "sim")]
#[command(about = "Sim: color edges, avoid completing a triangle in your color")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Session config JSON file (delays, seed)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer
    Play(play_cmd::PlayArgs),
    /// Play headless rounds, random stand-in vs computer
    Auto(auto_cmd::AutoArgs),
    /// Print the rules
    Rules,
    /// Print the board topology
    Graph,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, config),
        Commands::Auto(args) => auto_cmd::run(args, config),
        Commands::Rules => {
            render::print_rules();
            Ok(())
        }
        Commands::Graph => {
            let graph = GameGraph::new().context("Failed to build game graph")?;
            render::print_graph(&graph);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any) with the command-line seed applied on top
fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    tracing::debug!(?config, "Session config");
    Ok(config)
}

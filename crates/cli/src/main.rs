//! crossboot - inspect the search-path fixup a cross-build interpreter
//! performs at startup.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// Model and inspect the bootstrap patch of a cross-build interpreter.
#[derive(Parser)]
#[command(name = "crossboot")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a cross-build environment skeleton with a config file
  Init {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    dir: PathBuf,
  },

  /// Boot the modeled interpreter, apply the patch, and report the outcome
  Status {
    /// Path to the config file (default: ./crossboot.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
  },

  /// Show the regular and the effective module search paths
  Paths {
    /// Path to the config file (default: ./crossboot.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
  },

  /// Resolve modules through the patched import machinery
  Resolve {
    /// Path to the config file (default: ./crossboot.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Modules to resolve
    #[arg(required = true)]
    modules: Vec<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Init { dir } => cmd::cmd_init(&dir),
    Commands::Status { config, json } => cmd::cmd_status(config.as_deref(), json),
    Commands::Paths { config, json } => cmd::cmd_paths(config.as_deref(), json),
    Commands::Resolve {
      config,
      modules,
      json,
    } => cmd::cmd_resolve(config.as_deref(), &modules, json),
  }
}

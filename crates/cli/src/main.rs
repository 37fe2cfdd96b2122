mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pwasync_lib::platform::paths::Layout;

/// pwasync - Declarative Firefox web-app manager
#[derive(Parser)]
#[command(name = "pwasync")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Data directory to manage instead of $XDG_DATA_HOME
  #[arg(long, global = true, value_name = "DIR")]
  data_home: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Deploy, update and prune applications to match a manifest
  Sync {
    /// Path to the manifest (JSON)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Template profile cloned into new profiles
    #[arg(short, long, value_name = "DIR")]
    template: Option<PathBuf>,

    /// Skip redirect resolution and register URLs as configured
    #[arg(long)]
    offline: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show what a sync would do without changing anything
  Plan {
    /// Path to the manifest (JSON)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
  },

  /// List deployed applications
  List {
    /// Print as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let layout = match cli.data_home {
    Some(dir) => Layout::new(dir),
    None => Layout::from_env()?,
  };

  match cli.command {
    Commands::Sync {
      manifest,
      template,
      offline,
      json,
    } => cmd::cmd_sync(&layout, &manifest, template, offline, json),
    Commands::Plan { manifest, json } => cmd::cmd_plan(&layout, &manifest, json),
    Commands::List { json } => cmd::cmd_list(&layout, json),
  }
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("warn,pwasync={level},pwasync_lib={level}")));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

//! CLI command definitions for mock-task-api
//!
//! The main entry point is the `Cli` struct. Running without a subcommand
//! starts the server with default `serve` options.

pub mod fixtures;

use clap::{Args, Parser, Subcommand};
use fixtures::FixturesArgs;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::Config;

/// Mock REST API with artificial latency and fault injection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve(ServeArgs),

    /// Print a generated bulk task set as JSON
    Fixtures(FixturesArgs),
}

/// Arguments for the serve subcommand. Each flag overrides the config file
/// and environment.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seed for latency and fault draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable artificial latency
    #[arg(long)]
    pub no_latency: bool,

    /// Disable synthetic errors
    #[arg(long)]
    pub no_faults: bool,

    /// Seed the store with generated tasks instead of the fixture tasks
    #[arg(long)]
    pub bulk_tasks: bool,
}

impl ServeArgs {
    /// Apply the flags on top of a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if self.no_latency {
            config.simulation.latency = false;
        }
        if self.no_faults {
            config.simulation.faults = false;
        }
        if self.bulk_tasks {
            config.seed.bulk_tasks = true;
        }
    }
}

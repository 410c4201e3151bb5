//! Fixtures subcommand: print a generated task set.

use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::seed::{BulkTaskOptions, generate_tasks};

/// Arguments for the fixtures subcommand
#[derive(Args, Debug, Clone)]
pub struct FixturesArgs {
    /// Number of projects to spread tasks over
    #[arg(long, default_value_t = 5)]
    pub projects: i64,

    /// Tasks generated per project
    #[arg(long, default_value_t = 50)]
    pub per_project: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

impl FixturesArgs {
    pub fn options(&self) -> BulkTaskOptions {
        BulkTaskOptions {
            project_count: self.projects,
            tasks_per_project: self.per_project,
            seed: self.seed,
        }
    }
}

/// Write the generated tasks as pretty JSON.
pub fn run_fixtures(args: &FixturesArgs, out: &mut impl Write) -> Result<()> {
    let tasks = generate_tasks(&args.options());
    serde_json::to_writer_pretty(&mut *out, &tasks)?;
    writeln!(out)?;
    Ok(())
}

//! Mock task API server
//!
//! Serves in-memory users, projects, tasks, comments, activity and metrics
//! over HTTP with artificial latency and injected failures.

use anyhow::Result;
use clap::Parser;
use mock_task_api::api::{AppState, start_server};
use mock_task_api::cli::fixtures::run_fixtures;
use mock_task_api::cli::{Cli, Command, ServeArgs};
use mock_task_api::config::{Config, ConfigLoader, ConfigPaths, ProcessEnv, RouteGroup};
use mock_task_api::logging::{self, LogTarget};
use mock_task_api::seed::{SeedData, generate_tasks};
use mock_task_api::store::Store;
use std::path::PathBuf;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    match cli.command {
        Some(Command::Fixtures(args)) => run_fixtures(&args, &mut std::io::stdout().lock()),
        Some(Command::Serve(args)) => run_server(cli.config, args).await,
        None => run_server(cli.config, ServeArgs::default()).await,
    }
}

/// Fixture data, with the tasks swapped for a generated set when requested.
fn initial_data(config: &Config) -> SeedData {
    let fixture = SeedData::fixture();
    if !config.seed.bulk_tasks {
        return fixture;
    }
    let tasks = generate_tasks(&config.seed.bulk_options(config.simulation.seed));
    info!("Seeding {} generated tasks", tasks.len());
    fixture.with_tasks(tasks)
}

/// Run the HTTP server until ctrl-c.
async fn run_server(config_path: Option<PathBuf>, args: ServeArgs) -> Result<()> {
    let loader = match config_path {
        Some(path) => ConfigLoader::load_with(&ConfigPaths::explicit(path), &ProcessEnv)?,
        None => ConfigLoader::load()?,
    };
    for source in loader.sources() {
        info!("Config: {}", source.display());
    }
    let mut config = loader.into_config();
    args.apply(&mut config);

    info!("Starting mock task API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Latency: {}, faults: {}, seed: {:?}",
        if config.simulation.latency { "on" } else { "off" },
        if config.simulation.faults { "on" } else { "off" },
        config.simulation.seed
    );
    for group in RouteGroup::ALL {
        let profile = config.simulation.groups.get(group);
        debug!(
            group = group.as_str(),
            min_delay_ms = profile.min_delay_ms,
            max_delay_ms = profile.max_delay_ms,
            error_rate = ?profile.error_rate,
            "Route group profile"
        );
    }

    let store = Store::new(initial_data(&config));
    let state = AppState::from_config(&config, store);
    let handle = start_server(state, config.server.addr()).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received ctrl-c");
    handle.shutdown().await;

    Ok(())
}

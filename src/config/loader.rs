//! Configuration loader with tier-based merging.
//!
//! Tiers, lowest to highest priority:
//! 1. Built-in defaults
//! 2. User config (`<config dir>/mock-task-api/config.yaml`)
//! 3. Project config (`./mock-api.yaml`)
//! 4. Environment variables
//!
//! An explicit path (`--config` or `MOCK_API_CONFIG`) replaces tiers 2 and 3.
//! CLI flags are applied by the binary on top of the result.

use super::types::{Config, ConfigError};
use serde_json::Value;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "mock-api.yaml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MOCK_API_CONFIG";

/// Candidate config file locations.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Explicit file; when set, no other file is read.
    pub explicit: Option<PathBuf>,
    /// Project-level file.
    pub project_file: Option<PathBuf>,
    /// User-level file.
    pub user_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover paths from the environment and platform conventions.
    pub fn discover() -> Self {
        Self {
            explicit: std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
            project_file: Some(PathBuf::from(PROJECT_CONFIG_FILE)),
            user_file: dirs::config_dir().map(|d| d.join("mock-task-api").join("config.yaml")),
        }
    }

    /// Only read `path`.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Source of environment values. Abstracted so tests need not touch the
/// process environment.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Loaded configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load from discovered paths and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&ConfigPaths::discover(), &ProcessEnv)
    }

    /// Load from explicit paths and environment source.
    pub fn load_with(paths: &ConfigPaths, env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let mut layers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = Vec::new();

        let files: Vec<&PathBuf> = match &paths.explicit {
            Some(path) => vec![path],
            None => paths
                .user_file
                .iter()
                .chain(paths.project_file.iter())
                .filter(|p| p.exists())
                .collect(),
        };

        for path in files {
            layers.push(read_yaml(path)?);
            sources.push(path.clone());
            debug!(path = %path.display(), "Loaded config file");
        }

        let merged = layers.into_iter().reduce(merge_layers).unwrap_or(Value::Null);
        let mut config: Config = serde_json::from_value(merged)?;
        apply_env_overrides(&mut config, env)?;
        config.validate()?;

        Ok(Self { config, sources })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Files that contributed, lowest priority first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    // An empty file parses as null; treat it as "no overrides".
    Ok(if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    })
}

/// Merge `overlay` into `base` key by key. Non-object values, including an
/// explicit null, replace the base value.
pub fn merge_layers(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_layers(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

fn parse_env<T: std::str::FromStr>(
    env: &dyn EnvSource,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env.var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
    }
}

fn env_flag(env: &dyn EnvSource, name: &str) -> bool {
    env.var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Apply `PORT`, `MOCK_API_HOST`, `MOCK_API_SEED`, `MOCK_API_NO_LATENCY` and
/// `MOCK_API_NO_FAULTS`.
fn apply_env_overrides(config: &mut Config, env: &dyn EnvSource) -> Result<(), ConfigError> {
    if let Some(port) = parse_env::<u16>(env, "PORT")? {
        config.server.port = port;
    }
    if let Some(host) = parse_env::<IpAddr>(env, "MOCK_API_HOST")? {
        config.server.host = host;
    }
    if let Some(seed) = parse_env::<u64>(env, "MOCK_API_SEED")? {
        config.simulation.seed = Some(seed);
    }
    if env_flag(env, "MOCK_API_NO_LATENCY") {
        config.simulation.latency = false;
    }
    if env_flag(env, "MOCK_API_NO_FAULTS") {
        config.simulation.faults = false;
    }
    Ok(())
}

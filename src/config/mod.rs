//! Server configuration.
//!
//! Built-in defaults are overlaid with YAML files and then environment
//! variables. See [`loader`] for the tier order.
//!
//! ## Environment Variables
//! - `MOCK_API_CONFIG` - Explicit config file (overrides file discovery)
//! - `PORT` - Listen port
//! - `MOCK_API_HOST` - Listen address
//! - `MOCK_API_SEED` - Seed for latency and fault draws
//! - `MOCK_API_NO_LATENCY` - Disable artificial latency
//! - `MOCK_API_NO_FAULTS` - Disable synthetic errors

mod loader;
mod types;

pub use loader::{
    CONFIG_PATH_ENV, ConfigLoader, ConfigPaths, EnvSource, PROJECT_CONFIG_FILE, ProcessEnv,
    merge_layers,
};
pub use types::*;

//! Configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::fault::{FaultProfile, FaultProfileError};
use crate::seed::BulkTaskOptions;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

impl Config {
    /// Check every fault profile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for group in RouteGroup::ALL {
            self.simulation
                .groups
                .get(group)
                .validate()
                .map_err(|source| ConfigError::InvalidProfile { group, source })?;
        }
        Ok(())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to bind (default: 3001).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Latency and fault injection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Apply artificial latency (default: true).
    #[serde(default = "default_true")]
    pub latency: bool,

    /// Inject synthetic errors (default: true).
    #[serde(default = "default_true")]
    pub faults: bool,

    /// Seed for the random source. Unset draws from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Per-group delay range and error rate.
    #[serde(default)]
    pub groups: GroupProfiles,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency: true,
            faults: true,
            seed: None,
            groups: GroupProfiles::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Route groups mounted under `/api`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    Users,
    Projects,
    Tasks,
    Comments,
    Activity,
    Metrics,
    Search,
}

impl RouteGroup {
    pub const ALL: [RouteGroup; 7] = [
        RouteGroup::Users,
        RouteGroup::Projects,
        RouteGroup::Tasks,
        RouteGroup::Comments,
        RouteGroup::Activity,
        RouteGroup::Metrics,
        RouteGroup::Search,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteGroup::Users => "users",
            RouteGroup::Projects => "projects",
            RouteGroup::Tasks => "tasks",
            RouteGroup::Comments => "comments",
            RouteGroup::Activity => "activity",
            RouteGroup::Metrics => "metrics",
            RouteGroup::Search => "search",
        }
    }

    /// Mount path, e.g. `/api/tasks`.
    pub fn path(&self) -> String {
        format!("/api/{}", self.as_str())
    }
}

impl fmt::Display for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fault profile for every route group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupProfiles {
    #[serde(default = "default_users")]
    pub users: FaultProfile,
    #[serde(default = "default_projects")]
    pub projects: FaultProfile,
    #[serde(default = "default_tasks")]
    pub tasks: FaultProfile,
    #[serde(default = "default_comments")]
    pub comments: FaultProfile,
    #[serde(default = "default_activity")]
    pub activity: FaultProfile,
    #[serde(default = "default_metrics")]
    pub metrics: FaultProfile,
    #[serde(default = "default_search")]
    pub search: FaultProfile,
}

impl GroupProfiles {
    pub fn get(&self, group: RouteGroup) -> &FaultProfile {
        match group {
            RouteGroup::Users => &self.users,
            RouteGroup::Projects => &self.projects,
            RouteGroup::Tasks => &self.tasks,
            RouteGroup::Comments => &self.comments,
            RouteGroup::Activity => &self.activity,
            RouteGroup::Metrics => &self.metrics,
            RouteGroup::Search => &self.search,
        }
    }

    pub fn get_mut(&mut self, group: RouteGroup) -> &mut FaultProfile {
        match group {
            RouteGroup::Users => &mut self.users,
            RouteGroup::Projects => &mut self.projects,
            RouteGroup::Tasks => &mut self.tasks,
            RouteGroup::Comments => &mut self.comments,
            RouteGroup::Activity => &mut self.activity,
            RouteGroup::Metrics => &mut self.metrics,
            RouteGroup::Search => &mut self.search,
        }
    }

    /// Same profile for every group.
    pub fn uniform(profile: FaultProfile) -> Self {
        Self {
            users: profile,
            projects: profile,
            tasks: profile,
            comments: profile,
            activity: profile,
            metrics: profile,
            search: profile,
        }
    }
}

impl Default for GroupProfiles {
    fn default() -> Self {
        Self {
            users: default_users(),
            projects: default_projects(),
            tasks: default_tasks(),
            comments: default_comments(),
            activity: default_activity(),
            metrics: default_metrics(),
            search: default_search(),
        }
    }
}

fn default_users() -> FaultProfile {
    FaultProfile::new(2000, 5000, None)
}

fn default_projects() -> FaultProfile {
    FaultProfile::new(1000, 2500, None)
}

fn default_tasks() -> FaultProfile {
    FaultProfile::new(2000, 5000, Some(0.05))
}

fn default_comments() -> FaultProfile {
    FaultProfile::new(1000, 2500, Some(0.03))
}

fn default_activity() -> FaultProfile {
    FaultProfile::new(1000, 2500, Some(0.02))
}

fn default_metrics() -> FaultProfile {
    FaultProfile::new(1000, 2500, Some(0.01))
}

fn default_search() -> FaultProfile {
    FaultProfile::new(2000, 5000, Some(0.02))
}

/// Seed data selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Replace the hand-seeded tasks with a generated set (default: false).
    #[serde(default)]
    pub bulk_tasks: bool,

    /// Projects to spread generated tasks over (default: 5).
    #[serde(default = "default_bulk_projects")]
    pub bulk_projects: i64,

    /// Generated tasks per project (default: 50).
    #[serde(default = "default_bulk_tasks_per_project")]
    pub bulk_tasks_per_project: usize,
}

impl SeedConfig {
    pub fn bulk_options(&self, seed: Option<u64>) -> BulkTaskOptions {
        BulkTaskOptions {
            project_count: self.bulk_projects,
            tasks_per_project: self.bulk_tasks_per_project,
            seed,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            bulk_tasks: false,
            bulk_projects: default_bulk_projects(),
            bulk_tasks_per_project: default_bulk_tasks_per_project(),
        }
    }
}

fn default_bulk_projects() -> i64 {
    5
}

fn default_bulk_tasks_per_project() -> usize {
    50
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid merged configuration: {0}")]
    Merge(#[from] serde_json::Error),

    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("invalid fault profile for group '{group}': {source}")]
    InvalidProfile {
        group: RouteGroup,
        #[source]
        source: FaultProfileError,
    },
}

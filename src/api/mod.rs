//! HTTP API.
//!
//! Each resource group is mounted under `/api/<group>` and wrapped in the
//! group's latency and fault middleware. `/health` sits outside the groups
//! and is never delayed.

pub mod activity;
pub mod body;
pub mod comments;
pub mod metrics;
pub mod params;
pub mod projects;
pub mod search;
mod server;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use crate::config::{Config, GroupProfiles, RouteGroup};
use crate::fault::{FaultInjector, GroupFaults};
use crate::store::Store;

pub use server::{ServerHandle, build_router, start_server};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub injector: Arc<FaultInjector>,
    pub groups: GroupProfiles,
}

impl AppState {
    pub fn new(store: Store, injector: FaultInjector, groups: GroupProfiles) -> Self {
        Self {
            store,
            injector: Arc::new(injector),
            groups,
        }
    }

    /// State wired from the simulation section of `config`.
    pub fn from_config(config: &Config, store: Store) -> Self {
        let sim = &config.simulation;
        Self::new(
            store,
            FaultInjector::new(sim.seed, sim.latency, sim.faults),
            sim.groups.clone(),
        )
    }

    /// State with latency and faults switched off.
    pub fn without_faults(store: Store) -> Self {
        Self::new(store, FaultInjector::disabled(), GroupProfiles::default())
    }

    /// Middleware state for one group.
    pub fn group_faults(&self, group: RouteGroup) -> GroupFaults {
        GroupFaults::new(
            group.as_str(),
            *self.groups.get(group),
            Arc::clone(&self.injector),
        )
    }
}

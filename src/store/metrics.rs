//! Metrics.
//!
//! The collection view is recomputed from live data on every read, while the
//! by-name lookup serves the static rows seeded at startup. Clients polling
//! both see the "fresh vs stale" contrast.

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::types::{EntityKind, Metric, TaskStatus};

impl Store {
    /// Live metrics: total tasks, completed tasks, projects, in-progress tasks.
    pub fn live_metrics(&self) -> Vec<Metric> {
        self.with_data(|data| {
            let count_status = |status: TaskStatus| {
                data.tasks.iter().filter(|t| t.status == status).count() as i64
            };
            let metric = |id, name: &str, value| Metric {
                id,
                name: name.to_string(),
                value,
            };
            vec![
                metric(1, "total_tasks", data.tasks.len() as i64),
                metric(2, "completed_tasks", count_status(TaskStatus::Completed)),
                metric(3, "active_projects", data.projects.len() as i64),
                metric(4, "in_progress_tasks", count_status(TaskStatus::InProgress)),
            ]
        })
    }

    /// Stored metric row by name.
    pub fn get_metric(&self, name: &str) -> ApiResult<Metric> {
        self.with_data(|data| {
            data.metrics
                .iter()
                .find(|m| m.name == name)
                .cloned()
                .ok_or_else(|| ApiError::not_found(EntityKind::Metric))
        })
    }
}

//! In-memory entity store.
//!
//! All six collections and their id counters live behind one mutex. Every
//! store method performs its whole read-validate-mutate sequence inside a
//! single lock acquisition, so id assignment and the push of the new row can
//! never interleave with another request's mutation. The lock is never held
//! across an `.await`.

pub mod activity;
pub mod comments;
pub mod metrics;
pub mod projects;
pub mod search;
pub mod tasks;
pub mod users;

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{ApiError, ApiResult};
use crate::seed::SeedData;
use crate::types::{ActivityEntry, Comment, EntityKind, Metric, Project, Task, User, now};

/// Per-kind monotonic id counters. Each field holds the next id to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCounters {
    pub user: i64,
    pub project: i64,
    pub task: i64,
    pub comment: i64,
    pub activity: i64,
    pub metric: i64,
}

impl IdCounters {
    /// Start every counter one above the highest seeded id of its kind.
    pub fn after(seed: &SeedData) -> Self {
        fn next<T>(items: &[T], id: impl Fn(&T) -> i64) -> i64 {
            items.iter().map(id).max().unwrap_or(0) + 1
        }
        Self {
            user: next(&seed.users, |u| u.id),
            project: next(&seed.projects, |p| p.id),
            task: next(&seed.tasks, |t| t.id),
            comment: next(&seed.comments, |c| c.id),
            activity: next(&seed.activity, |a| a.id),
            metric: next(&seed.metrics, |m| m.id),
        }
    }

    fn slot(&mut self, kind: EntityKind) -> &mut i64 {
        match kind {
            EntityKind::User => &mut self.user,
            EntityKind::Project => &mut self.project,
            EntityKind::Task => &mut self.task,
            EntityKind::Comment => &mut self.comment,
            EntityKind::Activity => &mut self.activity,
            EntityKind::Metric => &mut self.metric,
        }
    }

    /// Hand out the next id for `kind` and advance the counter.
    pub fn next_id(&mut self, kind: EntityKind) -> i64 {
        let slot = self.slot(kind);
        let id = *slot;
        *slot += 1;
        id
    }
}

/// The collections guarded by the store lock.
#[derive(Debug, Clone)]
pub struct Collections {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub comments: Vec<Comment>,
    pub activity: Vec<ActivityEntry>,
    pub metrics: Vec<Metric>,
    pub counters: IdCounters,
}

impl Collections {
    pub fn from_seed(seed: SeedData) -> Self {
        let counters = IdCounters::after(&seed);
        Self {
            users: seed.users,
            projects: seed.projects,
            tasks: seed.tasks,
            comments: seed.comments,
            activity: seed.activity,
            metrics: seed.metrics,
            counters,
        }
    }

    pub(crate) fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub(crate) fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub(crate) fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn require_user(&self, id: i64) -> ApiResult<&User> {
        self.user(id).ok_or_else(|| ApiError::not_found(EntityKind::User))
    }

    pub(crate) fn require_project(&self, id: i64) -> ApiResult<&Project> {
        self.project(id)
            .ok_or_else(|| ApiError::not_found(EntityKind::Project))
    }

    pub(crate) fn require_task(&self, id: i64) -> ApiResult<&Task> {
        self.task(id).ok_or_else(|| ApiError::not_found(EntityKind::Task))
    }

    /// Append an activity entry stamped with the current time.
    pub(crate) fn record_activity(&mut self, kind: &str, message: String) -> ActivityEntry {
        let entry = ActivityEntry {
            id: self.counters.next_id(EntityKind::Activity),
            kind: kind.to_string(),
            message,
            created_at: now(),
        };
        self.activity.push(entry.clone());
        entry
    }

    /// Remove every task of `project_id` and every comment on those tasks.
    /// Returns the ids of the removed tasks.
    pub(crate) fn remove_tasks_of_project(&mut self, project_id: i64) -> Vec<i64> {
        let task_ids: Vec<i64> = self
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(|t| t.id)
            .collect();
        self.tasks.retain(|t| t.project_id != project_id);
        self.comments.retain(|c| !task_ids.contains(&c.task_id));
        task_ids
    }
}

/// Store handle. Cloning shares the same collections.
#[derive(Clone)]
pub struct Store {
    data: Arc<Mutex<Collections>>,
}

impl Store {
    /// Build a store from seed data; counters start above the seeded ids.
    pub fn new(seed: SeedData) -> Self {
        Self {
            data: Arc::new(Mutex::new(Collections::from_seed(seed))),
        }
    }

    /// Store populated with the standard fixture.
    pub fn seeded() -> Self {
        Self::new(SeedData::fixture())
    }

    /// Store with no rows at all.
    pub fn empty() -> Self {
        Self::new(SeedData::default())
    }

    /// Replace every collection and counter.
    pub fn reset(&self, seed: SeedData) {
        self.with_data_mut(|data| *data = Collections::from_seed(seed));
    }

    /// Run `f` with shared access to the collections.
    pub fn with_data<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Collections) -> T,
    {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        f(&data)
    }

    /// Run `f` with exclusive access to the collections.
    pub fn with_data_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Collections) -> T,
    {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut data)
    }

    /// Hand out the next id for `kind`.
    pub fn next_id(&self, kind: EntityKind) -> i64 {
        self.with_data_mut(|data| data.counters.next_id(kind))
    }

    /// 404 unless a `kind` row with `id` exists.
    ///
    /// Handlers call this to answer "not found" before reading the request
    /// body. The mutating call that follows checks again under its own lock.
    pub fn ensure_exists(&self, kind: EntityKind, id: i64) -> ApiResult<()> {
        self.with_data(|data| {
            let found = match kind {
                EntityKind::User => data.user(id).is_some(),
                EntityKind::Project => data.project(id).is_some(),
                EntityKind::Task => data.task(id).is_some(),
                EntityKind::Comment => data.comments.iter().any(|c| c.id == id),
                EntityKind::Activity => data.activity.iter().any(|a| a.id == id),
                EntityKind::Metric => data.metrics.iter().any(|m| m.id == id),
            };
            if found {
                Ok(())
            } else {
                Err(ApiError::not_found(kind))
            }
        })
    }

    /// Copy of the current collections.
    pub fn snapshot(&self) -> Collections {
        self.with_data(Collections::clone)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded()
    }
}

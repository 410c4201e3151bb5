//! Core entity types served by the mock API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kinds with their own id counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Project,
    Task,
    Comment,
    Activity,
    Metric,
}

impl EntityKind {
    /// Human-readable name used in "<Kind> not found" messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Project => "Project",
            EntityKind::Task => "Task",
            EntityKind::Comment => "Comment",
            EntityKind::Activity => "Activity",
            EntityKind::Metric => "Metric",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub owner_id: Option<i64>,
}

/// Project annotated with the live number of tasks referencing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithTaskCount {
    #[serde(flatten)]
    pub project: Project,
    pub task_count: usize,
}

/// Task workflow status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// Parse a wire status. Matching is exact (case-sensitive).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Comma-separated list of valid statuses, for error messages.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub assignee_id: Option<i64>,
}

/// Task with its relations inlined (`?include=all`).
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub project: Option<Project>,
    pub assignee: Option<User>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub task_id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
}

/// Activity entry types emitted by mutations.
pub mod activity_type {
    pub const TASK_CREATED: &str = "task_created";
    pub const TASK_UPDATED: &str = "task_updated";
    pub const TASK_COMPLETED: &str = "task_completed";
    pub const COMMENT_ADDED: &str = "comment_added";
    pub const PROJECT_CREATED: &str = "project_created";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub name: String,
    pub value: i64,
}

/// Validated input for creating a project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub owner_id: Option<i64>,
}

/// Validated partial update for a project. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<i64>,
}

/// Validated input for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub assignee_id: Option<i64>,
}

/// Validated partial update for a task.
///
/// `assignee_id` is doubly optional: `Some(None)` clears the assignee.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<Option<i64>>,
    pub project_id: Option<i64>,
}

/// Validated input for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub task_id: i64,
    pub user_id: i64,
    pub content: String,
}

/// Filters for the task listing.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub project_id: Option<i64>,
}

/// Which collections a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchScope {
    pub tasks: bool,
    pub projects: bool,
    pub users: bool,
}

impl SearchScope {
    pub const ALL: SearchScope = SearchScope {
        tasks: true,
        projects: true,
        users: true,
    };

    /// Resolve the `type` query parameter. Unknown values search nothing.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.filter(|s| !s.is_empty()) {
            None | Some("all") => Self::ALL,
            Some("tasks") => Self {
                tasks: true,
                projects: false,
                users: false,
            },
            Some("projects") => Self {
                tasks: false,
                projects: true,
                users: false,
            },
            Some("users") => Self {
                tasks: false,
                projects: false,
                users: true,
            },
            Some(_) => Self {
                tasks: false,
                projects: false,
                users: false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub users: Vec<User>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.tasks.len() + self.projects.len() + self.users.len()
    }
}

/// Current time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Millisecond-precision UTC timestamp (`2024-01-01T12:00:00.000Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for millisecond-precision ISO-8601 timestamps.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

//! Seed data for the in-memory store.
//!
//! The hand-seeded fixture is what the server serves by default. Timestamps
//! are relative to the moment the fixture is built, so the newest comment is
//! always "an hour ago" after a restart.
//!
//! [`generate_tasks`] builds a large random task set for exercising
//! pagination; it is only used when explicitly requested.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{
    ActivityEntry, Comment, Metric, Project, Task, TaskStatus, User, activity_type, now,
};

/// Complete contents for a fresh store.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub comments: Vec<Comment>,
    pub activity: Vec<ActivityEntry>,
    pub metrics: Vec<Metric>,
}

impl SeedData {
    /// The standard hand-seeded fixture.
    pub fn fixture() -> Self {
        Self::fixture_at(now())
    }

    /// The standard fixture with timestamps relative to `at`.
    pub fn fixture_at(at: DateTime<Utc>) -> Self {
        Self {
            users: seed_users(),
            projects: seed_projects(),
            tasks: seed_tasks(),
            comments: seed_comments(at),
            activity: seed_activity(at),
            metrics: seed_metrics(),
        }
    }

    /// Replace the hand-seeded tasks with a generated set.
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
    }
}

fn seed_users() -> Vec<User> {
    vec![
        user(1, "Alice Johnson"),
        user(2, "Bob Smith"),
        user(3, "Charlie Brown"),
    ]
}

fn project(id: i64, name: &str, description: &str, owner_id: i64) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: description.to_string(),
        owner_id: Some(owner_id),
    }
}

fn seed_projects() -> Vec<Project> {
    vec![
        project(
            1,
            "E-commerce Platform",
            "Building a modern online shopping experience",
            1,
        ),
        project(
            2,
            "Mobile App",
            "iOS and Android app for customer engagement",
            2,
        ),
        project(
            3,
            "Dashboard Analytics",
            "Real-time analytics and reporting dashboard",
            1,
        ),
    ]
}

fn task(id: i64, project_id: i64, title: &str, status: TaskStatus, assignee_id: Option<i64>) -> Task {
    Task {
        id,
        project_id,
        title: title.to_string(),
        status,
        assignee_id,
    }
}

fn seed_tasks() -> Vec<Task> {
    use TaskStatus::*;
    vec![
        task(1, 1, "Design user authentication flow", InProgress, Some(1)),
        task(2, 1, "Implement shopping cart", Todo, Some(2)),
        task(3, 1, "Add payment integration", Todo, None),
        task(4, 2, "Create app icon", Completed, Some(3)),
        task(5, 2, "Setup push notifications", InProgress, Some(2)),
        task(6, 3, "Build data visualization charts", InProgress, Some(1)),
    ]
}

fn seed_comments(at: DateTime<Utc>) -> Vec<Comment> {
    let comment = |id, task_id, user_id, content: &str, age: Duration| Comment {
        id,
        task_id,
        user_id,
        content: content.to_string(),
        created_at: at - age,
    };
    vec![
        comment(1, 1, 1, "Started working on the authentication flow", Duration::days(2)),
        comment(2, 1, 2, "Looking good! Can we add 2FA?", Duration::days(1)),
        comment(3, 2, 2, "Need to review the cart requirements", Duration::hours(3)),
        comment(4, 5, 3, "Push notifications are working in development", Duration::hours(1)),
    ]
}

fn seed_activity(at: DateTime<Utc>) -> Vec<ActivityEntry> {
    let entry = |id, kind: &str, message: &str, age: Duration| ActivityEntry {
        id,
        kind: kind.to_string(),
        message: message.to_string(),
        created_at: at - age,
    };
    vec![
        entry(
            1,
            activity_type::TASK_CREATED,
            "Task 'Design user authentication flow' was created",
            Duration::days(5),
        ),
        entry(
            2,
            activity_type::TASK_UPDATED,
            "Task 'Design user authentication flow' status changed to in-progress",
            Duration::days(2),
        ),
        entry(
            3,
            activity_type::COMMENT_ADDED,
            "New comment on task 'Design user authentication flow'",
            Duration::days(1),
        ),
        entry(
            4,
            activity_type::TASK_COMPLETED,
            "Task 'Create app icon' was completed",
            Duration::days(3),
        ),
        entry(
            5,
            activity_type::PROJECT_CREATED,
            "Project 'E-commerce Platform' was created",
            Duration::days(10),
        ),
        entry(
            6,
            activity_type::TASK_CREATED,
            "Task 'Implement shopping cart' was created",
            Duration::days(4),
        ),
        entry(
            7,
            activity_type::TASK_UPDATED,
            "Task 'Setup push notifications' status changed to in-progress",
            // Logged just after entry 3.
            Duration::days(1) - Duration::milliseconds(1),
        ),
    ]
}

fn seed_metrics() -> Vec<Metric> {
    let metric = |id, name: &str, value| Metric {
        id,
        name: name.to_string(),
        value,
    };
    vec![
        metric(1, "total_tasks", 6),
        metric(2, "completed_tasks", 1),
        metric(3, "active_projects", 3),
    ]
}

const BULK_TITLES: [&str; 10] = [
    "Design login screen",
    "Implement API integration",
    "Fix UI bugs",
    "Write unit tests",
    "Add dark mode",
    "Optimize images",
    "Setup CI/CD pipeline",
    "Refactor legacy code",
    "Build notification system",
    "Improve performance metrics",
];

const BULK_STATUSES: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

/// Parameters for the bulk task generator.
#[derive(Debug, Clone, Copy)]
pub struct BulkTaskOptions {
    pub project_count: i64,
    pub tasks_per_project: usize,
    pub seed: Option<u64>,
}

impl Default for BulkTaskOptions {
    fn default() -> Self {
        Self {
            project_count: 5,
            tasks_per_project: 50,
            seed: None,
        }
    }
}

/// Generate `project_count * tasks_per_project` tasks with sequential ids.
///
/// Titles are drawn from a fixed list and suffixed with `#<n>`, statuses from
/// todo/in-progress/completed, and 80% of tasks get an assignee in `1..=5`.
pub fn generate_tasks(options: &BulkTaskOptions) -> Vec<Task> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut tasks = Vec::with_capacity(options.project_count.max(0) as usize * options.tasks_per_project);
    let mut id = 1;

    for project_id in 1..=options.project_count {
        for i in 0..options.tasks_per_project {
            let title = BULK_TITLES[rng.random_range(0..BULK_TITLES.len())];
            let status = BULK_STATUSES[rng.random_range(0..BULK_STATUSES.len())];
            let assignee_id = if rng.random::<f64>() < 0.8 {
                Some(rng.random_range(1..=5))
            } else {
                None
            };

            tasks.push(Task {
                id,
                project_id,
                title: format!("{} #{}", title, i + 1),
                status,
                assignee_id,
            });
            id += 1;
        }
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_counts() {
        let seed = SeedData::fixture();
        assert_eq!(seed.users.len(), 3);
        assert_eq!(seed.projects.len(), 3);
        assert_eq!(seed.tasks.len(), 6);
        assert_eq!(seed.comments.len(), 4);
        assert_eq!(seed.activity.len(), 7);
        assert_eq!(seed.metrics.len(), 3);
    }

    #[test]
    fn test_fixture_timestamps_are_relative() {
        let at = now();
        let seed = SeedData::fixture_at(at);
        assert_eq!(seed.comments[3].created_at, at - Duration::hours(1));
        assert_eq!(seed.activity[4].created_at, at - Duration::days(10));
    }

    #[test]
    fn test_later_activity_is_never_older() {
        let seed = SeedData::fixture();
        assert!(seed.activity[6].created_at > seed.activity[2].created_at);
    }

    #[test]
    fn test_generate_tasks_shape() {
        let options = BulkTaskOptions {
            project_count: 3,
            tasks_per_project: 4,
            seed: Some(5),
        };
        let tasks = generate_tasks(&options);
        assert_eq!(tasks.len(), 12);
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());
        assert!(tasks[..4].iter().all(|t| t.project_id == 1));
        assert!(tasks[8..].iter().all(|t| t.project_id == 3));
        assert!(tasks[5].title.ends_with(" #2"));
        for task in &tasks {
            assert_ne!(task.status, TaskStatus::Blocked);
            if let Some(assignee) = task.assignee_id {
                assert!((1..=5).contains(&assignee));
            }
        }
    }

    #[test]
    fn test_generate_tasks_seeded_is_reproducible() {
        let options = BulkTaskOptions {
            seed: Some(99),
            ..BulkTaskOptions::default()
        };
        assert_eq!(generate_tasks(&options), generate_tasks(&options));
        assert_eq!(generate_tasks(&options).len(), 250);
    }
}

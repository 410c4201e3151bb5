//! Task operations.

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{Page, paginate};
use crate::types::{EntityKind, NewTask, Task, TaskDetail, TaskFilter, TaskPatch, activity_type};
use tracing::debug;

impl Store {
    /// Filter tasks by status and project (AND), then slice one offset page.
    pub fn list_tasks(&self, filter: &TaskFilter, page: usize, limit: usize) -> Page<Task> {
        self.with_data(|data| {
            let filtered: Vec<Task> = data
                .tasks
                .iter()
                .filter(|t| {
                    filter
                        .status
                        .as_deref()
                        .is_none_or(|status| t.status.as_str() == status)
                })
                .filter(|t| filter.project_id.is_none_or(|id| t.project_id == id))
                .cloned()
                .collect();
            paginate(&filtered, page, limit)
        })
    }

    pub fn get_task(&self, id: i64) -> ApiResult<Task> {
        self.with_data(|data| data.require_task(id).cloned())
    }

    /// Task with owning project, resolved assignee and its comments inlined.
    pub fn get_task_detail(&self, id: i64) -> ApiResult<TaskDetail> {
        self.with_data(|data| {
            let task = data.require_task(id)?.clone();
            let project = data.project(task.project_id).cloned();
            let assignee = task
                .assignee_id
                .filter(|&id| id != 0)
                .and_then(|id| data.user(id).cloned());
            let comments = data
                .comments
                .iter()
                .filter(|c| c.task_id == task.id)
                .cloned()
                .collect();
            Ok(TaskDetail {
                task,
                project,
                assignee,
                comments,
            })
        })
    }

    /// Create a task in an existing project and log `task_created`.
    pub fn create_task(&self, input: NewTask) -> ApiResult<Task> {
        self.with_data_mut(|data| {
            data.require_project(input.project_id)?;
            let task = Task {
                id: data.counters.next_id(EntityKind::Task),
                project_id: input.project_id,
                title: input.title,
                status: input.status,
                assignee_id: input.assignee_id,
            };
            data.tasks.push(task.clone());
            data.record_activity(
                activity_type::TASK_CREATED,
                format!("Task '{}' was created", task.title),
            );
            Ok(task)
        })
    }

    /// Apply a partial update.
    ///
    /// The target project is checked before anything changes, so a failed
    /// update leaves the task untouched. A `task_updated` entry is logged only
    /// when the status actually changes.
    pub fn update_task(&self, id: i64, patch: TaskPatch) -> ApiResult<Task> {
        self.with_data_mut(|data| {
            let index = data
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| ApiError::not_found(EntityKind::Task))?;
            if let Some(project_id) = patch.project_id {
                data.require_project(project_id)?;
            }

            let task = &mut data.tasks[index];
            if let Some(title) = patch.title {
                task.title = title;
            }
            let mut status_change = None;
            if let Some(status) = patch.status {
                if task.status != status {
                    status_change = Some((task.status, status));
                }
                task.status = status;
            }
            if let Some(assignee_id) = patch.assignee_id {
                task.assignee_id = assignee_id;
            }
            if let Some(project_id) = patch.project_id {
                task.project_id = project_id;
            }
            let task = task.clone();

            if let Some((from, to)) = status_change {
                data.record_activity(
                    activity_type::TASK_UPDATED,
                    format!(
                        "Task '{}' status changed from {} to {}",
                        task.title, from, to
                    ),
                );
            }
            Ok(task)
        })
    }

    /// Delete a task and its comments.
    pub fn delete_task(&self, id: i64) -> ApiResult<()> {
        self.with_data_mut(|data| {
            data.require_task(id)?;
            let before = data.comments.len();
            data.comments.retain(|c| c.task_id != id);
            data.tasks.retain(|t| t.id != id);
            debug!(task_id = id, comments_removed = before - data.comments.len(), "Task deleted");
            Ok(())
        })
    }
}

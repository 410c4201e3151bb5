//! Project operations, including the task cascade on delete.

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{DEFAULT_LIMIT, total_pages};
use crate::types::{
    EntityKind, NewProject, Project, ProjectPatch, ProjectWithTaskCount, Task, activity_type,
};
use serde::Serialize;
use tracing::debug;

/// One page of a project's tasks (`/projects/:id/page-tasks`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTaskPage {
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub items: Vec<Task>,
}

impl Store {
    pub fn list_projects(&self) -> Vec<Project> {
        self.with_data(|data| data.projects.clone())
    }

    /// Projects annotated with the live count of tasks referencing each one.
    pub fn list_projects_with_task_counts(&self) -> Vec<ProjectWithTaskCount> {
        self.with_data(|data| {
            data.projects
                .iter()
                .map(|project| ProjectWithTaskCount {
                    project: project.clone(),
                    task_count: data
                        .tasks
                        .iter()
                        .filter(|t| t.project_id == project.id)
                        .count(),
                })
                .collect()
        })
    }

    /// Projects owned by `owner_id`. The owner's existence is not checked.
    pub fn list_projects_by_owner(&self, owner_id: i64) -> Vec<Project> {
        self.with_data(|data| {
            data.projects
                .iter()
                .filter(|p| p.owner_id == Some(owner_id))
                .cloned()
                .collect()
        })
    }

    pub fn get_project(&self, id: i64) -> ApiResult<Project> {
        self.with_data(|data| data.require_project(id).cloned())
    }

    /// All tasks of a project, in insertion order.
    pub fn list_project_tasks(&self, id: i64) -> ApiResult<Vec<Task>> {
        self.with_data(|data| {
            data.require_project(id)?;
            Ok(data
                .tasks
                .iter()
                .filter(|t| t.project_id == id)
                .cloned()
                .collect())
        })
    }

    /// One page of a project's tasks. A page past the end yields no items.
    pub fn page_project_tasks(&self, id: i64, page: usize, limit: usize) -> ApiResult<ProjectTaskPage> {
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        let tasks = self.list_project_tasks(id)?;
        let total_items = tasks.len();
        let total_pages = total_pages(total_items, limit);

        if page > total_pages && total_pages > 0 {
            return Ok(ProjectTaskPage {
                total_items,
                total_pages,
                current_page: page,
                items: Vec::new(),
            });
        }

        let start = page.saturating_sub(1).saturating_mul(limit).min(total_items);
        let end = start.saturating_add(limit).min(total_items);
        Ok(ProjectTaskPage {
            total_items,
            total_pages,
            current_page: page,
            items: tasks[start..end].to_vec(),
        })
    }

    pub fn create_project(&self, input: NewProject) -> ApiResult<Project> {
        self.with_data_mut(|data| {
            let project = Project {
                id: data.counters.next_id(EntityKind::Project),
                name: input.name,
                description: input.description,
                owner_id: input.owner_id,
            };
            data.projects.push(project.clone());
            data.record_activity(
                activity_type::PROJECT_CREATED,
                format!("Project '{}' was created", project.name),
            );
            Ok(project)
        })
    }

    pub fn update_project(&self, id: i64, patch: ProjectPatch) -> ApiResult<Project> {
        self.with_data_mut(|data| {
            let project = data
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| ApiError::not_found(EntityKind::Project))?;
            if let Some(name) = patch.name {
                project.name = name;
            }
            if let Some(description) = patch.description {
                project.description = description;
            }
            if let Some(owner_id) = patch.owner_id {
                project.owner_id = Some(owner_id);
            }
            Ok(project.clone())
        })
    }

    /// Delete a project together with its tasks and their comments.
    pub fn delete_project(&self, id: i64) -> ApiResult<()> {
        self.with_data_mut(|data| {
            data.require_project(id)?;
            let removed = data.remove_tasks_of_project(id);
            data.projects.retain(|p| p.id != id);
            debug!(project_id = id, tasks_removed = removed.len(), "Project deleted");
            Ok(())
        })
    }
}

//! `/api/projects`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use super::AppState;
use super::body::{JsonBody, as_integer, is_truthy, trimmed_string};
use super::params::{parse_int, path_id, strict_page};
use crate::error::{ApiError, ApiResult};
use crate::store::projects::ProjectTaskPage;
use crate::types::{EntityKind, NewProject, Project, ProjectPatch, Task};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/users/{user_id}", get(projects_by_owner))
        .route(
            "/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/{id}/tasks", get(project_tasks))
        .route("/{id}/page-tasks", get(page_project_tasks))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "includeTaskCount")]
    include_task_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

async fn list_projects(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    if query.include_task_count.as_deref() == Some("true") {
        Json(state.store.list_projects_with_task_counts()).into_response()
    } else {
        Json(state.store.list_projects()).into_response()
    }
}

/// Zero and unparseable ids answer "User not found" without consulting the
/// users collection.
async fn projects_by_owner(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Project>>> {
    let owner_id = parse_int(&user_id)
        .filter(|&id| id != 0)
        .ok_or_else(|| ApiError::not_found(EntityKind::User))?;
    Ok(Json(state.store.list_projects_by_owner(owner_id)))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    state.store.get_project(path_id(&id)).map(Json)
}

async fn project_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    state.store.list_project_tasks(path_id(&id)).map(Json)
}

async fn page_project_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ProjectTaskPage>> {
    let (page, limit) = strict_page(query.page.as_deref(), query.limit.as_deref())?;
    state
        .store
        .page_project_tasks(path_id(&id), page, limit)
        .map(Json)
}

/// Falsy descriptions become empty; anything else must be a string.
fn parse_description(value: &Value) -> ApiResult<String> {
    if !is_truthy(value) {
        return Ok(String::new());
    }
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| ApiError::invalid_value("description", "Description must be a string"))
}

fn parse_new_project(body: &JsonBody) -> ApiResult<NewProject> {
    let name = body
        .field("name")
        .and_then(trimmed_string)
        .ok_or_else(|| ApiError::missing_field("name", "Name is required"))?;

    // Falsy owners (absent, null, 0, "", false) mean "no owner".
    let owner_id = match body.truthy("ownerId") {
        Some(v) => Some(
            as_integer(v)
                .ok_or_else(|| ApiError::invalid_value("ownerId", "ownerId must be an integer"))?,
        ),
        None => None,
    };

    let description = body.field("description").map(parse_description).transpose()?;

    Ok(NewProject {
        name,
        description: description.unwrap_or_default(),
        owner_id,
    })
}

fn parse_project_patch(body: &JsonBody) -> ApiResult<ProjectPatch> {
    let name = body
        .field("name")
        .map(|v| {
            trimmed_string(v)
                .ok_or_else(|| ApiError::invalid_value("name", "Name must be a non-empty string"))
        })
        .transpose()?;
    let description = body.field("description").map(parse_description).transpose()?;
    let owner_id = body
        .field("ownerId")
        .map(|v| {
            as_integer(v)
                .ok_or_else(|| ApiError::invalid_value("ownerId", "ownerId must be an integer"))
        })
        .transpose()?;

    Ok(ProjectPatch {
        name,
        description,
        owner_id,
    })
}

async fn create_project(
    State(state): State<AppState>,
    body: JsonBody,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let input = parse_new_project(&body)?;
    let project = state.store.create_project(input)?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<Project>> {
    let id = path_id(&id);
    state.store.ensure_exists(EntityKind::Project, id)?;
    let patch = parse_project_patch(&body)?;
    state.store.update_project(id, patch).map(Json)
}

async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_project(path_id(&id))?;
    Ok(StatusCode::NO_CONTENT)
}

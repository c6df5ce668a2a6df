/// Task CRUD endpoints
///
/// All endpoints live under `/api/:user_id/tasks` and require a valid JWT.
/// Every handler runs the same two-step gate before touching data:
///
/// 1. The JWT middleware has already verified signature and expiry and put
///    the subject into [`AuthContext`].
/// 2. [`require_owner`] compares that subject byte-for-byte against the
///    `:user_id` path segment; a mismatch is a 403 and no query runs.
///
/// After the gate, the verified `user_id` scopes every query, so a task id
/// belonging to another user behaves exactly like a nonexistent id (404).
///
/// # Endpoints
///
/// - `GET    /api/:user_id/tasks` - List tasks (200)
/// - `POST   /api/:user_id/tasks` - Create task (201)
/// - `GET    /api/:user_id/tasks/:id` - Fetch one task (200)
/// - `PUT    /api/:user_id/tasks/:id` - Update task (200)
/// - `DELETE /api/:user_id/tasks/:id` - Delete task (204)
/// - `PATCH  /api/:user_id/tasks/:id/complete` - Toggle completion (200)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskflow_shared::{
    auth::{authorization::require_owner, middleware::AuthContext},
    models::task::{CreateTask, Task, UpdateTask},
};
use validator::Validate;

/// Request body for creating a task
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title (required, 1-200 characters)
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional description (up to 1000 characters)
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Request body for updating a task (partial update)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// New completion status
    pub is_completed: Option<bool>,
}

/// Flattens validator errors into a single detail message
fn validation_detail(errors: validator::ValidationErrors) -> ApiError {
    let detail = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    ApiError::ValidationError(detail)
}

/// Lists all tasks owned by the authenticated user, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    require_owner(&auth, &user_id)?;

    let tasks = Task::list_for_user(&state.db, &auth.user_id).await?;

    Ok(Json(tasks))
}

/// Creates a new task
///
/// The server is authoritative for the generated id, completion default and
/// timestamps; the confirmed entity is returned with 201.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    require_owner(&auth, &user_id)?;
    req.validate().map_err(validation_detail)?;

    let task = Task::create(
        &state.db,
        &auth.user_id,
        CreateTask {
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetches a single task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((user_id, id)): Path<(String, i64)>,
) -> ApiResult<Json<Task>> {
    require_owner(&auth, &user_id)?;

    let task = Task::find_by_id_and_user(&state.db, id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Updates a task (partial update, `null` fields unchanged)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((user_id, id)): Path<(String, i64)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    require_owner(&auth, &user_id)?;
    req.validate().map_err(validation_detail)?;

    let task = Task::update(
        &state.db,
        id,
        &auth.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            is_completed: req.is_completed,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task
///
/// Returns 204 with an empty body on success.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((user_id, id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    require_owner(&auth, &user_id)?;

    let deleted = Task::delete(&state.db, id, &auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Toggles the completion flag of a task
///
/// The flip happens in a single SQL statement, so toggling twice always
/// restores the original state regardless of client-side races.
pub async fn toggle_task_completed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((user_id, id)): Path<(String, i64)>,
) -> ApiResult<Json<Task>> {
    require_owner(&auth, &user_id)?;

    let task = Task::toggle_completed(&state.db, id, &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_boundary_lengths() {
        // Exactly 200 characters is accepted
        let at_limit = CreateTaskRequest {
            title: "a".repeat(200),
            description: None,
        };
        assert!(at_limit.validate().is_ok());

        // 201 characters is rejected
        let over_limit = CreateTaskRequest {
            title: "a".repeat(201),
            description: None,
        };
        assert!(over_limit.validate().is_err());

        // Empty title is rejected
        let empty = CreateTaskRequest {
            title: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_description_boundary_lengths() {
        let at_limit = CreateTaskRequest {
            title: "Buy milk".to_string(),
            description: Some("d".repeat(1000)),
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = CreateTaskRequest {
            title: "Buy milk".to_string(),
            description: Some("d".repeat(1001)),
        };
        assert!(over_limit.validate().is_err());
    }

    #[test]
    fn test_update_request_partial_fields() {
        // Empty update is valid at the validation layer
        assert!(UpdateTaskRequest::default().validate().is_ok());

        let title_only = UpdateTaskRequest {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(title_only.validate().is_ok());

        let bad_title = UpdateTaskRequest {
            title: Some("a".repeat(201)),
            ..Default::default()
        };
        assert!(bad_title.validate().is_err());
    }
}

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::domain::task::{
    ListTasksParams, Task, TaskPage, TaskService, TaskServiceApi, TaskServiceError, UpdateMode,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::http::JsonBody;

pub struct TaskController {
    task_service: Arc<TaskService>,
}

impl TaskController {
    pub fn new(task_service: Arc<TaskService>) -> Self {
        Self { task_service }
    }

    /// GET /tasks - List tasks, newest first
    pub async fn list_tasks(
        State(controller): State<Arc<TaskController>>,
        params: Result<Query<ListTasksParams>, QueryRejection>,
    ) -> AppResult<Json<TaskPage>> {
        let Query(params) = params?;
        let page = controller.task_service.list_tasks(&params).await?;
        Ok(Json(page))
    }

    /// POST /tasks - Create a task
    pub async fn create_task(
        State(controller): State<Arc<TaskController>>,
        body: Result<JsonBody, AppError>,
    ) -> AppResult<(StatusCode, Json<Task>)> {
        let JsonBody(body) = body?;
        let task = controller.task_service.create_task(&body).await?;
        Ok((StatusCode::CREATED, Json(task)))
    }

    /// GET /tasks/{id} - Get a single task
    pub async fn get_task(
        State(controller): State<Arc<TaskController>>,
        id: Result<Path<String>, PathRejection>,
    ) -> AppResult<Json<Task>> {
        let id = task_id(id?)?;
        let task = controller.task_service.get_task(id).await?;
        Ok(Json(task))
    }

    /// PUT /tasks/{id} - Replace a task
    pub async fn update_task(
        State(controller): State<Arc<TaskController>>,
        id: Result<Path<String>, PathRejection>,
        body: Result<JsonBody, AppError>,
    ) -> AppResult<Json<Task>> {
        let id = task_id(id?)?;
        let JsonBody(body) = body?;
        let task = controller
            .task_service
            .update_task(id, &body, UpdateMode::Full)
            .await?;
        Ok(Json(task))
    }

    /// PATCH /tasks/{id} - Update some fields of a task
    pub async fn partial_update_task(
        State(controller): State<Arc<TaskController>>,
        id: Result<Path<String>, PathRejection>,
        body: Result<JsonBody, AppError>,
    ) -> AppResult<Json<Task>> {
        let id = task_id(id?)?;
        let JsonBody(body) = body?;
        let task = controller
            .task_service
            .update_task(id, &body, UpdateMode::Partial)
            .await?;
        Ok(Json(task))
    }

    /// DELETE /tasks/{id} - Delete a task
    pub async fn delete_task(
        State(controller): State<Arc<TaskController>>,
        id: Result<Path<String>, PathRejection>,
    ) -> AppResult<StatusCode> {
        let id = task_id(id?)?;
        controller.task_service.delete_task(id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

/// Ids that are not integers can never match a stored task.
fn task_id(Path(raw): Path<String>) -> Result<i64, TaskServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| TaskServiceError::NotFound(raw))
}

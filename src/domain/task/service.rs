use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::dto::{ListTasksParams, TaskFilter, TaskPage, UpdateMode};
use super::error::TaskServiceError;
use super::model::Task;
use super::pagination::{page_number, total_pages, PaginationSettings};
use super::validation::{validate_new_task, validate_task_changes};
use crate::infrastructure::repositories::TaskRepository;

pub struct TaskService {
    task_repo: Arc<dyn TaskRepository>,
    pagination: PaginationSettings,
}

impl TaskService {
    pub fn new(task_repo: Arc<dyn TaskRepository>, pagination: PaginationSettings) -> Self {
        Self {
            task_repo,
            pagination,
        }
    }
}

#[async_trait]
pub trait TaskServiceApi: Send + Sync {
    async fn list_tasks(&self, params: &ListTasksParams) -> Result<TaskPage, TaskServiceError>;

    async fn get_task(&self, id: i64) -> Result<Task, TaskServiceError>;

    async fn create_task(&self, body: &Value) -> Result<Task, TaskServiceError>;

    async fn update_task(
        &self,
        id: i64,
        body: &Value,
        mode: UpdateMode,
    ) -> Result<Task, TaskServiceError>;

    async fn delete_task(&self, id: i64) -> Result<(), TaskServiceError>;
}

#[async_trait]
impl TaskServiceApi for TaskService {
    async fn list_tasks(&self, params: &ListTasksParams) -> Result<TaskPage, TaskServiceError> {
        let filter = TaskFilter::from_params(params);
        let page_size = self.pagination.page_size(params.page_size.as_deref());

        let count = self.task_repo.count(&filter).await?;
        let total_pages = total_pages(count, page_size);
        let current_page = page_number(params.page.as_deref(), total_pages)?;

        let tasks = self
            .task_repo
            .list(&filter, page_size, (current_page - 1) * page_size)
            .await?;

        Ok(TaskPage {
            current_page,
            total_pages,
            page_size,
            tasks,
        })
    }

    async fn get_task(&self, id: i64) -> Result<Task, TaskServiceError> {
        self.task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskServiceError::not_found(id))
    }

    async fn create_task(&self, body: &Value) -> Result<Task, TaskServiceError> {
        let new_task = validate_new_task(body).map_err(TaskServiceError::Invalid)?;

        let task = self.task_repo.create(&new_task).await?;
        tracing::info!(task_id = task.id, "Task created");

        Ok(task)
    }

    async fn update_task(
        &self,
        id: i64,
        body: &Value,
        mode: UpdateMode,
    ) -> Result<Task, TaskServiceError> {
        // unknown ids win over invalid bodies
        self.get_task(id).await?;

        let changes = validate_task_changes(body, mode).map_err(TaskServiceError::Invalid)?;

        let task = self
            .task_repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| TaskServiceError::not_found(id))?;
        tracing::info!(task_id = task.id, ?mode, "Task updated");

        Ok(task)
    }

    async fn delete_task(&self, id: i64) -> Result<(), TaskServiceError> {
        if !self.task_repo.delete(id).await? {
            return Err(TaskServiceError::not_found(id));
        }
        tracing::info!(task_id = id, "Task deleted");

        Ok(())
    }
}

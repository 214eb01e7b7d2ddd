use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::task_repository::TaskRepository;
use crate::domain::task::{NewTask, Task, TaskChanges, TaskFilter};
use crate::error::AppResult;

/// Process-local task store, used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching tasks, newest first.
    fn filtered<'a>(tasks: &'a BTreeMap<i64, Task>, filter: &'a TaskFilter) -> Vec<&'a Task> {
        let mut matching: Vec<&Task> = tasks.values().filter(|task| filter.matches(task)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matching
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn create(&self, task: &NewTask) -> AppResult<Task> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = chrono::Utc::now();

        let created = Task {
            id: state.last_id,
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &TaskChanges) -> AppResult<Option<Task>> {
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            task.title = title.clone();
        }
        if let Some(description) = &changes.description {
            task.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        task.updated_at = chrono::Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(Self::filtered(&state.tasks, filter).len() as u64)
    }

    async fn list(&self, filter: &TaskFilter, limit: u64, offset: u64) -> AppResult<Vec<Task>> {
        let state = self.state.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(Self::filtered(&state.tasks, filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

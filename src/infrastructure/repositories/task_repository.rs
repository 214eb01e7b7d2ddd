use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::task::{NewTask, Task, TaskChanges, TaskFilter};
use crate::error::AppResult;
use crate::infrastructure::db::{check_connection, DbPool};

/// Storage collaborator for tasks. Listings are ordered newest first.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Task>>;

    async fn create(&self, task: &NewTask) -> AppResult<Task>;

    /// `None` when no task has this id
    async fn update(&self, id: i64, changes: &TaskChanges) -> AppResult<Option<Task>>;

    /// `false` when no task has this id
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64>;

    async fn list(&self, filter: &TaskFilter, limit: u64, offset: u64) -> AppResult<Vec<Task>>;

    async fn ping(&self) -> AppResult<()>;
}

pub struct PgTaskRepository {
    pool: Arc<DbPool>,
}

impl PgTaskRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &TaskFilter) {
    builder.push(" WHERE TRUE");

    if let Some(completed) = filter.completed {
        builder.push(" AND completed = ").push_bind(completed);
    }

    for term in &filter.search_terms {
        builder
            .push(" AND title ILIKE ")
            .push_bind(format!("%{}%", escape_like(term)));
    }
}

/// Escape LIKE wildcards so search terms match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Task>> {
        let pool = self.pool.as_ref();
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, task: &NewTask) -> AppResult<Task> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let created = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &TaskChanges) -> AppResult<Option<Task>> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                updated_at = $5
            WHERE id = $1
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.completed)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64> {
        let pool = self.pool.as_ref();
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;

        Ok(count.max(0) as u64)
    }

    async fn list(&self, filter: &TaskFilter, limit: u64, offset: u64) -> AppResult<Vec<Task>> {
        let pool = self.pool.as_ref();
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks", TASK_COLUMNS));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let tasks = builder.build_query_as::<Task>().fetch_all(pool).await?;

        Ok(tasks)
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(&self.pool).await?;
        Ok(())
    }
}

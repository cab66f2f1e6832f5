// Todo store contract and its Postgres implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::todos::{error::TodoError, models::Todo};

/// Todo store contract
///
/// Every lookup and mutation is scoped to the owning user at the query
/// level, so a todo owned by someone else behaves exactly like a missing
/// row. `delete` reports the number of affected rows so the caller can
/// detect a lost race between check and delete.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        user_id: i32,
    ) -> Result<Todo, TodoError>;
    async fn find_by_id(&self, id: i32, user_id: i32) -> Result<Option<Todo>, TodoError>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Todo>, TodoError>;
    async fn update(&self, todo: &Todo) -> Result<Todo, TodoError>;
    async fn delete(&self, id: i32, user_id: i32) -> Result<u64, TodoError>;
}

/// Postgres-backed todo repository
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        user_id: i32,
    ) -> Result<Todo, TodoError> {
        sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, description, user_id, completed)
             VALUES ($1, $2, $3, FALSE)
             RETURNING id, title, description, completed, user_id, created_at, updated_at",
        )
        .bind(title)
        .bind(description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: i32, user_id: i32) -> Result<Option<Todo>, TodoError> {
        sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, user_id, created_at, updated_at
             FROM todos WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Todo>, TodoError> {
        sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, user_id, created_at, updated_at
             FROM todos WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, TodoError> {
        sqlx::query_as::<_, Todo>(
            "UPDATE todos
             SET title = $1, description = $2, completed = $3, updated_at = NOW()
             WHERE id = $4 AND user_id = $5
             RETURNING id, title, description, completed, user_id, created_at, updated_at",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.id)
        .bind(todo.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?
        // The row can vanish between the service's fetch and this update
        .ok_or(TodoError::TodoNotFound)
    }

    async fn delete(&self, id: i32, user_id: i32) -> Result<u64, TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

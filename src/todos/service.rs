// Todo service - ownership-scoped CRUD business logic

use std::sync::Arc;

use crate::auth::repository::UserRepository;
use crate::todos::{
    error::TodoError,
    models::{CreateTodoRequest, Todo, UpdateTodoRequest},
    repository::TodoRepository,
};

/// Todo service
///
/// Every operation takes the authenticated user's id explicitly; it comes
/// from the authorization gate, never from the request body.
pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
    users: Arc<dyn UserRepository>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { todos, users }
    }

    /// Create a new todo owned by `user_id`
    ///
    /// New todos always start with `completed = false`.
    pub async fn create(&self, req: &CreateTodoRequest, user_id: i32) -> Result<Todo, TodoError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(TodoError::UserNotFound)?;

        let todo = self
            .todos
            .create(&req.title, req.description.as_deref(), user_id)
            .await?;

        tracing::info!("Created todo {} for user {}", todo.id, user_id);
        Ok(todo)
    }

    /// Fetch a single todo scoped to its owner
    pub async fn get_by_id(&self, id: i32, user_id: i32) -> Result<Todo, TodoError> {
        let todo = self
            .todos
            .find_by_id(id, user_id)
            .await?
            .ok_or(TodoError::TodoNotFound)?;

        // The store query already scopes by owner; this re-check guards
        // against a future query regression.
        if todo.user_id != user_id {
            return Err(TodoError::UnauthorizedAccess);
        }

        Ok(todo)
    }

    /// List all todos owned by `user_id`, newest first
    ///
    /// An empty list is a successful result, not an error.
    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Vec<Todo>, TodoError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(TodoError::UserNotFound)?;

        self.todos.list_by_user(user_id).await
    }

    /// Apply a partial update to an owned todo
    ///
    /// Only fields present in the request change; absent fields keep their
    /// prior values.
    pub async fn update(
        &self,
        id: i32,
        req: &UpdateTodoRequest,
        user_id: i32,
    ) -> Result<Todo, TodoError> {
        let mut todo = self
            .todos
            .find_by_id(id, user_id)
            .await?
            .ok_or(TodoError::TodoNotFound)?;

        if todo.user_id != user_id {
            return Err(TodoError::UnauthorizedAccess);
        }

        if let Some(title) = &req.title {
            todo.title = title.clone();
        }
        if let Some(description) = &req.description {
            todo.description = Some(description.clone());
        }
        if let Some(completed) = req.completed {
            todo.completed = completed;
        }

        self.todos.update(&todo).await
    }

    /// Delete an owned todo
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), TodoError> {
        self.todos
            .find_by_id(id, user_id)
            .await?
            .ok_or(TodoError::TodoNotFound)?;

        // The existence check can race with a concurrent delete; a zero-row
        // delete is reported as not-found rather than silent success.
        let rows = self.todos.delete(id, user_id).await?;
        if rows == 0 {
            return Err(TodoError::TodoNotFound);
        }

        tracing::info!("Deleted todo {} for user {}", id, user_id);
        Ok(())
    }
}

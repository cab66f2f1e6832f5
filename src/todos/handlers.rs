// HTTP handlers for todo endpoints
// All routes here sit behind the authentication middleware; the identity
// comes from the request context, never from the body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ErrorResponse;
use crate::todos::{
    error::TodoError,
    models::{CreateTodoRequest, Todo, TodoListResponse, UpdateTodoRequest},
};
use crate::AppState;

/// Create a new todo for the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo successfully created", body = Todo),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), TodoError> {
    request.validate()?;

    let todo = state.todo_service.create(&request, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// List all todos belonging to the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "List of todos", body = TodoListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TodoListResponse>, TodoError> {
    let todos = state.todo_service.get_by_user_id(user.user_id).await?;

    let count = todos.len();
    Ok(Json(TodoListResponse { todos, count }))
}

/// Fetch a single todo by id
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Todo>, TodoError> {
    let todo = state.todo_service.get_by_id(id, user.user_id).await?;
    Ok(Json(todo))
}

/// Partially update a todo
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, TodoError> {
    request.validate()?;

    let todo = state
        .todo_service
        .update(id, &request, user.user_id)
        .await?;
    Ok(Json(todo))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, TodoError> {
    state.todo_service.delete(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

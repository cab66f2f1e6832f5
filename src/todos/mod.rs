// Todo module
// Ownership-scoped CRUD over todo items, protected by the auth middleware.

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::TodoError;
pub use models::{CreateTodoRequest, Todo, TodoListResponse, UpdateTodoRequest};
pub use repository::{PgTodoRepository, TodoRepository};
pub use service::TodoService;

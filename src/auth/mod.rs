// Authentication module
// JWT-based authentication: registration, login, and the bearer-token gate
// protecting the todo routes.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use middleware::{require_auth, AuthenticatedUser};
pub use models::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
pub use password::PasswordHasher;
pub use repository::{PgUserRepository, UserRepository};
pub use service::AuthService;
pub use token::{Claims, TokenService};

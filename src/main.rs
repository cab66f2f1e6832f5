mod auth;
mod config;
mod db;
mod error;
mod todos;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, PasswordHasher, PgUserRepository, TokenService, UserRepository};
use config::Config;
use todos::{PgTodoRepository, TodoRepository, TodoService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register,
        auth::handlers::login,
        todos::handlers::create_todo,
        todos::handlers::list_todos,
        todos::handlers::get_todo,
        todos::handlers::update_todo,
        todos::handlers::delete_todo,
        health_check,
        readiness_check,
    ),
    components(
        schemas(
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::AuthResponse,
            auth::models::UserResponse,
            todos::models::Todo,
            todos::models::CreateTodoRequest,
            todos::models::UpdateTodoRequest,
            todos::models::TodoListResponse,
            error::ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Account registration and login"),
        (name = "todos", description = "Per-user todo management"),
        (name = "health", description = "Service health endpoints")
    ),
    info(
        title = "Todo API",
        version = "1.0.0",
        description = "RESTful API for a todo-list application with JWT authentication"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
///
/// Constructed once at startup and injected everywhere; there is no
/// ambient global database handle or secret.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: Arc<AuthService>,
    pub todo_service: Arc<TodoService>,
    pub token_service: TokenService,
}

impl AppState {
    fn new(db: PgPool, config: &Config) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db.clone()));
        let todo_repo: Arc<dyn TodoRepository> = Arc::new(PgTodoRepository::new(db.clone()));

        let token_service = TokenService::new(
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        );
        let hasher = PasswordHasher::with_cost(config.hash_cost);

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            hasher,
            token_service.clone(),
        ));
        let todo_service = Arc::new(TodoService::new(todo_repo, users));

        Self {
            db,
            auth_service,
            todo_service,
            token_service,
        }
    }
}

/// Health check response body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub time: String,
}

/// Health check: reports API liveness and database connectivity
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    // Bound the ping so a stalled database cannot hang the caller
    let ping = tokio::time::timeout(Duration::from_secs(5), db::health_check(&state.db)).await;

    let healthy = matches!(ping, Ok(Ok(())));
    let response = HealthResponse {
        status: if healthy { "ok" } else { "unhealthy" }.to_string(),
        database: if healthy { "connected" } else { "disconnected" }.to_string(),
        time: chrono::Utc::now().to_rfc3339(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        tracing::error!("Database health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Readiness check: tighter deadline, same dependencies
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse)
    ),
    tag = "health"
)]
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ping = tokio::time::timeout(Duration::from_secs(3), db::health_check(&state.db)).await;

    let ready = matches!(ping, Ok(Ok(())));
    let response = HealthResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        database: if ready { "ready" } else { "not_ready" }.to_string(),
        time: chrono::Utc::now().to_rfc3339(),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Creates and configures the application router
///
/// All `/todos` routes sit behind the bearer-token middleware; auth and
/// health routes are public.
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/api/v1/todos",
            post(todos::handlers::create_todo).get(todos::handlers::list_todos),
        )
        .route(
            "/api/v1/todos/:id",
            get(todos::handlers::get_todo)
                .put(todos::handlers::update_todo)
                .delete(todos::handlers::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth::require_auth,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/v1/auth/register", post(auth::handlers::register))
        .route("/api/v1/auth/login", post(auth::handlers::login))
        .merge(protected)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() {
    let config = Config::load().expect("Invalid configuration");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Todo API - Starting...");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = AppState::new(db_pool.clone(), &config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Todo API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Explicit close so in-flight connections drain before exit
    tracing::info!("Shutting down, closing database pool");
    db_pool.close().await;
}

#[cfg(test)]
mod tests;

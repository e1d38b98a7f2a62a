use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_task::create_task;
use super::handlers::delete_task::delete_task;
use super::handlers::get_task::get_task;
use super::handlers::health::health;
use super::handlers::list_tasks::list_tasks;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::handlers::update_task::update_task;
use super::middleware::authenticate as auth_middleware;
use super::middleware::AuthGate;
use crate::domain::task::ports::TaskRepository;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::task::service::TaskService;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub task_service: Arc<dyn TaskServicePort>,
}

/// Build the full HTTP application over the given stores.
///
/// The authentication gate wraps every route; `public_prefixes` decides
/// which paths it lets through without a token.
pub fn create_router<UR, TR>(
    user_repository: Arc<UR>,
    task_repository: Arc<TR>,
    authenticator: Arc<Authenticator>,
    public_prefixes: Vec<String>,
) -> Router
where
    UR: UserRepository,
    TR: TaskRepository,
{
    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            Arc::clone(&user_repository),
            Arc::clone(&authenticator),
        )),
        task_service: Arc::new(TaskService::new(task_repository)),
    };

    let gate = Arc::new(AuthGate::new(
        authenticator,
        user_repository,
        public_prefixes,
    ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(middleware::from_fn_with_state(gate, auth_middleware))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub mod context;
pub mod cors;
pub mod dispatcher;
pub mod json_body;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, task::TaskController};
use crate::domain::task::TaskService;
use crate::error::{AppError, ClientError, RaisedError};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::TaskRepository;

pub use context::{request_context_middleware, RequestContext, X_REQUEST_ID};
pub use dispatcher::{
    default_error_handler, DefaultHandler, Dispatched, ExceptionDispatcher, FallbackResponse,
};
pub use json_body::JsonBody;

/// Wire services, controllers and the exception dispatcher on top of a task store
pub fn create_app(config: &Config, task_repo: Arc<dyn TaskRepository>) -> Router {
    let task_service = Arc::new(TaskService::new(task_repo.clone(), config.pagination()));
    let task_controller = Arc::new(TaskController::new(task_service));

    build_router(
        task_controller,
        task_repo,
        Arc::new(ExceptionDispatcher::default()),
        cors::cors_layer(config),
    )
}

pub fn build_router(
    task_controller: Arc<TaskController>,
    task_repo: Arc<dyn TaskRepository>,
    dispatcher: Arc<ExceptionDispatcher>,
    cors: CorsLayer,
) -> Router {
    let collection: MethodRouter<Arc<TaskController>> = get(TaskController::list_tasks)
        .post(TaskController::create_task)
        .fallback(method_not_allowed);
    let detail: MethodRouter<Arc<TaskController>> = get(TaskController::get_task)
        .put(TaskController::update_task)
        .patch(TaskController::partial_update_task)
        .delete(TaskController::delete_task)
        .fallback(method_not_allowed);

    let task_routes = Router::new()
        .route("/tasks", collection.clone())
        .route("/tasks/", collection)
        .route("/tasks/:id", detail.clone())
        .route("/tasks/:id/", detail)
        .with_state(task_controller);

    Router::new()
        .route("/health", get(health::health).fallback(method_not_allowed))
        .route(
            "/health/ready",
            get(health::health_ready).fallback(method_not_allowed),
        )
        .with_state(task_repo)
        .merge(task_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(dispatcher, error_boundary))
        .layer(middleware::from_fn(request_context_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn method_not_allowed(method: Method) -> AppError {
    ClientError::method_not_allowed(&method).into()
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}

/// Hand every error raised below this layer to the exception dispatcher
pub async fn error_boundary(
    State(dispatcher): State<Arc<ExceptionDispatcher>>,
    request: Request,
    next: Next,
) -> Response {
    let context = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::from_request(&request));

    let mut response = next.run(request).await;

    let Some(RaisedError(error)) = response.extensions_mut().remove::<RaisedError>() else {
        return response;
    };

    match dispatcher.dispatch(&error, &context) {
        Some(dispatched) => {
            let status = dispatched.status();
            if status.is_server_error() {
                tracing::error!(
                    request_id = %context.request_id,
                    method = %context.method,
                    path = %context.path,
                    code = dispatched.code().unwrap_or("-"),
                    status = status.as_u16(),
                    error = %error,
                    "Request failed"
                );
            } else {
                tracing::warn!(
                    request_id = %context.request_id,
                    method = %context.method,
                    path = %context.path,
                    code = dispatched.code().unwrap_or("-"),
                    status = status.as_u16(),
                    error = %error,
                    "Request rejected"
                );
            }
            dispatched.into_response()
        }
        None => {
            tracing::error!(
                request_id = %context.request_id,
                method = %context.method,
                path = %context.path,
                error = %error,
                "Unclassified error"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Start the HTTP server and serve until Ctrl+C or SIGTERM
pub async fn start_http_server(
    config: &Config,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

//! Application startup and lifecycle management.

use axum::{
    extract::FromRef,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::TodoConfig;
use crate::handlers::{self, todos};
use crate::services::{MongoTodoRepository, TodoRepository};
use crate::utils::ValidationPolicy;

/// Shared application state. The repository is created once by
/// [`Application`] and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: TodoConfig,
    pub repository: Arc<dyn TodoRepository>,
}

impl FromRef<AppState> for ValidationPolicy {
    fn from_ref(state: &AppState) -> Self {
        state.config.validation
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::greeting))
        .route("/todo", post(todos::create_todo))
        .route(
            "/todo/:todoID",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/todos", get(todos::list_todos))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect to MongoDB and bind the listener.
    pub async fn build(config: TodoConfig) -> Result<Self, AppError> {
        let repository = MongoTodoRepository::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
            &config.mongodb.collection,
            config.storage.timeout(),
        )
        .await?;

        repository.init_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        Self::build_with_repository(config, Arc::new(repository)).await
    }

    /// Bind the listener over an already constructed repository.
    pub async fn build_with_repository(
        config: TodoConfig,
        repository: Arc<dyn TodoRepository>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random port, used by tests.
        let addr = format!("{}:{}", config.common.host, config.common.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Todo service: HTTP on {}:{}", config.common.host, port);

        Ok(Self {
            port,
            listener,
            state: AppState { config, repository },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn repository(&self) -> Arc<dyn TodoRepository> {
        self.state.repository.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

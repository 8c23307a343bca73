//! Application startup and lifecycle management.

use crate::config::{StoreBackend, StudentConfig};
use crate::handlers;
use crate::services::{InMemoryStudentStore, MongoDb, StudentStore};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, metrics_middleware, request_id_middleware};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state. The store is injected here and never replaced.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::greeting))
        .route("/register", post(handlers::register_student))
        .route("/student/:emailId", get(handlers::get_student))
        .route("/students", get(handlers::list_students))
        .route("/update/:emailId", put(handlers::update_student))
        .route("/delete/:emailId", delete(handlers::delete_student))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(from_fn(metrics_middleware))
        .with_state(state)
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
}

/// Connect the configured store backend.
pub async fn connect_store(config: &StudentConfig) -> Result<Arc<dyn StudentStore>, AppError> {
    match config.store.backend {
        StoreBackend::Mongo => {
            let db = MongoDb::connect(&config.mongodb, &config.store).await?;
            db.initialize_indexes().await?;
            Ok(Arc::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory student store; records are lost on restart");
            Ok(Arc::new(InMemoryStudentStore::new()))
        }
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: StudentConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        let app = build_router(AppState::new(store));

        let addr = config.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            host = %config.common.host,
            port,
            backend = ?config.store.backend,
            "Student service listening"
        );

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

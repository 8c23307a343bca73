#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use student_service::config::{MongoConfig, StoreBackend, StoreConfig, StudentConfig};
use student_service::services::{InMemoryStudentStore, StudentStore};
use student_service::{build_router, AppState, Application};
use tower::util::ServiceExt;
use uuid::Uuid;

pub fn student_json(email: &str) -> Value {
    json!({
        "firstname": "Ann",
        "lastname": "Lee",
        "age": 20,
        "department": "CS",
        "emailId": email
    })
}

/// Router wired to an in-memory store the test can inspect.
pub struct TestRouter {
    pub store: Arc<InMemoryStudentStore>,
    router: Router,
}

impl TestRouter {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStudentStore::new());
        let router = build_router(AppState::new(store.clone()));
        Self { store, router }
    }

    pub fn with_store(store: Arc<dyn StudentStore>) -> Router {
        build_router(AppState::new(store))
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(self.router.clone(), method, uri, body).await
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: String,
    ) -> (StatusCode, Value) {
        send_raw(self.router.clone(), method, uri, content_type, body).await
    }
}

pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Sends `body` verbatim with the given content type.
pub async fn send_raw(
    router: Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: String,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// A live server backed by MongoDB on a throwaway database.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mongodb_uri = std::env::var("TEST_MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("student_test_{}", Uuid::new_v4().simple());

        let mut common = service_core::config::Config::default();
        common.port = 0; // Random port for testing

        let config = StudentConfig {
            common,
            mongodb: MongoConfig {
                uri: mongodb_uri.clone(),
                database: db_name.clone(),
                collection: "students".to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Mongo,
                ..StoreConfig::default()
            },
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the greeting endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            mongodb_uri,
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        if let Ok(client) = mongodb::Client::with_uri_str(&self.mongodb_uri).await {
            let _ = client.database(&self.db_name).drop(None).await;
        }
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use todo_service::config::{MongoConfig, ObservabilityConfig, StorageConfig, TodoConfig};
use todo_service::dtos::InsertedTodo;
use todo_service::models::{Todo, TodoUpdate};
use todo_service::services::{InMemoryTodoRepository, TodoRepository};
use todo_service::utils::ValidationPolicy;
use todo_service::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub repository: Arc<dyn TodoRepository>,
    pub db_name: String,
}

pub fn test_config(db_name: &str, validation: ValidationPolicy) -> TodoConfig {
    TodoConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "debug".to_string(),
        },
        mongodb: MongoConfig {
            uri: Secret::new(
                std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            database: db_name.to_string(),
            collection: "todos".to_string(),
        },
        storage: StorageConfig::default(),
        validation,
        observability: ObservabilityConfig::default(),
    }
}

impl TestApp {
    /// Spawn over an in-memory repository.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            Arc::new(InMemoryTodoRepository::new()),
            ValidationPolicy::default(),
        )
        .await
    }

    pub async fn spawn_with(
        repository: Arc<dyn TodoRepository>,
        validation: ValidationPolicy,
    ) -> Self {
        let config = test_config("unused", validation);
        let app = Application::build_with_repository(config, repository)
            .await
            .expect("Failed to build test application");
        Self::start(app, "unused".to_string()).await
    }

    /// Spawn against the MongoDB at `TEST_MONGODB_URI`, in a fresh database.
    pub async fn spawn_with_mongo() -> Self {
        let db_name = format!("todo_test_{}", uuid::Uuid::new_v4().simple());
        let config = test_config(&db_name, ValidationPolicy::default());
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::start(app, db_name).await
    }

    async fn start(app: Application, db_name: String) -> Self {
        let port = app.port();
        let repository = app.repository();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            repository,
            db_name,
        }
    }

    pub async fn post_todo(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/todo", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_todo(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/todo/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_todo(&self, id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .put(format!("{}/todo/{}", self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_todo(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}/todo/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_todos(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/todos", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Drop the per-test database; a no-op for in-memory apps.
    pub async fn cleanup(&self) {
        if self.db_name == "unused" {
            return;
        }
        let uri = std::env::var("TEST_MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&uri)
            .await
            .expect("Failed to connect to MongoDB");
        client
            .database(&self.db_name)
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}

/// A gateway whose every call fails the way an unreachable database does.
pub struct FailingRepository;

fn unavailable() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("server selection timeout"))
}

#[async_trait]
impl TodoRepository for FailingRepository {
    async fn insert(&self, _todo: &Todo) -> Result<InsertedTodo, AppError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Todo, AppError> {
        Err(unavailable())
    }

    async fn update_by_id(&self, _id: i64, _update: &TodoUpdate) -> Result<u64, AppError> {
        Err(unavailable())
    }

    async fn delete_by_id(&self, _id: i64) -> Result<u64, AppError> {
        Err(unavailable())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

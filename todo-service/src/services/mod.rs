pub mod database;
pub mod memory;
pub mod metrics;

use async_trait::async_trait;
use service_core::error::AppError;
use std::future::Future;
use std::time::Duration;

use crate::dtos::InsertedTodo;
use crate::models::{Todo, TodoUpdate};

pub use database::MongoTodoRepository;
pub use memory::InMemoryTodoRepository;
pub use self::metrics::{get_metrics, init_metrics, record_todo_operation};

/// Error text reported when a lookup by `id` finds nothing. Reads do not
/// distinguish this from other storage failures.
pub const NO_DOCUMENTS: &str = "mongo: no documents in result";

/// Sole access point to the todo collection. Each call is one storage
/// operation.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn insert(&self, todo: &Todo) -> Result<InsertedTodo, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Todo, AppError>;

    /// Returns the number of documents matched by `id`.
    async fn update_by_id(&self, id: i64, update: &TodoUpdate) -> Result<u64, AppError>;

    /// Returns the number of documents removed; at most one.
    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError>;

    /// Stops at the first document that fails to decode.
    async fn find_all(&self) -> Result<Vec<Todo>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Runs one storage operation under `timeout`, recording its outcome.
pub async fn with_timeout<T, E, F>(
    operation: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<AppError>,
{
    let result = match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            tracing::error!(operation, timeout = ?timeout, "Storage operation timed out");
            Err(AppError::Timeout(timeout))
        }
    };

    record_todo_operation(operation, result.is_ok());
    result
}

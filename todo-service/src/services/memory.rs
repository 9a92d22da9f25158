use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use tokio::sync::RwLock;

use super::{TodoRepository, NO_DOCUMENTS};
use crate::dtos::InsertedTodo;
use crate::models::{Todo, TodoUpdate};

/// Keeps todos in insertion order with the same matching rules as the
/// MongoDB gateway: first document whose `id` matches wins.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, todo: &Todo) -> Result<InsertedTodo, AppError> {
        self.todos.write().await.push(todo.clone());
        Ok(InsertedTodo {
            inserted_id: ObjectId::new().to_hex(),
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Todo, AppError> {
        self.todos
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::DatabaseError(anyhow::anyhow!(NO_DOCUMENTS)))
    }

    async fn update_by_id(&self, id: i64, update: &TodoUpdate) -> Result<u64, AppError> {
        let mut todos = self.todos.write().await;
        match todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.text = update.text.clone();
                todo.checked = update.checked;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError> {
        let mut todos = self.todos.write().await;
        match todos.iter().position(|t| t.id == id) {
            Some(index) => {
                todos.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.todos.read().await.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

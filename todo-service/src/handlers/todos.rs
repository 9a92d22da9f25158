//! Todo CRUD handlers.
//!
//! Each handler runs decode, validate, one gateway call, respond, and
//! stops at the first failure. Errors become envelopes via `AppError`.

use axum::{extract::State, http::StatusCode};
use service_core::envelope::Envelope;
use service_core::error::AppError;

use crate::dtos::InsertedTodo;
use crate::models::Todo;
use crate::startup::AppState;
use crate::utils::{TodoId, ValidatedTodo};

pub const DELETED_MESSAGE: &str = "Todo successfully deleted!";
pub const NOT_FOUND_MESSAGE: &str = "Todo with specified ID not found!";

#[tracing::instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    ValidatedTodo(payload): ValidatedTodo,
) -> Result<Envelope<InsertedTodo>, AppError> {
    let todo = payload.into_todo();
    let inserted = state.repository.insert(&todo).await?;

    tracing::info!(
        todo_id = todo.id,
        inserted_id = %inserted.inserted_id,
        "Todo created"
    );

    Ok(Envelope::success(StatusCode::CREATED, inserted))
}

#[tracing::instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Envelope<Todo>, AppError> {
    let todo = state.repository.find_by_id(id).await?;
    Ok(Envelope::success(StatusCode::OK, todo))
}

/// A body `id` is ignored; the path decides which todo is updated. When no
/// todo matches, the zero todo is returned with 200.
#[tracing::instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    ValidatedTodo(payload): ValidatedTodo,
) -> Result<Envelope<Todo>, AppError> {
    let update = payload.into_update();
    let matched = state.repository.update_by_id(id, &update).await?;

    let todo = if matched >= 1 {
        tracing::info!(todo_id = id, matched, "Todo updated");
        state.repository.find_by_id(id).await?
    } else {
        tracing::warn!(todo_id = id, "Update matched no todo");
        Todo::default()
    };

    Ok(Envelope::success(StatusCode::OK, todo))
}

#[tracing::instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Envelope<&'static str>, AppError> {
    let deleted = state.repository.delete_by_id(id).await?;

    if deleted < 1 {
        return Err(AppError::NotFound(anyhow::anyhow!(NOT_FOUND_MESSAGE)));
    }

    tracing::info!(todo_id = id, "Todo deleted");
    Ok(Envelope::success(StatusCode::OK, DELETED_MESSAGE))
}

#[tracing::instrument(skip(state))]
pub async fn list_todos(State(state): State<AppState>) -> Result<Envelope<Vec<Todo>>, AppError> {
    let todos = state.repository.find_all().await?;
    tracing::debug!(count = todos.len(), "Listed todos");
    Ok(Envelope::success(StatusCode::OK, todos))
}

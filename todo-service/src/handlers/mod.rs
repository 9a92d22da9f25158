//! HTTP handlers for todo-service.

pub mod health;
pub mod todos;

pub use health::{greeting, health_check, metrics_endpoint, readiness_check};

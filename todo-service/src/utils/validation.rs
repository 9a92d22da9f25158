use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use service_core::error::AppError;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dtos::TodoPayload;

/// Extra rules applied on top of the field annotations on [`TodoPayload`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPolicy {
    /// Treat `checked: false` as a missing required field, the way the
    /// service historically behaved.
    pub reject_false_checked: bool,
}

impl ValidationPolicy {
    pub fn check(&self, payload: &TodoPayload) -> Result<(), ValidationErrors> {
        let mut errors = match payload.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.reject_false_checked && payload.checked == Some(false) {
            let mut error = ValidationError::new("required");
            error.message = Some("checked is required".into());
            errors.add("checked", error);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A decoded and validated todo body. Malformed JSON and failed
/// validation both reject with 400.
pub struct ValidatedTodo(pub TodoPayload);

#[async_trait]
impl<S> FromRequest<S> for ValidatedTodo
where
    S: Send + Sync,
    ValidationPolicy: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<TodoPayload>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

        ValidationPolicy::from_ref(state).check(&payload)?;

        Ok(ValidatedTodo(payload))
    }
}

/// The `:todoID` path segment as a todo identifier.
pub struct TodoId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

        parse_todo_id(&raw).map(TodoId)
    }
}

pub fn parse_todo_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("invalid todo id '{}'", raw)))
}

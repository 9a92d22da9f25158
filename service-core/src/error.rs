use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(anyhow::Error),

    #[error("{0}")]
    NotFound(anyhow::Error),

    #[error("{0}")]
    InternalError(#[from] anyhow::Error),

    #[error("{0}")]
    DatabaseError(anyhow::Error),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::Timeout(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // The raw error text is handed back to the client unmodified.
        let details = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %details, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %details, "Request rejected");
        }

        Envelope::error(status, details).into_response()
    }
}

//! Fixed response wrapper shared by every Todo API response.
//!
//! Wire shape: `{"status": 201, "message": "success", "data": {"data": <payload>}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const SUCCESS: &str = "success";
pub const ERROR: &str = "error";

#[derive(Debug, Serialize)]
pub struct Payload<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: Payload<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: SUCCESS,
            data: Payload { data },
        }
    }
}

impl Envelope<String> {
    pub fn error(status: StatusCode, details: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: ERROR,
            data: Payload {
                data: details.into(),
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

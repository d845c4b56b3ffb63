use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::inference::InferenceSchemaError;
use crate::services::inputs::InputError;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error(transparent)]
    InferenceSchema(#[from] InferenceSchemaError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingField(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InferenceSchema(err) => {
                tracing::error!("Feature schema does not match the loaded model: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::MissingField(field) => AppError::MissingField(field.to_string()),
            InputError::OutOfRange { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}

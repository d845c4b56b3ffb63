//! GET /api/v1/inputs: the bounded input controls the page renders.

use axum::Json;

use crate::services::inputs::{InputField, INPUT_FIELDS};

/// List the eleven weather inputs with their bounds, defaults and steps.
#[utoipa::path(
    get,
    path = "/api/v1/inputs",
    tag = "Prediction",
    responses(
        (status = 200, description = "Input definitions in record order", body = Vec<InputField>),
    )
)]
pub async fn list_inputs() -> Json<Vec<InputField>> {
    Json(INPUT_FIELDS.to_vec())
}

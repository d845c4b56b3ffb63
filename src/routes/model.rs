//! Model metadata endpoint.
//!
//! GET /api/v1/model: what was loaded at startup and the feature order it
//! consumes.

use axum::extract::State;
use axum::Json;

use crate::routes::AppState;
use crate::services::model::ModelInfo;

/// Get metadata about the loaded classifier.
#[utoipa::path(
    get,
    path = "/api/v1/model",
    tag = "Model",
    responses(
        (status = 200, description = "Loaded model metadata", body = ModelInfo),
    )
)]
pub async fn get_model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.model_info.as_ref().clone())
}

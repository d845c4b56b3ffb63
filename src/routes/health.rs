use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" once the model is loaded)
    pub status: String,
    /// API version
    pub version: String,
    /// Name of the loaded model
    pub model: String,
    /// Feature schema version of the loaded model
    pub schema_version: String,
}

/// Health check endpoint.
///
/// The service only starts serving after the model artifact has loaded, so
/// a response always means predictions are available.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.model_info.name.clone(),
        schema_version: state.model_info.schema_version.clone(),
    })
}

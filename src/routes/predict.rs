//! Prediction endpoint.
//!
//! POST /api/v1/predict: one operator submission in, one rainfall
//! probability out. Each request runs the whole chain independently:
//! collect → derive → infer → present.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;
use crate::services::features::{derive_features, DerivedFeatureVector, FEATURE_SCHEMA};
use crate::services::inference::predict_rainfall;
use crate::services::inputs::{collect, RawWeatherInput, RawWeatherRecord};
use crate::services::presenter::{present, Presentation};

/// Prediction response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionResponse {
    /// The validated observation
    pub input: RawWeatherRecord,
    /// Engineered features in the order the model consumes them
    pub features: DerivedFeatureVector,
    /// Feature schema version used for derivation
    pub schema_version: String,
    /// Raw class-1 probability from the classifier
    pub probability: f64,
    /// Display block: percentage, progress, tier and message
    pub presentation: Presentation,
}

/// Predict the probability of rainfall for one observation.
///
/// All eleven fields are required and must lie within the bounds published
/// at `/api/v1/inputs`.
#[utoipa::path(
    post,
    path = "/api/v1/predict",
    tag = "Prediction",
    request_body = RawWeatherInput,
    responses(
        (status = 200, description = "Rainfall probability", body = PredictionResponse),
        (status = 400, description = "Missing or out-of-range field", body = ErrorResponse),
        (status = 500, description = "Feature schema does not match the loaded model", body = ErrorResponse),
    )
)]
pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<RawWeatherInput>,
) -> Result<Json<PredictionResponse>, AppError> {
    let record = collect(input)?;
    let features = derive_features(&record);
    let probability = predict_rainfall(state.classifier.as_ref(), &features)?;
    let presentation = present(probability);

    tracing::info!(
        "Prediction for day {}: {} ({:?})",
        record.day,
        presentation.percentage,
        presentation.tier
    );

    Ok(Json(PredictionResponse {
        input: record,
        features,
        schema_version: FEATURE_SCHEMA.version.to_string(),
        probability,
        presentation,
    }))
}

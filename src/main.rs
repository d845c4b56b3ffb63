// Rainfall Predictor API v0.1
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;

/// Rainfall Predictor API: OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rainfall Predictor API",
        version = "0.1.0",
        description = "Predicts the probability of rainfall from eleven daily weather \
            measurements. Inputs are turned into an engineered feature vector and scored \
            by a pre-trained soft-voting ensemble of random forest and gradient boosted trees.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Prediction", description = "Weather inputs and rainfall prediction"),
        (name = "Model", description = "Loaded model metadata"),
    ),
    paths(
        routes::health::health_check,
        routes::inputs::list_inputs,
        routes::predict::predict,
        routes::model::get_model_info,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            services::inputs::InputField,
            services::inputs::RawWeatherInput,
            services::inputs::RawWeatherRecord,
            services::features::DerivedFeatureVector,
            services::presenter::Presentation,
            services::presenter::RiskTier,
            routes::predict::PredictionResponse,
            services::model::ModelInfo,
            services::model::EstimatorSummary,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rainfall_predictor_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Load the classifier once; it is shared read-only by every request
    let model = match services::model::load_model(Path::new(&config.model_path)) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("Failed to load model from {}: {}", config.model_path, e);
            std::process::exit(1);
        }
    };

    let app_state = AppState {
        model_info: Arc::new(model.info()),
        classifier: Arc::new(model),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(routes::page::index))
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/inputs", get(routes::inputs::list_inputs))
        .route("/api/v1/predict", post(routes::predict::predict))
        .route("/api/v1/model", get(routes::model::get_model_info))
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}

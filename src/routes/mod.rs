use std::sync::Arc;

use crate::services::inference::RainfallClassifier;
use crate::services::model::ModelInfo;

pub mod health;
pub mod inputs;
pub mod model;
pub mod page;
pub mod predict;

/// Shared application state: the classifier loaded at startup, read-only
/// for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn RainfallClassifier>,
    pub model_info: Arc<ModelInfo>,
}

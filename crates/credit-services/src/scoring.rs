//! Servicio de scoring: contrato y handler de referencia.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ServiceError;
use credit_domain::{heuristic_score, FeatureVector};

/// Versión publicada del modelo heurístico.
pub const MODEL_VERSION: &str = "v1.0-kaggle-proto";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub features: FeatureVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub application_id: Option<i64>,
    pub default_probability: f64,
    pub model_version: String,
    pub feature_importances: FeatureVector,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}

/// Handler de scoring.
///
/// Falla con `Validation` (400) si no llega ni `application_id` ni ninguna
/// feature. Con features vacías pero id presente, el score usa los defaults
/// documentados de la heurística.
pub fn score(req: &ScoreRequest) -> Result<ScoreResponse, ServiceError> {
    if req.application_id.is_none() && req.features.is_empty() {
        return Err(ServiceError::Validation("application_id or features must be provided".to_string()));
    }

    let breakdown = heuristic_score(&req.features);
    Ok(ScoreResponse { application_id: req.application_id,
                       default_probability: breakdown.default_probability,
                       model_version: MODEL_VERSION.to_string(),
                       feature_importances: breakdown.feature_importances,
                       confidence: breakdown.confidence,
                       generated_at: Utc::now() })
}

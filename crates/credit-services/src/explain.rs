//! Servicio de explicación: contrato y handler de referencia.
//!
//! La explicación es una tabla de reglas más render de plantillas
//! (`credit-policies`); acá viven el shape del request/response y la
//! validación de borde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ServiceError;
use credit_domain::{round4, Decision, FeatureVector};
use credit_policies::{explanation_confidence, recommendations, render_explanation, to_key_factors, ExplanationMode,
                      KeyFactor, Recommendation};

/// Cantidad de factores clave presentados.
const TOP_K_FACTORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub default_probability: f64,
    pub model_version: String,
    #[serde(default)]
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainData {
    #[serde(default)]
    pub feature_importances: FeatureVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub features: FeatureVector,
    pub scoring_result: ScoringResult,
    #[serde(default)]
    pub explain_data: Option<ExplainData>,
    #[serde(default)]
    pub mode: ExplanationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSummary {
    pub default_probability: f64,
    pub decision: Decision,
    pub model_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub application_id: Option<i64>,
    pub scoring: ScoringSummary,
    pub explanation_text: String,
    pub key_factors: Vec<KeyFactor>,
    pub recommendations: Vec<Recommendation>,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}

/// Handler de explicación.
///
/// Falla con `Validation` (400) si `explain_data.feature_importances` viene
/// vacío: el prototipo no recalcula importancias. La decisión es la
/// provista o la derivada de la probabilidad.
pub fn explain(req: &ExplainRequest) -> Result<ExplainResponse, ServiceError> {
    let importances = match req.explain_data.as_ref() {
        Some(data) if !data.feature_importances.is_empty() => &data.feature_importances,
        _ => {
            return Err(ServiceError::Validation("explain_data.feature_importances is required in prototype".to_string()))
        }
    };

    let decision = req.scoring_result
                      .decision
                      .unwrap_or_else(|| Decision::from_probability(req.scoring_result.default_probability));
    let factors = to_key_factors(&req.features, importances, TOP_K_FACTORS);
    let recs = recommendations(&factors);
    let confidence = round4(explanation_confidence(&factors)).min(0.99);

    Ok(ExplainResponse { application_id: req.application_id,
                         scoring: ScoringSummary { default_probability: req.scoring_result.default_probability,
                                                   decision,
                                                   model_version: req.scoring_result.model_version.clone() },
                         explanation_text: render_explanation(req.scoring_result.default_probability, req.mode, &factors),
                         key_factors: factors,
                         recommendations: recs,
                         confidence,
                         generated_at: Utc::now() })
}

/// Explicación por lotes: aplicación elemento a elemento del contrato
/// individual, preservando el orden. Sin aislamiento por ítem: el primer
/// request inválido falla el lote completo (comportamiento de referencia).
pub fn batch_explain(items: &[ExplainRequest]) -> Result<Vec<ExplainResponse>, ServiceError> {
    items.iter().map(explain).collect()
}

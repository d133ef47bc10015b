//! Scoring heurístico de referencia y mapeo a decisión.
//!
//! El "modelo" es una heurística lineal cerrada: no hay entrenamiento ni
//! inferencia real. Los coeficientes son placeholders de negocio y se
//! preservan tal cual; lo que importa aquí es el contrato (probabilidad
//! acotada, importancias firmadas, confianza) y el determinismo.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mapa ordenado feature → f64 con presencia explícita: `get` retorna
/// `Option` y los defaults se aplican en un único lugar (`heuristic_score`),
/// no dispersos en los call sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(IndexMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        FeatureVector(IndexMap::new())
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
        where I: IntoIterator<Item = (S, f64)>,
              S: Into<String>
    {
        FeatureVector(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Resultado del scoring heurístico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub default_probability: f64,
    pub feature_importances: FeatureVector,
    pub confidence: f64,
}

/// Redondeo a 4 decimales, compartido por probabilidades, importancias y
/// confianzas para mantener salidas estables.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Heurística lineal de referencia.
///
/// Defaults cuando una feature está ausente: income=50000, age=35,
/// debt_to_income=0.3, bki_request_cnt=1. La probabilidad se acota a
/// `[0.01, 0.99]` antes de redondear.
pub fn heuristic_score(features: &FeatureVector) -> ScoreBreakdown {
    let income = features.get("income").unwrap_or(50_000.0);
    let age = features.get("age").unwrap_or(35.0);
    let debt_to_income = features.get("debt_to_income").unwrap_or(0.3);
    let bki_requests = features.get("bki_request_cnt").unwrap_or(1.0);

    let linear = 0.45 + (debt_to_income * 0.7) + (bki_requests * 0.04) - (income / 300_000.0) - (age / 400.0);
    let probability = linear.clamp(0.01, 0.99);

    let mut importances = FeatureVector::new();
    importances.insert("debt_to_income", round4((debt_to_income * 0.5).min(0.35)));
    importances.insert("bki_request_cnt", round4((bki_requests * 0.03).min(0.2)));
    importances.insert("income", round4((-(income / 500_000.0)).max(-0.25)));
    importances.insert("age", round4((-(age / 1_000.0)).max(-0.1)));

    let confidence = round4(0.65 + 0.3 * (0.5 - probability).abs()).min(0.98);

    ScoreBreakdown { default_probability: round4(probability),
                     feature_importances: importances,
                     confidence }
}

/// Decisión derivada de la probabilidad de default.
/// Cortes: `< 0.3` aprueba, `< 0.5` aprueba condicional, resto rechaza
/// condicional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    ConditionallyApprove,
    ConditionallyReject,
}

impl Decision {
    pub fn from_probability(probability: f64) -> Decision {
        if probability < 0.3 {
            Decision::Approve
        } else if probability < 0.5 {
            Decision::ConditionallyApprove
        } else {
            Decision::ConditionallyReject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::ConditionallyApprove => "conditionally_approve",
            Decision::ConditionallyReject => "conditionally_reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

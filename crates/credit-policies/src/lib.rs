//! credit-policies – Reglas de explicación del scoring
//!
//! Tabla estática de reglas por feature (dato, no código) más el ranking
//! determinista de factores clave, las recomendaciones derivadas y el
//! render del texto de explicación por modo. Consumido por el servicio de
//! explicación; no conoce contratos HTTP.

use credit_domain::{round4, FeatureVector};
use serde::{Deserialize, Serialize};

/// Horizonte temporal sugerido para una recomendación.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdviceHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

/// Regla de explicación asociada a una feature del modelo.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FactorRule {
    pub feature: &'static str,
    pub description: &'static str,
    pub advice: &'static str,
    pub horizon: AdviceHorizon,
    pub impact_estimate: f64,
}

/// Consejo genérico cuando la feature no tiene regla propia.
pub const DEFAULT_ADVICE: &str = "Improve the overall financial profile.";
/// Estimación de impacto por defecto para recomendaciones sin regla.
pub const DEFAULT_IMPACT_ESTIMATE: f64 = 0.01;

/// Tabla de reglas del prototipo. Mantener como dato para extender sin
/// tocar la lógica de ranking.
pub static RULES: &[FactorRule] = &[FactorRule { feature: "debt_to_income",
                                                 description: "High debt load relative to income",
                                                 advice: "Reduce outstanding debt below 40% of income.",
                                                 horizon: AdviceHorizon::ShortTerm,
                                                 impact_estimate: 0.06 },
                                    FactorRule { feature: "income",
                                                 description: "Insufficient confirmed income",
                                                 advice: "Confirm an additional income source or add a co-borrower.",
                                                 horizon: AdviceHorizon::MediumTerm,
                                                 impact_estimate: 0.05 },
                                    FactorRule { feature: "bki_request_cnt",
                                                 description: "High frequency of credit bureau requests",
                                                 advice: "Reduce the number of simultaneous credit applications.",
                                                 horizon: AdviceHorizon::ShortTerm,
                                                 impact_estimate: 0.04 },
                                    FactorRule { feature: "age",
                                                 description: "Age profile affects risk",
                                                 advice: "Build up confirmed tenure and employment stability.",
                                                 horizon: AdviceHorizon::LongTerm,
                                                 impact_estimate: 0.02 }];

/// Busca la regla de una feature.
pub fn rule_for(feature: &str) -> Option<&'static FactorRule> {
    RULES.iter().find(|r| r.feature == feature)
}

/// Factor clave del scoring, listo para presentar.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyFactor {
    pub feature: String,
    pub value: f64,
    pub impact: f64,
    pub advice: String,
}

/// Recomendación accionable derivada de un factor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub kind: AdviceHorizon,
    pub text: String,
    pub impact_estimate: f64,
}

/// Modo de render del texto de explicación.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationMode {
    #[default]
    Brief,
    Detailed,
    Policy,
}

/// Rankea las importancias por |impacto| descendente y arma los factores
/// clave con el consejo de la tabla. El desempate es por nombre de feature
/// ascendente para mantener un orden total determinista.
pub fn to_key_factors(features: &FeatureVector, importances: &FeatureVector, top_k: usize) -> Vec<KeyFactor> {
    let mut ranked: Vec<(&str, f64)> = importances.iter().collect();
    ranked.sort_by(|a, b| {
              b.1.abs()
                 .partial_cmp(&a.1.abs())
                 .unwrap_or(std::cmp::Ordering::Equal)
                 .then_with(|| a.0.cmp(b.0))
          });
    ranked.into_iter()
          .take(top_k)
          .map(|(feature, impact)| KeyFactor { feature: feature.to_string(),
                                               value: features.get(feature).unwrap_or(0.0),
                                               impact,
                                               advice: rule_for(feature).map(|r| r.advice.to_string())
                                                                        .unwrap_or_else(|| DEFAULT_ADVICE.to_string()) })
          .collect()
}

/// Deriva una recomendación por factor, con horizonte e impacto estimado de
/// la tabla (defaults para features sin regla).
pub fn recommendations(factors: &[KeyFactor]) -> Vec<Recommendation> {
    factors.iter()
           .map(|f| {
               let rule = rule_for(&f.feature);
               Recommendation { kind: rule.map(|r| r.horizon).unwrap_or(AdviceHorizon::ShortTerm),
                                text: f.advice.clone(),
                                impact_estimate: rule.map(|r| r.impact_estimate).unwrap_or(DEFAULT_IMPACT_ESTIMATE) }
           })
           .collect()
}

/// Confianza de la explicación: crece con el impacto absoluto acumulado,
/// acotada a 0.99.
pub fn explanation_confidence(factors: &[KeyFactor]) -> f64 {
    let total: f64 = factors.iter().map(|f| f.impact.abs()).sum();
    round4(0.7 + (total / 2.0).min(0.25)).min(0.99)
}

/// Render del texto de explicación según el modo pedido.
pub fn render_explanation(probability: f64, mode: ExplanationMode, factors: &[KeyFactor]) -> String {
    let base = format!("Estimated default probability is {:.2}%. The main decision factors are listed below.",
                       probability * 100.0);
    if matches!(mode, ExplanationMode::Brief) {
        return base;
    }

    let details: Vec<String> = factors.iter()
                                      .map(|f| format!("{}: contribution {:+.3}", f.feature, f.impact))
                                      .collect();
    let details = details.join("; ");
    match mode {
        ExplanationMode::Policy => {
            format!("{} The decision is based on interpretable factors without discriminatory attributes. {}",
                    base, details)
        }
        _ => format!("{} Factor breakdown: {}", base, details),
    }
}

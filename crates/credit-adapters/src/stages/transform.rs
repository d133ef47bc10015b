//! TransformFeaturesStage (Transform con señal de checksum)
//!
//! Deriva la columna categórica `risk_bucket` binned desde
//! `debt_to_income`; un valor fuera de los intervalos queda como `null`
//! (decisión pass-through, igual que el corte de referencia). El checksum
//! se calcula sobre los bytes exactos del CSV materializado de la tabla de
//! salida, de modo que una relectura de los mismos bytes reproduce el
//! digest y delata mutaciones silenciosas del storage entre escritura y
//! verificación.

use credit_core::errors::EngineError;
use credit_core::model::RunContext;
use credit_core::stage::{StageKind, StageRunResultTyped, StageSignal, TypedStage};
use serde_json::{json, Value};

use crate::artifacts::{CleanTableArtifact, FeatureTableArtifact};
use credit_domain::RiskBucket;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TransformParams {}

#[derive(Clone, Debug, Default)]
pub struct TransformFeaturesStage;

impl TransformFeaturesStage {
    pub fn new() -> Self {
        Self
    }
}

impl TypedStage for TransformFeaturesStage {
    type Params = TransformParams;
    type Input = CleanTableArtifact;
    type Output = FeatureTableArtifact;

    fn id(&self) -> &'static str {
        "transform_features"
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, input: Option<Self::Input>, _params: Self::Params, _meta: &RunContext) -> StageRunResultTyped<Self::Output> {
        let artifact = match input {
            Some(a) => a,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInputs },
        };

        let buckets: Vec<Value> = artifact.table
                                          .rows()
                                          .iter()
                                          .map(|row| {
                                              row.get("debt_to_income")
                                                 .and_then(Value::as_f64)
                                                 .and_then(RiskBucket::classify)
                                                 .map(|b| Value::String(b.label().to_string()))
                                                 .unwrap_or(Value::Null)
                                          })
                                          .collect();

        let table = match artifact.table.with_column("risk_bucket", buckets) {
            Ok(t) => t,
            Err(e) => return StageRunResultTyped::Failure { error: EngineError::Internal(e.to_string()) },
        };

        // Digest sobre los bytes materializados, una sola vez por transform.
        let checksum = table.content_digest();

        StageRunResultTyped::SuccessWithSignals {
            outputs: vec![FeatureTableArtifact { table,
                                                 checksum: checksum.clone(),
                                                 schema_version: 1 }],
            signals: vec![StageSignal::new("features_checksum", json!(checksum))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_domain::{Schema, Table};

    fn clean_artifact(dti_values: &[Value]) -> CleanTableArtifact {
        let columns = Schema::credit_v1().columns().to_vec();
        let rows = dti_values.iter()
                             .enumerate()
                             .map(|(i, dti)| {
                                 [("client_id", json!(i + 1)),
                                  ("age", json!(30)),
                                  ("income", json!(50000)),
                                  ("debt_to_income", dti.clone()),
                                  ("bki_request_cnt", json!(1)),
                                  ("app_date", json!("2026-02-18"))].iter()
                                                                    .map(|(k, v)| (k.to_string(), v.clone()))
                                                                    .collect()
                             })
                             .collect();
        CleanTableArtifact { table: Table::new(columns, rows).unwrap(),
                             schema_version: 1 }
    }

    fn run(artifact: CleanTableArtifact) -> FeatureTableArtifact {
        match TransformFeaturesStage::new().run_typed(Some(artifact), TransformParams::default(), &RunContext::new()) {
            StageRunResultTyped::SuccessWithSignals { mut outputs, .. } => outputs.remove(0),
            _ => panic!("transform debe producir un output"),
        }
    }

    #[test]
    fn buckets_follow_half_open_bins() {
        let out = run(clean_artifact(&[json!(0.31), json!(0.55)]));
        assert_eq!(out.table.value(0, "risk_bucket"), Some(&json!("medium")));
        assert_eq!(out.table.value(1, "risk_bucket"), Some(&json!("high")));
    }

    #[test]
    fn out_of_range_value_passes_through_as_null() {
        let out = run(clean_artifact(&[json!(1.7)]));
        assert_eq!(out.table.value(0, "risk_bucket"), Some(&Value::Null));
    }

    #[test]
    fn checksum_is_deterministic_per_content() {
        let a = run(clean_artifact(&[json!(0.31)]));
        let b = run(clean_artifact(&[json!(0.31)]));
        let c = run(clean_artifact(&[json!(0.32)]));
        assert_eq!(a.checksum, b.checksum);
        assert_ne!(a.checksum, c.checksum);
        assert_eq!(a.checksum, a.table.content_digest());
    }
}

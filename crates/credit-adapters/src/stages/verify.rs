//! PostLoadChecksStage (Check final)
//!
//! Cruza los metadatos propagados por etapas previas:
//! - `row_count` (de la validación): si es menor a 1 la corrida falla con
//!   `IntegrityFailure` (guarda de dataset vacío).
//! - `features_checksum` (del transform) contra el checksum que el recibo
//!   de carga registró. La comparación es por igualdad textual, sin
//!   recomputar el digest: recalcularlo ocultaría justamente la divergencia
//!   entre lo escrito y lo leído que se busca detectar. Una discrepancia se
//!   reporta (`checksum_match: false` + señal `checksum_divergence`) pero
//!   no detiene la corrida.

use credit_core::errors::EngineError;
use credit_core::model::RunContext;
use credit_core::stage::{StageKind, StageRunResultTyped, StageSignal, TypedStage};
use log::warn;
use serde_json::json;

use crate::artifacts::{LoadReceiptArtifact, VerificationReportArtifact};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct VerifyParams {}

#[derive(Clone, Debug, Default)]
pub struct PostLoadChecksStage;

impl PostLoadChecksStage {
    pub fn new() -> Self {
        Self
    }
}

impl TypedStage for PostLoadChecksStage {
    type Params = VerifyParams;
    type Input = LoadReceiptArtifact;
    type Output = VerificationReportArtifact;

    fn id(&self) -> &'static str {
        "post_load_checks"
    }

    fn kind(&self) -> StageKind {
        StageKind::Check
    }

    fn run_typed(&self, input: Option<Self::Input>, _params: Self::Params, meta: &RunContext) -> StageRunResultTyped<Self::Output> {
        let receipt = match input {
            Some(a) => a,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInputs },
        };

        let row_count = match meta.get_u64("row_count") {
            Some(n) => n,
            None => {
                return StageRunResultTyped::Failure { error: EngineError::IntegrityFailure { reason: "row_count ausente en el contexto de corrida".to_string() } }
            }
        };
        if row_count < 1 {
            return StageRunResultTyped::Failure { error: EngineError::IntegrityFailure { reason: "no rows processed".to_string() } };
        }

        let expected = match meta.get_str("features_checksum") {
            Some(c) => c.to_string(),
            None => {
                return StageRunResultTyped::Failure { error: EngineError::IntegrityFailure { reason: "features_checksum ausente en el contexto de corrida".to_string() } }
            }
        };

        let checksum_match = receipt.checksum == expected;
        let report = VerificationReportArtifact { row_count,
                                                  checksum: expected.clone(),
                                                  checksum_match,
                                                  schema_version: 1 };

        if checksum_match {
            StageRunResultTyped::Success { outputs: vec![report] }
        } else {
            warn!("checksum divergence: expected {} recorded {}", expected, receipt.checksum);
            StageRunResultTyped::SuccessWithSignals {
                outputs: vec![report],
                signals: vec![StageSignal::new("checksum_divergence",
                                               json!({ "expected": expected, "recorded": receipt.checksum }))],
            }
        }
    }
}

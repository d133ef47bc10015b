//! LoadStage (Sink hacia el colaborador externo de carga)
//!
//! El destino real (warehouse, archivo) queda detrás del trait
//! `LoadAdapter`: el pipeline solo necesita un contrato síncrono de
//! llamada-y-acuse. El stage registra el resumen en el contexto
//! (`load_summary`) y emite un recibo con el checksum que el destino
//! registró. Un fallo del adapter es terminal (`UpstreamService`); no hay
//! reintentos.

use credit_core::errors::EngineError;
use credit_core::model::RunContext;
use credit_core::stage::{StageKind, StageRunResultTyped, StageSignal, TypedStage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artifacts::{FeatureTableArtifact, LoadReceiptArtifact};
use credit_domain::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loaded,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Loaded => "loaded",
            LoadStatus::Failed => "failed",
        }
    }
}

/// Acuse del destino de carga.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub status: LoadStatus,
    pub destination: String,
    /// Checksum tal como lo registró el destino; en el prototipo es un
    /// passthrough del recibido.
    pub recorded_checksum: String,
}

/// Colaborador externo de carga: contrato de llamada-y-acuse.
pub trait LoadAdapter {
    fn load(&self, features: &Table, checksum: &str) -> Result<LoadSummary, String>;
}

/// Adapter prototipo: no conecta a ningún warehouse; acusa recibo con un
/// destino fijo y registra el checksum sin alterarlo.
#[derive(Clone, Debug)]
pub struct PrototypeLoadAdapter {
    pub destination: String,
}

impl Default for PrototypeLoadAdapter {
    fn default() -> Self {
        Self { destination: "dwh://credit_features".to_string() }
    }
}

impl LoadAdapter for PrototypeLoadAdapter {
    fn load(&self, _features: &Table, checksum: &str) -> Result<LoadSummary, String> {
        Ok(LoadSummary { status: LoadStatus::Loaded,
                         destination: self.destination.clone(),
                         recorded_checksum: checksum.to_string() })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadParams {}

#[derive(Clone, Debug)]
pub struct LoadStage<A: LoadAdapter> {
    adapter: A,
}

impl<A: LoadAdapter> LoadStage<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }
}

impl Default for LoadStage<PrototypeLoadAdapter> {
    fn default() -> Self {
        Self::new(PrototypeLoadAdapter::default())
    }
}

impl<A> TypedStage for LoadStage<A> where A: LoadAdapter + Clone + std::fmt::Debug + 'static
{
    type Params = LoadParams;
    type Input = FeatureTableArtifact;
    type Output = LoadReceiptArtifact;

    fn id(&self) -> &'static str {
        "load_dwh"
    }

    fn kind(&self) -> StageKind {
        StageKind::Sink
    }

    fn run_typed(&self, input: Option<Self::Input>, _params: Self::Params, _meta: &RunContext) -> StageRunResultTyped<Self::Output> {
        let artifact = match input {
            Some(a) => a,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInputs },
        };

        match self.adapter.load(&artifact.table, &artifact.checksum) {
            Ok(summary) => {
                let data = serde_json::to_value(&summary).unwrap_or(Value::Null);
                StageRunResultTyped::SuccessWithSignals {
                    outputs: vec![LoadReceiptArtifact { status: summary.status.as_str().to_string(),
                                                        destination: summary.destination,
                                                        checksum: summary.recorded_checksum,
                                                        schema_version: 1 }],
                    signals: vec![StageSignal::new("load_summary", data)],
                }
            }
            Err(reason) => StageRunResultTyped::Failure { error: EngineError::UpstreamService(reason) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_domain::Schema;

    fn features() -> FeatureTableArtifact {
        let table = Table::empty(Schema::credit_v1().columns().to_vec());
        let checksum = table.content_digest();
        FeatureTableArtifact { table, checksum, schema_version: 1 }
    }

    #[test]
    fn prototype_adapter_acknowledges_and_echoes_checksum() {
        let artifact = features();
        let expected = artifact.checksum.clone();
        let result = LoadStage::new(PrototypeLoadAdapter::default()).run_typed(Some(artifact), LoadParams::default(), &RunContext::new());
        match result {
            StageRunResultTyped::SuccessWithSignals { outputs, signals } => {
                assert_eq!(outputs[0].status, "loaded");
                assert_eq!(outputs[0].destination, "dwh://credit_features");
                assert_eq!(outputs[0].checksum, expected);
                assert_eq!(signals[0].key, "load_summary");
            }
            _ => panic!("se esperaba acuse de carga"),
        }
    }

    #[derive(Clone, Debug)]
    struct UnreachableAdapter;
    impl LoadAdapter for UnreachableAdapter {
        fn load(&self, _features: &Table, _checksum: &str) -> Result<LoadSummary, String> {
            Err("dwh unreachable".to_string())
        }
    }

    #[test]
    fn adapter_failure_maps_to_upstream_service() {
        let result = LoadStage::new(UnreachableAdapter).run_typed(Some(features()), LoadParams::default(), &RunContext::new());
        match result {
            StageRunResultTyped::Failure { error } => {
                assert_eq!(error, EngineError::UpstreamService("dwh unreachable".to_string()));
            }
            _ => panic!("se esperaba fallo upstream"),
        }
    }
}

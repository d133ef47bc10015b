//! ValidateSchemaStage (Check, compuerta dura)
//!
//! Comprueba que la tabla cruda contenga todas las columnas requeridas por
//! el esquema v1. Si falta alguna, la corrida se detiene con
//! `SchemaMismatch` cargando los nombres exactos; si no, re-emite la tabla
//! sin cambios y señala `row_count` para las etapas posteriores.
//!
//! Implementa `TypedStage` a mano porque puede fallar y emite señales, dos
//! cosas que el macro `typed_stage!` no cubre.

use credit_core::errors::EngineError;
use credit_core::model::RunContext;
use credit_core::stage::{StageKind, StageRunResultTyped, StageSignal, TypedStage};
use serde_json::json;

use crate::artifacts::RawTableArtifact;
use credit_domain::Schema;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ValidateParams {}

#[derive(Clone, Debug, Default)]
pub struct ValidateSchemaStage;

impl ValidateSchemaStage {
    pub fn new() -> Self {
        Self
    }
}

impl TypedStage for ValidateSchemaStage {
    type Params = ValidateParams;
    type Input = RawTableArtifact;
    type Output = RawTableArtifact;

    fn id(&self) -> &'static str {
        "validate_schema"
    }

    fn kind(&self) -> StageKind {
        StageKind::Check
    }

    fn run_typed(&self, input: Option<Self::Input>, _params: Self::Params, _meta: &RunContext) -> StageRunResultTyped<Self::Output> {
        let artifact = match input {
            Some(a) => a,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInputs },
        };

        match Schema::credit_v1().check(&artifact.table) {
            Ok(row_count) => StageRunResultTyped::SuccessWithSignals {
                outputs: vec![artifact],
                signals: vec![StageSignal::new("row_count", json!(row_count))],
            },
            Err(missing) => StageRunResultTyped::Failure { error: EngineError::SchemaMismatch { missing } },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_domain::Table;

    #[test]
    fn missing_columns_fail_with_exact_set() {
        let artifact = RawTableArtifact { table: Table::empty(vec!["client_id".into()]),
                                          schema_version: 1 };
        let result = ValidateSchemaStage::new().run_typed(Some(artifact), ValidateParams::default(), &RunContext::new());
        match result {
            StageRunResultTyped::Failure { error: EngineError::SchemaMismatch { missing } } => {
                assert_eq!(missing,
                           vec!["age".to_string(),
                                "income".to_string(),
                                "debt_to_income".to_string(),
                                "bki_request_cnt".to_string(),
                                "app_date".to_string()]);
            }
            _ => panic!("se esperaba SchemaMismatch"),
        }
    }

    #[test]
    fn valid_table_signals_row_count() {
        let table = Table::empty(credit_domain::Schema::credit_v1().columns().to_vec());
        let artifact = RawTableArtifact { table, schema_version: 1 };
        let result = ValidateSchemaStage::new().run_typed(Some(artifact), ValidateParams::default(), &RunContext::new());
        match result {
            StageRunResultTyped::SuccessWithSignals { signals, .. } => {
                assert_eq!(signals.len(), 1);
                assert_eq!(signals[0].key, "row_count");
                assert_eq!(signals[0].data, json!(0));
            }
            _ => panic!("se esperaba éxito con señal row_count"),
        }
    }
}

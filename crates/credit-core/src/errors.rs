//! Errores del core.
//!
//! El enum es serializable porque viaja dentro de los eventos
//! (`StageFailed` lo embebe tal cual) y el replay debe reconstruirlo.
//! La taxonomía distingue los fallos de orquestación (índices, inputs,
//! stop-on-failure) de las compuertas de datos: `SchemaMismatch` e
//! `IntegrityFailure` siempre detienen la corrida.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("run already completed")] RunCompleted,
    #[error("invalid stage index")] InvalidStageIndex,
    #[error("stage already terminal")] StageAlreadyTerminal,
    #[error("missing required inputs")] MissingInputs,
    #[error("first stage must be source kind")] FirstStageMustBeSource,
    #[error("run has failed previously (stop-on-failure invariant)")] RunHasFailed,
    #[error("missing required columns: {missing:?}")] SchemaMismatch { missing: Vec<String> },
    #[error("integrity failure: {reason}")] IntegrityFailure { reason: String },
    #[error("upstream service error: {0}")] UpstreamService(String),
    #[error("internal: {0}")] Internal(String),
}

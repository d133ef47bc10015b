use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::EngineError, model::Artifact};

/// Metadato liviano emitido por un stage. El engine lo registra como evento
/// y lo pliega al `RunContext` bajo `key`, donde stages posteriores lo leen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSignal {
    pub key: String,
    pub data: Value,
}

impl StageSignal {
    pub fn new(key: impl Into<String>, data: Value) -> Self {
        Self { key: key.into(), data }
    }
}

/// Resultado abstracto de ejecutar un stage.
pub enum StageRunResult {
    Success { outputs: Vec<Artifact> },
    SuccessWithSignals { outputs: Vec<Artifact>, signals: Vec<StageSignal> },
    Failure { error: EngineError },
}

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Artifact, RunContext};

/// Contexto de ejecución entregado a `StageDefinition::run`.
pub struct ExecutionContext {
    pub input: Option<Artifact>, // Artifact único encadenado (None primer stage)
    pub params: Value,           // parámetros canónicos
    pub meta: RunContext,        // copia de solo lectura del RunContext
}

impl ExecutionContext {
    /// Decodifica los params al tipo concreto del stage.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.params.clone())
    }
}

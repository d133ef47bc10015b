use serde_json::Value;

use super::run_result::StageRunResult;
use crate::model::ExecutionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind { Source, Transform, Sink, Check }

/// Trait que define un Stage. Implementaciones deben ser puras respecto a
/// inputs + params + metadatos del contexto.
pub trait StageDefinition {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str { self.id() }

    /// Parámetros base deterministas (defaults).
    fn base_params(&self) -> Value;

    /// Ejecución pura del stage.
    fn run(&self, ctx: &ExecutionContext) -> StageRunResult;

    /// Tipo general del stage.
    fn kind(&self) -> StageKind;

    /// Hash estable de la definición del stage; entra al fingerprint de
    /// fallos.
    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": self.id(),
            "kind": format!("{:?}", self.kind()),
            "base_params": self.base_params(),
        });
        crate::hashing::hash_value(&hash_input)
    }
}

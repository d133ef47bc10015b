//! Contexto de corrida: metadatos que viajan entre stages.
//!
//! El `RunContext` es el canal de metadatos entre etapas (conteos de filas,
//! checksums, resúmenes de carga). Lo posee el engine: se crea al iniciar
//! una corrida y se descarta al iniciar la siguiente; nunca se persiste.
//! Los stages no lo mutan directamente: escriben a través de señales
//! (`StageSignal`) que el engine registra como evento y pliega aquí, y leen
//! una copia de solo lectura dentro de `ExecutionContext`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunContext {
    entries: BTreeMap<String, Value>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.entries.get(key).and_then(Value::as_u64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descarta todas las entradas. Lo invoca el engine al iniciar una
    /// corrida nueva.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! Tipos de evento de corrida y estructura `RunEvent`.
//!
//! Rol en el pipeline:
//! - Cada ejecución del `RunEngine` emite eventos a un `EventStore`
//!   append-only.
//! - Estos eventos permiten reconstruir el estado del `RunRepository`
//!   (replay) sin depender de estructuras mutables.
//! - El enum `RunEventKind` define el contrato observable y estable del
//!   motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::EngineError;

/// Tipos de eventos soportados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Emisión inicial de una corrida: fija la `definition_hash` y cantidad
    /// de stages. Invariante: debe ser el primer evento de un `run_id`.
    RunInitialized { definition_hash: String, stage_count: usize },
    /// Un stage comenzó su ejecución. No implica éxito.
    StageStarted { stage_index: usize, stage_id: String },
    /// Un stage terminó correctamente, con sus outputs (hashes) y fingerprint.
    StageFinished {
        stage_index: usize,
        stage_id: String,
        outputs: Vec<String>,
        fingerprint: String,
    },
    /// Un stage terminó con error terminal. La corrida no continúa
    /// (stop-on-failure).
    StageFailed {
        stage_index: usize,
        stage_id: String,
        error: EngineError,
        fingerprint: String,
    },
    /// Metadato emitido por un stage. El engine lo registra aquí y lo
    /// pliega al `RunContext` bajo la misma clave.
    StageSignal {
        stage_index: usize,
        stage_id: String,
        key: String,
        data: Value,
    },
    /// Evento de cierre con fingerprint agregado de la corrida (hash de
    /// fingerprints ordenados de stages exitosos).
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por EventStore in-memory (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}

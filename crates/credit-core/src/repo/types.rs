//! Tipos de repositorio: estado reconstruido (RunInstance) y definición
//! (RunDefinition).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! actualiza un `RunInstance` por evento. No almacena artifacts completos
//! (solo hashes) para mantener neutralidad. El `RunInstance` materializa la
//! máquina de estados del orquestador: el cursor indica hasta dónde avanzó
//! la corrida y `failed` es el estado terminal Failed(stage, causa), cuyos
//! detalles quedan en el evento `StageFailed`.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{RunEvent, RunEventKind};
use crate::stage::{StageDefinition, StageStatus};

pub struct RunInstance {
    pub id: Uuid,
    pub stages: Vec<StageSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de un stage en la instancia.
pub struct StageSlot {
    pub stage_id: String,
    pub status: StageStatus,
    pub fingerprint: Option<String>,
    pub outputs: Vec<String>, // solo hashes (los artifacts viven en el store)
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

/// Trait para reconstruir (`replay`) el estado de una corrida a partir de
/// eventos.
pub trait RunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &RunDefinition) -> RunInstance;
}

/// Definición inmutable del pipeline.
pub struct RunDefinition {
    pub stages: Vec<Box<dyn StageDefinition>>,
    pub definition_hash: String,
}

impl RunDefinition {
    pub fn new(stages: Vec<Box<dyn StageDefinition>>, definition_hash: String) -> Self {
        Self { stages, definition_hash }
    }
    pub fn len(&self) -> usize {
        self.stages.len()
    }
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

pub struct InMemoryRunRepository;
impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InMemoryRunRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &RunDefinition) -> RunInstance {
        let mut stages: Vec<StageSlot> = definition.stages
                                                   .iter()
                                                   .map(|s| StageSlot { stage_id: s.id().to_string(),
                                                                        status: StageStatus::Pending,
                                                                        fingerprint: None,
                                                                        outputs: vec![],
                                                                        started_at: None,
                                                                        finished_at: None,
                                                                        attempts: 0 })
                                                   .collect();
        let mut completed = false;
        let mut failed = false;
        for ev in events {
            match &ev.kind {
                RunEventKind::RunInitialized { .. } => {}
                RunEventKind::StageStarted { stage_index, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Running;
                        slot.started_at = Some(ev.ts);
                        slot.attempts += 1;
                    }
                }
                RunEventKind::StageFinished { stage_index,
                                              fingerprint,
                                              outputs,
                                              .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::FinishedOk;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.outputs = outputs.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageFailed { stage_index, fingerprint, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                    failed = true;
                }
                RunEventKind::RunCompleted { .. } => completed = true,
                RunEventKind::StageSignal { .. } => {}
            }
        }
        let cursor = stages.iter()
                           .position(|s| matches!(s.status, StageStatus::Pending))
                           .unwrap_or(stages.len());
        RunInstance { id: run_id,
                      stages,
                      cursor,
                      completed,
                      failed }
    }
}

pub fn build_run_definition(stage_ids: &[&str], stages: Vec<Box<dyn StageDefinition>>) -> RunDefinition {
    use crate::hashing::{hash_str, to_canonical_json};
    use serde_json::json;
    let ids_json = json!(stage_ids);
    let canonical = to_canonical_json(&ids_json);
    let definition_hash = hash_str(&canonical);
    RunDefinition::new(stages, definition_hash)
}

/// Builder alternativo: recibe directamente los stages y extrae sus ids en
/// orden. Evita mantener a mano el arreglo `stage_ids`.
pub fn build_run_definition_auto(stages: Vec<Box<dyn StageDefinition>>) -> RunDefinition {
    let ids: Vec<String> = stages.iter().map(|s| s.id().to_string()).collect();
    let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
    build_run_definition(&id_refs, stages)
}

//! Core RunEngine implementation

use crate::engine::EngineBuilderInit;
use crate::errors::EngineError;
use crate::event::{EventStore, RunEventKind};
use crate::hashing::hash_value;
use crate::model::{Artifact, ExecutionContext, RunContext};
use crate::repo::{RunDefinition, RunRepository};
use crate::store::{ArtifactLocator, ArtifactStore, InMemoryArtifactStore};
use crate::StageDefinition;
use log::{debug, info, warn};
use serde_json::json;
use uuid::Uuid;

/// Motor de ejecución del pipeline.
///
/// Orquesta los stages en orden estricto, mantiene el estado por replay de
/// eventos y garantiza determinismo mediante fingerprints. Posee el
/// `RunContext` de la corrida (se crea al iniciar y se descarta al iniciar
/// la siguiente) y el store de artifacts intermedios, direccionado por
/// `(run_id, stage)`.
pub struct RunEngine<E, R>
    where E: EventStore,
          R: RunRepository
{
    event_store: E,
    repository: R,
    artifact_store: InMemoryArtifactStore,
    run_context: RunContext,
    default_run_id: Option<Uuid>,
    default_definition: Option<RunDefinition>,
}

impl<E, R> RunEngine<E, R>
    where E: EventStore,
          R: RunRepository
{
    /// Crea un nuevo builder para configurar el engine
    #[inline]
    pub fn builder(event_store: E, repository: R) -> EngineBuilderInit<E, R> {
        EngineBuilderInit { event_store, repository }
    }

    /// Crea un nuevo engine con stores en memoria
    #[inline]
    pub fn new() -> EngineBuilderInit<crate::event::InMemoryEventStore, crate::repo::InMemoryRunRepository> {
        EngineBuilderInit { event_store: crate::event::InMemoryEventStore::default(),
                            repository: crate::repo::InMemoryRunRepository::new() }
    }

    /// Crea un nuevo motor con los stores proporcionados
    pub fn new_with_stores(event_store: E, repository: R) -> Self {
        Self { event_store,
               repository,
               artifact_store: InMemoryArtifactStore::default(),
               run_context: RunContext::new(),
               default_run_id: None,
               default_definition: None }
    }

    /// Acceso de lectura al store de eventos.
    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Vista del `RunContext` acumulado por la corrida en curso.
    pub fn run_context(&self) -> &RunContext {
        &self.run_context
    }

    /// Recupera un artifact por locator.
    pub fn artifact(&self, locator: &ArtifactLocator) -> Option<Artifact> {
        self.artifact_store.get(locator)
    }

    /// Recupera el artifact producido por un stage de una corrida.
    pub fn artifact_for_stage(&self, run_id: Uuid, stage_id: &str) -> Option<Artifact> {
        self.artifact_store.get(&ArtifactLocator::new(run_id, stage_id))
    }

    /// Asegura que exista un RunInitialized y retorna los eventos actuales
    /// de la corrida (incluyendo el recién agregado si corresponde). Al
    /// inicializar una corrida nueva se descarta el RunContext anterior.
    fn load_or_init(&mut self, run_id: Uuid, definition: &RunDefinition) -> Vec<crate::event::RunEvent> {
        let mut events = self.event_store.list(run_id);
        let has_init = events.iter().any(|e| matches!(e.kind, RunEventKind::RunInitialized { .. }));
        if !has_init {
            self.run_context.clear();
            let ev = self.event_store
                         .append_kind(run_id,
                                      RunEventKind::RunInitialized { definition_hash: definition.definition_hash.clone(),
                                                                     stage_count: definition.len() });
            info!("run {} initialized with {} stages", run_id, definition.len());
            events.push(ev);
        }
        self.default_run_id = Some(run_id);
        events
    }

    /// Define/genera un `run_id` por defecto si no existe aún y lo retorna.
    pub fn ensure_default_run_id(&mut self) -> Uuid {
        match self.default_run_id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                self.default_run_id = Some(id);
                id
            }
        }
    }

    /// Fija explícitamente un `run_id` por defecto.
    pub fn set_default_run_id(&mut self, run_id: Uuid) {
        self.default_run_id = Some(run_id);
    }

    /// Obtiene el `run_id` por defecto si está configurado.
    pub fn default_run_id(&self) -> Option<Uuid> {
        self.default_run_id
    }

    fn hash_and_store_outputs(&mut self, run_id: Uuid, stage_id: &str, outputs: &mut [Artifact]) -> Vec<String> {
        let mut hashes: Vec<String> = Vec::with_capacity(outputs.len());
        for o in outputs.iter_mut() {
            let h = hash_value(&o.payload);
            o.hash = h.clone();
            self.artifact_store.put(run_id, stage_id, o.clone());
            hashes.push(h);
        }
        hashes
    }

    /// Ejecuta el pipeline completo y retorna el ID de la corrida
    ///
    /// # Ejemplo
    /// ```ignore
    /// let run_id = engine.run()?;
    /// ```
    pub fn run(&mut self) -> Result<Uuid, EngineError> {
        self.run_to_completion()
    }

    /// Avanza un stage en la ejecución del pipeline
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.next()
    }

    /// Configura la definición por defecto del pipeline
    pub fn set_default_definition(&mut self, definition: RunDefinition) {
        self.default_definition = Some(definition);
    }

    /// Ejecuta el pipeline completo usando la definición por defecto
    pub fn run_to_completion(&mut self) -> Result<Uuid, EngineError> {
        let run_id = self.ensure_default_run_id();
        let def = self.default_definition
                      .take()
                      .ok_or_else(|| EngineError::Internal("no default definition configured".into()))?;

        let result = self.run_for(run_id, &def);
        self.default_definition = Some(def);
        result
    }

    /// Ejecuta una corrida específica hasta su finalización
    pub fn run_for(&mut self, run_id: Uuid, definition: &RunDefinition) -> Result<Uuid, EngineError> {
        loop {
            match self.next_with(run_id, definition) {
                Ok(()) => continue,
                Err(EngineError::RunCompleted) => return Ok(run_id),
                Err(e) => return Err(e),
            }
        }
    }

    /// Ejecuta el siguiente stage pendiente de la corrida
    pub(crate) fn next_with(&mut self, run_id: Uuid, definition: &RunDefinition) -> Result<(), EngineError> {
        let events = self.load_or_init(run_id, definition);
        let instance = self.repository.load(run_id, &events, definition);

        if instance.completed {
            return Err(EngineError::RunCompleted);
        }
        if instance.failed {
            // Stop-on-failure: una corrida fallida no se reanuda; una nueva
            // corrida arranca desde el primer stage.
            return Err(EngineError::RunHasFailed);
        }

        let cursor = instance.cursor;
        if cursor >= definition.len() {
            return Err(EngineError::RunCompleted);
        }

        let stage_def = &definition.stages[cursor];
        let input = if cursor == 0 {
            None
        } else {
            let prev_id = definition.stages[cursor - 1].id();
            self.artifact_store.get(&ArtifactLocator::new(run_id, prev_id))
        };

        let ctx = ExecutionContext { input,
                                     params: stage_def.base_params(),
                                     meta: self.run_context.clone() };

        let _started = self.event_store.append_kind(run_id,
                                                    RunEventKind::StageStarted { stage_index: cursor,
                                                                                 stage_id: stage_def.id().to_string() });
        debug!("run {} stage {} started", run_id, stage_def.id());

        let run_res = stage_def.run(&ctx);

        match run_res {
            crate::stage::StageRunResult::Success { outputs } => {
                self.handle_stage_success(run_id, cursor, stage_def.as_ref(), outputs, Vec::new(), definition)
            }
            crate::stage::StageRunResult::SuccessWithSignals { outputs, signals } => {
                self.handle_stage_success(run_id, cursor, stage_def.as_ref(), outputs, signals, definition)
            }
            crate::stage::StageRunResult::Failure { error } => self.handle_stage_failure(run_id, cursor, stage_def.as_ref(), error),
        }
    }

    fn handle_stage_success(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            mut outputs: Vec<Artifact>,
                            signals: Vec<crate::stage::StageSignal>,
                            definition: &RunDefinition)
                            -> Result<(), EngineError> {
        let output_hashes = self.hash_and_store_outputs(run_id, stage_def.id(), &mut outputs);

        for s in signals {
            self.run_context.insert(s.key.clone(), s.data.clone());
            let _ = self.event_store.append_kind(run_id,
                                                 RunEventKind::StageSignal { stage_index: cursor,
                                                                             stage_id: stage_def.id().to_string(),
                                                                             key: s.key,
                                                                             data: s.data });
        }

        let fp = self.calculate_stage_fingerprint(cursor, stage_def, &output_hashes, definition);

        let _finished = self.event_store.append_kind(run_id,
                                                     RunEventKind::StageFinished { stage_index: cursor,
                                                                                   stage_id: stage_def.id().to_string(),
                                                                                   outputs: output_hashes.clone(),
                                                                                   fingerprint: fp.clone() });
        debug!("run {} stage {} finished", run_id, stage_def.id());

        if cursor + 1 == definition.len() {
            self.complete_run(run_id, definition);
        }

        Ok(())
    }

    fn handle_stage_failure(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            error: EngineError)
                            -> Result<(), EngineError> {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": stage_def.definition_hash(),
            "stage_index": cursor,
            "params": stage_def.base_params()
        });
        let fp = hash_value(&fp_json);

        warn!("run {} stage {} failed: {}", run_id, stage_def.id(), error);
        let _ = self.event_store.append_kind(run_id,
                                             RunEventKind::StageFailed { stage_index: cursor,
                                                                         stage_id: stage_def.id().to_string(),
                                                                         error: error.clone(),
                                                                         fingerprint: fp });

        Err(error)
    }

    fn calculate_stage_fingerprint(&self,
                                   cursor: usize,
                                   stage_def: &dyn StageDefinition,
                                   output_hashes: &[String],
                                   definition: &RunDefinition)
                                   -> String {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": definition.definition_hash,
            "stage_index": cursor,
            "output_hashes": output_hashes,
            "params": stage_def.base_params()
        });
        hash_value(&fp_json)
    }

    fn complete_run(&mut self, run_id: Uuid, definition: &RunDefinition) {
        let events = self.event_store.list(run_id);
        let stage_fps: Vec<String> = events.iter()
                                           .filter_map(|e| match &e.kind {
                                               RunEventKind::StageFinished { fingerprint, .. } => Some(fingerprint.clone()),
                                               _ => None,
                                           })
                                           .collect();

        let run_fp = hash_value(&json!({
                                    "engine_version": crate::constants::ENGINE_VERSION,
                                    "definition_hash": definition.definition_hash,
                                    "stage_fingerprints": stage_fps
                                }));

        info!("run {} completed", run_id);
        let _ = self.event_store
                    .append_kind(run_id, RunEventKind::RunCompleted { run_fingerprint: run_fp });
    }

    /// Avanza un stage en la corrida por defecto
    pub fn next(&mut self) -> Result<(), EngineError> {
        let run_id = self.ensure_default_run_id();
        let def = self.default_definition
                      .take()
                      .ok_or_else(|| EngineError::Internal("no default definition configured".into()))?;

        let result = self.next_with(run_id, &def);
        self.default_definition = Some(def);
        result
    }

    /// Lista eventos de la corrida por defecto
    pub fn events(&self) -> Option<Vec<crate::event::RunEvent>> {
        self.default_run_id.map(|rid| self.event_store.list(rid))
    }

    /// Lista eventos de una corrida arbitraria
    pub fn events_for(&self, run_id: Uuid) -> Vec<crate::event::RunEvent> {
        self.event_store.list(run_id)
    }

    /// Variante compacta de eventos para la corrida por defecto
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| {
                         events.iter()
                               .map(|e| match e.kind {
                                   RunEventKind::RunInitialized { .. } => "I",
                                   RunEventKind::StageStarted { .. } => "S",
                                   RunEventKind::StageFinished { .. } => "F",
                                   RunEventKind::StageFailed { .. } => "X",
                                   RunEventKind::StageSignal { .. } => "G",
                                   RunEventKind::RunCompleted { .. } => "C",
                               })
                               .collect()
                     })
    }

    /// Fingerprint de la corrida por defecto si está presente
    pub fn run_fingerprint(&self) -> Option<String> {
        let evs = self.events()?;
        evs.iter().rev().find_map(|e| match &e.kind {
                            RunEventKind::RunCompleted { run_fingerprint } => Some(run_fingerprint.clone()),
                            _ => None,
                        })
    }
}

impl Default for RunEngine<crate::event::InMemoryEventStore, crate::repo::InMemoryRunRepository> {
    fn default() -> Self {
        Self::new_with_stores(crate::event::InMemoryEventStore::default(),
                              crate::repo::InMemoryRunRepository::new())
    }
}

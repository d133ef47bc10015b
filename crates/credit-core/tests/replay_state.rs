//! Replay del estado de una corrida a partir de eventos.

use credit_core::errors::EngineError;
use credit_core::event::{EventStore, InMemoryEventStore, RunEventKind};
use credit_core::repo::{build_run_definition, InMemoryRunRepository, RunRepository};
use credit_core::stage::{StageDefinition, StageKind, StageRunResult, StageStatus};
use uuid::Uuid;

#[derive(Debug)]
struct DummyStage(&'static str);

impl StageDefinition for DummyStage {
    fn id(&self) -> &str { self.0 }
    fn base_params(&self) -> serde_json::Value { serde_json::Value::Null }
    fn run(&self, _ctx: &credit_core::model::ExecutionContext) -> StageRunResult {
        StageRunResult::Success { outputs: vec![] }
    }
    fn kind(&self) -> StageKind { StageKind::Transform }
}

#[test]
fn replay_reconstructs_cursor_and_failure() {
    let def = build_run_definition(&["a", "b"], vec![Box::new(DummyStage("a")), Box::new(DummyStage("b"))]);
    let run_id = Uuid::new_v4();
    let mut store = InMemoryEventStore::default();

    store.append_kind(run_id, RunEventKind::RunInitialized { definition_hash: def.definition_hash.clone(), stage_count: 2 });
    store.append_kind(run_id, RunEventKind::StageStarted { stage_index: 0, stage_id: "a".into() });
    store.append_kind(run_id, RunEventKind::StageFinished { stage_index: 0, stage_id: "a".into(), outputs: vec!["h0".into()], fingerprint: "fp0".into() });

    let events = store.list(run_id);
    let instance = InMemoryRunRepository::new().load(run_id, &events, &def);
    assert_eq!(instance.cursor, 1);
    assert!(!instance.failed);
    assert!(!instance.completed);
    assert_eq!(instance.stages[0].status, StageStatus::FinishedOk);
    assert_eq!(instance.stages[0].outputs, vec!["h0".to_string()]);

    store.append_kind(run_id, RunEventKind::StageStarted { stage_index: 1, stage_id: "b".into() });
    store.append_kind(run_id,
                      RunEventKind::StageFailed { stage_index: 1,
                                                  stage_id: "b".into(),
                                                  error: EngineError::Internal("boom".into()),
                                                  fingerprint: "fp1".into() });

    let events = store.list(run_id);
    let instance = InMemoryRunRepository::new().load(run_id, &events, &def);
    assert!(instance.failed, "StageFailed debe dejar la corrida en estado terminal");
    assert_eq!(instance.stages[1].status, StageStatus::Failed);
    assert_eq!(instance.stages[1].attempts, 1);
}

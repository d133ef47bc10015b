//! Tests de integración del pipeline completo
//! (extract → validate → clean → transform → load → verify).

use credit_adapters::artifacts::{FeatureTableArtifact, RawTableArtifact, VerificationReportArtifact};
use credit_adapters::{CleanDataStage, ExtractRawStage, LoadAdapter, LoadStage, LoadStatus, LoadSummary,
                      PostLoadChecksStage, TransformFeaturesStage, ValidateSchemaStage};
use credit_core::model::ArtifactSpec;
use credit_core::{EngineError, InMemoryEventStore, InMemoryRunRepository, RunEngine, RunEventKind};
use credit_domain::Table;
use serde_json::json;

fn build_engine() -> RunEngine<InMemoryEventStore, InMemoryRunRepository> {
    RunEngine::<InMemoryEventStore, InMemoryRunRepository>::new().first_stage(ExtractRawStage::default())
                                                                 .add_stage(ValidateSchemaStage::new())
                                                                 .add_stage(CleanDataStage::new())
                                                                 .add_stage(TransformFeaturesStage::new())
                                                                 .add_stage(LoadStage::default())
                                                                 .add_stage(PostLoadChecksStage::new())
                                                                 .build()
}

#[test]
fn pipeline_end_to_end_on_sample_dataset() {
    let mut engine = build_engine();
    let run_id = engine.run().expect("la corrida debe completarse");

    // La fila 1 (dti 0.31) cae en (0.3, 0.5] → medium; la fila 2 (0.55) en
    // (0.5, 1.0] → high.
    let features_artifact = engine.artifact_for_stage(run_id, "transform_features").expect("features presentes");
    let features = FeatureTableArtifact::from_artifact(&features_artifact).expect("decode features");
    assert_eq!(features.table.value(0, "risk_bucket"), Some(&json!("medium")));
    assert_eq!(features.table.value(1, "risk_bucket"), Some(&json!("high")));

    // El reporte final cruza row_count=2 con el checksum del transform.
    let report_artifact = engine.artifact_for_stage(run_id, "post_load_checks").expect("reporte presente");
    let report = VerificationReportArtifact::from_artifact(&report_artifact).expect("decode reporte");
    assert_eq!(report.row_count, 2);
    assert!(report.checksum_match);
    assert_eq!(report.checksum, features.checksum);

    // Metadatos propagados por señales.
    assert_eq!(engine.run_context().get_u64("row_count"), Some(2));
    assert_eq!(engine.run_context().get_str("features_checksum"), Some(features.checksum.as_str()));

    let variants = engine.event_variants().expect("variantes presentes");
    assert_eq!(variants.first(), Some(&"I"));
    assert_eq!(variants.last(), Some(&"C"));
}

#[test]
fn pipeline_is_deterministic_across_engines() {
    let mut first = build_engine();
    let mut second = build_engine();
    first.run().expect("run ok");
    second.run().expect("run ok");

    let fp1 = first.run_fingerprint().expect("fp1");
    let fp2 = second.run_fingerprint().expect("fp2");
    assert_eq!(fp1, fp2, "el fingerprint de corrida debe ser reproducible");
    assert_eq!(first.event_variants(), second.event_variants());
}

#[test]
fn empty_dataset_fails_post_load_checks() {
    let mut engine = RunEngine::<InMemoryEventStore, InMemoryRunRepository>::new()
        .first_stage(ExtractRawStage::new("empty".to_string()))
        .add_stage(ValidateSchemaStage::new())
        .add_stage(CleanDataStage::new())
        .add_stage(TransformFeaturesStage::new())
        .add_stage(LoadStage::default())
        .add_stage(PostLoadChecksStage::new())
        .build();

    let result = engine.run();
    assert_eq!(result,
               Err(EngineError::IntegrityFailure { reason: "no rows processed".to_string() }));

    let events = engine.events().expect("eventos presentes");
    assert!(events.iter().any(|e| matches!(&e.kind,
                                           RunEventKind::StageFailed { stage_id, .. } if stage_id == "post_load_checks")));
}

// Source malformado para ejercitar la compuerta de esquema.
credit_core::typed_stage! {
    source LegacyExtractStage {
        id: "extract_raw",
        output: RawTableArtifact,
        params: (),
        run(_me, _p) {{
            RawTableArtifact { table: Table::empty(vec!["client_id".to_string(), "age".to_string()]),
                               schema_version: 1 }
        }}
    }
}

#[test]
fn schema_gate_halts_run_with_missing_columns() {
    let mut engine = RunEngine::<InMemoryEventStore, InMemoryRunRepository>::new()
        .first_stage(LegacyExtractStage::new())
        .add_stage(ValidateSchemaStage::new())
        .build();

    let result = engine.run();
    assert_eq!(result,
               Err(EngineError::SchemaMismatch { missing: vec!["income".to_string(),
                                                               "debt_to_income".to_string(),
                                                               "bki_request_cnt".to_string(),
                                                               "app_date".to_string()] }));

    // La corrida fallida no se reanuda.
    assert_eq!(engine.step(), Err(EngineError::RunHasFailed));
}

#[derive(Clone, Debug)]
struct CorruptingAdapter;

impl LoadAdapter for CorruptingAdapter {
    fn load(&self, _features: &Table, checksum: &str) -> Result<LoadSummary, String> {
        // Registra un checksum distinto al recibido, simulando una mutación
        // silenciosa entre escritura y lectura en el destino.
        Ok(LoadSummary { status: LoadStatus::Loaded,
                         destination: "dwh://corrupt".to_string(),
                         recorded_checksum: format!("{}-tampered", checksum) })
    }
}

#[test]
fn checksum_divergence_is_reported_not_fatal() {
    let mut engine = RunEngine::<InMemoryEventStore, InMemoryRunRepository>::new()
        .first_stage(ExtractRawStage::default())
        .add_stage(ValidateSchemaStage::new())
        .add_stage(CleanDataStage::new())
        .add_stage(TransformFeaturesStage::new())
        .add_stage(LoadStage::new(CorruptingAdapter))
        .add_stage(PostLoadChecksStage::new())
        .build();

    let run_id = engine.run().expect("la divergencia no detiene la corrida");

    let report_artifact = engine.artifact_for_stage(run_id, "post_load_checks").expect("reporte presente");
    let report = VerificationReportArtifact::from_artifact(&report_artifact).expect("decode reporte");
    assert!(!report.checksum_match);

    let events = engine.events_for(run_id);
    assert!(events.iter().any(|e| matches!(&e.kind,
                                           RunEventKind::StageSignal { key, .. } if key == "checksum_divergence")));
}

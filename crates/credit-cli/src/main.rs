use credit_adapters::artifacts::VerificationReportArtifact;
use credit_adapters::{CleanDataStage, ExtractRawStage, LoadStage, PostLoadChecksStage, TransformFeaturesStage,
                      ValidateSchemaStage};
use credit_core::model::ArtifactSpec;
use credit_core::{InMemoryEventStore, InMemoryRunRepository, RunEngine};
use credit_domain::{Decision, FeatureVector};
use credit_services::{score, ScoreRequest};

fn main() {
    // Cargar .env si existe
    let _ = dotenvy::dotenv();
    // CLI mínima:
    //   credit-cli run [--dataset <NAME>]
    //   credit-cli score [--application <ID>] [--feature k=v]...
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "run" {
        let mut dataset = String::new();
        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--dataset" => {
                    i += 1;
                    if i < args.len() { dataset = args[i].clone(); }
                }
                _ => {}
            }
            i += 1;
        }

        let mut engine = RunEngine::<InMemoryEventStore, InMemoryRunRepository>::new()
            .first_stage(ExtractRawStage::new(dataset))
            .add_stage(ValidateSchemaStage::new())
            .add_stage(CleanDataStage::new())
            .add_stage(TransformFeaturesStage::new())
            .add_stage(LoadStage::default())
            .add_stage(PostLoadChecksStage::new())
            .build();

        match engine.run() {
            Ok(run_id) => {
                let variants = engine.event_variants().unwrap_or_default();
                println!("run {} completada: eventos {:?}", run_id, variants);
                if let Some(fp) = engine.run_fingerprint() {
                    println!("fingerprint: {}", fp);
                }
                match engine.artifact_for_stage(run_id, "post_load_checks")
                            .and_then(|a| VerificationReportArtifact::from_artifact(&a).ok())
                {
                    Some(report) => {
                        println!("verificación: filas={} checksum={} match={}",
                                 report.row_count, report.checksum, report.checksum_match);
                        std::process::exit(0);
                    }
                    None => {
                        eprintln!("[credit run] reporte de verificación ausente");
                        std::process::exit(5);
                    }
                }
            }
            Err(e) => {
                eprintln!("[credit run] corrida fallida: {e}");
                if let Some(events) = engine.events() {
                    for ev in events {
                        if let credit_core::RunEventKind::StageFailed { stage_id, error, .. } = ev.kind {
                            eprintln!("[credit run] stage {stage_id}: {error}");
                        }
                    }
                }
                std::process::exit(4);
            }
        }
    } else if args.len() >= 2 && args[1] == "score" {
        let mut application: Option<i64> = None;
        let mut features = FeatureVector::new();
        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--application" => {
                    i += 1;
                    if i < args.len() {
                        match args[i].parse::<i64>() {
                            Ok(id) => application = Some(id),
                            Err(_) => {
                                eprintln!("[credit score] id inválido: {}", args[i]);
                                std::process::exit(3);
                            }
                        }
                    }
                }
                "--feature" => {
                    i += 1;
                    if i < args.len() {
                        match args[i].split_once('=') {
                            Some((name, raw)) => match raw.parse::<f64>() {
                                Ok(value) => features.insert(name, value),
                                Err(_) => {
                                    eprintln!("[credit score] valor inválido para {}: {}", name, raw);
                                    std::process::exit(3);
                                }
                            },
                            None => {
                                eprintln!("[credit score] se esperaba k=v, llegó: {}", args[i]);
                                std::process::exit(3);
                            }
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }

        match score(&ScoreRequest { application_id: application, features }) {
            Ok(response) => {
                let decision = Decision::from_probability(response.default_probability);
                match serde_json::to_string_pretty(&response) {
                    Ok(body) => println!("{body}"),
                    Err(e) => {
                        eprintln!("[credit score] error serializando respuesta: {e}");
                        std::process::exit(5);
                    }
                }
                println!("decision: {decision}");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("[credit score] rechazado ({}): {e}", e.status_code());
                std::process::exit(4);
            }
        }
    } else {
        println!("credit-cli: use 'run' or 'score' subcommands");
        eprintln!("Uso: credit-cli run [--dataset <NAME>]");
        eprintln!("     credit-cli score [--application <ID>] [--feature k=v]...");
        std::process::exit(2);
    }
}

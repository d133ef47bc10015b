//! credit-adapters: stages concretos del pipeline de features de crédito.
//!
//! Cada stage adapta una operación del dominio (`credit-domain`) a la
//! interfaz neutral del motor (`credit-core`). El encadenado es estricto:
//! extract → validate → clean → transform → load → verify, y ningún stage
//! llama a otro directamente; los metadatos viajan por señales plegadas al
//! `RunContext`.

pub mod artifacts;
pub mod stages;

pub use stages::clean::CleanDataStage;
pub use stages::extract::ExtractRawStage;
pub use stages::load::{LoadAdapter, LoadStage, LoadStatus, LoadSummary, PrototypeLoadAdapter};
pub use stages::transform::TransformFeaturesStage;
pub use stages::validate::ValidateSchemaStage;
pub use stages::verify::PostLoadChecksStage;

//! Definiciones relacionadas a Stages.
//!
//! Un Stage es una unidad determinista que transforma a lo sumo un
//! `Artifact` de entrada en 0..n artifacts de salida. Este módulo define:
//! - `StageDefinition`: interfaz neutral usada por el engine.
//! - `TypedStage`: interfaz de alto nivel (opcional) con tipos fuertes.
//! - `StageRunResult` y señales (`StageSignal`).
//! - `Pipe` para construir pipelines tipados que validan IO en compilación.

pub mod definition;
pub mod macros; // macros para artifacts y stages tipados
pub mod pipeline;
mod run_result;
mod status;
pub mod typed;

pub use definition::{StageDefinition, StageKind};
pub use pipeline::{Pipe, SameAs};
pub use run_result::{StageRunResult, StageSignal};
pub use status::StageStatus;
pub use typed::{StageRunResultTyped, TypedStage};

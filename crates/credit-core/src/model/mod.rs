//! Modelos neutrales (Artifact, RunContext, ExecutionContext,...)

pub mod artifact;
pub mod context;
pub mod run_context;
pub mod typed_artifact;

pub use artifact::{Artifact, ArtifactKind};
pub use context::ExecutionContext;
pub use run_context::RunContext;
pub use typed_artifact::{ArtifactDecodeError, ArtifactSpec};

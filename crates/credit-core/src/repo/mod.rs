pub mod types;
pub use types::{RunInstance, RunRepository, StageSlot};
pub use types::{build_run_definition, build_run_definition_auto, InMemoryRunRepository, RunDefinition};

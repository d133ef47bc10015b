//! Engine module for RunEngine implementation
//!
//! Provides the core engine, builder pattern, and run handle for
//! deterministic pipeline execution.

pub mod builder;
pub mod core;
pub mod run_ctx;

pub use builder::{EngineBuilder, EngineBuilderInit};
pub use core::RunEngine;
pub use run_ctx::RunCtx;

pub use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use crate::repo::{InMemoryRunRepository, RunDefinition, RunRepository};
pub use crate::stage::{StageRunResult, StageStatus};

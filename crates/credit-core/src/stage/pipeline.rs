use std::marker::PhantomData;

use super::{StageDefinition, TypedStage};
use crate::repo::{build_run_definition_auto, RunDefinition};

/// Marker trait to assert two types are the same at compile time.
/// Implemented only for identical types (T: SameAs<T> for all T).
pub trait SameAs<T> {}
impl<T> SameAs<T> for T {}

/// Typed pipeline builder that enforces at compile time that the next
/// stage's input matches the previous stage's output.
///
/// Usage:
///   let pipe = Pipe::new(ExtractStage).then(ValidateStage).then(CleanStage);
///   let definition: RunDefinition = pipe.build();
pub struct Pipe<S: TypedStage + 'static> {
    stages: Vec<Box<dyn StageDefinition>>,
    _out: PhantomData<<S as TypedStage>::Output>,
}

impl<S: TypedStage + std::fmt::Debug + 'static> Pipe<S> {
    pub fn new(stage: S) -> Self {
        Self { stages: vec![Box::new(stage)],
               _out: PhantomData }
    }

    /// Append a new stage, enforcing N::Input == S::Output at compile time.
    pub fn then<N>(mut self, next: N) -> Pipe<N>
        where N: TypedStage + std::fmt::Debug + 'static,
              <N as TypedStage>::Input: SameAs<<S as TypedStage>::Output>
    {
        self.stages.push(Box::new(next));
        Pipe::<N> { stages: self.stages,
                    _out: PhantomData }
    }

    /// Build a RunDefinition from the typed pipeline. The compile-time
    /// checks provided by `then` ensure adjacency compatibility prior to
    /// boxing.
    pub fn build(self) -> RunDefinition {
        build_run_definition_auto(self.stages)
    }
}

//! Builder para `RunEngine`.
//!
//! Patrón builder seguro en tiempo de compilación: obliga a declarar el
//! primer stage (fuente) y a encadenar stages cuyos tipos de entrada y
//! salida sean compatibles.
//!
//! Notas de diseño
//! - `EngineBuilderInit` representa el estado inicial del builder: stores
//!   (event_store + repository) deben estar presentes.
//! - `EngineBuilder<S, E, R>` mantiene el último tipo de salida conocido
//!   `S::Output` (mediante `PhantomData`) y la lista de stages en forma de
//!   `Vec<Box<dyn StageDefinition>>`.
//! - El método `add_stage` impone en sus bounds que la entrada del siguiente
//!   stage sea compatible con la salida del anterior usando `SameAs`.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::engine::RunEngine;
use crate::event::EventStore;
use crate::repo::RunRepository;
use crate::stage::{SameAs, StageDefinition, TypedStage};

/// Estado inicial del builder.
///
/// Contiene las stores necesarias para crear un `RunEngine`. Antes de poder
/// añadir stages debemos definir el primero (de tipo `Source`).
pub struct EngineBuilderInit<E: EventStore, R: RunRepository> {
    /// Store de eventos que usará el engine.
    pub event_store: E,
    /// Repositorio de definiciones/estado de la corrida.
    pub repository: R,
}

impl<E: EventStore, R: RunRepository> EngineBuilderInit<E, R> {
    /// Define el primer stage del pipeline y transiciona al builder completo.
    ///
    /// Requerimos que el primer stage sea de tipo `Source`. Se hace una
    /// aserción en tiempo de ejecución (`debug_assert!`) para ayudar durante
    /// el desarrollo; en builds release la aserción queda desactivada.
    #[inline]
    pub fn first_stage<S>(self, stage: S) -> EngineBuilder<S, E, R>
        where S: TypedStage + Debug + 'static
    {
        debug_assert!(matches!(<S as TypedStage>::kind(&stage), crate::stage::StageKind::Source),
                      "El primer stage debe ser de tipo Source",);

        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        stages: vec![Box::new(stage)],
                        _out: PhantomData::<S::Output> }
    }
}

/// Builder principal que acumula stages y garantiza compatibilidad de tipos.
///
/// El parámetro genérico `S` representa el tipo del último `TypedStage`
/// añadido; su asociado `S::Output` se conserva en `_out` para imponer
/// restricciones en el siguiente `add_stage`.
pub struct EngineBuilder<S: TypedStage + Debug + 'static, E: EventStore, R: RunRepository> {
    event_store: E,
    repository: R,
    /// Lista de stages que conforman la definición del pipeline.
    stages: Vec<Box<dyn StageDefinition>>,
    /// Marcador de tipo para el output del último stage añadido.
    _out: PhantomData<S::Output>,
}

impl<S: TypedStage + Debug + 'static, E: EventStore, R: RunRepository> EngineBuilder<S, E, R> {
    /// Añade un siguiente stage al pipeline.
    ///
    /// La comprobación `N::Input: SameAs<S::Output>` asegura que la entrada
    /// del nuevo stage `N` es compatible con la salida del stage anterior
    /// `S`.
    #[inline]
    pub fn add_stage<N>(mut self, next: N) -> EngineBuilder<N, E, R>
        where N: TypedStage + Debug + 'static,
              N::Input: SameAs<S::Output>
    {
        self.stages.push(Box::new(next));

        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        stages: self.stages,
                        _out: PhantomData }
    }

    /// Construye el `RunEngine` final usando las stores y la lista de stages.
    ///
    /// Genera automáticamente la definición del pipeline a partir de
    /// `self.stages` y la establece como definición por defecto del engine.
    #[inline]
    pub fn build(self) -> RunEngine<E, R> {
        let mut engine = RunEngine::new_with_stores(self.event_store, self.repository);
        let definition = crate::repo::build_run_definition_auto(self.stages);
        engine.set_default_definition(definition);
        engine
    }
}

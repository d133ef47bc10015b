//! Almacenamiento de artifacts intermedios.
//!
//! Los artifacts se direccionan por `(run_id, stage_id)`: cada corrida tiene
//! su propio espacio de claves, de modo que corridas concurrentes con ids
//! distintos no pisan los intermedios ajenos. Dentro de una misma corrida la
//! escritura es un overwrite idempotente por stage: re-ejecutar reemplaza el
//! artifact previo de ese stage (last-write-wins, las corridas son
//! secuenciales).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::model::Artifact;

/// Identificador estable de un artifact almacenado.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactLocator {
    pub run_id: Uuid,
    pub stage_id: String,
}

impl ArtifactLocator {
    pub fn new(run_id: Uuid, stage_id: impl Into<String>) -> Self {
        Self { run_id,
               stage_id: stage_id.into() }
    }
}

impl fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run/{}/{}", self.run_id, self.stage_id)
    }
}

/// Contrato del store de artifacts.
pub trait ArtifactStore {
    /// Guarda el artifact del stage y devuelve su locator. Sobrescribe el
    /// artifact previo de la misma clave si existe.
    fn put(&mut self, run_id: Uuid, stage_id: &str, artifact: Artifact) -> ArtifactLocator;
    /// Recupera un artifact por locator.
    fn get(&self, locator: &ArtifactLocator) -> Option<Artifact>;
}

pub struct InMemoryArtifactStore {
    inner: HashMap<(Uuid, String), Artifact>,
}

impl Default for InMemoryArtifactStore {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn put(&mut self, run_id: Uuid, stage_id: &str, artifact: Artifact) -> ArtifactLocator {
        self.inner.insert((run_id, stage_id.to_string()), artifact);
        ArtifactLocator::new(run_id, stage_id)
    }

    fn get(&self, locator: &ArtifactLocator) -> Option<Artifact> {
        self.inner.get(&(locator.run_id, locator.stage_id.clone())).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactKind;
    use serde_json::json;

    fn artifact(tag: &str) -> Artifact {
        Artifact { kind: ArtifactKind::GenericJson,
                   hash: String::new(),
                   payload: json!({ "tag": tag }),
                   metadata: None }
    }

    #[test]
    fn put_overwrites_by_run_and_stage() {
        let mut store = InMemoryArtifactStore::default();
        let run = Uuid::new_v4();
        let loc = store.put(run, "clean_data", artifact("v1"));
        store.put(run, "clean_data", artifact("v2"));
        let got = store.get(&loc).expect("artifact present");
        assert_eq!(got.payload["tag"], json!("v2"));
    }

    #[test]
    fn distinct_runs_do_not_collide() {
        let mut store = InMemoryArtifactStore::default();
        let run_a = Uuid::new_v4();
        let run_b = Uuid::new_v4();
        let loc_a = store.put(run_a, "extract_raw", artifact("a"));
        let loc_b = store.put(run_b, "extract_raw", artifact("b"));
        assert_eq!(store.get(&loc_a).unwrap().payload["tag"], json!("a"));
        assert_eq!(store.get(&loc_b).unwrap().payload["tag"], json!("b"));
    }
}

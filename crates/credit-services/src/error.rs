//! Errores de borde de los servicios.
//!
//! La política de propagación es traducir a códigos HTTP y devolverlos tal
//! cual al llamador, sin reintentos automáticos: un request malformado es
//! un error del cliente (400) y un upstream caído se reporta como servicio
//! no disponible (503).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("upstream service error: {0}")]
    Upstream(String),
}

impl ServiceError {
    /// Código de estado HTTP equivalente para la capa web.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::Upstream(_) => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_boundary_policy() {
        assert_eq!(ServiceError::Validation("bad".into()).status_code(), 400);
        assert_eq!(ServiceError::Upstream("down".into()).status_code(), 503);
    }
}

//! Constantes del motor core.
//!
//! Valores estáticos que participan en el cálculo de fingerprints y en la
//! compatibilidad entre versiones del motor. `ENGINE_VERSION` entra al
//! hashing: un cambio de versión invalida determinísticamente los
//! fingerprints aunque la definición y los datos no cambien.

/// Versión lógica del motor de pipeline. Mantener estable mientras no haya
/// cambios incompatibles.
pub const ENGINE_VERSION: &str = "R1.0";

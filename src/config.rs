//! Configuración central de la demo.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) evaluada una sola vez.
use once_cell::sync::Lazy;
use std::env;

/// Configuración global de la demo (extensible para más secciones).
pub struct AppConfig {
    /// Configuración específica del pipeline.
    pub pipeline: PipelineConfig,
}

/// Parámetros del pipeline de la demo.
pub struct PipelineConfig {
    /// Dataset de muestra a extraer (CREDITFLOW_DATASET).
    pub dataset: String,
    /// Id de solicitud usado en la demo de scoring
    /// (CREDITFLOW_DEMO_APPLICATION).
    pub demo_application_id: i64,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let dataset = env::var("CREDITFLOW_DATASET").unwrap_or_else(|_| "kaggle_sample_v1".to_string());
    let demo_application_id = env::var("CREDITFLOW_DEMO_APPLICATION").ok()
        .and_then(|v| v.parse().ok()).unwrap_or(1);
    AppConfig {
        pipeline: PipelineConfig { dataset, demo_application_id },
    }
});

//! Artifacts tipados que fluyen entre los stages del pipeline.
//!
//! Estos tipos no introducen semántica en el core; solo definen la forma
//! del `payload` JSON que se serializa a `credit_core::Artifact` con un
//! `schema_version` estable. El hash de identidad lo calcula el engine a
//! partir del payload canónico; el `checksum` de la tabla de features es un
//! digest aparte, sobre los bytes CSV materializados.

use credit_core::typed_artifact;
use credit_domain::Table;

// Tabla cruda tal como la emite la extracción.
typed_artifact!(RawTableArtifact { table: Table } kind: credit_core::model::ArtifactKind::Tabular);

// Tabla deduplicada y con defaults aplicados.
typed_artifact!(CleanTableArtifact { table: Table } kind: credit_core::model::ArtifactKind::Tabular);

// Tabla con la columna derivada `risk_bucket` más el checksum de contenido
// calculado tras materializar el CSV.
typed_artifact!(FeatureTableArtifact {
    table: Table,
    checksum: String,
} kind: credit_core::model::ArtifactKind::Tabular);

// Acuse del colaborador de carga: estado, destino y el checksum que el
// destino registró (passthrough en el prototipo).
typed_artifact!(LoadReceiptArtifact {
    status: String,
    destination: String,
    checksum: String,
} kind: credit_core::model::ArtifactKind::Report);

// Reporte final de verificación post-carga.
typed_artifact!(VerificationReportArtifact {
    row_count: u64,
    checksum: String,
    checksum_match: bool,
} kind: credit_core::model::ArtifactKind::Report);

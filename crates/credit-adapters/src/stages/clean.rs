//! CleanDataStage (Transform determinista, nunca falla)
//!
//! Dos transformaciones en este orden:
//! 1. elimina filas duplicadas exactas conservando la primera aparición y
//!    el orden relativo del resto;
//! 2. sustituye `null` en `debt_to_income` por el default fijo de los
//!    params (0.4 en la configuración de referencia). Ninguna otra columna
//!    se defaultea.
//!
//! La secuencia es idempotente: limpiar una tabla ya limpia la deja igual.

use credit_core::{stage::StageKind, typed_stage};

use crate::artifacts::{CleanTableArtifact, RawTableArtifact};

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct CleanParams {
    pub fill_debt_to_income: f64,
}

impl Default for CleanParams {
    fn default() -> Self {
        Self { fill_debt_to_income: 0.4 }
    }
}

typed_stage! {
    stage CleanDataStage {
        id: "clean_data",
        kind: StageKind::Transform,
        input: RawTableArtifact,
        output: CleanTableArtifact,
        params: CleanParams,
        run(_me, inp, p) {{
            let table = inp.table
                           .deduplicated()
                           .filled("debt_to_income", serde_json::json!(p.fill_debt_to_income));
            CleanTableArtifact { table, schema_version: 1 }
        }}
    }
}

#[cfg(test)]
mod tests {
    use credit_domain::{Schema, Table};
    use serde_json::json;

    fn dirty_table() -> Table {
        let columns = Schema::credit_v1().columns().to_vec();
        let base: credit_domain::Row = [("client_id", json!(1)),
                                        ("age", json!(30)),
                                        ("income", json!(100000)),
                                        ("debt_to_income", json!(0.31)),
                                        ("bki_request_cnt", json!(2)),
                                        ("app_date", json!("2026-02-18"))].iter()
                                                                          .map(|(k, v)| (k.to_string(), v.clone()))
                                                                          .collect();
        let mut hole = base.clone();
        hole.insert("client_id".to_string(), json!(2));
        hole.insert("debt_to_income".to_string(), serde_json::Value::Null);
        Table::new(columns, vec![base.clone(), base, hole]).unwrap()
    }

    #[test]
    fn dedup_then_fill_matches_reference_behavior() {
        let cleaned = dirty_table().deduplicated().filled("debt_to_income", json!(0.4));
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.value(0, "debt_to_income"), Some(&json!(0.31)));
        assert_eq!(cleaned.value(1, "debt_to_income"), Some(&json!(0.4)));
    }

    #[test]
    fn clean_sequence_is_idempotent() {
        let once = dirty_table().deduplicated().filled("debt_to_income", json!(0.4));
        let twice = once.deduplicated().filled("debt_to_income", json!(0.4));
        assert_eq!(once, twice);
    }
}

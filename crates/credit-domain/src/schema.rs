//! Esquema requerido de una tabla.
//!
//! Un `Schema` es el conjunto ordenado de columnas obligatorias, fijo por
//! versión del pipeline. La validación es una compuerta dura: el orquestador
//! no avanza si faltan columnas.

use serde::{Deserialize, Serialize};

use crate::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Schema { columns: columns.into_iter().map(Into::into).collect() }
    }

    /// Esquema v1 de solicitudes de crédito.
    pub fn credit_v1() -> Self {
        Schema::new(["client_id", "age", "income", "debt_to_income", "bki_request_cnt", "app_date"])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Diferencia exacta `requeridas − presentes`, en el orden declarado.
    pub fn missing_from(&self, table: &Table) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !table.columns().iter().any(|tc| tc == *c))
            .cloned()
            .collect()
    }

    /// Valida la tabla contra el esquema. En éxito retorna la cantidad de
    /// filas para propagación aguas abajo; en fallo, las columnas faltantes.
    pub fn check(&self, table: &Table) -> Result<usize, Vec<String>> {
        let missing = self.missing_from(table);
        if missing.is_empty() {
            Ok(table.row_count())
        } else {
            Err(missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_succeeds_iff_required_subset_present() {
        let schema = Schema::new(["a", "b"]);
        let table = Table::new(vec!["b".into(), "a".into(), "extra".into()],
                               vec![[("a".to_string(), json!(1)), ("b".to_string(), json!(2)), ("extra".to_string(), json!(3))].into_iter().collect()]).unwrap();
        assert_eq!(schema.check(&table), Ok(1));
    }

    #[test]
    fn missing_set_is_exact_and_ordered() {
        let schema = Schema::new(["a", "b", "c"]);
        let table = Table::empty(vec!["b".into()]);
        assert_eq!(schema.missing_from(&table), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(schema.check(&table), Err(vec!["a".to_string(), "c".to_string()]));
    }
}

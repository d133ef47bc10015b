// table.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::DomainError;

/// Fila de una tabla: mapa ordenado columna → valor JSON.
pub type Row = IndexMap<String, Value>;

/// Representa un dataset tabular inmutable con columnas ordenadas y filas
/// homogéneas. Cada transformación produce una tabla nueva; nunca se muta
/// una tabla existente (cada etapa del pipeline lee un artifact previo y
/// escribe uno nuevo).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Crea una tabla validando que cada fila use exactamente las columnas
    /// declaradas. Las filas se normalizan al orden declarado; una columna
    /// ausente en la fila queda como `null` explícito.
    ///
    /// # Errores
    /// Retorna `DomainError::ValidationError` si una fila trae columnas no
    /// declaradas.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, DomainError> {
        for (idx, row) in rows.iter().enumerate() {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    return Err(DomainError::ValidationError(format!("Columna no declarada '{}' en fila {}", key, idx)));
                }
            }
        }
        let rows = rows.into_iter().map(|row| Self::normalize_row(&columns, row)).collect();
        Ok(Table { columns, rows })
    }

    /// Tabla sin filas con el conjunto de columnas dado.
    pub fn empty(columns: Vec<String>) -> Self {
        Table { columns, rows: Vec::new() }
    }

    fn normalize_row(columns: &[String], mut row: Row) -> Row {
        let mut normalized = Row::with_capacity(columns.len());
        for column in columns {
            let value = row.shift_remove(column.as_str()).unwrap_or(Value::Null);
            normalized.insert(column.clone(), value);
        }
        normalized
    }

    // Getters
    /// Columnas declaradas, en orden.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Filas normalizadas, en orden de inserción.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Cantidad de filas.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Indica si la tabla no tiene filas.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Valor de una celda por índice de fila y nombre de columna.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Elimina filas duplicadas exactas (iguales en todas las columnas),
    /// conservando la primera aparición y el orden relativo del resto.
    pub fn deduplicated(&self) -> Table {
        let mut seen = std::collections::HashSet::new();
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            // Las filas están normalizadas al orden de columnas, por lo que la
            // serialización JSON es una llave de igualdad estable.
            let key = serde_json::to_string(row).unwrap_or_default();
            if seen.insert(key) {
                rows.push(row.clone());
            }
        }
        Table { columns: self.columns.clone(), rows }
    }

    /// Sustituye `null` por un valor por defecto en una única columna
    /// designada. Ninguna otra columna se modifica; una columna desconocida
    /// deja la tabla igual (la operación nunca falla).
    pub fn filled(&self, column: &str, default: Value) -> Table {
        if !self.columns.iter().any(|c| c == column) {
            return self.clone();
        }
        let rows = self.rows
                       .iter()
                       .map(|row| {
                           let mut next = row.clone();
                           if matches!(next.get(column), None | Some(Value::Null)) {
                               next.insert(column.to_string(), default.clone());
                           }
                           next
                       })
                       .collect();
        Table { columns: self.columns.clone(), rows }
    }

    /// Agrega una columna derivada al final, con un valor por fila.
    ///
    /// # Errores
    /// Retorna `DomainError::ValidationError` si la columna ya existe o si la
    /// cantidad de valores no coincide con la cantidad de filas.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table, DomainError> {
        if self.columns.iter().any(|c| c == name) {
            return Err(DomainError::ValidationError(format!("La columna '{}' ya existe", name)));
        }
        if values.len() != self.rows.len() {
            return Err(DomainError::ValidationError(format!("Se esperaban {} valores para '{}', llegaron {}",
                                                            self.rows.len(),
                                                            name,
                                                            values.len())));
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let rows = self.rows
                       .iter()
                       .zip(values)
                       .map(|(row, value)| {
                           let mut next = row.clone();
                           next.insert(name.to_string(), value);
                           next
                       })
                       .collect();
        Ok(Table { columns, rows })
    }

    /// Serializa la tabla a CSV determinista: encabezado con las columnas
    /// declaradas y una línea por fila en el mismo orden. `null` se
    /// representa como celda vacía.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = self.columns.iter().map(|c| csv_cell(row.get(c).unwrap_or(&Value::Null))).collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    /// Digest SHA-256 (hex) sobre los bytes exactos del CSV materializado.
    /// Una relectura de los mismos bytes reproduce el mismo digest, lo que
    /// permite detectar divergencias entre escritura y lectura.
    pub fn content_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_csv().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Renderiza una celda CSV. Strings con coma, comilla o salto de línea van
/// entre comillas dobles con escape estándar.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        other => other.to_string(),
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table(columns: {}, rows: {})", self.columns.len(), self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn rejects_undeclared_columns() {
        let result = Table::new(vec!["a".into()], vec![row(&[("a", json!(1)), ("b", json!(2))])]);
        assert!(result.is_err());
    }

    #[test]
    fn normalizes_missing_columns_to_null() {
        let table = Table::new(vec!["a".into(), "b".into()], vec![row(&[("b", json!(2))])]).unwrap();
        assert_eq!(table.value(0, "a"), Some(&Value::Null));
        assert_eq!(table.value(0, "b"), Some(&json!(2)));
    }

    #[test]
    fn deduplicated_keeps_first_occurrence_and_order() {
        let table = Table::new(vec!["a".into()],
                               vec![row(&[("a", json!(1))]),
                                    row(&[("a", json!(2))]),
                                    row(&[("a", json!(1))]),
                                    row(&[("a", json!(3))])]).unwrap();
        let deduped = table.deduplicated();
        assert_eq!(deduped.row_count(), 3);
        assert_eq!(deduped.value(0, "a"), Some(&json!(1)));
        assert_eq!(deduped.value(1, "a"), Some(&json!(2)));
        assert_eq!(deduped.value(2, "a"), Some(&json!(3)));
    }

    #[test]
    fn filled_touches_only_designated_column() {
        let table = Table::new(vec!["a".into(), "b".into()],
                               vec![row(&[("a", Value::Null), ("b", Value::Null)])]).unwrap();
        let filled = table.filled("a", json!(0.4));
        assert_eq!(filled.value(0, "a"), Some(&json!(0.4)));
        assert_eq!(filled.value(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn csv_and_digest_are_deterministic() {
        let table = Table::new(vec!["a".into(), "b".into()],
                               vec![row(&[("a", json!(1)), ("b", json!("x,y"))])]).unwrap();
        let csv = table.to_csv();
        assert_eq!(csv, "a,b\n1,\"x,y\"\n");
        assert_eq!(table.content_digest(), table.clone().content_digest());
    }

    #[test]
    fn with_column_requires_matching_length() {
        let table = Table::new(vec!["a".into()], vec![row(&[("a", json!(1))])]).unwrap();
        assert!(table.with_column("b", vec![]).is_err());
        assert!(table.with_column("a", vec![json!(2)]).is_err());
        let extended = table.with_column("b", vec![json!(2)]).unwrap();
        assert_eq!(extended.columns(), &["a".to_string(), "b".to_string()]);
    }
}

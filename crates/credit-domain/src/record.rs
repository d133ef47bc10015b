use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::table::Row;

/// Solicitud de crédito individual tal como llega del origen de datos.
/// `debt_to_income` es opcional de forma explícita: la ausencia se modela
/// con `None` y se resuelve recién en la etapa de limpieza, nunca con
/// defaults dispersos en los call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    pub client_id: u32,
    pub age: u32,
    pub income: u64,
    pub debt_to_income: Option<f64>,
    pub bki_request_cnt: u32,
    pub app_date: String,
}

impl CreditRecord {
    /// Convierte el registro en una fila de tabla con las columnas del
    /// esquema v1, en su orden. `None` queda como `null` explícito.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("client_id".to_string(), json!(self.client_id));
        row.insert("age".to_string(), json!(self.age));
        row.insert("income".to_string(), json!(self.income));
        row.insert("debt_to_income".to_string(),
                   self.debt_to_income.map(|v| json!(v)).unwrap_or(Value::Null));
        row.insert("bki_request_cnt".to_string(), json!(self.bki_request_cnt));
        row.insert("app_date".to_string(), json!(self.app_date));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;

    #[test]
    fn row_matches_schema_v1_order() {
        let record = CreditRecord { client_id: 1,
                                    age: 30,
                                    income: 100_000,
                                    debt_to_income: Some(0.31),
                                    bki_request_cnt: 2,
                                    app_date: "2026-02-18".to_string() };
        let row = record.to_row();
        let keys: Vec<&str> = row.keys().map(|k| k.as_str()).collect();
        let expected: Vec<&str> = Schema::credit_v1().columns().iter().map(|c| c.as_str()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn absent_debt_to_income_serializes_as_null() {
        let record = CreditRecord { client_id: 3,
                                    age: 40,
                                    income: 60_000,
                                    debt_to_income: None,
                                    bki_request_cnt: 1,
                                    app_date: "2026-02-18".to_string() };
        assert_eq!(record.to_row().get("debt_to_income"), Some(&Value::Null));
    }
}

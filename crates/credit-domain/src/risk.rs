use serde::{Deserialize, Serialize};
use std::fmt;

/// Categoría de riesgo derivada de `debt_to_income` por binning en
/// intervalos semiabiertos a derecha:
///
/// - `(0.0, 0.3]` → `Low`
/// - `(0.3, 0.5]` → `Medium`
/// - `(0.5, 1.0]` → `High`
///
/// Un valor fuera de la unión de los intervalos (incluidos 0, negativos,
/// mayores a 1 y NaN) no clasifica: `classify` retorna `None` y la columna
/// derivada queda en `null`, igual que el corte de referencia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

impl RiskBucket {
    pub fn classify(debt_to_income: f64) -> Option<RiskBucket> {
        if debt_to_income > 0.0 && debt_to_income <= 0.3 {
            Some(RiskBucket::Low)
        } else if debt_to_income > 0.3 && debt_to_income <= 0.5 {
            Some(RiskBucket::Medium)
        } else if debt_to_income > 0.5 && debt_to_income <= 1.0 {
            Some(RiskBucket::High)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBucket::Low => "low",
            RiskBucket::Medium => "medium",
            RiskBucket::High => "high",
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_edges_are_half_open_right() {
        assert_eq!(RiskBucket::classify(0.3), Some(RiskBucket::Low));
        assert_eq!(RiskBucket::classify(0.31), Some(RiskBucket::Medium));
        assert_eq!(RiskBucket::classify(0.5), Some(RiskBucket::Medium));
        assert_eq!(RiskBucket::classify(0.55), Some(RiskBucket::High));
        assert_eq!(RiskBucket::classify(1.0), Some(RiskBucket::High));
    }

    #[test]
    fn out_of_range_values_do_not_classify() {
        assert_eq!(RiskBucket::classify(0.0), None);
        assert_eq!(RiskBucket::classify(-0.2), None);
        assert_eq!(RiskBucket::classify(1.01), None);
        assert_eq!(RiskBucket::classify(f64::NAN), None);
    }
}

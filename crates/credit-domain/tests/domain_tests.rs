//! Tests de integración del dominio: esquema, limpieza y binning sobre el
//! dataset de muestra.

use credit_domain::{CreditRecord, RiskBucket, Schema, Table};
use serde_json::json;

fn sample_table() -> Table {
    let records = vec![CreditRecord { client_id: 1,
                                      age: 30,
                                      income: 100_000,
                                      debt_to_income: Some(0.31),
                                      bki_request_cnt: 2,
                                      app_date: "2026-02-18".to_string() },
                       CreditRecord { client_id: 2,
                                      age: 45,
                                      income: 55_000,
                                      debt_to_income: Some(0.55),
                                      bki_request_cnt: 4,
                                      app_date: "2026-02-18".to_string() }];
    Table::new(Schema::credit_v1().columns().to_vec(),
               records.iter().map(|r| r.to_row()).collect()).expect("sample rows match schema")
}

#[test]
fn schema_v1_accepts_sample_and_reports_row_count() {
    let table = sample_table();
    assert_eq!(Schema::credit_v1().check(&table), Ok(2));
}

#[test]
fn schema_reports_exact_missing_columns() {
    let table = Table::empty(vec!["client_id".into(), "age".into()]);
    let missing = Schema::credit_v1().check(&table).unwrap_err();
    assert_eq!(missing,
               vec!["income".to_string(),
                    "debt_to_income".to_string(),
                    "bki_request_cnt".to_string(),
                    "app_date".to_string()]);
}

#[test]
fn clean_sequence_is_idempotent() {
    let mut rows: Vec<_> = sample_table().rows().to_vec();
    rows.push(rows[0].clone()); // duplicado exacto
    let table = Table::new(Schema::credit_v1().columns().to_vec(), rows).unwrap();

    let once = table.deduplicated().filled("debt_to_income", json!(0.4));
    let twice = once.deduplicated().filled("debt_to_income", json!(0.4));
    assert_eq!(once, twice);
    assert_eq!(once.row_count(), 2);
}

#[test]
fn sample_rows_bucket_as_medium_and_high() {
    let table = sample_table();
    let buckets: Vec<Option<RiskBucket>> = table.rows()
                                                .iter()
                                                .map(|row| {
                                                    row.get("debt_to_income")
                                                       .and_then(|v| v.as_f64())
                                                       .and_then(RiskBucket::classify)
                                                })
                                                .collect();
    assert_eq!(buckets, vec![Some(RiskBucket::Medium), Some(RiskBucket::High)]);
}

#[test]
fn content_digest_survives_serialization_round_trip() {
    let table = sample_table();
    let digest = table.content_digest();

    let encoded = serde_json::to_string(&table).unwrap();
    let decoded: Table = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.content_digest(), digest);
}

// credit-domain library entry point
pub mod table;
pub mod schema;
pub mod record;
pub mod risk;
pub mod scoring;
pub mod errors;
pub use table::{Row, Table};
pub use schema::Schema;
pub use record::CreditRecord;
pub use risk::RiskBucket;
pub use scoring::{heuristic_score, round4, Decision, FeatureVector, ScoreBreakdown};
pub use errors::DomainError;

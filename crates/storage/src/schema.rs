//! Table Definitions

use crate::sql::quote_ident;
use feature_engine::columns::{CHURN, MONTHLY_CHARGES, TENURE, TOTAL_CHARGES};
use feature_frame::Frame;
use sqlx::SqliteConnection;
use tracing::info;

pub const FEATURE_TABLE: &str = "customer_features";
pub const METADATA_TABLE: &str = "feature_metadata";
pub const TRAINING_SETS_TABLE: &str = "training_sets";

const CREATE_CUSTOMER_FEATURES: &str = r#"
CREATE TABLE IF NOT EXISTS customer_features (
    customer_id TEXT PRIMARY KEY,
    tenure INTEGER,
    MonthlyCharges REAL,
    TotalCharges REAL,
    tenure_group INTEGER,
    charges_per_tenure REAL,
    total_to_monthly_ratio REAL,
    avg_monthly_charges REAL,
    gender_encoded INTEGER,
    SeniorCitizen INTEGER,
    Partner_encoded INTEGER,
    Dependents_encoded INTEGER,
    PhoneService_encoded INTEGER,
    MultipleLines_encoded INTEGER,
    InternetService_encoded INTEGER,
    OnlineSecurity_encoded INTEGER,
    OnlineBackup_encoded INTEGER,
    DeviceProtection_encoded INTEGER,
    TechSupport_encoded INTEGER,
    StreamingTV_encoded INTEGER,
    StreamingMovies_encoded INTEGER,
    Contract_encoded INTEGER,
    PaperlessBilling_encoded INTEGER,
    PaymentMethod_encoded INTEGER,
    Churn INTEGER,
    total_services INTEGER,
    service_density REAL,
    customer_value_segment INTEGER,
    tenure_stability INTEGER,
    high_risk_payment INTEGER,
    tenure_monthly_interaction REAL,
    tenure_total_interaction REAL,
    services_charges_interaction REAL,
    contract_payment_interaction INTEGER,
    created_timestamp TEXT,
    updated_timestamp TEXT
)"#;

const CREATE_FEATURE_METADATA: &str = r#"
CREATE TABLE IF NOT EXISTS feature_metadata (
    feature_name TEXT PRIMARY KEY,
    feature_type TEXT,
    description TEXT,
    transformation_applied TEXT,
    created_date TEXT
)"#;

const CREATE_TRAINING_SETS: &str = r#"
CREATE TABLE IF NOT EXISTS training_sets (
    set_id TEXT PRIMARY KEY,
    set_name TEXT,
    creation_date TEXT,
    feature_count INTEGER,
    record_count INTEGER,
    target_distribution TEXT,
    data_quality_score REAL
)"#;

/// Secondary indexes on the feature table: (name, columns)
const FEATURE_INDEXES: [(&str, &[&str]); 3] = [
    ("idx_customer_features_tenure", &[TENURE]),
    ("idx_customer_features_churn", &[CHURN]),
    ("idx_customer_features_charges", &[MONTHLY_CHARGES, TOTAL_CHARGES]),
];

/// Create all tables and indexes if they do not exist
pub(crate) async fn setup(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for ddl in [CREATE_CUSTOMER_FEATURES, CREATE_FEATURE_METADATA, CREATE_TRAINING_SETS] {
        sqlx::query(ddl).execute(&mut *conn).await?;
    }
    for (name, columns) in FEATURE_INDEXES {
        sqlx::query(&create_index(name, columns)).execute(&mut *conn).await?;
    }
    info!("SQLite database initialized");
    Ok(())
}

/// `CREATE TABLE` for a replacement feature table shaped like `frame`
pub(crate) fn create_feature_table(frame: &Frame, id_column: &str) -> String {
    let columns: Vec<String> = frame
        .columns()
        .iter()
        .map(|column| {
            let mut def = format!(
                "{} {}",
                quote_ident(column.name()),
                crate::sql::sql_type(column.kind())
            );
            if column.name() == id_column {
                def = format!("{} TEXT PRIMARY KEY", quote_ident(column.name()));
            }
            def
        })
        .collect();
    format!("CREATE TABLE {} ({})", FEATURE_TABLE, columns.join(", "))
}

/// Index statements for every index whose columns exist in `frame`
pub(crate) fn feature_indexes(frame: &Frame) -> Vec<String> {
    FEATURE_INDEXES
        .iter()
        .filter(|(_, columns)| columns.iter().all(|c| frame.has_column(c)))
        .map(|(name, columns)| create_index(name, columns))
        .collect()
}

fn create_index(name: &str, columns: &[&str]) -> String {
    let columns: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {}({})",
        name,
        FEATURE_TABLE,
        columns.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_frame::Value;

    #[test]
    fn test_create_feature_table_types() {
        let frame = Frame::from_rows(
            &["customer_id", "tenure", "MonthlyCharges", "PhoneService_Yes"],
            vec![vec!["a".into(), Value::Int(1), Value::Float(2.5), Value::Bool(true)]],
        )
        .unwrap();
        assert_eq!(
            create_feature_table(&frame, "customer_id"),
            "CREATE TABLE customer_features (\"customer_id\" TEXT PRIMARY KEY, \"tenure\" INTEGER, \
             \"MonthlyCharges\" REAL, \"PhoneService_Yes\" INTEGER)"
        );
    }

    #[test]
    fn test_indexes_follow_present_columns() {
        let frame = Frame::from_rows(
            &["tenure", "MonthlyCharges"],
            vec![vec![Value::Int(1), Value::Float(1.0)]],
        )
        .unwrap();
        let indexes = feature_indexes(&frame);
        assert_eq!(indexes.len(), 1);
        assert!(indexes[0].contains("idx_customer_features_tenure"));
    }
}

//! Repository Implementation

use crate::quality::data_quality_score;
use crate::records::{
    target_distribution, FeatureMetadataRecord, TrainingSetHandle, TrainingSetRecord,
};
use crate::schema::{self, FEATURE_TABLE, METADATA_TABLE, TRAINING_SETS_TABLE};
use crate::sql::{bind_value, decode_cell, quote_ident};
use crate::StorageError;
use chrono::{Local, NaiveDateTime};
use feature_engine::columns::{
    CREATED_TIMESTAMP, CUSTOMER_ID, CUSTOMER_ID_SOURCE, UPDATED_TIMESTAMP,
};
use feature_frame::{Column, Frame, Value};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, Row, SqliteConnection};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Store locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Directory receiving training set CSV extracts
    pub training_sets_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/processed/churn_data.db"),
            training_sets_dir: PathBuf::from("data/processed/training_sets"),
        }
    }
}

/// Feature store over a single SQLite connection.
///
/// The repository is the only writer of its database. All methods take
/// `&mut self` and are awaited one at a time.
pub struct FeatureRepository {
    conn: SqliteConnection,
    training_sets_dir: PathBuf,
}

impl FeatureRepository {
    /// Open (or create) the database file and ensure the schema exists
    pub async fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true)
            .connect()
            .await?;
        info!("Opened feature store at {}", config.db_path.display());
        Self::with_connection(conn, config.training_sets_dir.clone()).await
    }

    /// Open a private in-memory database
    pub async fn in_memory(training_sets_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let conn = SqliteConnectOptions::from_str("sqlite::memory:")?.connect().await?;
        Self::with_connection(conn, training_sets_dir.into()).await
    }

    async fn with_connection(
        mut conn: SqliteConnection,
        training_sets_dir: PathBuf,
    ) -> Result<Self, StorageError> {
        schema::setup(&mut conn).await?;
        Ok(Self {
            conn,
            training_sets_dir,
        })
    }

    pub fn training_sets_dir(&self) -> &Path {
        &self.training_sets_dir
    }

    /// Replace the feature table with `frame` and refresh the catalog.
    ///
    /// `customerID` is renamed to `customer_id`, missing `created_timestamp`
    /// cells are filled and `updated_timestamp` is set on every row. Returns
    /// the frame as stored.
    pub async fn store_transformed(&mut self, frame: Frame) -> Result<Frame, StorageError> {
        self.store_transformed_at(frame, Local::now().naive_local()).await
    }

    pub async fn store_transformed_at(
        &mut self,
        mut frame: Frame,
        now: NaiveDateTime,
    ) -> Result<Frame, StorageError> {
        frame.rename_column(CUSTOMER_ID_SOURCE, CUSTOMER_ID)?;

        let stamp = iso_timestamp(now);
        let rows = frame.row_count();
        match frame.column_mut(CREATED_TIMESTAMP) {
            Some(column) => {
                for value in column.values_mut().iter_mut().filter(|v| v.is_null()) {
                    *value = Value::Text(stamp.clone());
                }
            }
            None => frame.insert_column(CREATED_TIMESTAMP, vec![Value::Text(stamp.clone()); rows])?,
        }
        frame.insert_column(UPDATED_TIMESTAMP, vec![Value::Text(stamp); rows])?;

        self.replace_features(&frame).await?;
        info!("Stored {} rows in {}", rows, FEATURE_TABLE);

        self.update_metadata_at(&frame, now).await?;
        Ok(frame)
    }

    /// Drop and rewrite the feature table in one transaction
    async fn replace_features(&mut self, frame: &Frame) -> Result<(), StorageError> {
        let id_column = if frame.has_column(CUSTOMER_ID) { CUSTOMER_ID } else { "" };
        let create = schema::create_feature_table(frame, id_column);
        let names: Vec<String> = frame.column_names().into_iter().map(quote_ident).collect();
        let placeholders = vec!["?"; names.len()].join(", ");
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            FEATURE_TABLE,
            names.join(", "),
            placeholders
        );

        let mut tx = self.conn.begin().await?;
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", FEATURE_TABLE))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&create).execute(&mut *tx).await?;
        for idx in 0..frame.row_count() {
            let mut query = sqlx::query(&insert);
            for value in frame.row(idx) {
                query = bind_value(query, value);
            }
            query.execute(&mut *tx).await?;
        }
        for statement in schema::feature_indexes(frame) {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        debug!("Rewrote {} with {} columns", FEATURE_TABLE, frame.column_count());
        Ok(())
    }

    /// Upsert one catalog row per column, timestamps excluded
    pub async fn update_metadata(&mut self, frame: &Frame) -> Result<usize, StorageError> {
        self.update_metadata_at(frame, Local::now().naive_local()).await
    }

    async fn update_metadata_at(
        &mut self,
        frame: &Frame,
        now: NaiveDateTime,
    ) -> Result<usize, StorageError> {
        let created = iso_timestamp(now);
        let statement = format!(
            "INSERT OR REPLACE INTO {} \
             (feature_name, feature_type, description, transformation_applied, created_date) \
             VALUES (?, ?, ?, ?, ?)",
            METADATA_TABLE
        );

        let mut tx = self.conn.begin().await?;
        let mut updated = 0;
        for name in frame.column_names() {
            if name == CREATED_TIMESTAMP || name == UPDATED_TIMESTAMP {
                continue;
            }
            let record = FeatureMetadataRecord::new(name, created.clone());
            sqlx::query(&statement)
                .bind(record.feature_name.as_str())
                .bind(record.feature_type.as_str())
                .bind(record.description.as_str())
                .bind(record.transformation_applied.as_str())
                .bind(record.created_date.as_str())
                .execute(&mut *tx)
                .await?;
            updated += 1;
        }
        tx.commit().await?;
        info!("Feature metadata updated ({} features)", updated);
        Ok(updated)
    }

    /// Snapshot the stored features as a named training set
    pub async fn create_training_set(
        &mut self,
        set_name: &str,
        columns: Option<&[String]>,
    ) -> Result<TrainingSetHandle, StorageError> {
        self.create_training_set_at(set_name, columns, Local::now().naive_local())
            .await
    }

    /// Same as [`create_training_set`](Self::create_training_set) with an explicit clock.
    ///
    /// A second set created under the same name within the same second
    /// replaces the first, both row and file.
    pub async fn create_training_set_at(
        &mut self,
        set_name: &str,
        columns: Option<&[String]>,
        now: NaiveDateTime,
    ) -> Result<TrainingSetHandle, StorageError> {
        let frame = self.load_features(columns).await?;
        let set_id = format!("{}_{}", set_name, now.format("%Y%m%d_%H%M%S"));
        let record = TrainingSetRecord {
            set_id: set_id.clone(),
            set_name: set_name.to_string(),
            creation_date: iso_timestamp(now),
            feature_count: frame.column_count() as i64,
            record_count: frame.row_count() as i64,
            target_distribution: target_distribution(&frame),
            data_quality_score: data_quality_score(&frame),
        };

        let output_path = self.training_sets_dir.join(format!("{}.csv", set_id));
        frame.write_csv(&output_path)?;

        sqlx::query(&format!(
            "INSERT OR REPLACE INTO {} \
             (set_id, set_name, creation_date, feature_count, record_count, \
              target_distribution, data_quality_score) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            TRAINING_SETS_TABLE
        ))
        .bind(record.set_id.as_str())
        .bind(record.set_name.as_str())
        .bind(record.creation_date.as_str())
        .bind(record.feature_count)
        .bind(record.record_count)
        .bind(record.target_distribution.as_str())
        .bind(record.data_quality_score)
        .execute(&mut self.conn)
        .await?;

        info!(
            "Training set created: {} ({} rows, quality {})",
            set_id, record.record_count, record.data_quality_score
        );
        Ok(TrainingSetHandle { set_id, output_path })
    }

    /// Column names of the stored feature table, in table order
    pub async fn feature_columns(&mut self) -> Result<Vec<String>, StorageError> {
        let names = sqlx::query_scalar::<_, String>(&format!(
            "SELECT name FROM pragma_table_info('{}') ORDER BY cid",
            FEATURE_TABLE
        ))
        .fetch_all(&mut self.conn)
        .await?;
        Ok(names)
    }

    /// Read the stored features; `columns` selects a subset, empty meaning all
    pub async fn load_features(
        &mut self,
        columns: Option<&[String]>,
    ) -> Result<Frame, StorageError> {
        let stored = self.feature_columns().await?;
        let selected: Vec<String> = match columns.filter(|c| !c.is_empty()) {
            Some(requested) => {
                if let Some(unknown) = requested.iter().find(|c| !stored.contains(c)) {
                    return Err(StorageError::UnknownColumn(unknown.clone()));
                }
                requested.to_vec()
            }
            None => stored,
        };

        let list: Vec<String> = selected.iter().map(|c| quote_ident(c)).collect();
        let rows = sqlx::query(&format!("SELECT {} FROM {}", list.join(", "), FEATURE_TABLE))
            .fetch_all(&mut self.conn)
            .await?;

        let mut values: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); selected.len()];
        for row in &rows {
            for (idx, column) in values.iter_mut().enumerate() {
                column.push(decode_cell(row, idx)?);
            }
        }
        let columns = selected
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Ok(Frame::from_columns(columns)?)
    }

    /// Catalog rows ordered by feature name
    pub async fn feature_summary(&mut self) -> Result<Vec<FeatureMetadataRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT feature_name, feature_type, description, transformation_applied, created_date \
             FROM {} ORDER BY feature_name",
            METADATA_TABLE
        ))
        .fetch_all(&mut self.conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<FeatureMetadataRecord, StorageError> {
                let feature_type: String = row.try_get("feature_type")?;
                Ok(FeatureMetadataRecord {
                    feature_name: row.try_get("feature_name")?,
                    feature_type: feature_type.parse()?,
                    description: row.try_get("description")?,
                    transformation_applied: row.try_get("transformation_applied")?,
                    created_date: row.try_get("created_date")?,
                })
            })
            .collect()
    }

    /// Training set lineage ordered by creation
    pub async fn training_sets(&mut self) -> Result<Vec<TrainingSetRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT set_id, set_name, creation_date, feature_count, record_count, \
             target_distribution, data_quality_score \
             FROM {} ORDER BY creation_date, set_id",
            TRAINING_SETS_TABLE
        ))
        .fetch_all(&mut self.conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<TrainingSetRecord, StorageError> {
                Ok(TrainingSetRecord {
                    set_id: row.try_get("set_id")?,
                    set_name: row.try_get("set_name")?,
                    creation_date: row.try_get("creation_date")?,
                    feature_count: row.try_get("feature_count")?,
                    record_count: row.try_get("record_count")?,
                    target_distribution: row.try_get("target_distribution")?,
                    data_quality_score: row.try_get("data_quality_score")?,
                })
            })
            .collect()
    }

    /// Close the connection
    pub async fn close(self) -> Result<(), StorageError> {
        self.conn.close().await?;
        info!("Database connection closed");
        Ok(())
    }
}

fn iso_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FeatureType;
    use chrono::NaiveDate;
    use feature_engine::columns::{CHURN, TENURE};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn features() -> Frame {
        Frame::from_rows(
            &[CUSTOMER_ID_SOURCE, TENURE, "MonthlyCharges", "Contract_encoded", CHURN],
            vec![
                vec![
                    "c1".into(),
                    Value::Int(1),
                    Value::Float(29.85),
                    Value::Int(0),
                    Value::Int(0),
                ],
                vec![
                    "c2".into(),
                    Value::Int(34),
                    Value::Float(56.95),
                    Value::Int(1),
                    Value::Int(0),
                ],
                vec!["c3".into(), Value::Int(2), Value::Null, Value::Int(0), Value::Int(1)],
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();

        let stored = repo.store_transformed_at(features(), at(10, 0, 0)).await.unwrap();
        assert!(stored.has_column(CUSTOMER_ID));
        assert!(!stored.has_column(CUSTOMER_ID_SOURCE));
        assert_eq!(
            stored.column(UPDATED_TIMESTAMP).unwrap().values()[0],
            Value::Text("2024-03-01T10:00:00.000000".to_string())
        );

        let loaded = repo.load_features(None).await.unwrap();
        assert_eq!(loaded, stored);
    }

    #[tokio::test]
    async fn test_created_timestamp_kept_and_filled() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();

        let mut frame = features();
        frame
            .insert_column(
                CREATED_TIMESTAMP,
                vec!["2023-01-01T00:00:00".into(), Value::Null, "2023-01-02T00:00:00".into()],
            )
            .unwrap();
        let stored = repo.store_transformed_at(frame, at(9, 30, 0)).await.unwrap();
        let created = stored.column(CREATED_TIMESTAMP).unwrap().values();
        assert_eq!(created[0], Value::Text("2023-01-01T00:00:00".to_string()));
        assert_eq!(created[1], Value::Text("2024-03-01T09:30:00.000000".to_string()));
    }

    #[tokio::test]
    async fn test_replace_drops_old_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let smaller =
            Frame::from_rows(&[CUSTOMER_ID, TENURE], vec![vec!["c9".into(), Value::Int(5)]])
                .unwrap();
        repo.store_transformed(smaller).await.unwrap();

        let columns = repo.feature_columns().await.unwrap();
        assert_eq!(columns, vec![CUSTOMER_ID, TENURE, CREATED_TIMESTAMP, UPDATED_TIMESTAMP]);
        assert_eq!(repo.load_features(None).await.unwrap().row_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_customer_id_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let duplicated = Frame::from_rows(
            &[CUSTOMER_ID, TENURE],
            vec![vec!["c1".into(), Value::Int(1)], vec!["c1".into(), Value::Int(2)]],
        )
        .unwrap();
        let result = repo.store_transformed(duplicated).await;
        assert!(matches!(result, Err(StorageError::Database(_))));
        assert_eq!(repo.load_features(None).await.unwrap().row_count(), 3);
    }

    #[tokio::test]
    async fn test_indexes_recreated_after_replace() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let indexes = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master \
             WHERE type = 'index' AND tbl_name = 'customer_features' \
             AND name LIKE 'idx_%' ORDER BY name",
        )
        .fetch_all(&mut repo.conn)
        .await
        .unwrap();
        assert_eq!(indexes, vec!["idx_customer_features_churn", "idx_customer_features_tenure"]);
    }

    #[tokio::test]
    async fn test_metadata_upserted() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let summary = repo.feature_summary().await.unwrap();
        let names: Vec<&str> = summary.iter().map(|r| r.feature_name.as_str()).collect();
        assert_eq!(names, vec![CHURN, "Contract_encoded", "MonthlyCharges", CUSTOMER_ID, TENURE]);

        let contract = summary.iter().find(|r| r.feature_name == "Contract_encoded").unwrap();
        assert_eq!(contract.feature_type, FeatureType::Categorical);
        assert_eq!(contract.description, "Feature: Contract_encoded");
    }

    #[tokio::test]
    async fn test_create_training_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let handle = repo
            .create_training_set_at("churn_prediction_v1", None, at(14, 5, 9))
            .await
            .unwrap();
        assert_eq!(handle.set_id, "churn_prediction_v1_20240301_140509");
        assert_eq!(handle.output_path, dir.path().join("churn_prediction_v1_20240301_140509.csv"));

        let extract = Frame::read_csv(&handle.output_path).unwrap();
        assert_eq!(extract.row_count(), 3);
        assert_eq!(extract.column_count(), 7);

        let sets = repo.training_sets().await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].set_name, "churn_prediction_v1");
        assert_eq!(sets[0].feature_count, 7);
        assert_eq!(sets[0].record_count, 3);
        assert_eq!(sets[0].target_distribution, "{0: 2, 1: 1}");
        // one missing cell out of 21
        assert_eq!(sets[0].data_quality_score, 95.24);
    }

    #[tokio::test]
    async fn test_training_set_column_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let selection = vec![TENURE.to_string()];
        repo.create_training_set_at("tenure_only", Some(&selection), at(8, 0, 0))
            .await
            .unwrap();
        let sets = repo.training_sets().await.unwrap();
        assert_eq!(sets[0].feature_count, 1);
        assert_eq!(sets[0].target_distribution, "No target");
        assert_eq!(sets[0].data_quality_score, 100.0);

        let empty: Vec<String> = Vec::new();
        let handle = repo
            .create_training_set_at("all_columns", Some(&empty), at(8, 0, 1))
            .await
            .unwrap();
        assert_eq!(Frame::read_csv(&handle.output_path).unwrap().column_count(), 7);
        assert_eq!(repo.training_sets().await.unwrap()[1].feature_count, 7);

        let unknown = vec!["nope".to_string()];
        let result = repo.create_training_set("bad", Some(&unknown)).await;
        assert!(matches!(result, Err(StorageError::UnknownColumn(c)) if c == "nope"));
    }

    #[tokio::test]
    async fn test_same_second_training_set_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = FeatureRepository::in_memory(dir.path()).await.unwrap();
        repo.store_transformed(features()).await.unwrap();

        let first = repo.create_training_set_at("v1", None, at(12, 0, 0)).await.unwrap();
        let second = repo.create_training_set_at("v1", None, at(12, 0, 0)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(repo.training_sets().await.unwrap().len(), 1);

        repo.create_training_set_at("v1", None, at(12, 0, 1)).await.unwrap();
        let ids: Vec<String> = repo
            .training_sets()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.set_id)
            .collect();
        assert_eq!(ids, vec!["v1_20240301_120000", "v1_20240301_120001"]);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            db_path: dir.path().join("nested").join("churn_data.db"),
            training_sets_dir: dir.path().join("training_sets"),
        };

        let mut repo = FeatureRepository::open(&config).await.unwrap();
        repo.store_transformed(features()).await.unwrap();
        repo.close().await.unwrap();

        let mut reopened = FeatureRepository::open(&config).await.unwrap();
        assert_eq!(reopened.load_features(None).await.unwrap().row_count(), 3);
        assert_eq!(reopened.feature_summary().await.unwrap().len(), 5);
        reopened.close().await.unwrap();
    }
}

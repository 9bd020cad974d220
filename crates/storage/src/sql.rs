//! Dynamic row binding and decoding

use feature_frame::{ColumnKind, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};

/// Double-quote an identifier for SQLite
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Declared column type for a frame column kind
pub(crate) fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Bool | ColumnKind::Int => "INTEGER",
        ColumnKind::Empty | ColumnKind::Float => "REAL",
        ColumnKind::Text => "TEXT",
    }
}

/// Bind one cell as a positional parameter
pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Bool(b) => query.bind(i64::from(*b)),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.as_str()),
    }
}

/// Decode column `idx` of `row` by its storage class
pub(crate) fn decode_cell(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_ascii_uppercase();
    let value = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => Value::Int(row.try_get_unchecked::<i64, _>(idx)?),
        "REAL" | "NUMERIC" => Value::float(row.try_get_unchecked::<f64, _>(idx)?),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
            Value::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::Text(row.try_get_unchecked::<String, _>(idx)?),
    };
    Ok(value)
}

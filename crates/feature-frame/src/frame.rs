//! Column-Oriented Frame

use crate::error::FrameError;
use crate::value::Value;
use serde::{Deserialize, Serialize};

fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

/// Storage kind of a column, inferred from its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Only missing cells
    Empty,
    Bool,
    Int,
    Float,
    Text,
}

impl ColumnKind {
    /// Numeric columns take part in arithmetic and scaling
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Empty | ColumnKind::Int | ColumnKind::Float)
    }
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from cells
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a column from raw CSV strings, inferring one kind for all cells
    pub fn from_raw(name: impl Into<String>, raw: Vec<String>) -> Self {
        let present: Vec<&str> = raw.iter().map(|s| s.trim()).filter(|s| !is_missing(s)).collect();
        let all_bool = present
            .iter()
            .all(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"));
        let all_int = present.iter().all(|s| s.parse::<i64>().is_ok());
        let all_float = present.iter().all(|s| s.parse::<f64>().is_ok());
        let any_present = !present.is_empty();

        let values = raw
            .into_iter()
            .map(|s| {
                if is_missing(&s) {
                    return Value::Null;
                }
                let t = s.trim();
                if any_present && all_bool {
                    Value::Bool(t.eq_ignore_ascii_case("true"))
                } else if all_int {
                    t.parse().map(Value::Int).unwrap_or(Value::Null)
                } else if all_float {
                    t.parse().map(Value::float).unwrap_or(Value::Null)
                } else {
                    Value::Text(s)
                }
            })
            .collect();

        Self::new(name, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing cells
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Numeric view of every cell (`None` for missing or non-numeric)
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.values.iter().map(Value::as_f64).collect()
    }

    /// Infer the column kind from its cells
    pub fn kind(&self) -> ColumnKind {
        let mut kind = ColumnKind::Empty;
        for value in &self.values {
            kind = match (kind, value) {
                (_, Value::Text(_)) => return ColumnKind::Text,
                (_, Value::Null) => kind,
                (ColumnKind::Empty, Value::Bool(_)) => ColumnKind::Bool,
                (ColumnKind::Empty | ColumnKind::Bool, Value::Int(_)) => ColumnKind::Int,
                (_, Value::Float(_)) => ColumnKind::Float,
                (k, _) => k,
            };
        }
        kind
    }
}

/// Ordered set of equal-length columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Create an empty frame with `rows` rows and no columns
    pub fn with_rows(rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            rows,
        }
    }

    /// Build a frame from columns of equal length
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, FrameError> {
        let rows = columns.first().map_or(0, Column::len);
        let mut frame = Self::with_rows(rows);
        for column in columns {
            if frame.has_column(column.name()) {
                return Err(FrameError::DuplicateColumn(column.name));
            }
            frame.check_length(&column)?;
            frame.columns.push(column);
        }
        Ok(frame)
    }

    /// Build a frame from a header and row-major cells
    pub fn from_rows(header: &[&str], rows: Vec<Vec<Value>>) -> Result<Self, FrameError> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); header.len()];
        for (line, row) in rows.into_iter().enumerate() {
            if row.len() != header.len() {
                return Err(FrameError::LengthMismatch {
                    column: format!("row {}", line),
                    expected: header.len(),
                    actual: row.len(),
                });
            }
            for (idx, value) in row.into_iter().enumerate() {
                columns[idx].push(value);
            }
        }
        Self::from_columns(
            header
                .iter()
                .zip(columns)
                .map(|(name, values)| Column::new(*name, values))
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of cells (rows × columns)
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns.len()
    }

    /// Number of missing cells across all columns
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Cells of one row, in column order
    pub fn row(&self, idx: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// Insert a column, replacing an existing one of the same name in place
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<(), FrameError> {
        let column = Column::new(name, values);
        if self.columns.is_empty() && self.rows == 0 {
            self.rows = column.len();
        }
        self.check_length(&column)?;
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Rename a column; returns whether the source column existed
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool, FrameError> {
        if from == to {
            return Ok(self.has_column(from));
        }
        if !self.has_column(from) {
            return Ok(false);
        }
        if self.has_column(to) {
            return Err(FrameError::DuplicateColumn(to.to_string()));
        }
        if let Some(column) = self.column_mut(from) {
            column.name = to.to_string();
        }
        Ok(true)
    }

    /// New frame holding only the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame, FrameError> {
        let mut selected = Frame::with_rows(self.rows);
        for name in names {
            let name = name.as_ref();
            let column = self
                .column(name)
                .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))?;
            if selected.has_column(name) {
                return Err(FrameError::DuplicateColumn(name.to_string()));
            }
            selected.columns.push(column.clone());
        }
        Ok(selected)
    }

    fn check_length(&self, column: &Column) -> Result<(), FrameError> {
        if column.len() != self.rows {
            return Err(FrameError::LengthMismatch {
                column: column.name.clone(),
                expected: self.rows,
                actual: column.len(),
            });
        }
        Ok(())
    }
}

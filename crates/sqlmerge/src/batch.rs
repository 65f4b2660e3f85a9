//! In-memory batches of rows to be merged into a target table.

use serde::{Deserialize, Serialize};
use sqlmerge_core::error::{DataError, DataErrorKind};
use sqlmerge_core::{Error, Result, SchemaErrorKind, Value};
use std::collections::HashMap;

/// Column names plus rows of values, one value per column.
///
/// ```
/// use sqlmerge::{Batch, Value};
///
/// let batch = Batch::new(["code", "name"])
///     .row(vec![Value::from("DE"), Value::from("Deutschland")])
///     .row(vec![Value::from("IT"), Value::from("Italien")]);
/// assert_eq!(batch.len(), 2);
/// assert!(batch.validate_shape().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl Batch {
    /// Create an empty batch with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    /// Append a row in place.
    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check that column names are unique and every row has one value per
    /// column.
    #[allow(clippy::result_large_err)]
    pub fn validate_shape(&self) -> Result<()> {
        for (i, name) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(name) {
                return Err(Error::schema(
                    SchemaErrorKind::DuplicateColumn,
                    "batch",
                    format!("duplicate batch column '{}'", name),
                ));
            }
        }

        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(Error::Data(DataError {
                    kind: DataErrorKind::RowShape,
                    row: Some(index),
                    message: format!(
                        "expected {} values, found {}",
                        self.columns.len(),
                        row.len()
                    ),
                }));
            }
        }
        Ok(())
    }

    /// Check that no two rows share the same values in `key_columns`.
    ///
    /// Keys are compared the way the database compares them after staging:
    /// integers of any width, integral floats and numeric text are equal
    /// when they denote the same number. Rows with a NULL in the key never
    /// match anything and are skipped.
    ///
    /// Rows must already have the batch's shape.
    #[allow(clippy::result_large_err)]
    pub fn check_unique_keys(&self, key_columns: &[&str]) -> Result<()> {
        let mut positions = Vec::with_capacity(key_columns.len());
        for name in key_columns {
            let Some(pos) = self.column_index(name) else {
                return Err(Error::schema(
                    SchemaErrorKind::ColumnNotFound,
                    "batch",
                    format!("key column '{}' not found in batch", name),
                ));
            };
            positions.push(pos);
        }

        let mut seen: HashMap<Vec<KeyPart>, usize> = HashMap::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            let Some(key) = positions
                .iter()
                .map(|&p| row.get(p).and_then(KeyPart::of))
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            if let Some(first) = seen.insert(key, index) {
                let values: Vec<&Value> = positions.iter().filter_map(|&p| row.get(p)).collect();
                return Err(Error::Data(DataError {
                    kind: DataErrorKind::DuplicateKey,
                    row: Some(index),
                    message: format!(
                        "key {:?} on ({}) already used by row {}",
                        values,
                        key_columns.join(", "),
                        first
                    ),
                }));
            }
        }
        Ok(())
    }
}

/// One key value, normalized to what the database compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Int(i64),
    /// Bits of a finite, non-integral double.
    Real(u64),
    Text(String),
    Bytes(Vec<u8>),
    Date(i64),
    Time(i64),
    Timestamp(i64),
}

impl KeyPart {
    /// `None` for NULL and NaN, which never compare equal.
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(v) => Some(KeyPart::Int(i64::from(*v))),
            Value::TinyInt(v) => Some(KeyPart::Int(i64::from(*v))),
            Value::SmallInt(v) => Some(KeyPart::Int(i64::from(*v))),
            Value::Int(v) => Some(KeyPart::Int(i64::from(*v))),
            Value::BigInt(v) => Some(KeyPart::Int(*v)),
            Value::Float(v) => Self::number(f64::from(*v)),
            Value::Double(v) => Self::number(*v),
            Value::Decimal(s) | Value::Text(s) => Some(Self::text(s)),
            Value::Json(json) => Some(Self::text(&json.to_string())),
            Value::Bytes(b) => Some(KeyPart::Bytes(b.clone())),
            Value::Date(days) => Some(KeyPart::Date(i64::from(*days))),
            Value::Time(micros) => Some(KeyPart::Time(*micros)),
            Value::Timestamp(micros) | Value::TimestampTz(micros) => {
                Some(KeyPart::Timestamp(*micros))
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn number(v: f64) -> Option<Self> {
        if v.is_nan() {
            return None;
        }
        // i64::MIN and 2^63 are exact doubles.
        if v.fract() == 0.0
            && v >= -9_223_372_036_854_775_808.0
            && v < 9_223_372_036_854_775_808.0
        {
            return Some(KeyPart::Int(v as i64));
        }
        Some(KeyPart::Real(v.to_bits()))
    }

    /// Text that spells a number exactly the way the number prints is
    /// converted by numeric column affinity, so it keys as that number.
    fn text(s: &str) -> Self {
        if let Ok(i) = s.parse::<i64>() {
            if i.to_string() == s {
                return KeyPart::Int(i);
            }
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && f.to_string() == s {
                if let Some(part) = Self::number(f) {
                    return part;
                }
            }
        }
        KeyPart::Text(s.to_string())
    }
}

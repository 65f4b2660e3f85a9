//! SQL type definitions.

use serde::{Deserialize, Serialize};

/// Column data types understood by the schema model.
///
/// Types are carried through staging derivation unchanged; the merge engine
/// never coerces or compares them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    // Integer types
    TinyInt,
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,

    // Fixed precision
    Numeric { precision: u8, scale: u8 },
    Decimal { precision: u8, scale: u8 },

    // Boolean
    Boolean,

    // String types
    Char(u32),
    VarChar(u32),
    Text,

    // Binary types
    Binary(u32),
    VarBinary(u32),
    Blob,

    // Date/time types
    Date,
    Time,
    DateTime,
    Timestamp,
    TimestampTz,

    // JSON
    Json,

    // Custom type name, emitted verbatim
    Custom(String),
}

impl SqlType {
    /// Get the ANSI SQL type name for this type.
    pub fn sql_name(&self) -> String {
        match self {
            SqlType::TinyInt => "TINYINT".to_string(),
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "DOUBLE PRECISION".to_string(),
            SqlType::Numeric { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
            SqlType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Char(len) => format!("CHAR({})", len),
            SqlType::VarChar(len) => format!("VARCHAR({})", len),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Binary(len) => format!("BINARY({})", len),
            SqlType::VarBinary(len) => format!("VARBINARY({})", len),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::DateTime => "DATETIME".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::TimestampTz => "TIMESTAMPTZ".to_string(),
            SqlType::Json => "JSON".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Real
                | SqlType::Double
                | SqlType::Numeric { .. }
                | SqlType::Decimal { .. }
        )
    }

    /// Check if this type is text-based.
    pub const fn is_text(&self) -> bool {
        matches!(self, SqlType::Char(_) | SqlType::VarChar(_) | SqlType::Text)
    }

    /// Check if this type is a date/time type.
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            SqlType::Date
                | SqlType::Time
                | SqlType::DateTime
                | SqlType::Timestamp
                | SqlType::TimestampTz
        )
    }
}

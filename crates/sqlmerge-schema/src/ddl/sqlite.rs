//! SQLite DDL generator.
//!
//! SQLite only knows storage classes; declared types are reduced to the
//! affinity names INTEGER, REAL, NUMERIC, TEXT and BLOB. Temporal values are
//! stored as text.

use super::DdlGenerator;
use sqlmerge_core::{Dialect, SqlType};

/// DDL generator for SQLite.
pub struct SqliteDdlGenerator;

impl DdlGenerator for SqliteDdlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn column_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::TinyInt
            | SqlType::SmallInt
            | SqlType::Integer
            | SqlType::BigInt
            | SqlType::Boolean => "INTEGER".to_string(),
            SqlType::Real | SqlType::Double => "REAL".to_string(),
            SqlType::Numeric { .. } | SqlType::Decimal { .. } => "NUMERIC".to_string(),
            SqlType::Char(_)
            | SqlType::VarChar(_)
            | SqlType::Text
            | SqlType::Date
            | SqlType::Time
            | SqlType::DateTime
            | SqlType::Timestamp
            | SqlType::TimestampTz
            | SqlType::Json => "TEXT".to_string(),
            SqlType::Binary(_) | SqlType::VarBinary(_) | SqlType::Blob => "BLOB".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }
}

//! MySQL DDL generator.
//!
//! Timestamps use microsecond precision to match `CURRENT_TIMESTAMP(6)`.

use super::DdlGenerator;
use sqlmerge_core::{Dialect, SqlType};

/// DDL generator for MySQL.
pub struct MysqlDdlGenerator;

impl DdlGenerator for MysqlDdlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn column_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Double => "DOUBLE".to_string(),
            SqlType::Boolean => "TINYINT(1)".to_string(),
            SqlType::Time => "TIME(6)".to_string(),
            SqlType::DateTime | SqlType::Timestamp | SqlType::TimestampTz => {
                "DATETIME(6)".to_string()
            }
            other => other.sql_name(),
        }
    }
}

//! SQL Server DDL generator.
//!
//! Character types are emitted as their Unicode `N` forms.

use super::DdlGenerator;
use sqlmerge_core::{Dialect, SqlType};

/// DDL generator for SQL Server.
pub struct MssqlDdlGenerator;

impl DdlGenerator for MssqlDdlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    fn column_type(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Integer => "INT".to_string(),
            SqlType::Double => "FLOAT".to_string(),
            SqlType::Boolean => "BIT".to_string(),
            SqlType::Char(len) => format!("NCHAR({})", len),
            SqlType::VarChar(len) => format!("NVARCHAR({})", len),
            SqlType::Text | SqlType::Json => "NVARCHAR(MAX)".to_string(),
            SqlType::Blob => "VARBINARY(MAX)".to_string(),
            SqlType::DateTime | SqlType::Timestamp => "DATETIME2".to_string(),
            SqlType::TimestampTz => "DATETIMEOFFSET".to_string(),
            other => other.sql_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::fixtures;

    #[test]
    fn type_mapping() {
        let g = MssqlDdlGenerator;
        assert_eq!(g.column_type(&SqlType::Boolean), "BIT");
        assert_eq!(g.column_type(&SqlType::Double), "FLOAT");
        assert_eq!(g.column_type(&SqlType::Text), "NVARCHAR(MAX)");
        assert_eq!(g.column_type(&SqlType::Blob), "VARBINARY(MAX)");
        assert_eq!(g.column_type(&SqlType::Timestamp), "DATETIME2");
        assert_eq!(g.column_type(&SqlType::TimestampTz), "DATETIMEOFFSET");
        assert_eq!(g.column_type(&SqlType::BigInt), "BIGINT");
    }

    #[test]
    fn create_country() {
        let sql = MssqlDdlGenerator.create_table(&fixtures::country());
        assert_eq!(
            sql,
            "CREATE TABLE [dbo].[country] (\n  [code] NCHAR(2) NOT NULL,\n  [name] NVARCHAR(40),\n  [inserted_at] DATETIME2,\n  [updated_at] DATETIME2,\n  PRIMARY KEY ([code])\n)"
        );
    }
}

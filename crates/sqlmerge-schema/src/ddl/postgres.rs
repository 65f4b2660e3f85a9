//! PostgreSQL DDL generator.

use super::DdlGenerator;
use sqlmerge_core::{Dialect, SqlType};

/// DDL generator for PostgreSQL.
pub struct PostgresDdlGenerator;

impl DdlGenerator for PostgresDdlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn column_type(&self, ty: &SqlType) -> String {
        match ty {
            // No one-byte integer
            SqlType::TinyInt => "SMALLINT".to_string(),
            SqlType::Binary(_) | SqlType::VarBinary(_) | SqlType::Blob => "BYTEA".to_string(),
            SqlType::DateTime => "TIMESTAMP".to_string(),
            SqlType::Json => "JSONB".to_string(),
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
        let g = PostgresDdlGenerator;
        assert_eq!(g.column_type(&SqlType::TinyInt), "SMALLINT");
        assert_eq!(g.column_type(&SqlType::Blob), "BYTEA");
        assert_eq!(g.column_type(&SqlType::DateTime), "TIMESTAMP");
        assert_eq!(g.column_type(&SqlType::TimestampTz), "TIMESTAMPTZ");
        assert_eq!(g.column_type(&SqlType::Json), "JSONB");
        assert_eq!(g.column_type(&SqlType::VarChar(40)), "VARCHAR(40)");
        assert_eq!(
            g.column_type(&SqlType::Numeric {
                precision: 12,
                scale: 4
            }),
            "NUMERIC(12, 4)"
        );
    }

    #[test]
    fn create_country() {
        let sql = PostgresDdlGenerator.create_table(&fixtures::country());
        assert_eq!(
            sql,
            "CREATE TABLE \"dbo\".\"country\" (\n  \"code\" CHAR(2) NOT NULL,\n  \"name\" VARCHAR(40),\n  \"inserted_at\" TIMESTAMP,\n  \"updated_at\" TIMESTAMP,\n  PRIMARY KEY (\"code\")\n)"
        );
    }
}

//! Supported SQL dialects.

use crate::identifiers::{quote_ident, quote_ident_mssql, quote_ident_mysql};
use serde::{Deserialize, Serialize};

/// SQL dialect for statement and DDL generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL dialect (uses $1, $2 placeholders)
    #[default]
    Postgres,
    /// SQLite dialect (uses ?1, ?2 placeholders)
    Sqlite,
    /// MySQL dialect (uses ? placeholders)
    Mysql,
    /// SQL Server dialect (uses @P1, @P2 placeholders)
    Mssql,
}

impl Dialect {
    /// Generate a placeholder for the given parameter index (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => format!("?{index}"),
            Dialect::Mysql => "?".to_string(),
            Dialect::Mssql => format!("@P{index}"),
        }
    }

    /// Maximum number of bound parameters in a single statement.
    pub const fn max_params(self) -> usize {
        match self {
            Dialect::Postgres | Dialect::Mysql => 65_535,
            Dialect::Sqlite => 32_766,
            Dialect::Mssql => 2_100,
        }
    }

    /// Quote an identifier for this dialect.
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => quote_ident(name),
            Dialect::Mysql => quote_ident_mysql(name),
            Dialect::Mssql => quote_ident_mssql(name),
        }
    }

    /// Quote a possibly namespace-qualified table name.
    pub fn quote_qualified(self, namespace: Option<&str>, name: &str) -> String {
        match namespace {
            Some(ns) => format!(
                "{}.{}",
                self.quote_identifier(ns),
                self.quote_identifier(name)
            ),
            None => self.quote_identifier(name),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Mssql => "mssql",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

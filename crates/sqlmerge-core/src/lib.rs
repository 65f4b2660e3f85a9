//! Core types and traits for sqlmerge.
//!
//! - `TableSchema` / `Column` / `ColumnRole` describe the tables being reconciled
//! - `Value` and `Row` carry data in and out of the database
//! - `Connection` / `TransactionOps` abstract statement execution
//! - `Dialect` selects placeholder and quoting conventions
//! - `Outcome` and `Cx` are re-exported from asupersync

pub use asupersync::{Cx, Outcome};

pub mod connection;
pub mod dialect;
pub mod error;
pub mod identifiers;
pub mod row;
pub mod table;
pub mod types;
pub mod value;

pub use connection::{Connection, IsolationLevel, TransactionOps};
pub use dialect::Dialect;
pub use error::{
    ConfigError, ConnectionError, ConnectionErrorKind, DataError, DataErrorKind, Error,
    QueryError, QueryErrorKind, Result, SchemaError, SchemaErrorKind, TransactionError,
    TransactionErrorKind, TypeError,
};
pub use identifiers::{quote_ident, quote_ident_mssql, quote_ident_mysql};
pub use row::{ColumnInfo, FromValue, Row};
pub use table::{Column, ColumnRole, TableSchema};
pub use types::SqlType;
pub use value::Value;

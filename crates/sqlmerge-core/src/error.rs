//! Error types for sqlmerge operations.

use std::fmt;

/// The primary error type for all sqlmerge operations.
#[derive(Debug)]
pub enum Error {
    /// Connection-related errors (connect, disconnect, timeout)
    Connection(ConnectionError),
    /// Statement execution errors reported by the database
    Query(QueryError),
    /// Type conversion errors
    Type(TypeError),
    /// Transaction errors
    Transaction(TransactionError),
    /// Schema errors (missing or duplicate columns, mismatched tables)
    Schema(SchemaError),
    /// Configuration errors (no join columns, invalid options)
    Config(ConfigError),
    /// Batch data errors (row shape, duplicate join keys)
    Data(DataError),
    /// I/O errors
    Io(std::io::Error),
    /// Operation was cancelled via asupersync
    Cancelled,
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to establish connection
    Connect,
    /// Connection lost during operation
    Disconnected,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL
    Syntax,
    /// Constraint violation (unique, foreign key, etc.)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Permission denied
    Permission,
    /// Data too large for column
    DataTruncation,
    /// Lock could not be acquired (busy, deadlock)
    Deadlock,
    /// Statement timeout
    Timeout,
    /// Cancelled
    Cancelled,
    /// Other database error
    Database,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

#[derive(Debug)]
pub struct TransactionError {
    pub kind: TransactionErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionErrorKind {
    /// A transaction is already open on this connection
    AlreadyActive,
    /// No transaction is open on this connection
    NotActive,
}

#[derive(Debug)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub table: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// A referenced column does not exist on the table
    ColumnNotFound,
    /// A column name appears more than once in a table
    DuplicateColumn,
    /// Source and target shapes leave nothing to reconcile
    Mismatch,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

#[derive(Debug)]
pub struct DataError {
    pub kind: DataErrorKind,
    pub row: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataErrorKind {
    /// A row does not have one value per batch column
    RowShape,
    /// Two rows share the same join-key tuple
    DuplicateKey,
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(ConfigError {
            message: message.into(),
        })
    }

    /// Create a schema error for the given table.
    pub fn schema(kind: SchemaErrorKind, table: &str, message: impl Into<String>) -> Self {
        Error::Schema(SchemaError {
            kind,
            table: Some(table.to_string()),
            message: message.into(),
        })
    }

    /// Is this a retryable error (lock contention, timeouts)?
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Query(q) => matches!(q.kind, QueryErrorKind::Deadlock | QueryErrorKind::Timeout),
            _ => false,
        }
    }

    /// Was this error raised before any statement reached the database?
    pub fn is_generation_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Schema(_) | Error::Data(_))
    }

    /// Get the SQL that caused this error, if available
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sql.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => write!(f, "Query error: {}", e.message),
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
            Error::Transaction(e) => write!(f, "Transaction error: {}", e.message),
            Error::Schema(e) => write!(f, "Schema error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Data(e) => write!(f, "Data error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{} (table '{}')", self.message, table),
            None => write!(f, "{}", self.message),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{} (row {})", self.message, row),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<TransactionError> for Error {
    fn from(err: TransactionError) -> Self {
        Error::Transaction(err)
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<DataError> for Error {
    fn from(err: DataError) -> Self {
        Error::Data(err)
    }
}

/// Result type alias for sqlmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_flags() {
        let busy = Error::Query(QueryError {
            kind: QueryErrorKind::Deadlock,
            sql: Some("DELETE FROM t".to_string()),
            message: "database is locked".to_string(),
            source: None,
        });
        assert!(busy.is_retryable());
        assert_eq!(busy.sql(), Some("DELETE FROM t"));

        let constraint = Error::Query(QueryError {
            kind: QueryErrorKind::Constraint,
            sql: None,
            message: "UNIQUE constraint failed".to_string(),
            source: None,
        });
        assert!(!constraint.is_retryable());
        assert!(!Error::config("no join columns").is_retryable());
    }

    #[test]
    fn generation_errors_are_flagged() {
        assert!(Error::config("no join columns").is_generation_error());
        assert!(
            Error::schema(SchemaErrorKind::ColumnNotFound, "country", "missing").is_generation_error()
        );
        let data = Error::Data(DataError {
            kind: DataErrorKind::DuplicateKey,
            row: Some(3),
            message: "duplicate join key".to_string(),
        });
        assert!(data.is_generation_error());
        assert!(!Error::Cancelled.is_generation_error());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::schema(
            SchemaErrorKind::ColumnNotFound,
            "dbo.country",
            "join column 'code' not found",
        );
        assert_eq!(
            err.to_string(),
            "Schema error: join column 'code' not found (table 'dbo.country')"
        );

        let err = Error::Data(DataError {
            kind: DataErrorKind::RowShape,
            row: Some(2),
            message: "expected 3 values, found 2".to_string(),
        });
        assert_eq!(err.to_string(), "Data error: expected 3 values, found 2 (row 2)");

        assert_eq!(
            Error::config("no join columns").to_string(),
            "Configuration error: no join columns"
        );
    }
}

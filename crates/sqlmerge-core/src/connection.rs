//! Database connection traits.
//!
//! - [`Connection`] executes statements and opens transactions
//! - [`TransactionOps`] executes statements inside an open transaction
//! - [`IsolationLevel`] selects the transaction isolation level
//!
//! All operations take an asupersync `Cx` and return an `Outcome`, so
//! cancellation flows through the same channel as errors.

use crate::dialect::Dialect;
use crate::row::Row;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use std::future::Future;

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Transactions can see uncommitted changes from others.
    ReadUncommitted,
    /// Transactions only see committed changes from others.
    #[default]
    ReadCommitted,
    /// Transactions see a consistent snapshot of the database.
    RepeatableRead,
    /// Transactions appear to execute sequentially.
    Serializable,
}

impl IsolationLevel {
    /// Get the SQL syntax for this isolation level.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// A database connection capable of executing statements.
///
/// # Example
///
/// ```rust,ignore
/// let tx = conn.begin(&cx).await?;
/// tx.execute(&cx, "DELETE FROM country WHERE code = ?1", &[Value::from("??")]).await?;
/// tx.commit(&cx).await?;
/// ```
pub trait Connection: Send + Sync {
    /// The transaction type returned by this connection.
    type Tx<'conn>: TransactionOps
    where
        Self: 'conn;

    /// The SQL dialect this connection speaks.
    fn dialect(&self) -> Dialect;

    /// Execute a query and return all rows.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, crate::Error>> + Send;

    /// Execute a statement (INSERT, UPDATE, DELETE, DDL) and return rows affected.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    /// Execute multiple statements sequentially.
    ///
    /// Returns the number of rows affected by each statement.
    fn batch(
        &self,
        cx: &Cx,
        statements: &[(String, Vec<Value>)],
    ) -> impl Future<Output = Outcome<Vec<u64>, crate::Error>> + Send;

    /// Begin a transaction with the default isolation level.
    fn begin(&self, cx: &Cx) -> impl Future<Output = Outcome<Self::Tx<'_>, crate::Error>> + Send;

    /// Begin a transaction with a specific isolation level.
    fn begin_with(
        &self,
        cx: &Cx,
        isolation: IsolationLevel,
    ) -> impl Future<Output = Outcome<Self::Tx<'_>, crate::Error>> + Send;
}

/// Operations on an open transaction.
///
/// Dropping a transaction without calling `commit` or `rollback` rolls it back.
pub trait TransactionOps: Send {
    /// Execute a query within this transaction.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, crate::Error>> + Send;

    /// Execute a statement within this transaction.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    /// Commit the transaction, making all changes permanent.
    fn commit(self, cx: &Cx) -> impl Future<Output = Outcome<(), crate::Error>> + Send;

    /// Rollback the transaction, discarding all changes.
    fn rollback(self, cx: &Cx) -> impl Future<Output = Outcome<(), crate::Error>> + Send;
}

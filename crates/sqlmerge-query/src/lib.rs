//! Statement model and SQL rendering for sqlmerge.
//!
//! `sqlmerge-query` is the **statement layer**: reconciliation statements are
//! built as data (`Statement`, `Expr`, `TableRef`) and turned into SQL text
//! plus parameters by a per-dialect [`SqlRenderer`].
//!
//! - **Expressions**: column references, equality, `AND` chains, `EXISTS`
//!   probes and the [`Expr::Now`] timestamp marker.
//! - **Statements**: aliased `DELETE`, joined `UPDATE`, `INSERT ... SELECT`.
//! - **Renderers**: PostgreSQL, SQLite, MySQL and SQL Server.

pub mod expr;
pub mod render;
pub mod statement;

pub use expr::{BinaryOp, Expr, UnaryOp};
pub use render::{
    MssqlRenderer, MysqlRenderer, PostgresRenderer, SqlRenderer, SqliteRenderer,
    renderer_for_dialect,
};
pub use sqlmerge_core::Dialect;
pub use statement::{
    Assignment, DeleteStatement, InsertStatement, SelectQuery, Statement, TableRef,
    UpdateStatement,
};

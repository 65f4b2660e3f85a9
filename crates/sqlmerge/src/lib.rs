//! sqlmerge - set-based reconciliation of staged batches into SQL tables.
//!
//! Given a target table description and a batch of rows, sqlmerge:
//!
//! 1. derives and recreates a staging table next to the target,
//! 2. bulk loads the batch into it,
//! 3. generates set-based DELETE / UPDATE / INSERT statements that bring the
//!    target in line with the staged rows,
//! 4. runs them in one transaction and reports the rows affected.
//!
//! Columns marked [`ColumnRole::TrackInsert`] / [`ColumnRole::TrackUpdate`]
//! receive the database's current timestamp on insert / update.
//!
//! # Quick Start
//!
//! ```ignore
//! use sqlmerge::prelude::*;
//! use sqlmerge_sqlite::SqliteConnection;
//!
//! let target = TableSchema::new("country")
//!     .column(Column::new("code", SqlType::Char(2)).primary_key())
//!     .column(Column::new("name", SqlType::Text))
//!     .column(Column::new("updated_at", SqlType::Timestamp).track_update());
//!
//! let batch = Batch::new(["code", "name"])
//!     .row(vec![Value::from("DE"), Value::from("Deutschland")]);
//!
//! let conn = SqliteConnection::open_memory()?;
//! conn.execute_raw("ATTACH DATABASE ':memory:' AS staging")?;
//!
//! let loader = MergeLoader::new(LoadOptions::default());
//! let report = loader.load(&cx, &conn, &target, &batch).await;
//! ```
//!
//! Statement generation alone is available without a database:
//!
//! ```
//! use sqlmerge::{Column, SqlType, SqliteRenderer, TableSchema, generate};
//!
//! let target = TableSchema::new("country")
//!     .column(Column::new("code", SqlType::Char(2)).primary_key())
//!     .column(Column::new("name", SqlType::Text));
//! let source = TableSchema::new("country")
//!     .namespace("staging")
//!     .column(Column::new("code", SqlType::Char(2)))
//!     .column(Column::new("name", SqlType::Text));
//!
//! for op in generate(&source, &target, None).unwrap() {
//!     let (sql, params) = op.render(&SqliteRenderer);
//!     assert!(params.is_empty());
//!     println!("{}: {}", op.kind, sql);
//! }
//! ```

pub mod batch;
pub mod loader;
pub mod pipeline;

pub use batch::Batch;
pub use loader::{BulkLoader, DEFAULT_CHUNK_SIZE, InsertBulkLoader};
pub use pipeline::{LoadOptions, MergeLoader, MergePlan, MergeReport};

// Re-export the public API of the sub-crates
pub use sqlmerge_core::{
    Column, ColumnRole, Connection, Cx, Dialect, Error, IsolationLevel, Outcome, Result, Row,
    SqlType, TableSchema, TransactionOps, Value,
};

pub use sqlmerge_query::{
    MssqlRenderer, MysqlRenderer, PostgresRenderer, SqlRenderer, SqliteRenderer, Statement,
    renderer_for_dialect,
};

pub use sqlmerge_gen::{MergeConfig, MergeGenerator, MergeKind, MergeOperation, generate};

pub use sqlmerge_schema::{
    DEFAULT_STAGING_NAMESPACE, create_table_sql, derive_staging, drop_table_sql, recreate_table,
};

/// Common imports.
pub mod prelude {
    pub use crate::{
        Batch, BulkLoader, Column, ColumnRole, Connection, Cx, Dialect, Error, InsertBulkLoader,
        LoadOptions, MergeConfig, MergeKind, MergeLoader, MergeReport, Outcome, SqlType,
        TableSchema, TransactionOps, Value,
    };
}

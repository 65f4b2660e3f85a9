//! Bulk transfer of a batch into a staging table.

use crate::batch::Batch;
use asupersync::{Cx, Outcome};
use sqlmerge_core::{Connection, Dialect, Error, Result, SchemaErrorKind, TableSchema, Value};
use std::future::Future;

/// Rows per INSERT statement unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;

/// SQL Server rejects more row constructors than this in one VALUES list.
const MSSQL_MAX_VALUES_ROWS: usize = 1_000;

/// Moves the rows of a [`Batch`] into an existing staging table.
pub trait BulkLoader: Send + Sync {
    /// Load every row of `batch` into `staging` and return the number of rows
    /// written.
    fn load<C: Connection>(
        &self,
        cx: &Cx,
        conn: &C,
        staging: &TableSchema,
        batch: &Batch,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;
}

/// Loads batches with chunked multi-row `INSERT ... VALUES` statements.
///
/// Chunks are shrunk below `chunk_size` when a full chunk would exceed the
/// dialect's bound-parameter limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertBulkLoader {
    chunk_size: usize,
}

impl Default for InsertBulkLoader {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl InsertBulkLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum rows per INSERT statement.
    pub fn chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = rows;
        self
    }

    /// Rows per statement for `columns` columns in `dialect`.
    #[allow(clippy::result_large_err)]
    pub fn rows_per_statement(&self, dialect: Dialect, columns: usize) -> Result<usize> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunk size must be at least 1"));
        }
        let mut rows = self.chunk_size;
        if columns > 0 {
            rows = rows.min(dialect.max_params() / columns);
        }
        if dialect == Dialect::Mssql {
            rows = rows.min(MSSQL_MAX_VALUES_ROWS);
        }
        if rows == 0 {
            return Err(Error::config(format!(
                "{} columns exceed the {} parameter limit of {}",
                columns,
                dialect,
                dialect.max_params()
            )));
        }
        Ok(rows)
    }

    /// Build the INSERT statement for one chunk of `rows` rows.
    pub fn insert_sql(
        staging: &TableSchema,
        columns: &[String],
        rows: usize,
        dialect: Dialect,
    ) -> String {
        let column_list: Vec<String> = columns
            .iter()
            .map(|c| dialect.quote_identifier(c))
            .collect();

        let mut index = 0;
        let tuples: Vec<String> = (0..rows)
            .map(|_| {
                let placeholders: Vec<String> = columns
                    .iter()
                    .map(|_| {
                        index += 1;
                        dialect.placeholder(index)
                    })
                    .collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES {}",
            dialect.quote_qualified(staging.namespace.as_deref(), &staging.name),
            column_list.join(", "),
            tuples.join(", ")
        )
    }

    #[allow(clippy::result_large_err)]
    fn check_columns(staging: &TableSchema, batch: &Batch) -> Result<()> {
        if batch.columns().is_empty() {
            return Err(Error::schema(
                SchemaErrorKind::Mismatch,
                &staging.qualified_name(),
                "batch has no columns",
            ));
        }
        for name in batch.columns() {
            if !staging.has_column(name) {
                return Err(Error::schema(
                    SchemaErrorKind::ColumnNotFound,
                    &staging.qualified_name(),
                    format!("batch column '{}' not found in staging table", name),
                ));
            }
        }
        batch.validate_shape()
    }
}

impl BulkLoader for InsertBulkLoader {
    async fn load<C: Connection>(
        &self,
        cx: &Cx,
        conn: &C,
        staging: &TableSchema,
        batch: &Batch,
    ) -> Outcome<u64, Error> {
        if let Err(e) = Self::check_columns(staging, batch) {
            return Outcome::Err(e);
        }
        if batch.is_empty() {
            tracing::debug!(table = %staging.qualified_name(), "Empty batch, nothing to stage");
            return Outcome::Ok(0);
        }

        let dialect = conn.dialect();
        let per_statement = match self.rows_per_statement(dialect, batch.columns().len()) {
            Ok(n) => n,
            Err(e) => return Outcome::Err(e),
        };

        tracing::debug!(
            table = %staging.qualified_name(),
            rows = batch.len(),
            chunk = per_statement,
            dialect = dialect.name(),
            "Staging batch"
        );

        let mut written = 0u64;
        for chunk in batch.rows().chunks(per_statement) {
            let sql = Self::insert_sql(staging, batch.columns(), chunk.len(), dialect);
            let params: Vec<Value> = chunk.iter().flatten().cloned().collect();
            match conn.execute(cx, &sql, &params).await {
                Outcome::Ok(n) => written += n,
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
            tracing::trace!(rows = chunk.len(), written, "Staged chunk");
        }

        Outcome::Ok(written)
    }
}

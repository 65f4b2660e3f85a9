//! Staging table support for sqlmerge.
//!
//! This crate provides:
//! - Staging table derivation from a target table
//! - CREATE/DROP TABLE generation for PostgreSQL, SQLite, MySQL and SQL Server
//! - Table recreation against a live connection

pub mod ddl;
pub mod staging;

pub use ddl::{
    DdlGenerator, MssqlDdlGenerator, MysqlDdlGenerator, PostgresDdlGenerator,
    SqliteDdlGenerator, create_table_sql, drop_table_sql, generator_for_dialect,
};
pub use staging::{DEFAULT_STAGING_NAMESPACE, derive_staging};

use asupersync::{Cx, Outcome};
use sqlmerge_core::{Connection, Dialect, TableSchema};

/// Drop `table` if it exists, then create it empty.
///
/// Used to give every load a fresh staging table.
pub async fn recreate_table<C: Connection>(
    cx: &Cx,
    conn: &C,
    table: &TableSchema,
    dialect: Dialect,
) -> Outcome<(), sqlmerge_core::Error> {
    let generator = generator_for_dialect(dialect);

    let drop_sql = generator.drop_table(table, true);
    tracing::info!(table = %table.qualified_name(), sql = %drop_sql, "Dropping table");
    match conn.execute(cx, &drop_sql, &[]).await {
        Outcome::Ok(_) => {}
        Outcome::Err(e) => return Outcome::Err(e),
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    }

    let create_sql = generator.create_table(table);
    tracing::info!(
        table = %table.qualified_name(),
        columns = table.columns.len(),
        "Creating table"
    );
    conn.execute(cx, &create_sql, &[]).await.map(|_| ())
}

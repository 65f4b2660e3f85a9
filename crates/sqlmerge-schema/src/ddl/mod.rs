//! DDL (Data Definition Language) generation for staging and target tables.
//!
//! Each dialect supplies its column type mapping; the CREATE/DROP layout is
//! shared.

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use mssql::MssqlDdlGenerator;
pub use mysql::MysqlDdlGenerator;
pub use postgres::PostgresDdlGenerator;
pub use sqlite::SqliteDdlGenerator;

use sqlmerge_core::{Column, Dialect, SqlType, TableSchema};

/// Generates CREATE/DROP TABLE statements for one dialect.
pub trait DdlGenerator: Send + Sync {
    /// The database dialect.
    fn dialect(&self) -> Dialect;

    /// The column type as this dialect spells it.
    fn column_type(&self, ty: &SqlType) -> String;

    /// Generate CREATE TABLE for `table`, including a PRIMARY KEY clause when
    /// the table declares one.
    fn create_table(&self, table: &TableSchema) -> String {
        generate_create_table(self, table)
    }

    /// Generate DROP TABLE for `table`.
    fn drop_table(&self, table: &TableSchema, if_exists: bool) -> String {
        generate_drop_table(self.dialect(), table, if_exists)
    }
}

/// Create a DDL generator for the given dialect.
pub fn generator_for_dialect(dialect: Dialect) -> Box<dyn DdlGenerator> {
    match dialect {
        Dialect::Sqlite => Box::new(SqliteDdlGenerator),
        Dialect::Mysql => Box::new(MysqlDdlGenerator),
        Dialect::Postgres => Box::new(PostgresDdlGenerator),
        Dialect::Mssql => Box::new(MssqlDdlGenerator),
    }
}

/// Render CREATE TABLE for `table` in `dialect`.
pub fn create_table_sql(table: &TableSchema, dialect: Dialect) -> String {
    generator_for_dialect(dialect).create_table(table)
}

/// Render DROP TABLE for `table` in `dialect`.
pub fn drop_table_sql(table: &TableSchema, dialect: Dialect, if_exists: bool) -> String {
    generator_for_dialect(dialect).drop_table(table, if_exists)
}

// ============================================================================
// Shared Helpers
// ============================================================================

fn table_name(table: &TableSchema, dialect: Dialect) -> String {
    dialect.quote_qualified(table.namespace.as_deref(), &table.name)
}

/// Format a column definition for CREATE TABLE.
fn format_column_def<G: DdlGenerator + ?Sized>(generator: &G, col: &Column) -> String {
    let mut def = format!(
        "{} {}",
        generator.dialect().quote_identifier(&col.name),
        generator.column_type(&col.sql_type)
    );
    if !col.nullable {
        def.push_str(" NOT NULL");
    }
    def
}

fn generate_create_table<G: DdlGenerator + ?Sized>(generator: &G, table: &TableSchema) -> String {
    let dialect = generator.dialect();
    tracing::debug!(
        dialect = dialect.name(),
        table = %table.qualified_name(),
        columns = table.columns.len(),
        "Generating CREATE TABLE DDL"
    );

    let mut parts: Vec<String> = table
        .columns
        .iter()
        .map(|col| format!("  {}", format_column_def(generator, col)))
        .collect();

    let pk = table.primary_key();
    if !pk.is_empty() {
        let pk_cols: Vec<String> = pk.iter().map(|c| dialect.quote_identifier(c)).collect();
        parts.push(format!("  PRIMARY KEY ({})", pk_cols.join(", ")));
    }

    let sql = format!(
        "CREATE TABLE {} (\n{}\n)",
        table_name(table, dialect),
        parts.join(",\n")
    );

    tracing::trace!(sql = %sql, "Generated CREATE TABLE statement");
    sql
}

fn generate_drop_table(dialect: Dialect, table: &TableSchema, if_exists: bool) -> String {
    tracing::debug!(
        dialect = dialect.name(),
        table = %table.qualified_name(),
        if_exists,
        "Generating DROP TABLE DDL"
    );
    let name = table_name(table, dialect);
    if if_exists {
        format!("DROP TABLE IF EXISTS {}", name)
    } else {
        format!("DROP TABLE {}", name)
    }
}

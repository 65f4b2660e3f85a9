//! Column role policy.
//!
//! Decides, per target column, whether and how it takes part in the INSERT
//! column list and the UPDATE assignment list.

use sqlmerge_core::{Column, ColumnRole, Error, Result, SchemaErrorKind, TableSchema};
use sqlmerge_query::{Assignment, Expr};

/// Where a target column's value comes from in a given statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Copy the same-named source column.
    Copy,
    /// The current timestamp.
    Now,
    /// Leave the column out of the statement.
    Skip,
}

/// Binding of a column with `role` in the INSERT column list.
pub const fn insert_binding(role: ColumnRole) -> Binding {
    match role {
        ColumnRole::Plain => Binding::Copy,
        ColumnRole::TrackInsert => Binding::Now,
        ColumnRole::TrackUpdate => Binding::Skip,
    }
}

/// Binding of a column with `role` in the UPDATE assignment list.
///
/// Join columns are correlated, never assigned.
pub const fn update_binding(role: ColumnRole, is_join_column: bool) -> Binding {
    match role {
        ColumnRole::TrackInsert => Binding::Skip,
        ColumnRole::TrackUpdate => Binding::Now,
        ColumnRole::Plain if is_join_column => Binding::Skip,
        ColumnRole::Plain => Binding::Copy,
    }
}

/// Resolve a `Copy` binding against the source table.
///
/// Returns `None` for a column missing on the source in lenient mode.
#[allow(clippy::result_large_err)]
fn copy_from_source(
    column: &Column,
    source: &TableSchema,
    source_alias: &str,
    strict: bool,
    statement: &str,
) -> Result<Option<Expr>> {
    if source.has_column(&column.name) {
        return Ok(Some(Expr::qualified(source_alias, &column.name)));
    }
    if strict {
        return Err(Error::schema(
            SchemaErrorKind::ColumnNotFound,
            &source.qualified_name(),
            format!(
                "column '{}' required by {} not found in source",
                column.name, statement
            ),
        ));
    }
    tracing::debug!(
        column = %column.name,
        source = %source.qualified_name(),
        statement,
        "Skipping column absent from source"
    );
    Ok(None)
}

/// Target columns and value expressions for the INSERT, in target order.
#[allow(clippy::result_large_err)]
pub fn insert_columns(
    source: &TableSchema,
    target: &TableSchema,
    source_alias: &str,
    strict: bool,
) -> Result<Vec<(String, Expr)>> {
    let mut out = Vec::with_capacity(target.columns.len());
    for column in &target.columns {
        let value = match insert_binding(column.role) {
            Binding::Skip => None,
            Binding::Now => Some(Expr::Now),
            Binding::Copy => copy_from_source(column, source, source_alias, strict, "insert")?,
        };
        if let Some(value) = value {
            out.push((column.name.clone(), value));
        }
    }
    Ok(out)
}

/// SET-list assignments for the UPDATE, in target order.
#[allow(clippy::result_large_err)]
pub fn update_assignments(
    source: &TableSchema,
    target: &TableSchema,
    join_columns: &[String],
    source_alias: &str,
    strict: bool,
) -> Result<Vec<Assignment>> {
    let mut out = Vec::with_capacity(target.columns.len());
    for column in &target.columns {
        let is_join = join_columns.iter().any(|k| *k == column.name);
        let value = match update_binding(column.role, is_join) {
            Binding::Skip => None,
            Binding::Now => Some(Expr::Now),
            Binding::Copy => copy_from_source(column, source, source_alias, strict, "update")?,
        };
        if let Some(value) = value {
            out.push(Assignment::new(column.name.clone(), value));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlmerge_core::SqlType;

    fn target() -> TableSchema {
        TableSchema::new("country")
            .column(Column::new("code", SqlType::Char(2)).primary_key())
            .column(Column::new("name", SqlType::VarChar(40)))
            .column(Column::new("population", SqlType::BigInt))
            .column(Column::new("inserted_at", SqlType::DateTime).track_insert())
            .column(Column::new("updated_at", SqlType::DateTime).track_update())
    }

    fn source() -> TableSchema {
        TableSchema::new("country")
            .namespace("staging")
            .column(Column::new("code", SqlType::Char(2)))
            .column(Column::new("name", SqlType::VarChar(40)))
    }

    #[test]
    fn bindings_per_role() {
        assert_eq!(insert_binding(ColumnRole::Plain), Binding::Copy);
        assert_eq!(insert_binding(ColumnRole::TrackInsert), Binding::Now);
        assert_eq!(insert_binding(ColumnRole::TrackUpdate), Binding::Skip);

        assert_eq!(update_binding(ColumnRole::Plain, false), Binding::Copy);
        assert_eq!(update_binding(ColumnRole::Plain, true), Binding::Skip);
        assert_eq!(update_binding(ColumnRole::TrackInsert, false), Binding::Skip);
        assert_eq!(update_binding(ColumnRole::TrackUpdate, false), Binding::Now);
    }

    #[test]
    fn insert_list_is_lenient_by_default() {
        let cols = insert_columns(&source(), &target(), "s", false).unwrap();
        let names: Vec<_> = cols.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["code", "name", "inserted_at"]);
        assert_eq!(cols[0].1, Expr::qualified("s", "code"));
        assert_eq!(cols[2].1, Expr::Now);
    }

    #[test]
    fn insert_list_strict_reports_missing_column() {
        match insert_columns(&source(), &target(), "s", true) {
            Err(Error::Schema(e)) => {
                assert_eq!(e.kind, SchemaErrorKind::ColumnNotFound);
                assert!(e.message.contains("population"));
                assert_eq!(e.table.as_deref(), Some("staging.country"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn update_list_excludes_join_and_insert_tracking() {
        let join = vec!["code".to_string()];
        let set = update_assignments(&source(), &target(), &join, "s", false).unwrap();
        assert_eq!(
            set,
            vec![
                Assignment::new("name", Expr::qualified("s", "name")),
                Assignment::new("updated_at", Expr::Now),
            ]
        );
    }

    #[test]
    fn update_list_strict_reports_missing_column() {
        let join = vec!["code".to_string()];
        let err = update_assignments(&source(), &target(), &join, "s", true).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(ref e) if e.kind == SchemaErrorKind::ColumnNotFound
        ));
    }
}

//! Staging table derivation.

use sqlmerge_core::{Column, TableSchema};

/// Namespace used for staging tables when none is given.
pub const DEFAULT_STAGING_NAMESPACE: &str = "staging";

/// Derive the staging table for `target`.
///
/// The staging table has the target's name in `namespace` (default
/// [`DEFAULT_STAGING_NAMESPACE`]), keeps the target's column order and types,
/// and drops every tracking-role column. All staging columns are nullable
/// plain columns without a primary key, so any batch shape loads.
///
/// With `include_columns`, only the named columns are kept. Names the target
/// does not have are ignored.
pub fn derive_staging(
    target: &TableSchema,
    include_columns: Option<&[&str]>,
    namespace: Option<&str>,
) -> TableSchema {
    let columns: Vec<Column> = target
        .columns
        .iter()
        .filter(|c| !c.role.is_tracking())
        .filter(|c| include_columns.is_none_or(|names| names.contains(&c.name.as_str())))
        .map(|c| Column::new(c.name.clone(), c.sql_type.clone()))
        .collect();

    tracing::debug!(
        target_table = %target.qualified_name(),
        namespace = namespace.unwrap_or(DEFAULT_STAGING_NAMESPACE),
        columns = columns.len(),
        "Derived staging table"
    );

    TableSchema {
        name: target.name.clone(),
        namespace: Some(namespace.unwrap_or(DEFAULT_STAGING_NAMESPACE).to_string()),
        columns,
    }
}

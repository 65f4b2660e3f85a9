//! Table and column descriptions consumed by the merge engine.

use crate::error::{Error, Result, SchemaErrorKind};
use crate::types::SqlType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Behavioral role of a column during reconciliation.
///
/// The role is independent of the primary-key flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Ordinary data column, copied from the source on insert and update.
    #[default]
    Plain,
    /// Set to the current timestamp on insert, never touched by update.
    TrackInsert,
    /// Set to the current timestamp on update, never populated on insert.
    TrackUpdate,
}

impl ColumnRole {
    /// Whether the column's value is generated rather than copied from the source.
    pub const fn is_tracking(self) -> bool {
        matches!(self, ColumnRole::TrackInsert | ColumnRole::TrackUpdate)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Plain => "plain",
            ColumnRole::TrackInsert => "track_insert",
            ColumnRole::TrackUpdate => "track_update",
        }
    }
}

fn default_nullable() -> bool {
    true
}

/// A single column of a [`TableSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub role: ColumnRole,
}

impl Column {
    /// Create a nullable, plain, non-key column.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            primary_key: false,
            nullable: true,
            role: ColumnRole::Plain,
        }
    }

    /// Mark the column as part of the primary key (implies NOT NULL).
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn role(mut self, role: ColumnRole) -> Self {
        self.role = role;
        self
    }

    /// Shorthand for `.role(ColumnRole::TrackInsert)`.
    pub fn track_insert(self) -> Self {
        self.role(ColumnRole::TrackInsert)
    }

    /// Shorthand for `.role(ColumnRole::TrackUpdate)`.
    pub fn track_update(self) -> Self {
        self.role(ColumnRole::TrackUpdate)
    }
}

/// An ordered set of columns with a table name and optional namespace.
///
/// Column names must be unique within a table; see [`TableSchema::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            columns: Vec::new(),
        }
    }

    /// Set the namespace (schema or attached database) of the table.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Append a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Look up a column by exact name.
    pub fn column_named(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_named(name).is_some()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of the primary-key columns in declaration order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// `namespace.name`, or just `name` when no namespace is set.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Check that column names are unique.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::schema(
                    SchemaErrorKind::DuplicateColumn,
                    &self.qualified_name(),
                    format!("duplicate column '{}'", column.name),
                ));
            }
        }
        Ok(())
    }
}

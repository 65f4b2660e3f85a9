//! Abstract DELETE / UPDATE / INSERT ... SELECT statements.
//!
//! Statements carry table references, aliases, assignment lists and
//! predicates. They hold no SQL text; rendering is the job of a
//! [`SqlRenderer`](crate::SqlRenderer).

use crate::expr::Expr;
use sqlmerge_core::TableSchema;

/// A table reference with optional namespace and alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub namespace: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            alias: None,
        }
    }

    /// Reference the table described by a schema.
    pub fn of(table: &TableSchema) -> Self {
        Self {
            namespace: table.namespace.clone(),
            name: table.name.clone(),
            alias: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name used to qualify columns: the alias if set, else the table name.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// `SELECT <projection> FROM <from> [WHERE <filter>]`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub projection: Vec<Expr>,
    pub from: TableRef,
    pub filter: Option<Expr>,
}

impl SelectQuery {
    /// `SELECT 1 FROM <from>`, the usual body of an EXISTS probe.
    pub fn new(from: TableRef) -> Self {
        Self {
            projection: vec![Expr::raw("1")],
            from,
            filter: None,
        }
    }

    pub fn project(mut self, projection: Vec<Expr>) -> Self {
        self.projection = projection;
        self
    }

    pub fn filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// `column = value` in an UPDATE's SET list.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// `DELETE FROM <target> [WHERE <filter>]`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub target: TableRef,
    pub filter: Option<Expr>,
}

/// Joined update: rows of `target` matching `source` on `on` receive `assignments`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub target: TableRef,
    pub source: TableRef,
    pub on: Expr,
    pub assignments: Vec<Assignment>,
}

/// `INSERT INTO <target> (<columns>) <select>`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub target: TableRef,
    pub columns: Vec<String>,
    pub select: SelectQuery,
}

/// A data-manipulation statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Delete(DeleteStatement),
    Update(UpdateStatement),
    Insert(InsertStatement),
}

impl Statement {
    /// The table modified by this statement.
    pub fn target(&self) -> &TableRef {
        match self {
            Statement::Delete(s) => &s.target,
            Statement::Update(s) => &s.target,
            Statement::Insert(s) => &s.target,
        }
    }

    pub const fn verb(&self) -> &'static str {
        match self {
            Statement::Delete(_) => "DELETE",
            Statement::Update(_) => "UPDATE",
            Statement::Insert(_) => "INSERT",
        }
    }
}

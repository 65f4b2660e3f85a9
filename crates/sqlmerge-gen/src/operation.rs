//! Generated reconciliation operations.

use sqlmerge_core::Value;
use sqlmerge_query::{SqlRenderer, Statement};
use std::fmt;

/// The kind of a reconciliation statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeKind {
    Delete,
    Update,
    Insert,
}

impl MergeKind {
    /// Emission order of a merge.
    pub const ORDER: [MergeKind; 3] = [MergeKind::Delete, MergeKind::Update, MergeKind::Insert];

    pub const fn as_str(self) -> &'static str {
        match self {
            MergeKind::Delete => "delete",
            MergeKind::Update => "update",
            MergeKind::Insert => "insert",
        }
    }
}

impl fmt::Display for MergeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statement of a merge, tagged with its kind.
///
/// Built fresh per generation call and meant to be executed once.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOperation {
    pub kind: MergeKind,
    pub statement: Statement,
}

impl MergeOperation {
    pub fn new(kind: MergeKind, statement: Statement) -> Self {
        Self { kind, statement }
    }

    /// Render to SQL and parameters with the given renderer.
    pub fn render(&self, renderer: &dyn SqlRenderer) -> (String, Vec<Value>) {
        renderer.render(&self.statement)
    }
}

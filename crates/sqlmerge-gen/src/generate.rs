//! Merge statement generation.
//!
//! Given a source (staging) table and a target table, builds the DELETE,
//! UPDATE and INSERT statements that reconcile the target with the source
//! using set-based operations. Generation is pure: no connection, no I/O.
//!
//! Source rows are assumed unique on the join key. With duplicates the
//! UPDATE picks an arbitrary matching source row and the INSERT inserts
//! every copy; callers that cannot guarantee uniqueness should check it
//! before staging.

use crate::config::MergeConfig;
use crate::operation::{MergeKind, MergeOperation};
use crate::role;
use sqlmerge_core::{Error, Result, SchemaErrorKind, TableSchema};
use sqlmerge_query::{
    DeleteStatement, Expr, InsertStatement, SelectQuery, Statement, TableRef, UpdateStatement,
};

/// Alias of the target table in generated statements.
pub const TARGET_ALIAS: &str = "t";
/// Alias of the source table in generated statements.
pub const SOURCE_ALIAS: &str = "s";

/// Generate a full merge (delete, update, insert) of `source` into `target`.
///
/// `join_columns` defaults to the target's primary key.
#[allow(clippy::result_large_err)]
pub fn generate(
    source: &TableSchema,
    target: &TableSchema,
    join_columns: Option<&[&str]>,
) -> Result<Vec<MergeOperation>> {
    MergeGenerator::new(MergeConfig::full_merge()).generate(source, target, join_columns)
}

/// Resolve and validate the join key.
///
/// Explicit columns must exist on both tables; the default is the target's
/// primary key. Tracking-role columns cannot be join columns.
#[allow(clippy::result_large_err)]
pub fn resolve_join_columns(
    source: &TableSchema,
    target: &TableSchema,
    explicit: Option<&[&str]>,
) -> Result<Vec<String>> {
    let names: Vec<&str> = match explicit {
        Some(cols) => cols.to_vec(),
        None => target.primary_key(),
    };
    if names.is_empty() {
        return Err(Error::config(format!(
            "no join columns for table '{}': pass join columns or declare a primary key",
            target.qualified_name()
        )));
    }

    let mut resolved: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if resolved.iter().any(|k| k == name) {
            return Err(Error::config(format!("join column '{}' listed twice", name)));
        }
        let Some(column) = target.column_named(name) else {
            return Err(Error::schema(
                SchemaErrorKind::ColumnNotFound,
                &target.qualified_name(),
                format!("join column '{}' not found in target", name),
            ));
        };
        if !source.has_column(name) {
            return Err(Error::schema(
                SchemaErrorKind::ColumnNotFound,
                &source.qualified_name(),
                format!("join column '{}' not found in source", name),
            ));
        }
        if column.role.is_tracking() {
            return Err(Error::config(format!(
                "join column '{}' has role '{}' and cannot correlate rows",
                name,
                column.role.as_str()
            )));
        }
        resolved.push(name.to_string());
    }
    Ok(resolved)
}

/// Builds merge operations for a fixed [`MergeConfig`].
///
/// Stateless; share freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeGenerator {
    config: MergeConfig,
}

impl MergeGenerator {
    pub const fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> MergeConfig {
        self.config
    }

    /// Generate the enabled operations in delete, update, insert order.
    ///
    /// Fails before building anything when the join key cannot be resolved.
    #[allow(clippy::result_large_err)]
    pub fn generate(
        &self,
        source: &TableSchema,
        target: &TableSchema,
        join_columns: Option<&[&str]>,
    ) -> Result<Vec<MergeOperation>> {
        source.validate()?;
        target.validate()?;
        let columns = resolve_join_columns(source, target, join_columns)?;
        let join = JoinKey::new(&columns).ok_or_else(|| {
            Error::config(format!(
                "no join columns for table '{}'",
                target.qualified_name()
            ))
        })?;

        tracing::debug!(
            source = %source.qualified_name(),
            target_table = %target.qualified_name(),
            join = ?columns,
            insert = self.config.insert,
            update = self.config.update,
            delete = self.config.delete,
            strict = self.config.strict_column_matching,
            "Generating merge"
        );

        let mut ops = Vec::with_capacity(3);
        for kind in self.config.enabled_kinds() {
            let statement = match kind {
                MergeKind::Delete => Some(self.delete(source, target, &join)),
                MergeKind::Update => self.update(source, target, &join)?,
                MergeKind::Insert => Some(self.insert(source, target, &join)?),
            };
            if let Some(statement) = statement {
                ops.push(MergeOperation::new(kind, statement));
            }
        }

        tracing::debug!(
            target_table = %target.qualified_name(),
            operations = ops.len(),
            "Generated merge"
        );
        Ok(ops)
    }

    fn delete(&self, source: &TableSchema, target: &TableSchema, join: &JoinKey<'_>) -> Statement {
        // Correlated to the outer target alias; an uncorrelated probe would
        // delete everything or nothing.
        let probe = SelectQuery::new(TableRef::of(source).alias(SOURCE_ALIAS))
            .filter(join.predicate());
        Statement::Delete(DeleteStatement {
            target: TableRef::of(target).alias(TARGET_ALIAS),
            filter: Some(Expr::not_exists(probe)),
        })
    }

    #[allow(clippy::result_large_err)]
    fn update(
        &self,
        source: &TableSchema,
        target: &TableSchema,
        join: &JoinKey<'_>,
    ) -> Result<Option<Statement>> {
        let assignments = role::update_assignments(
            source,
            target,
            join.columns,
            SOURCE_ALIAS,
            self.config.strict_column_matching,
        )?;
        if assignments.is_empty() {
            if self.config.strict_column_matching {
                return Err(Error::schema(
                    SchemaErrorKind::Mismatch,
                    &target.qualified_name(),
                    "no updatable columns outside the join key",
                ));
            }
            tracing::warn!(
                target_table = %target.qualified_name(),
                "No updatable columns outside the join key; omitting UPDATE"
            );
            return Ok(None);
        }
        Ok(Some(Statement::Update(UpdateStatement {
            target: TableRef::of(target).alias(TARGET_ALIAS),
            source: TableRef::of(source).alias(SOURCE_ALIAS),
            on: join.predicate(),
            assignments,
        })))
    }

    #[allow(clippy::result_large_err)]
    fn insert(
        &self,
        source: &TableSchema,
        target: &TableSchema,
        join: &JoinKey<'_>,
    ) -> Result<Statement> {
        let bound = role::insert_columns(
            source,
            target,
            SOURCE_ALIAS,
            self.config.strict_column_matching,
        )?;
        if bound.is_empty() {
            return Err(Error::schema(
                SchemaErrorKind::Mismatch,
                &target.qualified_name(),
                "no insertable columns",
            ));
        }
        let (columns, projection): (Vec<String>, Vec<Expr>) = bound.into_iter().unzip();
        let probe = SelectQuery::new(TableRef::of(target).alias(TARGET_ALIAS))
            .filter(join.predicate());
        Ok(Statement::Insert(InsertStatement {
            target: TableRef::of(target),
            columns,
            select: SelectQuery::new(TableRef::of(source).alias(SOURCE_ALIAS))
                .project(projection)
                .filter(Expr::not_exists(probe)),
        }))
    }
}

/// A resolved join key; holds at least one column.
struct JoinKey<'a> {
    columns: &'a [String],
    first: &'a str,
    rest: &'a [String],
}

impl<'a> JoinKey<'a> {
    fn new(columns: &'a [String]) -> Option<Self> {
        let (first, rest) = columns.split_first()?;
        Some(Self {
            columns,
            first,
            rest,
        })
    }

    /// `t.k1 = s.k1 AND t.k2 = s.k2 ...`
    fn predicate(&self) -> Expr {
        let eq = |k: &str| Expr::qualified(TARGET_ALIAS, k).eq(Expr::qualified(SOURCE_ALIAS, k));
        self.rest
            .iter()
            .fold(eq(self.first), |acc, k| acc.and(eq(k.as_str())))
    }
}

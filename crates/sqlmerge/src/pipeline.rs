//! The load-and-merge pipeline.
//!
//! A [`MergeLoader`] takes a target table description and a [`Batch`],
//! stages the batch in a freshly recreated staging table, and reconciles
//! the target with the staged rows in one transaction.

use crate::batch::Batch;
use crate::loader::{BulkLoader, InsertBulkLoader};
use asupersync::{Cx, Outcome};
use serde::{Deserialize, Serialize};
use sqlmerge_core::{Connection, Error, Result, SchemaErrorKind, TableSchema, TransactionOps};
use sqlmerge_gen::{MergeConfig, MergeGenerator, MergeKind, MergeOperation, resolve_join_columns};
use sqlmerge_query::renderer_for_dialect;
use sqlmerge_schema::{DEFAULT_STAGING_NAMESPACE, derive_staging, recreate_table};

/// Options of a [`MergeLoader`].
///
/// Deserializes from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Which statements to run.
    pub merge: MergeConfig,
    /// Namespace of the staging table.
    pub staging_namespace: String,
    /// Reject batches with repeated join keys before staging.
    pub check_unique_keys: bool,
    /// Join key; the target's primary key when unset.
    pub join_columns: Option<Vec<String>>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            merge: MergeConfig::full_merge(),
            staging_namespace: DEFAULT_STAGING_NAMESPACE.to_string(),
            check_unique_keys: true,
            join_columns: None,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    pub fn staging_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.staging_namespace = namespace.into();
        self
    }

    pub fn check_unique_keys(mut self, check: bool) -> Self {
        self.check_unique_keys = check;
        self
    }

    /// Join on these columns instead of the target's primary key.
    pub fn join_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.join_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// Rows affected by one load, as reported by the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Rows written to the staging table.
    pub staged: u64,
    /// Target rows whose key is absent from the batch.
    pub deleted: u64,
    /// Target rows matched by the join key. Every match is rewritten, so
    /// rows whose values did not change are counted too.
    pub updated: u64,
    /// Batch rows whose key was absent from the target.
    pub inserted: u64,
}

impl MergeReport {
    /// Rows affected by the statement of `kind` (0 when it did not run).
    pub fn rows(&self, kind: MergeKind) -> u64 {
        match kind {
            MergeKind::Delete => self.deleted,
            MergeKind::Update => self.updated,
            MergeKind::Insert => self.inserted,
        }
    }

    /// Target rows deleted, matched for update or inserted.
    pub fn total(&self) -> u64 {
        self.deleted + self.updated + self.inserted
    }

    fn record(&mut self, kind: MergeKind, rows: u64) {
        match kind {
            MergeKind::Delete => self.deleted += rows,
            MergeKind::Update => self.updated += rows,
            MergeKind::Insert => self.inserted += rows,
        }
    }
}

/// Everything a load will do, computed without touching the database.
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    pub staging: TableSchema,
    pub join_columns: Vec<String>,
    pub operations: Vec<MergeOperation>,
}

/// Stages batches and merges them into target tables.
#[derive(Debug, Clone, Default)]
pub struct MergeLoader<L = InsertBulkLoader> {
    options: LoadOptions,
    loader: L,
}

impl MergeLoader<InsertBulkLoader> {
    /// A merge loader with the default chunked INSERT bulk loader.
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            loader: InsertBulkLoader::default(),
        }
    }
}

impl<L: BulkLoader> MergeLoader<L> {
    pub fn with_loader(options: LoadOptions, loader: L) -> Self {
        Self { options, loader }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Validate `batch` against `target` and generate the merge.
    ///
    /// Every validation and generation error surfaces here, before any
    /// statement runs.
    #[allow(clippy::result_large_err)]
    pub fn plan(&self, target: &TableSchema, batch: &Batch) -> Result<MergePlan> {
        target.validate()?;
        batch.validate_shape()?;

        if target.namespace.as_deref() == Some(self.options.staging_namespace.as_str()) {
            return Err(Error::config(format!(
                "target '{}' lives in the staging namespace '{}'",
                target.qualified_name(),
                self.options.staging_namespace
            )));
        }

        for name in batch.columns() {
            match target.column_named(name) {
                None => {
                    return Err(Error::schema(
                        SchemaErrorKind::ColumnNotFound,
                        &target.qualified_name(),
                        format!("batch column '{}' not found in target", name),
                    ));
                }
                Some(column) if column.role.is_tracking() => {
                    return Err(Error::schema(
                        SchemaErrorKind::Mismatch,
                        &target.qualified_name(),
                        format!(
                            "batch column '{}' has role '{}' and is set by the merge",
                            name,
                            column.role.as_str()
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        let batch_columns: Vec<&str> = batch.columns().iter().map(String::as_str).collect();
        let staging = derive_staging(
            target,
            Some(batch_columns.as_slice()),
            Some(self.options.staging_namespace.as_str()),
        );

        let explicit: Option<Vec<&str>> = self
            .options
            .join_columns
            .as_ref()
            .map(|cols| cols.iter().map(String::as_str).collect());
        let join_columns = resolve_join_columns(&staging, target, explicit.as_deref())?;
        let join: Vec<&str> = join_columns.iter().map(String::as_str).collect();

        if self.options.check_unique_keys {
            batch.check_unique_keys(&join)?;
        }

        let operations =
            MergeGenerator::new(self.options.merge).generate(&staging, target, Some(join.as_slice()))?;

        tracing::debug!(
            target_table = %target.qualified_name(),
            staging = %staging.qualified_name(),
            join = ?join_columns,
            operations = operations.len(),
            "Planned merge"
        );

        Ok(MergePlan {
            staging,
            join_columns,
            operations,
        })
    }

    /// Stage `batch` and merge it into `target`.
    ///
    /// The staging table is recreated and loaded outside the merge
    /// transaction. The merge statements run in one transaction; on the
    /// first failure it is rolled back and that error is returned.
    pub async fn load<C: Connection>(
        &self,
        cx: &Cx,
        conn: &C,
        target: &TableSchema,
        batch: &Batch,
    ) -> Outcome<MergeReport, Error> {
        let plan = match self.plan(target, batch) {
            Ok(plan) => plan,
            Err(e) => return Outcome::Err(e),
        };
        let dialect = conn.dialect();

        match recreate_table(cx, conn, &plan.staging, dialect).await {
            Outcome::Ok(()) => {}
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        }

        let staged = match self.loader.load(cx, conn, &plan.staging, batch).await {
            Outcome::Ok(n) => n,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };
        tracing::info!(
            staging = %plan.staging.qualified_name(),
            rows = staged,
            "Staged batch"
        );

        let renderer = renderer_for_dialect(dialect);
        let tx = match conn.begin(cx).await {
            Outcome::Ok(tx) => tx,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        let mut report = MergeReport {
            staged,
            ..MergeReport::default()
        };
        for op in &plan.operations {
            let (sql, params) = op.render(renderer.as_ref());
            tracing::info!(
                kind = %op.kind,
                target_table = %target.qualified_name(),
                sql = %sql,
                "Executing merge statement"
            );
            let result = tx.execute(cx, &sql, &params).await;
            match result {
                Outcome::Ok(rows) => {
                    tracing::debug!(kind = %op.kind, rows, "Merge statement done");
                    report.record(op.kind, rows);
                }
                Outcome::Err(e) => {
                    tracing::warn!(kind = %op.kind, error = %e, "Merge statement failed, rolling back");
                    if let Outcome::Err(rollback_err) = tx.rollback(cx).await {
                        tracing::warn!(error = %rollback_err, "Rollback failed");
                    }
                    return Outcome::Err(e);
                }
                // Dropping the transaction rolls it back.
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
        }

        match tx.commit(cx).await {
            Outcome::Ok(()) => {}
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        }

        tracing::info!(
            target_table = %target.qualified_name(),
            deleted = report.deleted,
            updated = report.updated,
            inserted = report.inserted,
            "Merge committed"
        );
        Outcome::Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlmerge_core::{Column, SqlType, Value};

    fn country() -> TableSchema {
        TableSchema::new("country")
            .column(Column::new("code", SqlType::Char(2)).primary_key())
            .column(Column::new("name", SqlType::Text))
            .column(Column::new("inserted_at", SqlType::Timestamp).track_insert())
            .column(Column::new("updated_at", SqlType::Timestamp).track_update())
    }

    fn batch() -> Batch {
        Batch::new(["code", "name"])
            .row(vec![Value::from("DE"), Value::from("Deutschland")])
            .row(vec![Value::from("IT"), Value::from("Italien")])
    }

    #[test]
    fn options_defaults_and_json() {
        let options = LoadOptions::default();
        assert_eq!(options.merge, MergeConfig::full_merge());
        assert_eq!(options.staging_namespace, "staging");
        assert!(options.check_unique_keys);
        assert!(options.join_columns.is_none());

        let options: LoadOptions = serde_json::from_str(
            r#"{"merge": {"delete": false}, "join_columns": ["code"], "staging_namespace": "load"}"#,
        )
        .unwrap();
        assert_eq!(options.merge, MergeConfig::upsert());
        assert_eq!(options.join_columns, Some(vec!["code".to_string()]));
        assert_eq!(options.staging_namespace, "load");
        assert!(options.check_unique_keys);
    }

    #[test]
    fn plan_full_merge() {
        let plan = MergeLoader::new(LoadOptions::default())
            .plan(&country(), &batch())
            .unwrap();
        assert_eq!(plan.staging.qualified_name(), "staging.country");
        assert_eq!(
            plan.staging.column_names().collect::<Vec<_>>(),
            ["code", "name"]
        );
        assert_eq!(plan.join_columns, ["code"]);
        let kinds: Vec<_> = plan.operations.iter().map(|op| op.kind).collect();
        assert_eq!(kinds, MergeKind::ORDER);
    }

    #[test]
    fn plan_rejects_unknown_batch_column() {
        let batch = Batch::new(["code", "population"]);
        let err = MergeLoader::new(LoadOptions::default())
            .plan(&country(), &batch)
            .unwrap_err();
        assert!(matches!(err, Error::Schema(ref e) if e.kind == SchemaErrorKind::ColumnNotFound));
    }

    #[test]
    fn plan_rejects_tracking_batch_column() {
        let batch = Batch::new(["code", "updated_at"]);
        let err = MergeLoader::new(LoadOptions::default())
            .plan(&country(), &batch)
            .unwrap_err();
        assert!(matches!(err, Error::Schema(ref e) if e.kind == SchemaErrorKind::Mismatch));
    }

    #[test]
    fn plan_rejects_duplicate_keys_unless_disabled() {
        let batch = batch().row(vec![Value::from("DE"), Value::from("Germany")]);
        let err = MergeLoader::new(LoadOptions::default())
            .plan(&country(), &batch)
            .unwrap_err();
        assert!(matches!(err, Error::Data(_)));

        let plan = MergeLoader::new(LoadOptions::new().check_unique_keys(false))
            .plan(&country(), &batch);
        assert!(plan.is_ok());
    }

    #[test]
    fn plan_requires_join_key_in_batch() {
        let batch = Batch::new(["name"]).row(vec![Value::from("Deutschland")]);
        let err = MergeLoader::new(LoadOptions::default())
            .plan(&country(), &batch)
            .unwrap_err();
        assert!(matches!(err, Error::Schema(ref e) if e.kind == SchemaErrorKind::ColumnNotFound));
    }

    #[test]
    fn plan_rejects_target_in_staging_namespace() {
        let target = country().namespace("staging");
        let err = MergeLoader::new(LoadOptions::default())
            .plan(&target, &batch())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn report_accessors() {
        let mut report = MergeReport::default();
        report.record(MergeKind::Delete, 1);
        report.record(MergeKind::Update, 2);
        report.record(MergeKind::Insert, 3);
        assert_eq!(report.rows(MergeKind::Update), 2);
        assert_eq!(report.total(), 6);
    }
}

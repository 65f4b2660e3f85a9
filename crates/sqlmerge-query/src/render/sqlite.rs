//! SQLite rendering.

use super::SqlRenderer;
use sqlmerge_core::Dialect;

/// Renders statements for SQLite (3.33 or newer for `UPDATE ... FROM`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteRenderer;

impl SqlRenderer for SqliteRenderer {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    // Millisecond text timestamps sort lexicographically.
    fn current_timestamp(&self) -> &'static str {
        "strftime('%Y-%m-%d %H:%M:%f', 'now')"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::render::fixtures;
    use crate::statement::{DeleteStatement, Statement, TableRef};

    #[test]
    fn update_uses_from_clause() {
        let (sql, params) = SqliteRenderer.render(&fixtures::update());
        assert_eq!(
            sql,
            "UPDATE \"dbo\".\"country\" AS \"t\" SET \"name\" = \"s\".\"name\", \
             \"updated_at\" = strftime('%Y-%m-%d %H:%M:%f', 'now') \
             FROM \"staging\".\"country\" AS \"s\" WHERE \"t\".\"code\" = \"s\".\"code\""
        );
        assert!(params.is_empty());
    }

    #[test]
    fn delete_without_namespace() {
        let stmt = Statement::Delete(DeleteStatement {
            target: TableRef::new("country").alias("t"),
            filter: Some(Expr::qualified("t", "code").eq(Expr::lit("??"))),
        });
        let (sql, params) = SqliteRenderer.render(&stmt);
        assert_eq!(
            sql,
            "DELETE FROM \"country\" AS \"t\" WHERE \"t\".\"code\" = ?1"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn insert_resolves_now() {
        let (sql, _) = SqliteRenderer.render(&fixtures::insert());
        assert!(sql.starts_with(
            "INSERT INTO \"dbo\".\"country\" (\"code\", \"name\", \"inserted_at\") SELECT"
        ));
        assert!(sql.contains("\"s\".\"name\", strftime('%Y-%m-%d %H:%M:%f', 'now') FROM"));
    }
}

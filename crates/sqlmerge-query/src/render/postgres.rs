//! PostgreSQL rendering.

use super::SqlRenderer;
use sqlmerge_core::Dialect;

/// Renders statements for PostgreSQL.
///
/// `UPDATE ... FROM` and aliased `DELETE FROM` are native, so the shared
/// defaults apply unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresRenderer;

impl SqlRenderer for PostgresRenderer {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn delete() {
        let (sql, _) = PostgresRenderer.render(&fixtures::delete());
        assert_eq!(
            sql,
            "DELETE FROM \"dbo\".\"country\" AS \"t\" WHERE NOT EXISTS \
             (SELECT 1 FROM \"staging\".\"country\" AS \"s\" WHERE \"t\".\"code\" = \"s\".\"code\")"
        );
    }

    #[test]
    fn update() {
        let (sql, _) = PostgresRenderer.render(&fixtures::update());
        assert_eq!(
            sql,
            "UPDATE \"dbo\".\"country\" AS \"t\" SET \"name\" = \"s\".\"name\", \
             \"updated_at\" = CURRENT_TIMESTAMP FROM \"staging\".\"country\" AS \"s\" \
             WHERE \"t\".\"code\" = \"s\".\"code\""
        );
    }

    #[test]
    fn insert() {
        let (sql, _) = PostgresRenderer.render(&fixtures::insert());
        assert_eq!(
            sql,
            "INSERT INTO \"dbo\".\"country\" (\"code\", \"name\", \"inserted_at\") \
             SELECT \"s\".\"code\", \"s\".\"name\", CURRENT_TIMESTAMP \
             FROM \"staging\".\"country\" AS \"s\" WHERE NOT EXISTS \
             (SELECT 1 FROM \"dbo\".\"country\" AS \"t\" WHERE \"t\".\"code\" = \"s\".\"code\")"
        );
    }
}

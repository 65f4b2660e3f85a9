//! SQL Server rendering.

use super::SqlRenderer;
use crate::statement::{DeleteStatement, UpdateStatement};
use sqlmerge_core::{Dialect, Value};

/// Renders statements for SQL Server (T-SQL).
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlRenderer;

impl SqlRenderer for MssqlRenderer {
    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// `DELETE t FROM target AS t WHERE ...`
    fn render_delete(&self, stmt: &DeleteStatement, params: &mut Vec<Value>) -> String {
        let mut sql = format!(
            "DELETE {} FROM {}",
            self.dialect().quote_identifier(stmt.target.binding()),
            self.render_table(&stmt.target)
        );
        if let Some(filter) = &stmt.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&self.render_expr(filter, params));
        }
        sql
    }

    /// `UPDATE t SET c = s.c FROM target AS t JOIN source AS s ON ...`
    fn render_update(&self, stmt: &UpdateStatement, params: &mut Vec<Value>) -> String {
        let set = self.render_assignments(&stmt.assignments, params);
        let on = self.render_expr(&stmt.on, params);
        format!(
            "UPDATE {} SET {} FROM {} JOIN {} ON {}",
            self.dialect().quote_identifier(stmt.target.binding()),
            set,
            self.render_table(&stmt.target),
            self.render_table(&stmt.source),
            on
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn delete() {
        let (sql, _) = MssqlRenderer.render(&fixtures::delete());
        assert_eq!(
            sql,
            "DELETE [t] FROM [dbo].[country] AS [t] WHERE NOT EXISTS \
             (SELECT 1 FROM [staging].[country] AS [s] WHERE [t].[code] = [s].[code])"
        );
    }

    #[test]
    fn update() {
        let (sql, _) = MssqlRenderer.render(&fixtures::update());
        assert_eq!(
            sql,
            "UPDATE [t] SET [name] = [s].[name], [updated_at] = CURRENT_TIMESTAMP \
             FROM [dbo].[country] AS [t] JOIN [staging].[country] AS [s] \
             ON [t].[code] = [s].[code]"
        );
    }

    #[test]
    fn insert() {
        let (sql, _) = MssqlRenderer.render(&fixtures::insert());
        assert_eq!(
            sql,
            "INSERT INTO [dbo].[country] ([code], [name], [inserted_at]) \
             SELECT [s].[code], [s].[name], CURRENT_TIMESTAMP \
             FROM [staging].[country] AS [s] WHERE NOT EXISTS \
             (SELECT 1 FROM [dbo].[country] AS [t] WHERE [t].[code] = [s].[code])"
        );
    }
}

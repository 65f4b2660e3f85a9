//! MySQL rendering.

use super::SqlRenderer;
use crate::statement::{DeleteStatement, UpdateStatement};
use sqlmerge_core::{Dialect, Value};

/// Renders statements for MySQL.
///
/// MySQL spells the joined update as `UPDATE t JOIN s ON ... SET` and needs
/// the multi-table `DELETE t FROM ...` form to delete through an alias.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlRenderer;

impl SqlRenderer for MysqlRenderer {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP(6)"
    }

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

    fn render_update(&self, stmt: &UpdateStatement, params: &mut Vec<Value>) -> String {
        let dialect = self.dialect();
        let on = self.render_expr(&stmt.on, params);
        let binding = dialect.quote_identifier(stmt.target.binding());
        // Target columns must be qualified once a second table is joined.
        let set = stmt
            .assignments
            .iter()
            .map(|a| {
                format!(
                    "{}.{} = {}",
                    binding,
                    dialect.quote_identifier(&a.column),
                    self.render_expr(&a.value, params)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} JOIN {} ON {} SET {}",
            self.render_table(&stmt.target),
            self.render_table(&stmt.source),
            on,
            set
        )
    }
}

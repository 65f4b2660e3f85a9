//! Dialect-specific SQL rendering of the statement model.
//!
//! Each dialect has a renderer implementing [`SqlRenderer`]. The shared
//! default methods produce the ANSI-style text used by PostgreSQL and
//! SQLite; MySQL and SQL Server override the joined UPDATE and aliased
//! DELETE forms they spell differently.

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use mssql::MssqlRenderer;
pub use mysql::MysqlRenderer;
pub use postgres::PostgresRenderer;
pub use sqlite::SqliteRenderer;

use crate::expr::{Expr, UnaryOp};
use crate::statement::{
    Assignment, DeleteStatement, InsertStatement, SelectQuery, Statement, TableRef,
    UpdateStatement,
};
use sqlmerge_core::{Dialect, Value};

/// Renders abstract statements to SQL text plus bound parameters.
pub trait SqlRenderer: Send + Sync {
    /// The dialect this renderer targets.
    fn dialect(&self) -> Dialect;

    /// SQL expression producing the current timestamp.
    fn current_timestamp(&self) -> &'static str;

    /// Render a complete statement.
    fn render(&self, statement: &Statement) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = match statement {
            Statement::Delete(stmt) => self.render_delete(stmt, &mut params),
            Statement::Update(stmt) => self.render_update(stmt, &mut params),
            Statement::Insert(stmt) => self.render_insert(stmt, &mut params),
        };
        tracing::trace!(
            dialect = %self.dialect(),
            params = params.len(),
            sql = %sql,
            "Rendered statement"
        );
        (sql, params)
    }

    /// Render an expression, appending literal values to `params`.
    fn render_expr(&self, expr: &Expr, params: &mut Vec<Value>) -> String {
        let dialect = self.dialect();
        match expr {
            Expr::Column { table, name } => {
                if let Some(t) = table {
                    format!(
                        "{}.{}",
                        dialect.quote_identifier(t),
                        dialect.quote_identifier(name)
                    )
                } else {
                    dialect.quote_identifier(name)
                }
            }

            Expr::Literal(value) => {
                params.push(value.clone());
                dialect.placeholder(params.len())
            }

            Expr::Now => self.current_timestamp().to_string(),

            Expr::Binary { left, op, right } => {
                let left_sql = self.render_expr(left, params);
                let right_sql = self.render_expr(right, params);
                format!("{left_sql} {} {right_sql}", op.as_str())
            }

            Expr::Unary { op, expr } => {
                let expr_sql = self.render_expr(expr, params);
                match op {
                    UnaryOp::Not => format!("NOT {expr_sql}"),
                }
            }

            Expr::IsNull { expr, negated } => {
                let expr_sql = self.render_expr(expr, params);
                if *negated {
                    format!("{expr_sql} IS NOT NULL")
                } else {
                    format!("{expr_sql} IS NULL")
                }
            }

            Expr::Exists { subquery, negated } => {
                let sub_sql = self.render_select(subquery, params);
                let not_str = if *negated { "NOT " } else { "" };
                format!("{not_str}EXISTS ({sub_sql})")
            }

            Expr::Raw(sql) => sql.clone(),

            Expr::Paren(inner) => format!("({})", self.render_expr(inner, params)),
        }
    }

    /// `[ns.]name [AS alias]`
    fn render_table(&self, table: &TableRef) -> String {
        let dialect = self.dialect();
        let name = dialect.quote_qualified(table.namespace.as_deref(), &table.name);
        match &table.alias {
            Some(alias) => format!("{} AS {}", name, dialect.quote_identifier(alias)),
            None => name,
        }
    }

    fn render_select(&self, query: &SelectQuery, params: &mut Vec<Value>) -> String {
        let projection: Vec<String> = query
            .projection
            .iter()
            .map(|e| self.render_expr(e, params))
            .collect();
        let mut sql = format!(
            "SELECT {} FROM {}",
            projection.join(", "),
            self.render_table(&query.from)
        );
        if let Some(filter) = &query.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&self.render_expr(filter, params));
        }
        sql
    }

    /// `SET` list entries; unqualified target columns by default.
    fn render_assignments(&self, assignments: &[Assignment], params: &mut Vec<Value>) -> String {
        let dialect = self.dialect();
        assignments
            .iter()
            .map(|a| {
                format!(
                    "{} = {}",
                    dialect.quote_identifier(&a.column),
                    self.render_expr(&a.value, params)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `DELETE FROM target AS t [WHERE ...]`
    fn render_delete(&self, stmt: &DeleteStatement, params: &mut Vec<Value>) -> String {
        let mut sql = format!("DELETE FROM {}", self.render_table(&stmt.target));
        if let Some(filter) = &stmt.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&self.render_expr(filter, params));
        }
        sql
    }

    /// `UPDATE target AS t SET c = s.c FROM source AS s WHERE <on>`
    fn render_update(&self, stmt: &UpdateStatement, params: &mut Vec<Value>) -> String {
        let set = self.render_assignments(&stmt.assignments, params);
        let on = self.render_expr(&stmt.on, params);
        format!(
            "UPDATE {} SET {} FROM {} WHERE {}",
            self.render_table(&stmt.target),
            set,
            self.render_table(&stmt.source),
            on
        )
    }

    /// `INSERT INTO target (cols) SELECT ...`
    fn render_insert(&self, stmt: &InsertStatement, params: &mut Vec<Value>) -> String {
        let dialect = self.dialect();
        let target = dialect.quote_qualified(stmt.target.namespace.as_deref(), &stmt.target.name);
        let columns: Vec<String> = stmt
            .columns
            .iter()
            .map(|c| dialect.quote_identifier(c))
            .collect();
        format!(
            "INSERT INTO {} ({}) {}",
            target,
            columns.join(", "),
            self.render_select(&stmt.select, params)
        )
    }
}

/// Create a renderer for the given dialect.
pub fn renderer_for_dialect(dialect: Dialect) -> Box<dyn SqlRenderer> {
    match dialect {
        Dialect::Postgres => Box::new(PostgresRenderer),
        Dialect::Sqlite => Box::new(SqliteRenderer),
        Dialect::Mysql => Box::new(MysqlRenderer),
        Dialect::Mssql => Box::new(MssqlRenderer),
    }
}

//! Dialect-neutral SQL expressions.

use crate::statement::SelectQuery;
use sqlmerge_core::Value;

/// A SQL expression used in predicates, projections and assignments.
///
/// Expressions are plain data; a [`SqlRenderer`](crate::SqlRenderer) turns
/// them into dialect-specific SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference with optional table qualifier
    Column {
        /// Optional table name or alias
        table: Option<String>,
        /// Column name
        name: String,
    },

    /// Literal value, rendered as a bound parameter
    Literal(Value),

    /// The current timestamp, resolved per dialect at render time
    Now,

    /// Binary operation (e.g., a = b, a AND b)
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation (NOT a)
    Unary { op: UnaryOp, expr: Box<Expr> },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// EXISTS / NOT EXISTS (subquery)
    Exists {
        subquery: Box<SelectQuery>,
        negated: bool,
    },

    /// Raw SQL fragment (escape hatch)
    Raw(String),

    /// Parenthesized expression
    Paren(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Logical AND
    And,
    /// Logical OR
    Or,
}

impl BinaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

impl Expr {
    /// Unqualified column reference.
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column {
            table: None,
            name: name.into(),
        }
    }

    /// Column reference qualified by a table name or alias.
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Expr::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    pub fn eq(self, other: Expr) -> Self {
        self.binary(BinaryOp::Eq, other)
    }

    pub fn ne(self, other: Expr) -> Self {
        self.binary(BinaryOp::Ne, other)
    }

    pub fn and(self, other: Expr) -> Self {
        self.binary(BinaryOp::And, other)
    }

    pub fn or(self, other: Expr) -> Self {
        self.binary(BinaryOp::Or, other)
    }

    pub fn not(self) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            expr: Box::new(self),
        }
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn exists(subquery: SelectQuery) -> Self {
        Expr::Exists {
            subquery: Box::new(subquery),
            negated: false,
        }
    }

    pub fn not_exists(subquery: SelectQuery) -> Self {
        Expr::Exists {
            subquery: Box::new(subquery),
            negated: true,
        }
    }

    /// Wrap expression in parentheses.
    pub fn paren(self) -> Self {
        Expr::Paren(Box::new(self))
    }

    fn binary(self, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Fold expressions into a left-nested AND chain.
    ///
    /// Returns `None` when the iterator is empty.
    pub fn and_all(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::and)
    }

    /// Column names referenced anywhere in this expression, including subqueries.
    pub fn referenced_columns(&self) -> Vec<(Option<&str>, &str)> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<(Option<&'a str>, &'a str)>) {
        match self {
            Expr::Column { table, name } => out.push((table.as_deref(), name.as_str())),
            Expr::Binary { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::Unary { expr, .. } | Expr::IsNull { expr, .. } | Expr::Paren(expr) => {
                expr.collect_columns(out);
            }
            Expr::Exists { subquery, .. } => {
                for p in &subquery.projection {
                    p.collect_columns(out);
                }
                if let Some(filter) = &subquery.filter {
                    filter.collect_columns(out);
                }
            }
            Expr::Literal(_) | Expr::Now | Expr::Raw(_) => {}
        }
    }
}

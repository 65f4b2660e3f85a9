//! SQL identifier quoting utilities.
//!
//! Table, namespace and column names flow into generated statements
//! unmodified, so every identifier is quoted with the dialect's quote
//! characters and embedded quote characters are doubled.

/// Quote a SQL identifier using ANSI double-quoting.
///
/// # Examples
///
/// ```
/// use sqlmerge_core::quote_ident;
///
/// assert_eq!(quote_ident("country"), "\"country\"");
/// assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using MySQL backtick quoting.
///
/// ```
/// use sqlmerge_core::quote_ident_mysql;
///
/// assert_eq!(quote_ident_mysql("country"), "`country`");
/// ```
#[inline]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a SQL identifier using SQL Server bracket quoting.
///
/// Only the closing bracket needs escaping (`]` becomes `]]`).
///
/// ```
/// use sqlmerge_core::quote_ident_mssql;
///
/// assert_eq!(quote_ident_mssql("country"), "[country]");
/// assert_eq!(quote_ident_mssql("a]b"), "[a]]b]");
/// ```
#[inline]
pub fn quote_ident_mssql(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

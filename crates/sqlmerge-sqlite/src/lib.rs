//! SQLite statement executor for sqlmerge.
//!
// FFI bindings require unsafe code
#![allow(unsafe_code)]
//!
//! Implements the `Connection` trait from sqlmerge-core on top of the
//! bundled libsqlite3, so generated merge statements and staging loads can
//! run against an in-memory or file database.
//!
//! Staging namespaces map to attached databases:
//!
//! ```rust,ignore
//! use sqlmerge_sqlite::SqliteConnection;
//!
//! let conn = SqliteConnection::open_memory()?;
//! conn.execute_raw("ATTACH DATABASE ':memory:' AS staging")?;
//! ```
//!
//! # Type Mapping
//!
//! | Value | SQLite storage |
//! |-------|----------------|
//! | `Bool` | INTEGER (0/1) |
//! | `TinyInt` .. `BigInt` | INTEGER |
//! | `Float`, `Double` | REAL |
//! | `Text`, `Decimal` | TEXT |
//! | `Bytes` | BLOB |
//! | `Date`, `Time`, `Timestamp` | TEXT (`YYYY-MM-DD HH:MM:SS.fff`) |
//! | `Json` | TEXT |
//!
//! Reading back yields `Int`/`BigInt`, `Double`, `Text`, `Bytes` or `Null`.

pub mod connection;
pub mod ffi;
pub mod types;

pub use connection::{OpenFlags, SqliteConfig, SqliteConnection, SqliteTransaction};

/// The SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// The SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}

//! SQLite connection implementation.
//!
//! Safe wrappers around SQLite's C API implementing the `Connection` and
//! `TransactionOps` traits from sqlmerge-core.

// Allow casts in FFI code where we need to match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::result_large_err)]
#![allow(clippy::borrow_as_ptr)]
#![allow(clippy::if_not_else)]

use crate::ffi;
use crate::types;
use sqlmerge_core::{
    Connection, Cx, Dialect, Error, IsolationLevel, Outcome, Row, TransactionOps, Value,
    error::{
        ConnectionError, ConnectionErrorKind, QueryError, QueryErrorKind, TransactionError,
        TransactionErrorKind,
    },
    row::ColumnInfo,
};
use std::ffi::{CStr, CString, c_int};
use std::future::Future;
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Configuration for opening SQLite connections.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or ":memory:" for in-memory database.
    pub path: String,
    /// Open flags (read-only, read-write, create, etc.)
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    /// Open for reading only.
    pub read_only: bool,
    /// Open for reading and writing.
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
    /// Enable URI filename interpretation.
    pub uri: bool,
    /// Open in multi-thread mode.
    pub no_mutex: bool,
    /// Open in serialized mode.
    pub full_mutex: bool,
}

impl OpenFlags {
    /// Create flags for read-only access.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access (database must exist).
    pub fn read_write() -> Self {
        Self {
            read_write: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access with creation if needed.
    pub fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Default::default()
        }
    }

    fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        }
        if self.read_write {
            flags |= ffi::SQLITE_OPEN_READWRITE;
        }
        if self.create {
            flags |= ffi::SQLITE_OPEN_CREATE;
        }
        if self.uri {
            flags |= ffi::SQLITE_OPEN_URI;
        }
        if self.no_mutex {
            flags |= ffi::SQLITE_OPEN_NOMUTEX;
        }
        if self.full_mutex {
            flags |= ffi::SQLITE_OPEN_FULLMUTEX;
        }

        // Default to read-write if no mode specified
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            flags: OpenFlags::create_read_write(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a new config for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Set open flags.
    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set busy timeout.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }
}

struct SqliteInner {
    db: *mut ffi::sqlite3,
    in_transaction: bool,
}

// SAFETY: the handle is only touched while the owning Mutex is held.
unsafe impl Send for SqliteInner {}

/// A connection to a SQLite database.
///
/// Statements execute synchronously under an internal mutex; the async
/// trait methods resolve immediately.
pub struct SqliteConnection {
    inner: Mutex<SqliteInner>,
    path: String,
}

impl SqliteConnection {
    /// Open a new SQLite connection with the given configuration.
    pub fn open(config: &SqliteConfig) -> Result<Self, Error> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                message: "Invalid path: contains null byte".to_string(),
                source: None,
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let msg = if !db.is_null() {
                // SAFETY: db is valid, errmsg returns a valid C string
                unsafe {
                    let msg = last_error_message(db);
                    ffi::sqlite3_close(db);
                    msg
                }
            } else {
                ffi::error_string(rc).to_string()
            };

            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                message: format!("Failed to open database: {}", msg),
                source: None,
            }));
        }

        if config.busy_timeout_ms > 0 {
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, config.busy_timeout_ms as c_int);
            }
        }

        tracing::debug!(path = %config.path, version = ffi::version(), "Opened SQLite database");

        Ok(Self {
            inner: Mutex::new(SqliteInner {
                db,
                in_transaction: false,
            }),
            path: config.path.clone(),
        })
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, Error> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open a file-based database.
    pub fn open_file(path: impl Into<String>) -> Result<Self, Error> {
        Self::open(&SqliteConfig::file(path))
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, SqliteInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Execute SQL directly without preparing (DDL, ATTACH, PRAGMA, ...).
    ///
    /// Multiple `;`-separated statements are allowed.
    pub fn execute_raw(&self, sql: &str) -> Result<(), Error> {
        let inner = self.lock();
        exec(inner.db, sql)
    }

    /// Get the number of rows changed by the last statement.
    pub fn changes(&self) -> i32 {
        let inner = self.lock();
        // SAFETY: db is valid
        unsafe { ffi::sqlite3_changes(inner.db) }
    }

    /// Whether an explicit transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.lock().in_transaction
    }

    /// Prepare and execute a query, returning all rows.
    fn query_sync(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        let inner = self.lock();
        tracing::trace!(sql = %sql, params = params.len(), "Executing query");
        let stmt = prepare_stmt(inner.db, sql)?;

        for (i, param) in params.iter().enumerate() {
            // SAFETY: stmt is valid, index is 1-based
            let rc = unsafe { types::bind_value(stmt, (i + 1) as c_int, param) };
            if rc != ffi::SQLITE_OK {
                // SAFETY: stmt is valid
                unsafe { ffi::sqlite3_finalize(stmt) };
                return Err(bind_error(inner.db, sql, i + 1));
            }
        }

        // SAFETY: stmt is valid
        let col_count = unsafe { ffi::sqlite3_column_count(stmt) };
        let mut col_names = Vec::with_capacity(col_count as usize);
        for i in 0..col_count {
            let name =
                unsafe { types::column_name(stmt, i) }.unwrap_or_else(|| format!("col{}", i));
            col_names.push(name);
        }
        let columns = Arc::new(ColumnInfo::new(col_names));

        let mut rows = Vec::new();
        loop {
            // SAFETY: stmt is valid
            let rc = unsafe { ffi::sqlite3_step(stmt) };
            match rc {
                ffi::SQLITE_ROW => {
                    let mut values = Vec::with_capacity(col_count as usize);
                    for i in 0..col_count {
                        // SAFETY: stmt is valid, we just got SQLITE_ROW
                        values.push(unsafe { types::read_column(stmt, i) });
                    }
                    rows.push(Row::with_columns(Arc::clone(&columns), values));
                }
                ffi::SQLITE_DONE => break,
                _ => {
                    // SAFETY: stmt is valid
                    unsafe { ffi::sqlite3_finalize(stmt) };
                    return Err(step_error(inner.db, sql));
                }
            }
        }

        // SAFETY: stmt is valid
        unsafe { ffi::sqlite3_finalize(stmt) };
        Ok(rows)
    }

    /// Prepare and execute a statement, returning rows affected.
    fn execute_sync(&self, sql: &str, params: &[Value]) -> Result<u64, Error> {
        let inner = self.lock();
        tracing::trace!(sql = %sql, params = params.len(), "Executing statement");
        let stmt = prepare_stmt(inner.db, sql)?;

        for (i, param) in params.iter().enumerate() {
            // SAFETY: stmt is valid
            let rc = unsafe { types::bind_value(stmt, (i + 1) as c_int, param) };
            if rc != ffi::SQLITE_OK {
                // SAFETY: stmt is valid
                unsafe { ffi::sqlite3_finalize(stmt) };
                return Err(bind_error(inner.db, sql, i + 1));
            }
        }

        // SAFETY: stmt is valid
        let rc = unsafe { ffi::sqlite3_step(stmt) };

        match rc {
            ffi::SQLITE_DONE | ffi::SQLITE_ROW => {
                // SAFETY: stmt is valid
                unsafe { ffi::sqlite3_finalize(stmt) };
                // SAFETY: db is valid
                let changes = unsafe { ffi::sqlite3_changes(inner.db) };
                Ok(changes as u64)
            }
            _ => {
                // Read the message before finalize resets it.
                let err = step_error(inner.db, sql);
                // SAFETY: stmt is valid
                unsafe { ffi::sqlite3_finalize(stmt) };
                Err(err)
            }
        }
    }

    fn begin_sync(&self, isolation: IsolationLevel) -> Result<(), Error> {
        let mut inner = self.lock();
        if inner.in_transaction {
            return Err(Error::Transaction(TransactionError {
                kind: TransactionErrorKind::AlreadyActive,
                message: "Already in a transaction".to_string(),
            }));
        }

        // SQLite has no isolation levels; approximate with lock modes.
        let begin_sql = match isolation {
            IsolationLevel::Serializable => "BEGIN EXCLUSIVE",
            IsolationLevel::RepeatableRead | IsolationLevel::ReadCommitted => "BEGIN IMMEDIATE",
            IsolationLevel::ReadUncommitted => "BEGIN DEFERRED",
        };

        exec(inner.db, begin_sql)?;
        inner.in_transaction = true;
        tracing::debug!(statement = begin_sql, "Transaction started");
        Ok(())
    }

    fn commit_sync(&self) -> Result<(), Error> {
        let mut inner = self.lock();
        if !inner.in_transaction {
            return Err(not_active());
        }

        exec(inner.db, "COMMIT")?;
        inner.in_transaction = false;
        tracing::debug!("Transaction committed");
        Ok(())
    }

    fn rollback_sync(&self) -> Result<(), Error> {
        let mut inner = self.lock();
        if !inner.in_transaction {
            return Err(not_active());
        }
        inner.in_transaction = false;

        // Some errors (SQLITE_FULL, SQLITE_IOERR, ...) already rolled back.
        // SAFETY: db is valid
        if unsafe { ffi::sqlite3_get_autocommit(inner.db) } != 0 {
            tracing::debug!("Transaction already rolled back by SQLite");
            return Ok(());
        }

        exec(inner.db, "ROLLBACK")?;
        tracing::debug!("Transaction rolled back");
        Ok(())
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !inner.db.is_null() {
            // SAFETY: db is valid and no statements outlive their call
            unsafe {
                ffi::sqlite3_close_v2(inner.db);
            }
            inner.db = ptr::null_mut();
        }
    }
}

/// A SQLite transaction.
///
/// Rolled back on drop unless committed.
pub struct SqliteTransaction<'conn> {
    conn: &'conn SqliteConnection,
    finished: bool,
}

impl<'conn> SqliteTransaction<'conn> {
    fn new(conn: &'conn SqliteConnection) -> Self {
        Self {
            conn,
            finished: false,
        }
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.conn.rollback_sync() {
                tracing::warn!(error = %e, "Rollback on drop failed");
            }
        }
    }
}

impl Connection for SqliteConnection {
    type Tx<'conn>
        = SqliteTransaction<'conn>
    where
        Self: 'conn;

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn query(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send {
        let result = self.query_sync(sql, params);
        async move { result.map_or_else(Outcome::Err, Outcome::Ok) }
    }

    fn execute(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        let result = self.execute_sync(sql, params);
        async move { result.map_or_else(Outcome::Err, Outcome::Ok) }
    }

    fn batch(
        &self,
        _cx: &Cx,
        statements: &[(String, Vec<Value>)],
    ) -> impl Future<Output = Outcome<Vec<u64>, Error>> + Send {
        let result = statements
            .iter()
            .map(|(sql, params)| self.execute_sync(sql, params))
            .collect::<Result<Vec<_>, _>>();
        async move { result.map_or_else(Outcome::Err, Outcome::Ok) }
    }

    fn begin(&self, cx: &Cx) -> impl Future<Output = Outcome<Self::Tx<'_>, Error>> + Send {
        self.begin_with(cx, IsolationLevel::default())
    }

    fn begin_with(
        &self,
        _cx: &Cx,
        isolation: IsolationLevel,
    ) -> impl Future<Output = Outcome<Self::Tx<'_>, Error>> + Send {
        let result = self
            .begin_sync(isolation)
            .map(|()| SqliteTransaction::new(self));
        async move { result.map_or_else(Outcome::Err, Outcome::Ok) }
    }
}

impl TransactionOps for SqliteTransaction<'_> {
    fn query(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send {
        let result = self.conn.query_sync(sql, params);
        async move { result.map_or_else(Outcome::Err, Outcome::Ok) }
    }

    fn execute(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        let result = self.conn.execute_sync(sql, params);
        async move { result.map_or_else(Outcome::Err, Outcome::Ok) }
    }

    async fn commit(mut self, _cx: &Cx) -> Outcome<(), Error> {
        self.finished = true;
        self.conn
            .commit_sync()
            .map_or_else(Outcome::Err, Outcome::Ok)
    }

    async fn rollback(mut self, _cx: &Cx) -> Outcome<(), Error> {
        self.finished = true;
        self.conn
            .rollback_sync()
            .map_or_else(Outcome::Err, Outcome::Ok)
    }
}

// Helper functions

/// # Safety
/// `db` must be a valid connection handle.
unsafe fn last_error_message(db: *mut ffi::sqlite3) -> String {
    unsafe {
        let ptr = ffi::sqlite3_errmsg(db);
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

fn nul_in_sql(sql: &str) -> Error {
    Error::Query(QueryError {
        kind: QueryErrorKind::Syntax,
        sql: Some(sql.to_string()),
        message: "SQL contains null byte".to_string(),
        source: None,
    })
}

fn not_active() -> Error {
    Error::Transaction(TransactionError {
        kind: TransactionErrorKind::NotActive,
        message: "Not in a transaction".to_string(),
    })
}

fn exec(db: *mut ffi::sqlite3, sql: &str) -> Result<(), Error> {
    let c_sql = CString::new(sql).map_err(|_| nul_in_sql(sql))?;
    let mut errmsg: *mut std::ffi::c_char = ptr::null_mut();

    // SAFETY: All pointers are valid
    let rc = unsafe { ffi::sqlite3_exec(db, c_sql.as_ptr(), None, ptr::null_mut(), &mut errmsg) };

    if rc != ffi::SQLITE_OK {
        let msg = if !errmsg.is_null() {
            // SAFETY: errmsg is a valid C string allocated by SQLite
            let msg = unsafe { CStr::from_ptr(errmsg).to_string_lossy().into_owned() };
            unsafe { ffi::sqlite3_free(errmsg.cast()) };
            msg
        } else {
            ffi::error_string(rc).to_string()
        };

        return Err(Error::Query(QueryError {
            kind: error_code_to_kind(rc),
            sql: Some(sql.to_string()),
            message: msg,
            source: None,
        }));
    }

    Ok(())
}

fn prepare_stmt(db: *mut ffi::sqlite3, sql: &str) -> Result<*mut ffi::sqlite3_stmt, Error> {
    let c_sql = CString::new(sql).map_err(|_| nul_in_sql(sql))?;
    let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();

    // SAFETY: All pointers are valid
    let rc = unsafe {
        ffi::sqlite3_prepare_v2(
            db,
            c_sql.as_ptr(),
            c_sql.as_bytes().len() as c_int,
            &mut stmt,
            ptr::null_mut(),
        )
    };

    if rc != ffi::SQLITE_OK {
        return Err(step_error(db, sql));
    }

    Ok(stmt)
}

fn bind_error(db: *mut ffi::sqlite3, sql: &str, param_index: usize) -> Error {
    // SAFETY: db is valid
    let msg = unsafe { last_error_message(db) };

    Error::Query(QueryError {
        kind: QueryErrorKind::Database,
        sql: Some(sql.to_string()),
        message: format!("Failed to bind parameter {}: {}", param_index, msg),
        source: None,
    })
}

fn step_error(db: *mut ffi::sqlite3, sql: &str) -> Error {
    // SAFETY: db is valid
    let msg = unsafe { last_error_message(db) };
    let code = unsafe { ffi::sqlite3_errcode(db) };

    Error::Query(QueryError {
        kind: error_code_to_kind(code),
        sql: Some(sql.to_string()),
        message: msg,
        source: None,
    })
}

fn error_code_to_kind(code: c_int) -> QueryErrorKind {
    // Extended codes keep the primary code in the low byte.
    match code & 0xff {
        ffi::SQLITE_CONSTRAINT => QueryErrorKind::Constraint,
        ffi::SQLITE_BUSY | ffi::SQLITE_LOCKED => QueryErrorKind::Deadlock,
        ffi::SQLITE_PERM | ffi::SQLITE_AUTH => QueryErrorKind::Permission,
        ffi::SQLITE_NOTFOUND => QueryErrorKind::NotFound,
        ffi::SQLITE_TOOBIG => QueryErrorKind::DataTruncation,
        ffi::SQLITE_INTERRUPT | ffi::SQLITE_ABORT => QueryErrorKind::Cancelled,
        _ => QueryErrorKind::Database,
    }
}

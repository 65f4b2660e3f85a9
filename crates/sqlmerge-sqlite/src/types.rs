//! Type encoding and decoding between `Value` and SQLite storage classes.
//!
//! SQLite stores INTEGER, REAL, TEXT, BLOB or NULL. Temporal values are
//! bound as text in the same `YYYY-MM-DD HH:MM:SS.fff` layout that the
//! SQLite renderer's current-timestamp expression produces, so generated
//! and loaded timestamps compare correctly.

use crate::ffi;
use sqlmerge_core::Value;
use std::ffi::{CStr, c_int};

fn bind_str(stmt: *mut ffi::sqlite3_stmt, index: c_int, s: &str) -> c_int {
    let bytes = s.as_bytes();
    // SAFETY: caller of bind_value guarantees stmt/index; SQLITE_TRANSIENT
    // makes SQLite copy the buffer before we drop it.
    unsafe {
        ffi::sqlite3_bind_text(
            stmt,
            index,
            bytes.as_ptr().cast(),
            bytes.len() as c_int,
            ffi::SQLITE_TRANSIENT,
        )
    }
}

/// Bind a Value to a prepared statement parameter.
///
/// # Safety
/// - `stmt` must be a valid, non-null prepared statement handle
/// - `index` must be a valid 1-based parameter index
pub unsafe fn bind_value(stmt: *mut ffi::sqlite3_stmt, index: c_int, value: &Value) -> c_int {
    unsafe {
        match value {
            Value::Null => ffi::sqlite3_bind_null(stmt, index),
            Value::Bool(b) => ffi::sqlite3_bind_int(stmt, index, if *b { 1 } else { 0 }),
            Value::TinyInt(v) => ffi::sqlite3_bind_int(stmt, index, i32::from(*v)),
            Value::SmallInt(v) => ffi::sqlite3_bind_int(stmt, index, i32::from(*v)),
            Value::Int(v) => ffi::sqlite3_bind_int(stmt, index, *v),
            Value::BigInt(v) => ffi::sqlite3_bind_int64(stmt, index, *v),
            Value::Float(v) => ffi::sqlite3_bind_double(stmt, index, f64::from(*v)),
            Value::Double(v) => ffi::sqlite3_bind_double(stmt, index, *v),
            Value::Decimal(s) | Value::Text(s) => bind_str(stmt, index, s),
            Value::Bytes(b) => ffi::sqlite3_bind_blob(
                stmt,
                index,
                b.as_ptr().cast(),
                b.len() as c_int,
                ffi::SQLITE_TRANSIENT,
            ),
            Value::Date(days) => bind_str(stmt, index, &days_to_date(*days)),
            Value::Time(micros) => bind_str(stmt, index, &micros_to_time(*micros)),
            Value::Timestamp(micros) | Value::TimestampTz(micros) => {
                bind_str(stmt, index, &micros_to_timestamp(*micros))
            }
            Value::Json(json) => bind_str(stmt, index, &json.to_string()),
        }
    }
}

/// Read a column value from a result row.
///
/// # Safety
/// - `stmt` must be a valid prepared statement that has just returned SQLITE_ROW
/// - `index` must be a valid 0-based column index
pub unsafe fn read_column(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Value {
    unsafe {
        match ffi::sqlite3_column_type(stmt, index) {
            ffi::SQLITE_INTEGER => {
                let v = ffi::sqlite3_column_int64(stmt, index);
                i32::try_from(v).map_or(Value::BigInt(v), Value::Int)
            }
            ffi::SQLITE_FLOAT => Value::Double(ffi::sqlite3_column_double(stmt, index)),
            ffi::SQLITE_TEXT => {
                let ptr = ffi::sqlite3_column_text(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index);
                if ptr.is_null() {
                    Value::Null
                } else {
                    let slice = std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize);
                    Value::Text(String::from_utf8_lossy(slice).into_owned())
                }
            }
            ffi::SQLITE_BLOB => {
                let ptr = ffi::sqlite3_column_blob(stmt, index);
                let len = ffi::sqlite3_column_bytes(stmt, index);
                if ptr.is_null() || len == 0 {
                    Value::Bytes(Vec::new())
                } else {
                    let slice = std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize);
                    Value::Bytes(slice.to_vec())
                }
            }
            _ => Value::Null,
        }
    }
}

/// Get the column name from a result.
///
/// # Safety
/// - `stmt` must be a valid prepared statement
/// - `index` must be a valid 0-based column index
pub unsafe fn column_name(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    unsafe {
        let ptr = ffi::sqlite3_column_name(stmt, index);
        if ptr.is_null() {
            None
        } else {
            CStr::from_ptr(ptr).to_str().ok().map(String::from)
        }
    }
}

/// Civil date from days since 1970-01-01 (proleptic Gregorian).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Days since Unix epoch to `YYYY-MM-DD`.
fn days_to_date(days: i32) -> String {
    let (year, month, day) = civil_from_days(i64::from(days));
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Microseconds since midnight to `HH:MM:SS.fff`.
fn micros_to_time(micros: i64) -> String {
    let micros = micros.rem_euclid(86_400_000_000);
    let total_secs = micros / 1_000_000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    let millis = (micros % 1_000_000) / 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Microseconds since Unix epoch to `YYYY-MM-DD HH:MM:SS.fff`.
fn micros_to_timestamp(micros: i64) -> String {
    let days = micros.div_euclid(86_400_000_000);
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02} {}",
        year,
        month,
        day,
        micros_to_time(micros)
    )
}

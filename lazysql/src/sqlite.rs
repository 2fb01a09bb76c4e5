///
/// SQLite backend.
///
/// `SqliteDatabase` owns a rusqlite `Connection`. Statements are compiled
/// directly through `rusqlite::ffi` so the cursor can drive the native
/// step/column/finalize calls itself instead of going through rusqlite's
/// borrowed `Rows`.
///
/// Storage classes map onto `ColumnType` as follows:
/// - INTEGER: `Integer32` when the value fits in an i32, else `Integer64`
/// - FLOAT: `Float`
/// - TEXT: `Text` (text that is not valid UTF-8 reads as absent)
/// - BLOB: `Blob`
/// - NULL: `Null`
///
/// Once a statement reports SQLITE_DONE it stays exhausted; stepping again
/// returns `false` instead of letting SQLite re-run the query. A failed step
/// is just as final: later steps repeat the same error.
///

use std::ffi::{CStr, CString, c_int};
use std::marker::PhantomData;
use std::path::Path;
use std::ptr;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, ffi};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{DbError, Result};
use crate::query::SelectQuery;
use crate::statement::{Database, Statement};
use crate::value::ColumnType;

pub struct SqliteDatabase {
    conn: Connection,
    tag: String,
    path: String,
}

impl SqliteDatabase {
    pub fn open(path: impl AsRef<Path>, tag: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            tag: tag.into(),
            path: path.display().to_string(),
        })
    }

    pub fn open_in_memory(tag: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            tag: tag.into(),
            path: crate::config::MEMORY_PATH.to_string(),
        })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else if config.read_only {
            Connection::open_with_flags(
                &config.path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            Connection::open(&config.path)?
        };

        if let Some(ms) = config.busy_timeout_ms {
            conn.busy_timeout(Duration::from_millis(ms))?;
        }

        debug!(tag = %config.tag(), path = %config.path, read_only = config.read_only, "opened database");

        Ok(Self {
            conn,
            tag: config.tag(),
            path: config.path.clone(),
        })
    }

    /// Runs one or more statements that return no rows (DDL, inserts).
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Database for SqliteDatabase {
    type Statement<'a> = SqliteStatement<'a>;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn prepare<'a>(&'a self, query: &SelectQuery) -> Result<SqliteStatement<'a>> {
        let sql = CString::new(query.to_sql()).map_err(rusqlite::Error::from)?;
        let db = unsafe { self.conn.handle() };
        let mut raw: *mut ffi::sqlite3_stmt = ptr::null_mut();

        let rc = unsafe { ffi::sqlite3_prepare_v2(db, sql.as_ptr(), -1, &mut raw, ptr::null_mut()) };
        if rc != ffi::SQLITE_OK {
            return Err(engine_error(db, rc));
        }
        if raw.is_null() {
            return Err(DbError::Engine(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_MISUSE),
                Some("query compiled to an empty statement".to_string()),
            )));
        }

        Ok(SqliteStatement {
            raw,
            db,
            done: false,
            failure: None,
            _conn: PhantomData,
        })
    }
}

fn engine_error(db: *mut ffi::sqlite3, code: c_int) -> DbError {
    failure_error(code, errmsg(db))
}

fn errmsg(db: *mut ffi::sqlite3) -> Option<String> {
    unsafe {
        let msg = ffi::sqlite3_errmsg(db);
        if msg.is_null() {
            None
        } else {
            Some(CStr::from_ptr(msg).to_string_lossy().into_owned())
        }
    }
}

fn failure_error(code: c_int, message: Option<String>) -> DbError {
    DbError::Engine(rusqlite::Error::SqliteFailure(ffi::Error::new(code), message))
}

pub struct SqliteStatement<'db> {
    raw: *mut ffi::sqlite3_stmt,
    db: *mut ffi::sqlite3,
    done: bool,
    failure: Option<(c_int, Option<String>)>,
    _conn: PhantomData<&'db Connection>,
}

impl SqliteStatement<'_> {
    fn has_column(&self, index: usize) -> bool {
        !self.raw.is_null() && index < self.column_count()
    }

    fn storage_class(&self, index: usize) -> c_int {
        if !self.has_column(index) {
            return ffi::SQLITE_NULL;
        }
        unsafe { ffi::sqlite3_column_type(self.raw, index as c_int) }
    }

    fn bytes_at(&self, index: usize) -> usize {
        let len = unsafe { ffi::sqlite3_column_bytes(self.raw, index as c_int) };
        len.max(0) as usize
    }
}

impl Statement for SqliteStatement<'_> {
    fn step(&mut self) -> Result<bool> {
        if self.raw.is_null() {
            return Err(DbError::Engine(rusqlite::Error::SqliteFailure(
                ffi::Error::new(ffi::SQLITE_MISUSE),
                Some("statement has been finalized".to_string()),
            )));
        }
        if let Some((code, ref message)) = self.failure {
            return Err(failure_error(code, message.clone()));
        }
        if self.done {
            return Ok(false);
        }

        match unsafe { ffi::sqlite3_step(self.raw) } {
            ffi::SQLITE_ROW => Ok(true),
            ffi::SQLITE_DONE => {
                self.done = true;
                Ok(false)
            }
            rc => {
                // stepping again would reset and re-run the query
                let message = errmsg(self.db);
                self.failure = Some((rc, message.clone()));
                Err(failure_error(rc, message))
            }
        }
    }

    fn column_count(&self) -> usize {
        if self.raw.is_null() {
            return 0;
        }
        let count = unsafe { ffi::sqlite3_column_count(self.raw) };
        count.max(0) as usize
    }

    fn column_type(&self, index: usize) -> ColumnType {
        match self.storage_class(index) {
            ffi::SQLITE_INTEGER => {
                let v = unsafe { ffi::sqlite3_column_int64(self.raw, index as c_int) };
                if i32::try_from(v).is_ok() {
                    ColumnType::Integer32
                } else {
                    ColumnType::Integer64
                }
            }
            ffi::SQLITE_FLOAT => ColumnType::Float,
            ffi::SQLITE_TEXT => ColumnType::Text,
            ffi::SQLITE_BLOB => ColumnType::Blob,
            _ => ColumnType::Null,
        }
    }

    fn column_name(&self, index: usize) -> Option<String> {
        if !self.has_column(index) {
            return None;
        }
        unsafe {
            let name = ffi::sqlite3_column_name(self.raw, index as c_int);
            if name.is_null() {
                None
            } else {
                Some(CStr::from_ptr(name).to_string_lossy().into_owned())
            }
        }
    }

    fn read_i32(&self, index: usize) -> Option<i32> {
        self.read_i64(index).and_then(|v| i32::try_from(v).ok())
    }

    fn read_i64(&self, index: usize) -> Option<i64> {
        if self.storage_class(index) == ffi::SQLITE_NULL {
            return None;
        }
        Some(unsafe { ffi::sqlite3_column_int64(self.raw, index as c_int) })
    }

    fn read_f64(&self, index: usize) -> Option<f64> {
        if self.storage_class(index) == ffi::SQLITE_NULL {
            return None;
        }
        Some(unsafe { ffi::sqlite3_column_double(self.raw, index as c_int) })
    }

    fn read_text(&self, index: usize) -> Option<String> {
        if self.storage_class(index) == ffi::SQLITE_NULL {
            return None;
        }
        // text before bytes: the length is only valid after the conversion
        let text = unsafe { ffi::sqlite3_column_text(self.raw, index as c_int) };
        if text.is_null() {
            return None;
        }
        let len = self.bytes_at(index);
        let bytes = unsafe { std::slice::from_raw_parts(text, len) };
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn read_blob(&self, index: usize) -> Option<Vec<u8>> {
        if self.storage_class(index) == ffi::SQLITE_NULL {
            return None;
        }
        let blob = unsafe { ffi::sqlite3_column_blob(self.raw, index as c_int) };
        let len = self.bytes_at(index);
        if len == 0 {
            return Some(Vec::new());
        }
        if blob.is_null() {
            return None;
        }
        let bytes = unsafe { std::slice::from_raw_parts(blob as *const u8, len) };
        Some(bytes.to_vec())
    }

    fn finalize(&mut self) -> Result<()> {
        if self.raw.is_null() {
            return Ok(());
        }
        let rc = unsafe { ffi::sqlite3_finalize(self.raw) };
        self.raw = ptr::null_mut();
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(engine_error(self.db, rc))
        }
    }
}

impl Drop for SqliteStatement<'_> {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            unsafe {
                ffi::sqlite3_finalize(self.raw);
            }
            self.raw = ptr::null_mut();
        }
    }
}

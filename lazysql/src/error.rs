///
/// Cursor error types.
///
/// Two families of failure reach callers:
/// - Misuse: caller-side contract violations caught before any I/O, such as
///   a select with no source tables, or iterating a cursor after `release`.
/// - Engine: anything the SQLite layer reports while compiling, stepping, or
///   finalizing a statement. These are carried verbatim, never rewrapped.
///
/// Configuration and file errors only come from `DatabaseConfig` loading.
///

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The operation a misuse error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Select,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Select => f.write_str("select"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Misuse in {operation} on database '{tag}' ({path}): {message}")]
    Misuse {
        tag: String,
        path: String,
        operation: OperationKind,
        message: String,
    },

    #[error("Cursor on database '{tag}' ({path}) has been released")]
    CursorClosed { tag: String, path: String },

    #[error(transparent)]
    Engine(#[from] rusqlite::Error),

    #[error("Failed to load database config at {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = DbError> = std::result::Result<T, E>;

impl DbError {
    pub fn is_misuse(&self) -> bool {
        matches!(self, DbError::Misuse { .. })
    }

    pub fn is_engine(&self) -> bool {
        matches!(self, DbError::Engine(_))
    }

    /// The SQLite extended result code, when the engine reported one.
    pub fn sqlite_code(&self) -> Option<i32> {
        match self {
            DbError::Engine(rusqlite::Error::SqliteFailure(err, _)) => Some(err.extended_code),
            _ => None,
        }
    }
}

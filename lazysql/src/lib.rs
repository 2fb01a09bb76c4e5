///
/// # lazysql — Lazy typed row cursors over SQLite
///
/// Turns the dynamically typed rows of a SQLite select into a uniform
/// `Value` model, one row at a time or all at once, without re-running the
/// query and without leaking the compiled statement.
///
/// Architecture:
/// - `value`: the `Value` tagged union and its `Row`/`RowSet` aliases.
/// - `query`: `SelectQuery`, the immutable select descriptor and its SQL.
/// - `statement`: the `Database`/`Statement` traits cursors drive.
/// - `sqlite`: the rusqlite-backed implementation of those traits.
/// - `extract`: decoding a positioned statement's columns into values.
/// - `cursor`: the lazily compiled `Cursor` and its four entry points.
/// - `config`: TOML-loadable `DatabaseConfig`.
///
/// ## Library Usage
///
/// ```rust,ignore
/// use lazysql::{Cursor, DatabaseConfig, SqliteDatabase};
///
/// let db = SqliteDatabase::from_config(&DatabaseConfig::from_path(path)?)?;
/// let mut cursor = Cursor::new(&db, false, vec!["id".into()], vec!["users".into()])?;
/// while let Some(row) = cursor.next_row()? {
///     println!("{:?}", row);
/// }
/// ```
///

pub mod config;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod query;
pub mod sqlite;
pub mod statement;
pub mod value;

#[cfg(test)]
mod fake;

pub use config::DatabaseConfig;
pub use cursor::{Cursor, Rows};
pub use error::{DbError, OperationKind, Result};
pub use query::SelectQuery;
pub use sqlite::{SqliteDatabase, SqliteStatement};
pub use statement::{Database, Statement};
pub use value::{ColumnType, Row, RowSet, Value, ValueColumn};

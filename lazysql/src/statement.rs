///
/// The seam between cursors and the database engine.
///
/// A `Database` compiles a `SelectQuery` into a `Statement`; the statement
/// borrows the database for as long as it lives. Cursors only ever talk to
/// the engine through these two traits, so the SQLite backend and the test
/// fakes are interchangeable.
///

use crate::error::Result;
use crate::query::SelectQuery;
use crate::value::ColumnType;

pub trait Database {
    type Statement<'a>: Statement
    where
        Self: 'a;

    /// Short name identifying this database in errors and logs.
    fn tag(&self) -> &str;

    /// Location the database was opened from (`:memory:` for in-memory).
    fn path(&self) -> &str;

    fn prepare<'a>(&'a self, query: &SelectQuery) -> Result<Self::Statement<'a>>;
}

/// A compiled statement positioned before, on, or after its result rows.
///
/// The typed reads look at the current row only and return `None` when the
/// engine has nothing to give back for that column.
pub trait Statement {
    /// Moves to the next row. `Ok(false)` once the result set is exhausted.
    fn step(&mut self) -> Result<bool>;

    fn column_count(&self) -> usize;

    fn column_type(&self, index: usize) -> ColumnType;

    fn column_name(&self, index: usize) -> Option<String>;

    fn read_i32(&self, index: usize) -> Option<i32>;

    fn read_i64(&self, index: usize) -> Option<i64>;

    fn read_f64(&self, index: usize) -> Option<f64>;

    fn read_text(&self, index: usize) -> Option<String>;

    fn read_blob(&self, index: usize) -> Option<Vec<u8>>;

    /// Releases native resources. Calling it again is a no-op.
    fn finalize(&mut self) -> Result<()>;
}

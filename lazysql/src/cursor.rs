///
/// # Lazy cursors
///
/// A `Cursor` owns a `SelectQuery` and, once it has been used, the compiled
/// statement for it. Construction validates the query and performs no I/O;
/// the statement is prepared on the first call to any iteration method and
/// reused for the rest of the cursor's life.
///
/// ## Lifecycle
///
/// ```text
/// new ──► (lazy) ──first iteration──► (compiled) ──release/drop──► (closed)
/// ```
///
/// The statement is finalized exactly once: by an explicit `release`, or by
/// `Drop` when the cursor goes out of scope. `release` reports finalize
/// failures; `Drop` logs and discards them. After an explicit `release`
/// every iteration method fails with `DbError::CursorClosed`.
///
/// ## Example
///
/// ```rust
/// use lazysql::{Cursor, SqliteDatabase, Value};
///
/// let db = SqliteDatabase::open_in_memory("main")?;
/// db.execute_batch("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (1), (2);")?;
///
/// let mut cursor = Cursor::new(&db, false, vec!["a".into()], vec!["t".into()])?;
/// assert_eq!(cursor.all_values()?, vec![Value::Integer32(1), Value::Integer32(2)]);
/// cursor.release()?;
/// # Ok::<(), lazysql::DbError>(())
/// ```
///

use tracing::{debug, trace, warn};

use crate::error::{DbError, OperationKind, Result};
use crate::extract::{decode_column, extract_row};
use crate::query::SelectQuery;
use crate::statement::{Database, Statement};
use crate::value::{Row, RowSet, Value, ValueColumn};

pub struct Cursor<'db, D: Database> {
    db: &'db D,
    query: SelectQuery,
    statement: Option<D::Statement<'db>>,
    closed: bool,
}

impl<'db, D: Database> Cursor<'db, D> {
    pub fn new(
        db: &'db D,
        distinct: bool,
        columns: Vec<String>,
        tables: Vec<String>,
    ) -> Result<Self> {
        Self::from_query(db, SelectQuery::new(distinct, columns, tables))
    }

    pub fn from_query(db: &'db D, query: SelectQuery) -> Result<Self> {
        if query.tables().is_empty() {
            return Err(DbError::Misuse {
                tag: db.tag().to_string(),
                path: db.path().to_string(),
                operation: OperationKind::Select,
                message: "Empty table".to_string(),
            });
        }
        Ok(Self {
            db,
            query,
            statement: None,
            closed: false,
        })
    }

    pub fn tag(&self) -> &str {
        self.db.tag()
    }

    pub fn path(&self) -> &str {
        self.db.path()
    }

    pub fn query(&self) -> &SelectQuery {
        &self.query
    }

    pub fn is_compiled(&self) -> bool {
        self.statement.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_compiled(&mut self) -> Result<&mut D::Statement<'db>> {
        if self.closed {
            return Err(DbError::CursorClosed {
                tag: self.db.tag().to_string(),
                path: self.db.path().to_string(),
            });
        }
        match &mut self.statement {
            Some(statement) => Ok(statement),
            slot => {
                debug!(tag = self.db.tag(), sql = %self.query, "compiling cursor statement");
                let statement = self.db.prepare(&self.query)?;
                Ok(slot.insert(statement))
            }
        }
    }

    fn advance(&mut self) -> Result<bool> {
        let statement = self.ensure_compiled()?;
        let has_row = statement.step()?;
        trace!(has_row, "stepped cursor");
        Ok(has_row)
    }

    /// Names of the result columns. Compiles the statement if needed.
    pub fn column_names(&mut self) -> Result<Vec<String>> {
        let statement = self.ensure_compiled()?;
        Ok((0..statement.column_count())
            .map(|i| statement.column_name(i).unwrap_or_default())
            .collect())
    }

    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if !self.advance()? {
            return Ok(None);
        }
        Ok(self.statement.as_ref().map(|s| extract_row(s)))
    }

    pub fn all_rows(&mut self) -> Result<RowSet> {
        let mut rows = RowSet::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        Ok(rows)
    }

    pub fn next_value(&mut self) -> Result<Option<Value>> {
        if !self.advance()? {
            return Ok(None);
        }
        Ok(self.statement.as_ref().map(|s| decode_column(s, 0)))
    }

    pub fn all_values(&mut self) -> Result<ValueColumn> {
        let mut values = ValueColumn::new();
        while let Some(value) = self.next_value()? {
            values.push(value);
        }
        Ok(values)
    }

    /// Borrowing iterator over the remaining rows. Stops after the first error.
    pub fn rows(&mut self) -> Rows<'_, 'db, D> {
        Rows {
            cursor: self,
            finished: false,
        }
    }

    /// Finalizes the statement, if one was compiled, and closes the cursor.
    pub fn release(&mut self) -> Result<()> {
        self.closed = true;
        match self.statement.take() {
            Some(mut statement) => {
                debug!(tag = self.db.tag(), "finalizing cursor statement");
                statement.finalize()
            }
            None => Ok(()),
        }
    }
}

impl<D: Database> Drop for Cursor<'_, D> {
    fn drop(&mut self) {
        if let Some(mut statement) = self.statement.take() {
            if let Err(e) = statement.finalize() {
                warn!(tag = self.db.tag(), path = self.db.path(), error = %e, "failed to finalize dropped cursor");
            }
        }
    }
}

pub struct Rows<'c, 'db, D: Database> {
    cursor: &'c mut Cursor<'db, D>,
    finished: bool,
}

impl<D: Database> Iterator for Rows<'_, '_, D> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.cursor.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

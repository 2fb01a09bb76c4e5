///
/// Scripted in-memory engine used by the unit tests.
///
/// Rows are given up front as `Cell`s so tests can produce engine edge cases
/// SQLite never shows (a typed read that comes back empty). Every engine call
/// is counted so laziness and single release can be asserted.
///

use crate::error::{DbError, Result};
use crate::query::SelectQuery;
use crate::statement::{Database, Statement};
use crate::value::{ColumnType, Value};

pub struct Cell {
    ty: ColumnType,
    value: Option<Value>,
}

impl Cell {
    pub fn value(value: Value) -> Self {
        Self {
            ty: value.column_type(),
            value: Some(value),
        }
    }

    pub fn null() -> Self {
        Self {
            ty: ColumnType::Null,
            value: None,
        }
    }

    /// Reports `ty` but yields nothing when read.
    pub fn absent(ty: ColumnType) -> Self {
        Self { ty, value: None }
    }
}

pub fn engine_failure(message: &str) -> DbError {
    DbError::Engine(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(message.to_string()),
    ))
}

pub struct FakeDatabase {
    rows: Vec<Vec<Cell>>,
    prepares: std::cell::Cell<usize>,
    steps: std::cell::Cell<usize>,
    reads: std::cell::Cell<usize>,
    finalizes: std::cell::Cell<usize>,
    fail_prepare: bool,
    fail_step_at: Option<usize>,
    fail_finalize: bool,
}

impl FakeDatabase {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows,
            prepares: std::cell::Cell::new(0),
            steps: std::cell::Cell::new(0),
            reads: std::cell::Cell::new(0),
            finalizes: std::cell::Cell::new(0),
            fail_prepare: false,
            fail_step_at: None,
            fail_finalize: false,
        }
    }

    /// Integer rows `1..=n` in a single column.
    pub fn counting(n: i32) -> Self {
        Self::new(
            (1..=n)
                .map(|i| vec![Cell::value(Value::Integer32(i))])
                .collect(),
        )
    }

    pub fn failing_prepare(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    /// Fails the step that would produce row `index`.
    pub fn failing_step_at(mut self, index: usize) -> Self {
        self.fail_step_at = Some(index);
        self
    }

    pub fn failing_finalize(mut self) -> Self {
        self.fail_finalize = true;
        self
    }

    pub fn prepares(&self) -> usize {
        self.prepares.get()
    }

    pub fn steps(&self) -> usize {
        self.steps.get()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn finalizes(&self) -> usize {
        self.finalizes.get()
    }

    pub fn engine_calls(&self) -> usize {
        self.prepares() + self.steps() + self.reads() + self.finalizes()
    }

    fn bump(counter: &std::cell::Cell<usize>) {
        counter.set(counter.get() + 1);
    }
}

impl Database for FakeDatabase {
    type Statement<'a> = FakeStatement<'a>;

    fn tag(&self) -> &str {
        "fake"
    }

    fn path(&self) -> &str {
        "/fake/path.db"
    }

    fn prepare<'a>(&'a self, _query: &SelectQuery) -> Result<FakeStatement<'a>> {
        Self::bump(&self.prepares);
        if self.fail_prepare {
            return Err(engine_failure("near \"FORM\": syntax error"));
        }
        Ok(FakeStatement {
            db: self,
            current: None,
            next: 0,
            finalized: false,
        })
    }
}

pub struct FakeStatement<'a> {
    db: &'a FakeDatabase,
    current: Option<usize>,
    next: usize,
    finalized: bool,
}

impl FakeStatement<'_> {
    fn cell(&self, index: usize) -> Option<&Cell> {
        self.db.rows.get(self.current?)?.get(index)
    }

    fn read(&self, index: usize) -> Option<&Value> {
        FakeDatabase::bump(&self.db.reads);
        self.cell(index)?.value.as_ref()
    }
}

impl Statement for FakeStatement<'_> {
    fn step(&mut self) -> Result<bool> {
        FakeDatabase::bump(&self.db.steps);
        if self.finalized {
            return Err(engine_failure("statement used after finalize"));
        }
        if self.db.fail_step_at == Some(self.next) {
            return Err(engine_failure("disk I/O error"));
        }
        if self.next < self.db.rows.len() {
            self.current = Some(self.next);
            self.next += 1;
            Ok(true)
        } else {
            self.current = None;
            Ok(false)
        }
    }

    fn column_count(&self) -> usize {
        self.current
            .and_then(|i| self.db.rows.get(i))
            .map_or(0, Vec::len)
    }

    fn column_type(&self, index: usize) -> ColumnType {
        self.cell(index).map_or(ColumnType::Null, |c| c.ty)
    }

    fn column_name(&self, index: usize) -> Option<String> {
        (index < self.db.rows.first().map_or(0, Vec::len)).then(|| format!("c{}", index))
    }

    fn read_i32(&self, index: usize) -> Option<i32> {
        match self.read(index)? {
            Value::Integer32(v) => Some(*v),
            _ => None,
        }
    }

    fn read_i64(&self, index: usize) -> Option<i64> {
        match self.read(index)? {
            Value::Integer64(v) => Some(*v),
            _ => None,
        }
    }

    fn read_f64(&self, index: usize) -> Option<f64> {
        match self.read(index)? {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    fn read_text(&self, index: usize) -> Option<String> {
        match self.read(index)? {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn read_blob(&self, index: usize) -> Option<Vec<u8>> {
        match self.read(index)? {
            Value::Blob(b) => Some(b.clone()),
            _ => None,
        }
    }

    fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;
        FakeDatabase::bump(&self.db.finalizes);
        if self.db.fail_finalize {
            return Err(engine_failure("finalize failed"));
        }
        Ok(())
    }
}

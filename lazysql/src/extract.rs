///
/// Decoding of the statement's current row into `Value`s.
///
/// Each column is read according to the type the engine reports for it at
/// that moment. A non-null column whose typed read comes back empty decodes
/// to the zero value of its type; a null column decodes to `Null` without
/// any read. Nothing here steps the statement.
///

use crate::statement::Statement;
use crate::value::{ColumnType, Row, Value};

pub fn decode_column<S: Statement + ?Sized>(statement: &S, index: usize) -> Value {
    let ty = statement.column_type(index);
    let value = match ty {
        ColumnType::Integer32 => statement.read_i32(index).map(Value::Integer32),
        ColumnType::Integer64 => statement.read_i64(index).map(Value::Integer64),
        ColumnType::Float => statement.read_f64(index).map(Value::Float64),
        ColumnType::Text => statement.read_text(index).map(Value::Text),
        ColumnType::Blob => statement.read_blob(index).map(Value::Blob),
        ColumnType::Null => return Value::Null,
    };
    value.unwrap_or_else(|| Value::zero(ty))
}

pub fn extract_row<S: Statement + ?Sized>(statement: &S) -> Row {
    (0..statement.column_count())
        .map(|index| decode_column(statement, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Cell, FakeDatabase};
    use crate::query::SelectQuery;
    use crate::statement::Database;

    fn query() -> SelectQuery {
        SelectQuery::new(false, vec!["x".into()], vec!["t".into()])
    }

    #[test]
    fn test_decodes_each_type() {
        let db = FakeDatabase::new(vec![vec![
            Cell::value(Value::Integer32(4)),
            Cell::value(Value::Integer64(1 << 40)),
            Cell::value(Value::Float64(2.25)),
            Cell::value(Value::Text("txt".into())),
            Cell::value(Value::Blob(vec![9])),
            Cell::null(),
        ]]);
        let mut stmt = db.prepare(&query()).unwrap();
        assert!(stmt.step().unwrap());

        let row = extract_row(&stmt);
        assert_eq!(
            row,
            vec![
                Value::Integer32(4),
                Value::Integer64(1 << 40),
                Value::Float64(2.25),
                Value::Text("txt".into()),
                Value::Blob(vec![9]),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_absent_read_falls_back_to_zero() {
        let db = FakeDatabase::new(vec![vec![
            Cell::absent(ColumnType::Integer32),
            Cell::absent(ColumnType::Integer64),
            Cell::absent(ColumnType::Float),
            Cell::absent(ColumnType::Text),
            Cell::absent(ColumnType::Blob),
        ]]);
        let mut stmt = db.prepare(&query()).unwrap();
        assert!(stmt.step().unwrap());

        let row = extract_row(&stmt);
        assert_eq!(
            row,
            vec![
                Value::Integer32(0),
                Value::Integer64(0),
                Value::Float64(0.0),
                Value::Text(String::new()),
                Value::Blob(Vec::new()),
            ]
        );
        assert!(row.iter().all(|v| !v.is_null()));
    }

    #[test]
    fn test_null_column_is_never_read() {
        let db = FakeDatabase::new(vec![vec![Cell::null(), Cell::null()]]);
        let mut stmt = db.prepare(&query()).unwrap();
        assert!(stmt.step().unwrap());

        assert_eq!(decode_column(&stmt, 1), Value::Null);
        assert_eq!(extract_row(&stmt), vec![Value::Null, Value::Null]);
        assert_eq!(db.reads(), 0);
    }

    #[test]
    fn test_extraction_does_not_move_cursor() {
        let db = FakeDatabase::new(vec![
            vec![Cell::value(Value::Integer32(1))],
            vec![Cell::value(Value::Integer32(2))],
        ]);
        let mut stmt = db.prepare(&query()).unwrap();
        assert!(stmt.step().unwrap());
        assert_eq!(extract_row(&stmt), extract_row(&stmt));
        assert_eq!(db.steps(), 1);
    }
}

//! Row-to-record mapping over query cursors.
//!
//! The mapping functions fill records from rusqlite rows *by column name*,
//! so they work with any statement whose result set carries the identifier
//! column and the record's declared fields, whatever the column order. They
//! never close the cursor they are handed; the caller owns the statement and
//! its rows.

use recordlite_core::{ID_COLUMN, Record, Value};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Row, Rows};

use crate::error::{Result, StorageError};

pub(crate) fn from_sql_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(v),
        SqlValue::Real(v) => Value::Real(v),
        SqlValue::Text(v) => Value::Text(v),
        SqlValue::Blob(v) => Value::Blob(v),
    }
}

pub(crate) fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(v) => SqlValue::Integer(v),
        Value::Real(v) => SqlValue::Real(v),
        Value::Text(v) => SqlValue::Text(v),
        Value::Blob(v) => SqlValue::Blob(v),
    }
}

/// Converts a record's field values into bindable SQL parameters.
pub(crate) fn bind_values(values: Vec<Value>) -> Vec<SqlValue> {
    values.into_iter().map(to_sql_value).collect()
}

/// Overwrites a record from the current row.
///
/// Reads the identifier and every declared field by column name.
///
/// # Errors
///
/// [`StorageError::Database`] when a column is missing from the result set,
/// [`StorageError::Decode`] when a stored value does not fit the declared
/// field type.
pub fn fill<R: Record>(record: &mut R, row: &Row<'_>) -> Result<()> {
    set_from_row(record, ID_COLUMN, row)?;
    for field in R::descriptor().fields {
        set_from_row(record, field.name, row)?;
    }
    Ok(())
}

fn set_from_row<R: Record>(record: &mut R, column: &str, row: &Row<'_>) -> Result<()> {
    let value: SqlValue = row.get(column)?;
    record
        .set_column(column, from_sql_value(value))
        .map_err(|source| StorageError::Decode {
            column: column.to_string(),
            source,
        })
}

/// Advances the cursor to its first remaining row and fills the record from
/// it.
///
/// Returns `false` on an exhausted cursor, leaving the record untouched.
/// The cursor is left positioned on the consumed row, never closed.
pub fn fill_first<R: Record>(record: &mut R, rows: &mut Rows<'_>) -> Result<bool> {
    match rows.next()? {
        Some(row) => {
            fill(record, row)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Drains the cursor into one freshly constructed record per remaining row,
/// in cursor order.
pub fn fill_all<R: Record>(rows: &mut Rows<'_>) -> Result<Vec<R>> {
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = R::default();
        fill(&mut record, row)?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordlite_core::record;
    use rusqlite::Connection;

    record! {
        #[version(1)]
        pub struct Reading {
            pub sensor: String,
            pub celsius: f64,
            pub flagged: bool,
            pub comment: Option<String>,
        }
    }

    fn sample_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Reading (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             sensor TEXT NOT NULL, celsius REAL NOT NULL, \
             flagged INTEGER NOT NULL, comment TEXT); \
             INSERT INTO Reading (sensor, celsius, flagged, comment) \
             VALUES ('attic', 19.5, 0, NULL); \
             INSERT INTO Reading (sensor, celsius, flagged, comment) \
             VALUES ('cellar', 11.25, 1, 'damp');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_fill_reads_columns_by_name() {
        let conn = sample_db();
        // Shuffled column order; mapping is by name, not position.
        let mut stmt = conn
            .prepare("SELECT comment, flagged, id, celsius, sensor FROM Reading ORDER BY id")
            .unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().unwrap();

        let mut reading = Reading::default();
        fill(&mut reading, row).unwrap();
        assert_eq!(reading.id, Some(1));
        assert_eq!(reading.sensor, "attic");
        assert_eq!(reading.celsius, 19.5);
        assert!(!reading.flagged);
        assert_eq!(reading.comment, None);
    }

    #[test]
    fn test_fill_first_false_on_exhausted_cursor() {
        let conn = sample_db();
        let mut stmt = conn
            .prepare("SELECT * FROM Reading WHERE sensor = 'nope'")
            .unwrap();
        let mut rows = stmt.query([]).unwrap();

        let mut reading = Reading {
            id: Some(99),
            sensor: "untouched".into(),
            celsius: 1.0,
            flagged: true,
            comment: Some("left alone".into()),
        };
        assert!(!fill_first(&mut reading, &mut rows).unwrap());
        assert_eq!(reading.id, Some(99));
        assert_eq!(reading.sensor, "untouched");
    }

    #[test]
    fn test_fill_first_leaves_cursor_open() {
        let conn = sample_db();
        let mut stmt = conn.prepare("SELECT * FROM Reading ORDER BY id").unwrap();
        let mut rows = stmt.query([]).unwrap();

        let mut first = Reading::default();
        assert!(fill_first(&mut first, &mut rows).unwrap());
        assert_eq!(first.sensor, "attic");

        // The rest of the cursor is still consumable.
        let rest: Vec<Reading> = fill_all(&mut rows).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].sensor, "cellar");
    }

    #[test]
    fn test_fill_all_in_cursor_order() {
        let conn = sample_db();
        let mut stmt = conn.prepare("SELECT * FROM Reading ORDER BY id").unwrap();
        let mut rows = stmt.query([]).unwrap();

        let readings: Vec<Reading> = fill_all(&mut rows).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].id, Some(1));
        assert_eq!(readings[1].id, Some(2));
        assert_eq!(readings[1].comment, Some("damp".to_string()));
        assert!(readings[1].flagged);
    }

    #[test]
    fn test_decode_failure_names_column() {
        let conn = sample_db();
        // SQLite's flexible typing stores the unconvertible text as-is.
        conn.execute(
            "INSERT INTO Reading (sensor, celsius, flagged, comment) \
             VALUES ('roof', 'hot', 0, NULL)",
            [],
        )
        .unwrap();

        let mut stmt = conn
            .prepare("SELECT * FROM Reading WHERE sensor = 'roof'")
            .unwrap();
        let mut rows = stmt.query([]).unwrap();
        let mut reading = Reading::default();
        let err = fill_first(&mut reading, &mut rows).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Decode { ref column, .. } if column == "celsius"
        ));
    }

    #[test]
    fn test_value_bridging_round_trip() {
        let values = vec![
            Value::Null,
            Value::Integer(-9),
            Value::Real(2.5),
            Value::Text("x".into()),
            Value::Blob(vec![1, 2]),
        ];
        for value in values {
            assert_eq!(from_sql_value(to_sql_value(value.clone())), value);
        }
    }
}

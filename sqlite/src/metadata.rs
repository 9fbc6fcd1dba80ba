//! The reserved schema-version catalog.
//!
//! Every database managed by this crate carries one `metadata` table mapping
//! a table name to the schema version it was created with. The ensure-schema
//! protocol reads it to decide between create, keep, and drop-and-recreate,
//! and writes it whenever a table's storage changes.
//!
//! The catalog's own row type is a hand-written [`Record`] impl rather than
//! a `record!` declaration because its table name (`metadata`, lowercase) is
//! not a Rust type name. It is bootstrapped through the same schema
//! derivation as user tables, so the persisted shape is
//! `metadata(id INTEGER PRIMARY KEY AUTOINCREMENT, table_name TEXT NOT
//! NULL, version INTEGER NOT NULL)` plus a unique index on `table_name`.
//! The catalog itself is exempt from version checking; user record types
//! may not claim its name, in any letter case.

use recordlite_core::{
    FieldDescriptor, FieldKind, FieldValue, ID_COLUMN, IndexSpec, Record, RecordDescriptor, Value,
    ValueError,
};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::mapper;
use crate::schema::TableSchema;

/// Name of the reserved catalog table.
pub const METADATA_TABLE: &str = "metadata";

/// Whether a table name collides with the reserved catalog table.
pub(crate) fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(METADATA_TABLE)
}

/// One catalog row: the stored schema version of a single table.
#[derive(Debug, Clone, Default, PartialEq)]
struct MetadataRow {
    id: Option<i64>,
    table_name: String,
    version: i64,
}

static METADATA_DESCRIPTOR: RecordDescriptor = RecordDescriptor {
    table: METADATA_TABLE,
    version: 1,
    fields: &[
        FieldDescriptor {
            name: "table_name",
            kind: FieldKind::Text,
            nullable: false,
        },
        FieldDescriptor {
            name: "version",
            kind: FieldKind::Integer,
            nullable: false,
        },
    ],
    indexes: &[IndexSpec {
        column: "table_name",
        unique: true,
    }],
};

impl Record for MetadataRow {
    fn descriptor() -> &'static RecordDescriptor {
        &METADATA_DESCRIPTOR
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn values(&self) -> Vec<Value> {
        vec![self.table_name.to_value(), self.version.to_value()]
    }

    fn set_column(&mut self, column: &str, value: Value) -> std::result::Result<(), ValueError> {
        match column {
            ID_COLUMN => {
                self.id = Option::<i64>::from_value(value)?;
                Ok(())
            }
            "table_name" => {
                self.table_name = String::from_value(value)?;
                Ok(())
            }
            "version" => {
                self.version = i64::from_value(value)?;
                Ok(())
            }
            other => Err(ValueError::UnknownColumn {
                column: other.to_string(),
            }),
        }
    }
}

/// Handle on the catalog table, with the most recently loaded row.
pub struct Metadata<'conn> {
    conn: &'conn Connection,
    schema: TableSchema,
    row: Option<MetadataRow>,
}

impl<'conn> Metadata<'conn> {
    /// Opens the catalog, creating its table and unique index if missing.
    ///
    /// Idempotent; safe to call before every use.
    pub fn open(conn: &'conn Connection) -> Result<Metadata<'conn>> {
        let schema = TableSchema::describe::<MetadataRow>()?;
        conn.execute(&schema.create_table_sql(), [])?;
        for sql in schema.create_index_sql() {
            conn.execute(&sql, [])?;
        }
        Ok(Metadata {
            conn,
            schema,
            row: None,
        })
    }

    /// Loads the catalog row for a table into the working record.
    ///
    /// Returns `false` on a miss, leaving any previously loaded row in
    /// place.
    pub fn find_by_name(&mut self, table: &str) -> Result<bool> {
        let mut row = MetadataRow::default();
        if self.select_into(&mut row, table)? {
            self.row = Some(row);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Version of the most recently loaded catalog row.
    ///
    /// # Errors
    ///
    /// [`StorageError::VersionNotLoaded`] when no row has been loaded yet.
    pub fn table_version(&self) -> Result<i64> {
        match &self.row {
            Some(row) => Ok(row.version),
            None => Err(StorageError::VersionNotLoaded),
        }
    }

    /// Writes the version for a table, updating the existing row in place
    /// or inserting a fresh one.
    ///
    /// The catalog holds exactly one row per table name; this logical
    /// upsert is what enforces it, with the unique index as a backstop.
    pub fn save(&mut self, table: &str, version: i64) -> Result<()> {
        let mut row = MetadataRow::default();
        if self.select_into(&mut row, table)? {
            row.version = version;
            self.conn.execute(
                &format!("UPDATE {METADATA_TABLE} SET version = ?1 WHERE {ID_COLUMN} = ?2"),
                params![row.version, row.id],
            )?;
        } else {
            row.table_name = table.to_string();
            row.version = version;
            self.conn.execute(
                &format!("INSERT INTO {METADATA_TABLE} (table_name, version) VALUES (?1, ?2)"),
                params![row.table_name, row.version],
            )?;
            row.id = Some(self.conn.last_insert_rowid());
        }
        debug!(table, version, "catalog row saved");
        self.row = Some(row);
        Ok(())
    }

    /// Deletes the catalog row for a table.
    ///
    /// Returns `false` when no row existed. Clears the working record if it
    /// was the removed table's.
    pub fn remove(&mut self, table: &str) -> Result<bool> {
        let removed = self.conn.execute(
            &format!("DELETE FROM {METADATA_TABLE} WHERE table_name = ?1"),
            params![table],
        )?;
        if self.row.as_ref().is_some_and(|row| row.table_name == table) {
            self.row = None;
        }
        Ok(removed > 0)
    }

    fn select_into(&self, row: &mut MetadataRow, table: &str) -> Result<bool> {
        let sql = format!(
            "SELECT {} FROM {METADATA_TABLE} WHERE table_name = ?1",
            self.schema.select_list()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![table])?;
        mapper::fill_first(row, &mut rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_rows(conn: &Connection) -> i64 {
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {METADATA_TABLE}"),
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_open_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        Metadata::open(&conn).unwrap();
        Metadata::open(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![METADATA_TABLE],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_persisted_shape_includes_unique_index() {
        let conn = Connection::open_in_memory().unwrap();
        Metadata::open(&conn).unwrap();

        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master \
                 WHERE type = 'index' AND name = 'index_metadata_table_name'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 1);
    }

    #[test]
    fn test_version_requires_a_loaded_row() {
        let conn = Connection::open_in_memory().unwrap();
        let catalog = Metadata::open(&conn).unwrap();
        assert!(matches!(
            catalog.table_version().unwrap_err(),
            StorageError::VersionNotLoaded
        ));
    }

    #[test]
    fn test_find_by_name_miss_leaves_state() {
        let conn = Connection::open_in_memory().unwrap();
        let mut catalog = Metadata::open(&conn).unwrap();
        catalog.save("Note", 4).unwrap();

        assert!(!catalog.find_by_name("Ghost").unwrap());
        // The previously loaded row is still current.
        assert_eq!(catalog.table_version().unwrap(), 4);
    }

    #[test]
    fn test_save_upserts_a_single_row() {
        let conn = Connection::open_in_memory().unwrap();
        let mut catalog = Metadata::open(&conn).unwrap();

        catalog.save("Note", 1).unwrap();
        catalog.save("Note", 2).unwrap();
        catalog.save("Note", 3).unwrap();
        assert_eq!(catalog_rows(&conn), 1);

        assert!(catalog.find_by_name("Note").unwrap());
        assert_eq!(catalog.table_version().unwrap(), 3);
    }

    #[test]
    fn test_save_tracks_separate_tables() {
        let conn = Connection::open_in_memory().unwrap();
        let mut catalog = Metadata::open(&conn).unwrap();

        catalog.save("Note", 1).unwrap();
        catalog.save("Book", 7).unwrap();
        assert_eq!(catalog_rows(&conn), 2);

        assert!(catalog.find_by_name("Note").unwrap());
        assert_eq!(catalog.table_version().unwrap(), 1);
        assert!(catalog.find_by_name("Book").unwrap());
        assert_eq!(catalog.table_version().unwrap(), 7);
    }

    #[test]
    fn test_remove_deletes_and_clears() {
        let conn = Connection::open_in_memory().unwrap();
        let mut catalog = Metadata::open(&conn).unwrap();
        catalog.save("Note", 2).unwrap();

        assert!(catalog.remove("Note").unwrap());
        assert!(!catalog.remove("Note").unwrap());
        assert_eq!(catalog_rows(&conn), 0);
        assert!(matches!(
            catalog.table_version().unwrap_err(),
            StorageError::VersionNotLoaded
        ));
    }

    #[test]
    fn test_reserved_name_matching() {
        assert!(is_reserved("metadata"));
        assert!(is_reserved("Metadata"));
        assert!(is_reserved("METADATA"));
        assert!(!is_reserved("metadata2"));
        assert!(!is_reserved("Note"));
    }
}

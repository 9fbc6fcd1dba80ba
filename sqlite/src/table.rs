//! Table handles and the ensure-schema protocol.
//!
//! A [`Table`] binds a record type to a connection and a
//! [`CreatedTables`] registry. Binding runs the ensure-schema protocol
//! under the registry lock:
//!
//! 1. registry hit — the table was ensured earlier this run; done.
//! 2. no catalog row — create the table and its indexes, record the
//!    declared version.
//! 3. catalog row at the declared version — nothing to do.
//! 4. catalog row older than declared — drop the table, recreate it empty,
//!    record the new version. Destructive: every stored row is gone.
//! 5. catalog row newer than declared — refuse with a downgrade error.
//!
//! No transaction wraps step 4; a crash between the drop and the catalog
//! write leaves the next run to recreate the table from the stale catalog
//! row, losing no additional data. CRUD statements always bind field values
//! as parameters; only validated identifiers are interpolated.

use std::marker::PhantomData;

use recordlite_core::{ID_COLUMN, Record, SchemaError};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, Statement, params, params_from_iter};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::mapper;
use crate::metadata::{self, Metadata};
use crate::registry::CreatedTables;
use crate::schema::TableSchema;

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A record type bound to its backing table.
#[derive(Debug)]
pub struct Table<'conn, R> {
    conn: &'conn Connection,
    registry: &'conn CreatedTables,
    schema: TableSchema,
    _record: PhantomData<fn() -> R>,
}

impl<'conn, R: Record> Table<'conn, R> {
    /// Binds the record type to a connection, ensuring its table exists at
    /// the declared schema version.
    ///
    /// # Errors
    ///
    /// Schema validation failures from
    /// [`TableSchema::describe`], [`SchemaError::ReservedTable`] when the
    /// record claims the catalog's name,
    /// [`StorageError::VersionDowngrade`] when the stored version is newer
    /// than the declared one, and any engine failure during DDL.
    pub fn bind(conn: &'conn Connection, registry: &'conn CreatedTables) -> Result<Self> {
        let declared_table = R::descriptor().table;
        if metadata::is_reserved(declared_table) {
            return Err(StorageError::Schema(SchemaError::ReservedTable {
                name: declared_table.to_string(),
            }));
        }
        let table = Table {
            conn,
            registry,
            schema: TableSchema::describe::<R>()?,
            _record: PhantomData,
        };
        table.ensure_schema()?;
        Ok(table)
    }

    /// Table name.
    pub fn name(&self) -> &'static str {
        self.schema.table()
    }

    /// Declared schema version.
    pub fn version(&self) -> i64 {
        self.schema.version()
    }

    fn ensure_schema(&self) -> Result<()> {
        let mut registry = self.registry.lock();
        if registry.contains(self.name()) {
            debug!(table = self.name(), "schema already ensured this run");
            return Ok(());
        }

        let mut catalog = Metadata::open(self.conn)?;
        let declared = self.version();
        if catalog.find_by_name(self.name())? {
            let stored = catalog.table_version()?;
            if stored == declared {
                registry.mark(self.name());
                return Ok(());
            }
            if declared < stored {
                return Err(StorageError::VersionDowngrade {
                    table: self.name().to_string(),
                    declared,
                    stored,
                });
            }
            info!(
                table = self.name(),
                stored, declared, "upgrading table by drop and recreate"
            );
            self.conn.execute(&self.schema.drop_table_sql(), [])?;
            self.create_storage()?;
            catalog.save(self.name(), declared)?;
            registry.mark(self.name());
            return Ok(());
        }

        debug!(table = self.name(), version = declared, "creating table");
        self.create_storage()?;
        catalog.save(self.name(), declared)?;
        registry.mark(self.name());
        Ok(())
    }

    fn create_storage(&self) -> Result<()> {
        self.conn.execute(&self.schema.create_table_sql(), [])?;
        for sql in self.schema.create_index_sql() {
            self.conn.execute(&sql, [])?;
        }
        Ok(())
    }

    /// Inserts the record as a new row.
    ///
    /// A record with no identifier (or identifier zero) receives the
    /// engine-assigned rowid; an explicit nonzero identifier is inserted
    /// as-is and kept. Returns `true` iff exactly one row was written.
    pub fn insert(&self, record: &mut R) -> Result<bool> {
        let data_columns: Vec<&str> = self.schema.fields().iter().map(|f| f.name).collect();
        let mut values = mapper::bind_values(record.values());

        let changed = match record.id() {
            Some(id) if id != 0 => {
                let mut columns = Vec::with_capacity(data_columns.len() + 1);
                columns.push(ID_COLUMN);
                columns.extend(data_columns);
                values.insert(0, SqlValue::Integer(id));
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    self.name(),
                    columns.join(", "),
                    placeholders(columns.len())
                );
                self.conn.execute(&sql, params_from_iter(values))?
            }
            _ => {
                let sql = if data_columns.is_empty() {
                    format!("INSERT INTO {} DEFAULT VALUES", self.name())
                } else {
                    format!(
                        "INSERT INTO {} ({}) VALUES ({})",
                        self.name(),
                        data_columns.join(", "),
                        placeholders(data_columns.len())
                    )
                };
                let changed = self.conn.execute(&sql, params_from_iter(values))?;
                record.set_id(Some(self.conn.last_insert_rowid()));
                changed
            }
        };
        Ok(changed == 1)
    }

    /// Loads the row with the given identifier into the record.
    ///
    /// On a hit every declared field and the identifier are overwritten and
    /// the call returns `true`; on a miss the record is left untouched.
    pub fn find(&self, record: &mut R, id: i64) -> Result<bool> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {ID_COLUMN} = ?1",
            self.schema.select_list(),
            self.name()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id])?;
        mapper::fill_first(record, &mut rows)
    }

    /// Re-reads the record's row using its current identifier.
    ///
    /// Returns `false` without touching the database when the record is
    /// new.
    pub fn reload(&self, record: &mut R) -> Result<bool> {
        match record.id() {
            Some(id) if id != 0 => self.find(record, id),
            _ => Ok(false),
        }
    }

    /// Fetches the row with the given identifier as a fresh record.
    pub fn get(&self, id: i64) -> Result<Option<R>> {
        let mut record = R::default();
        if self.find(&mut record, id)? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Writes the record's fields over its existing row.
    ///
    /// Returns `false` when the record is new or no row carries its
    /// identifier.
    pub fn update(&self, record: &R) -> Result<bool> {
        let id = match record.id() {
            Some(id) if id != 0 => id,
            _ => return Ok(false),
        };
        let fields = self.schema.fields();
        let assignments = if fields.is_empty() {
            // Keeps the statement well formed for field-less records.
            format!("{ID_COLUMN} = {ID_COLUMN}")
        } else {
            fields
                .iter()
                .enumerate()
                .map(|(i, f)| format!("{} = ?{}", f.name, i + 1))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let sql = format!(
            "UPDATE {} SET {} WHERE {ID_COLUMN} = ?{}",
            self.name(),
            assignments,
            fields.len() + 1
        );
        let mut values = mapper::bind_values(record.values());
        values.push(SqlValue::Integer(id));
        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        Ok(changed == 1)
    }

    /// Persists the record: insert when new, update otherwise.
    pub fn save(&self, record: &mut R) -> Result<bool> {
        if record.is_new() {
            self.insert(record)
        } else {
            self.update(record)
        }
    }

    /// Deletes the record's row.
    ///
    /// Returns `false` when the record is new or no row carries its
    /// identifier. The record keeps its identifier either way.
    pub fn delete(&self, record: &R) -> Result<bool> {
        let id = match record.id() {
            Some(id) if id != 0 => id,
            _ => return Ok(false),
        };
        let sql = format!("DELETE FROM {} WHERE {ID_COLUMN} = ?1", self.name());
        let changed = self.conn.execute(&sql, params![id])?;
        Ok(changed == 1)
    }

    /// Every row of the table, in identifier order.
    pub fn all(&self) -> Result<Vec<R>> {
        let mut stmt = self.select_all()?;
        let mut rows = stmt.query([])?;
        mapper::fill_all(&mut rows)
    }

    /// Prepares an unfiltered SELECT over the table.
    ///
    /// The caller owns the statement; its rows feed
    /// [`fill_first`](crate::fill_first) and
    /// [`fill_all`](crate::fill_all), and dropping the statement closes the
    /// cursor.
    pub fn select_all(&self) -> Result<Statement<'conn>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {ID_COLUMN}",
            self.schema.select_list(),
            self.name()
        );
        Ok(self.conn.prepare(&sql)?)
    }

    /// Number of rows currently stored.
    pub fn count(&self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Whether the backing table exists in the database.
    pub fn exists(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![self.name()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Drops the backing table and removes its catalog row.
    ///
    /// Idempotent; dropping an absent table is a no-op. The next binding of
    /// the record type recreates the table.
    pub fn drop_table(&self) -> Result<()> {
        let mut registry = self.registry.lock();
        debug!(table = self.name(), "dropping table");
        self.conn.execute(&self.schema.drop_table_sql(), [])?;
        let mut catalog = Metadata::open(self.conn)?;
        catalog.remove(self.name())?;
        registry.forget(self.name());
        Ok(())
    }
}

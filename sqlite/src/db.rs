//! Owned database handle.
//!
//! [`Database`] bundles the two pieces of injected state every table
//! binding needs, a [`Connection`] and a [`CreatedTables`] registry, behind
//! one owned value. Callers who want to manage those separately (several
//! connections sharing one registry, say) can keep constructing
//! [`Table::bind`](crate::Table::bind) arguments themselves; this wrapper
//! is the common single-connection case.

use std::path::Path;

use recordlite_core::Record;
use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;
use crate::registry::CreatedTables;
use crate::table::Table;

/// A connection paired with its created-tables registry.
pub struct Database {
    conn: Connection,
    registry: CreatedTables,
}

impl Database {
    /// Opens (creating if missing) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Database> {
        debug!(path = %path.as_ref().display(), "opening database");
        let conn = Connection::open(path)?;
        Ok(Database {
            conn,
            registry: CreatedTables::new(),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Database> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn,
            registry: CreatedTables::new(),
        })
    }

    /// Binds a record type to its table on this database.
    pub fn table<R: Record>(&self) -> Result<Table<'_, R>> {
        Table::bind(&self.conn, &self.registry)
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// The created-tables registry shared by every table handle.
    pub fn registry(&self) -> &CreatedTables {
        &self.registry
    }

    /// Clears the registry and closes the connection.
    pub fn close(self) -> Result<()> {
        self.registry.clear();
        self.conn.close().map_err(|(_, err)| err)?;
        Ok(())
    }
}

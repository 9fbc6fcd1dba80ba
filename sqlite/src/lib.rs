//! SQLite mapping engine for recordlite records.
//!
//! This crate persists [`Record`](recordlite_core::Record) types declared
//! with [`record!`](recordlite_core::record) into SQLite tables: one table
//! per record type, one column per field, single-table CRUD by primary key,
//! and versioned drop-and-recreate migrations driven by a reserved
//! `metadata` catalog table.
//!
//! # Architecture
//!
//! The crate is organized into six modules:
//!
//! - **`schema`** — table schema derivation and DDL generation from record
//!   descriptors
//! - **`metadata`** — the reserved per-table schema-version catalog
//! - **`registry`** — process-scoped registry of tables already ensured
//!   this run
//! - **`table`** — table handles: the ensure-schema protocol plus CRUD
//! - **`mapper`** — row-to-record filling over query cursors
//! - **`db`** — owned `Connection` + registry bundle
//!
//! # Quick start
//!
//! ```
//! use recordlite_core::record;
//! use recordlite_sqlite::Database;
//!
//! record! {
//!     #[version(1)]
//!     pub struct Note {
//!         pub text: String,
//!         pub stars: i64,
//!     }
//! }
//!
//! let db = Database::open_in_memory().unwrap();
//! let notes = db.table::<Note>().unwrap();
//!
//! let mut note = Note { id: None, text: "hello".into(), stars: 5 };
//! notes.save(&mut note).unwrap();
//! assert_eq!(note.id, Some(1));
//!
//! let restored = notes.get(1).unwrap().unwrap();
//! assert_eq!(restored, note);
//! ```
//!
//! # Schema versioning
//!
//! Bumping a record's `#[version(..)]` and rebinding it drops and recreates
//! the backing table, discarding every stored row. The stored version lives
//! in the `metadata` table; binding a record type whose declared version is
//! *older* than the stored one is refused. There is no data-preserving
//! column migration.

mod db;
mod error;
mod mapper;
mod metadata;
mod registry;
mod schema;
mod table;

pub use db::Database;
pub use error::{Result, StorageError};
pub use mapper::{fill, fill_all, fill_first};
pub use metadata::{METADATA_TABLE, Metadata};
pub use registry::CreatedTables;
pub use schema::TableSchema;
pub use table::Table;

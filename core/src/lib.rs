//! Engine-independent record model for recordlite.
//!
//! This crate defines what a persistable record *is*, with no database in
//! sight:
//!
//! - [`Value`] and [`FieldKind`] — the dynamic value model, one variant per
//!   SQLite storage class.
//! - [`FieldValue`] — the trait a Rust type implements to be usable as a
//!   record field.
//! - [`FieldDescriptor`], [`IndexSpec`], [`RecordDescriptor`] — static
//!   declaration-time shape of a record type.
//! - [`Record`] — the contract a storage engine drives: descriptor access,
//!   identifier handling, field values in declaration order, and
//!   column-addressed writes.
//! - [`record!`] — the declaration macro that generates all of the above
//!   from a plain struct.
//!
//! # Example
//!
//! ```
//! use recordlite_core::{record, Record, Value};
//!
//! record! {
//!     /// One row of the reading log.
//!     #[version(1)]
//!     pub struct Entry {
//!         pub title: String,
//!         pub pages: i64,
//!     }
//! }
//!
//! let mut entry = Entry::default();
//! assert!(entry.is_new());
//!
//! entry.set_column("title", Value::Text("Dune".into())).unwrap();
//! entry.set_column("pages", Value::Integer(412)).unwrap();
//! assert_eq!(entry.values(), vec![Value::Text("Dune".into()), Value::Integer(412)]);
//! ```

mod descriptor;
mod error;
mod macros;
mod record;
mod value;

pub use descriptor::{FieldDescriptor, ID_COLUMN, IndexSpec, RecordDescriptor};
pub use error::{SchemaError, ValueError};
pub use record::Record;
pub use value::{FieldKind, FieldValue, Value};

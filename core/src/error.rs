//! Error types for the record model.
//!
//! [`SchemaError`] covers declaration-level problems (bad versions, invalid
//! identifiers, index collisions) surfaced when a descriptor is inspected.
//! [`ValueError`] covers field-level conversion failures between [`Value`]s
//! and concrete Rust field types.
//!
//! [`Value`]: crate::Value

use thiserror::Error;

use crate::FieldKind;

/// Errors raised when a record declaration cannot be turned into a table
/// schema.
///
/// These are fatal and surface at table-handle construction or version-query
/// time; they are never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The record type declares no schema version (version 0 is treated as
    /// undeclared).
    #[error("record type '{record}' declares no schema version")]
    NoVersion {
        /// Table name of the offending record type.
        record: String,
    },

    /// The record type declares a negative schema version.
    #[error("record type '{record}' declares invalid schema version {version}")]
    InvalidVersion {
        /// Table name of the offending record type.
        record: String,
        /// The declared version.
        version: i64,
    },

    /// A table or column name is not a safe SQL identifier.
    #[error(
        "invalid identifier '{name}': must be non-empty, alphanumeric or \
         underscore, and must not start with a digit"
    )]
    InvalidIdentifier {
        /// The offending identifier.
        name: String,
    },

    /// The record type's table name collides with a reserved table.
    #[error("table name '{name}' is reserved")]
    ReservedTable {
        /// The reserved name.
        name: String,
    },

    /// Two columns share a name, or a declared field shadows the implicit
    /// identifier column.
    #[error("record type '{record}' declares duplicate column '{column}'")]
    DuplicateColumn {
        /// Table name of the offending record type.
        record: String,
        /// The duplicated column name.
        column: String,
    },

    /// An index declaration names a column the record does not declare.
    #[error("record type '{record}' declares an index on unknown column '{column}'")]
    UnknownIndexColumn {
        /// Table name of the offending record type.
        record: String,
        /// The missing column name.
        column: String,
    },

    /// Two index declarations derive the same index name.
    #[error("duplicate index name '{name}'")]
    IndexNameCollision {
        /// The colliding derived index name.
        name: String,
    },
}

/// Errors raised when a [`Value`](crate::Value) cannot be converted into a
/// record field, or a column name is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value's storage class does not match the field's declared kind.
    #[error("expected {expected} value, got {got}")]
    KindMismatch {
        /// The field's declared kind.
        expected: FieldKind,
        /// Storage-class name of the value that was supplied.
        got: &'static str,
    },

    /// An integer value does not fit the target field type.
    #[error("integer {value} out of range for {target}")]
    OutOfRange {
        /// The stored integer.
        value: i64,
        /// Name of the Rust target type.
        target: &'static str,
    },

    /// The column name is neither the identifier nor a declared field.
    #[error("unknown column '{column}'")]
    UnknownColumn {
        /// The unexpected column name.
        column: String,
    },
}

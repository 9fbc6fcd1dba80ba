//! Static record descriptors.
//!
//! A [`RecordDescriptor`] is the declaration-time shape of a persisted record
//! type: its table name, schema version, data fields in declaration order,
//! and any secondary indexes. The [`record!`](crate::record) macro emits
//! these as `'static` tables; hand-written [`Record`](crate::Record) impls
//! build them as constants.

use crate::error::SchemaError;
use crate::value::FieldKind;

/// Name of the implicit integer primary-key column every table carries.
///
/// It is not part of [`RecordDescriptor::fields`], but it is always the
/// first column of the persisted row.
pub const ID_COLUMN: &str = "id";

/// Shape of one persisted data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name.
    pub name: &'static str,
    /// Column kind.
    pub kind: FieldKind,
    /// Whether the column admits NULL.
    pub nullable: bool,
}

/// A secondary index over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    /// The indexed column.
    pub column: &'static str,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

/// Complete static description of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Table name, equal to the record type's simple name.
    pub table: &'static str,
    /// Declared schema version. Zero encodes "never declared".
    pub version: i64,
    /// Data fields in declaration order, identifier column excluded.
    pub fields: &'static [FieldDescriptor],
    /// Secondary indexes.
    pub indexes: &'static [IndexSpec],
}

impl RecordDescriptor {
    /// Returns the declared schema version after validating it.
    ///
    /// Needs no database access; a record type's version is queryable before
    /// any table exists.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NoVersion`] when the version is zero and
    /// [`SchemaError::InvalidVersion`] when it is negative.
    pub fn checked_version(&self) -> Result<i64, SchemaError> {
        match self.version {
            v if v > 0 => Ok(v),
            0 => Err(SchemaError::NoVersion {
                record: self.table.to_string(),
            }),
            v => Err(SchemaError::InvalidVersion {
                record: self.table.to_string(),
                version: v,
            }),
        }
    }

    /// Looks up a data field by column name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

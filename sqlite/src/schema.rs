//! Table schema derivation from record descriptors.
//!
//! Turns a [`RecordDescriptor`] into the DDL for its backing table: a
//! `CREATE TABLE IF NOT EXISTS` statement, one `CREATE INDEX` statement per
//! declared index, and the matching `DROP TABLE`. Identifiers are validated
//! before they are interpolated into SQL; field *values* never appear in
//! generated statements, the CRUD layer always binds them as parameters.
//!
//! # Table structure
//!
//! Every record table has the same shape:
//!
//! - `id INTEGER PRIMARY KEY AUTOINCREMENT` — the implicit identifier,
//!   always first,
//! - one column per declared field in declaration order, typed by the
//!   field's kind and `NOT NULL` unless the field is nullable,
//! - `index_<Table>_<column>` secondary indexes, plain or `UNIQUE`.
//!
//! Derivation is a pure function of the descriptor; no connection is
//! involved, so a record type can be checked before any database exists.

use std::collections::HashSet;

use recordlite_core::{FieldDescriptor, ID_COLUMN, Record, RecordDescriptor, SchemaError};

/// Validates a table or column name as a safe SQL identifier.
///
/// Accepts ASCII alphanumerics and underscores, not starting with a digit.
pub(crate) fn validate_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Derived index name for a single-column index.
fn index_name(table: &str, column: &str) -> String {
    format!("index_{table}_{column}")
}

/// A validated table schema derived from a record descriptor.
///
/// Constructing one proves the descriptor is well formed; every SQL
/// generator on it is then infallible.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    descriptor: &'static RecordDescriptor,
    version: i64,
}

impl TableSchema {
    /// Derives and validates the schema for a record type.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::NoVersion`] / [`SchemaError::InvalidVersion`] when
    ///   the declared version is not positive.
    /// - [`SchemaError::InvalidIdentifier`] when the table name or a column
    ///   name is not a safe SQL identifier.
    /// - [`SchemaError::DuplicateColumn`] when two fields share a name
    ///   (ASCII-case-insensitively, as SQLite treats identifiers) or a field
    ///   shadows the implicit `id` column.
    /// - [`SchemaError::UnknownIndexColumn`] when an index names a column
    ///   the record does not declare.
    /// - [`SchemaError::IndexNameCollision`] when two index declarations
    ///   derive the same index name.
    pub fn describe<R: Record>() -> Result<TableSchema, SchemaError> {
        let descriptor = R::descriptor();
        let version = descriptor.checked_version()?;
        validate_identifier(descriptor.table)?;

        let mut seen = HashSet::new();
        seen.insert(ID_COLUMN.to_string());
        for field in descriptor.fields {
            validate_identifier(field.name)?;
            if !seen.insert(field.name.to_ascii_lowercase()) {
                return Err(SchemaError::DuplicateColumn {
                    record: descriptor.table.to_string(),
                    column: field.name.to_string(),
                });
            }
        }

        let mut index_names = HashSet::new();
        for index in descriptor.indexes {
            if descriptor.field(index.column).is_none() {
                return Err(SchemaError::UnknownIndexColumn {
                    record: descriptor.table.to_string(),
                    column: index.column.to_string(),
                });
            }
            let name = index_name(descriptor.table, index.column);
            if !index_names.insert(name.clone()) {
                return Err(SchemaError::IndexNameCollision { name });
            }
        }

        Ok(TableSchema {
            descriptor,
            version,
        })
    }

    /// Table name.
    pub fn table(&self) -> &'static str {
        self.descriptor.table
    }

    /// Validated declared schema version, always positive.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Data fields in declaration order, identifier excluded.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.descriptor.fields
    }

    /// Generates the `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_table_sql(&self) -> String {
        let mut columns = vec![format!("{ID_COLUMN} INTEGER PRIMARY KEY AUTOINCREMENT")];
        for field in self.fields() {
            let not_null = if field.nullable { "" } else { " NOT NULL" };
            columns.push(format!("{} {}{}", field.name, field.kind, not_null));
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table(),
            columns.join(", ")
        )
    }

    /// Generates one `CREATE INDEX IF NOT EXISTS` statement per declared
    /// index, in declaration order.
    pub fn create_index_sql(&self) -> Vec<String> {
        self.descriptor
            .indexes
            .iter()
            .map(|index| {
                let unique = if index.unique { "UNIQUE " } else { "" };
                format!(
                    "CREATE {unique}INDEX IF NOT EXISTS {} ON {} ({})",
                    index_name(self.table(), index.column),
                    self.table(),
                    index.column
                )
            })
            .collect()
    }

    /// Generates the `DROP TABLE IF EXISTS` statement.
    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table())
    }

    /// Comma-separated column list for SELECT statements: the identifier
    /// first, then the data columns in declaration order.
    pub fn select_list(&self) -> String {
        let mut columns = Vec::with_capacity(self.fields().len() + 1);
        columns.push(ID_COLUMN);
        columns.extend(self.fields().iter().map(|f| f.name));
        columns.join(", ")
    }
}

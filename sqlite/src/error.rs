//! Error types for the SQLite mapping engine.
//!
//! Provides a unified error type covering engine failures, schema
//! declaration problems, catalog state, and row decoding.

use recordlite_core::{SchemaError, ValueError};
use thiserror::Error;

/// Errors that can occur while mapping records to SQLite storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record declaration cannot be turned into a table schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// SQLite engine failure, propagated unmodified.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A catalog version was queried before any row was loaded.
    #[error("no metadata row loaded; call find_by_name first")]
    VersionNotLoaded,

    /// The declared record version is older than the stored table version.
    #[error(
        "table '{table}' declares version {declared} but version {stored} is \
         already stored; downgrades are not supported"
    )]
    VersionDowngrade {
        /// The affected table.
        table: String,
        /// Version the record type declares.
        declared: i64,
        /// Version recorded in the metadata catalog.
        stored: i64,
    },

    /// A stored value could not be converted into the declared field type.
    #[error("cannot decode column '{column}': {source}")]
    Decode {
        /// The offending column.
        column: String,
        /// The underlying conversion failure.
        source: ValueError,
    },
}

/// Convenience alias for results with [`StorageError`].
pub type Result<T> = std::result::Result<T, StorageError>;

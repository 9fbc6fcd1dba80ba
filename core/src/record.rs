//! The [`Record`] contract.
//!
//! A record type is a plain struct with an optional integer identifier and a
//! set of data fields described by a [`RecordDescriptor`]. The trait exposes
//! exactly what a storage engine needs: the static descriptor, identifier
//! access, the field values in declaration order, and column-addressed
//! writes for filling a record back from a row.

use crate::descriptor::RecordDescriptor;
use crate::error::ValueError;
use crate::value::Value;

/// A persistable record type.
///
/// Implementations are normally generated by the [`record!`](crate::record)
/// macro; hand-written impls are possible and are validated at table-handle
/// construction time instead of compile time.
pub trait Record: Default {
    /// The static descriptor shared by every instance of the type.
    fn descriptor() -> &'static RecordDescriptor;

    /// Current identifier, if the record has been assigned one.
    fn id(&self) -> Option<i64>;

    /// Overwrites the identifier. `None` returns the record to the unsaved
    /// state.
    fn set_id(&mut self, id: Option<i64>);

    /// Data-field values in declaration order, identifier excluded.
    fn values(&self) -> Vec<Value>;

    /// Writes one column into the record.
    ///
    /// Accepts [`ID_COLUMN`](crate::ID_COLUMN) (routed to [`set_id`]) and
    /// every declared field name.
    ///
    /// # Errors
    ///
    /// [`ValueError::UnknownColumn`] for any other name, and the field's
    /// conversion error when the value does not fit.
    ///
    /// [`set_id`]: Record::set_id
    fn set_column(&mut self, column: &str, value: Value) -> Result<(), ValueError>;

    /// Whether the record has never been persisted.
    ///
    /// True iff the identifier is absent or exactly zero. Any other value,
    /// negative ones included, marks the record as stored.
    fn is_new(&self) -> bool {
        matches!(self.id(), None | Some(0))
    }
}

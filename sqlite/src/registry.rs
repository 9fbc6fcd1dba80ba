//! Process-scoped registry of tables already ensured this run.
//!
//! The ensure-schema protocol is check-then-act: look up the stored version,
//! then possibly create or recreate the table. [`CreatedTables`] remembers
//! which tables have already been through that protocol so repeat bindings
//! skip the catalog entirely, and its lock is held across the whole sequence
//! so two handles cannot interleave DDL for the same database.
//!
//! The registry is plain injected state. Callers create one per database
//! (or one per process, if several handles share a file) and pass it to
//! every table binding; [`clear`](CreatedTables::clear) is the reset point
//! on connection teardown or between test cases.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Names of tables whose schema has been ensured in this process.
#[derive(Debug, Default)]
pub struct CreatedTables {
    inner: Mutex<HashSet<String>>,
}

impl CreatedTables {
    /// Creates an empty registry.
    pub fn new() -> Self {
        CreatedTables::default()
    }

    /// Whether the named table has been ensured this run.
    pub fn contains(&self, table: &str) -> bool {
        self.lock().contains(table)
    }

    /// Number of ensured tables.
    pub fn len(&self) -> usize {
        self.lock().0.len()
    }

    /// Whether no table has been ensured yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every ensured table.
    ///
    /// After a clear, the next binding of each record type goes through the
    /// version catalog again.
    pub fn clear(&self) {
        self.lock().0.clear();
    }

    /// Locks the registry for one check-then-act sequence.
    ///
    /// A poisoned lock is recovered; the set of names stays usable after a
    /// panic elsewhere.
    pub(crate) fn lock(&self) -> RegistryGuard<'_> {
        RegistryGuard(self.inner.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

/// Exclusive view of the registry, held across an ensure-schema sequence.
pub(crate) struct RegistryGuard<'a>(MutexGuard<'a, HashSet<String>>);

impl RegistryGuard<'_> {
    pub(crate) fn contains(&self, table: &str) -> bool {
        self.0.contains(table)
    }

    pub(crate) fn mark(&mut self, table: &str) {
        self.0.insert(table.to_string());
    }

    pub(crate) fn forget(&mut self, table: &str) {
        self.0.remove(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let registry = CreatedTables::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(!registry.contains("Note"));
    }

    #[test]
    fn test_mark_and_forget() {
        let registry = CreatedTables::new();
        registry.lock().mark("Note");
        assert!(registry.contains("Note"));
        assert_eq!(registry.len(), 1);

        registry.lock().forget("Note");
        assert!(!registry.contains("Note"));
    }

    #[test]
    fn test_mark_is_idempotent() {
        let registry = CreatedTables::new();
        registry.lock().mark("Note");
        registry.lock().mark("Note");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear_resets() {
        let registry = CreatedTables::new();
        {
            let mut guard = registry.lock();
            guard.mark("Note");
            guard.mark("Book");
        }
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = std::sync::Arc::new(CreatedTables::new());
        let worker = {
            let registry = registry.clone();
            std::thread::spawn(move || registry.lock().mark("Note"))
        };
        worker.join().unwrap();
        assert!(registry.contains("Note"));
    }
}

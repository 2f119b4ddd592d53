//! The authoritative in-memory record cache.
//!
//! [`CarRepository`] holds every record keyed by id (at most one record per
//! id, last write wins) plus a dirty flag. Mutations only touch memory;
//! [`flush`](CarRepository::flush) pushes a full snapshot to the backend when,
//! and only when, something changed.
//!
//! The repository is not synchronised. Share it across threads only behind
//! a lock that covers whole read/mutate/flush sequences.
//!
//! ```
//! use fleetstore::{CarRecord, CarRepository, Condition, MemoryBackend};
//!
//! let mut repo = CarRepository::open(MemoryBackend::new())?;
//! repo.upsert(CarRecord::new("c1", "Atlas", Condition::Good, 1800.0));
//! assert!(repo.pending_changes());
//! repo.flush()?;
//! assert!(!repo.pending_changes());
//! # Ok::<(), fleetstore::StoreError>(())
//! ```

use crate::backend::StorageBackend;
use crate::error::Result;
use crate::record::CarRecord;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub struct CarRepository<B = Box<dyn StorageBackend>> {
    backend: B,
    records: BTreeMap<String, CarRecord>,
    dirty: bool,
}

impl<B: StorageBackend> CarRepository<B> {
    /// Take ownership of `backend` and load its snapshot.
    ///
    /// # Errors
    /// Whatever the backend's `load_cars` returns.
    pub fn open(backend: B) -> Result<Self> {
        let mut repo = Self {
            backend,
            records: BTreeMap::new(),
            dirty: false,
        };
        repo.reload()?;
        Ok(repo)
    }

    /// Discard the cache and replace it with the backend snapshot.
    ///
    /// Duplicate ids in the snapshot resolve to the later record. Pending
    /// changes are dropped.
    ///
    /// # Errors
    /// Whatever the backend's `load_cars` returns; the cache is left
    /// unchanged in that case.
    pub fn reload(&mut self) -> Result<()> {
        let loaded = self.backend.load_cars()?;
        self.records.clear();
        for record in loaded {
            if let Some(previous) = self.records.insert(record.id.clone(), record) {
                warn!(
                    id = %previous.id,
                    backend = %self.backend.name(),
                    "duplicate car id in snapshot, keeping the later record"
                );
            }
        }
        self.dirty = false;
        debug!(
            backend = %self.backend.name(),
            records = self.records.len(),
            "repository reloaded"
        );
        Ok(())
    }

    /// Every record, ascending by id.
    #[must_use]
    pub fn all(&self) -> Vec<CarRecord> {
        self.records.values().cloned().collect()
    }

    /// Records whose status is [`CarRecord::AVAILABLE`], ascending by id.
    #[must_use]
    pub fn available(&self) -> Vec<CarRecord> {
        self.records
            .values()
            .filter(|r| r.is_available())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&CarRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Insert or replace by id.
    pub fn upsert(&mut self, record: CarRecord) {
        self.records.insert(record.id.clone(), record);
        self.dirty = true;
    }

    /// Apply `mutator` to the record with `id`, if present.
    ///
    /// Returns whether the id existed. If the mutator changes the record's
    /// id, the entry moves to the new key (replacing any record there).
    pub fn update<F>(&mut self, id: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut CarRecord),
    {
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        mutator(record);
        if record.id != id
            && let Some(moved) = self.records.remove(id)
        {
            self.records.insert(moved.id.clone(), moved);
        }
        self.dirty = true;
        true
    }

    /// Upsert each record in order. Marks dirty if `records` is non-empty.
    pub fn bulk_upsert<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = CarRecord>,
    {
        for record in records {
            self.records.insert(record.id.clone(), record);
            self.dirty = true;
        }
    }

    /// Persist the full snapshot if anything changed since the last flush.
    ///
    /// A failed persist leaves the repository dirty.
    ///
    /// # Errors
    /// Whatever the backend's `persist_cars` returns.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let snapshot = self.all();
        self.backend.persist_cars(&snapshot)?;
        self.dirty = false;
        debug!(
            backend = %self.backend.name(),
            records = snapshot.len(),
            "repository flushed"
        );
        Ok(())
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    /// `true` while there are unsaved mutations.
    #[must_use]
    pub fn pending_changes(&self) -> bool {
        self.dirty
    }

    /// Diagnostic label of the underlying storage.
    #[must_use]
    pub fn backend_name(&self) -> String {
        self.backend.name()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

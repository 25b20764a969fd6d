use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use thiserror::Error;

use crate::codec::{self, Decoded};
use crate::ids;
use crate::models::{Record, RecordId};
use crate::ordering;
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Reorder of '{key}' is not a permutation of the current ids")]
    NotAPermutation { key: &'static str },
    #[error("Id {id} already exists in '{key}'")]
    DuplicateId { key: &'static str, id: RecordId },
}

/// In-memory collection for one schema, mirrored to the store.
///
/// The record sequence is loaded once and every mutating call ends with
/// [`Repository::save`], which rewrites the whole key. Calls that find nothing
/// to change do not write.
///
/// Elements of the stored array that do not match `T` are kept aside and
/// written back after the known records, so another producer's data survives.
pub struct Repository<T: Record> {
    store: Rc<dyn Store>,
    records: Vec<T>,
    foreign: Vec<Value>,
}

impl<T: Record> Repository<T> {
    pub fn load(store: Rc<dyn Store>) -> Self {
        let (records, foreign) = read_collection::<T>(store.as_ref(), T::KEY);
        Self {
            store,
            records,
            foreign,
        }
    }

    /// Discard in-memory state and read the key again.
    pub fn reload(&mut self) {
        (self.records, self.foreign) = read_collection::<T>(self.store.as_ref(), T::KEY);
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id().clone()).collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.position(id).is_some()
    }

    /// Issue an id that is new to this process and to the loaded records.
    pub fn fresh_id(&self) -> RecordId {
        loop {
            let id = ids::next_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Append `record` and write through.
    pub fn insert(&mut self, record: T) -> Result<(), RepoError> {
        self.check_unique(&record)?;
        self.records.push(record);
        self.save()
    }

    /// Insert `record`, then let `arrange` reorder the whole collection before
    /// it is written.
    pub fn insert_arranged<F>(&mut self, record: T, arrange: F) -> Result<(), RepoError>
    where
        F: FnOnce(&mut [T]),
    {
        self.check_unique(&record)?;
        self.records.push(record);
        arrange(self.records.as_mut_slice());
        self.save()
    }

    /// Apply `patch` to the record with `id`. Unknown ids are a no-op.
    pub fn update<F>(&mut self, id: &RecordId, patch: F) -> Result<bool, RepoError>
    where
        F: FnOnce(&mut T),
    {
        let Some(record) = self.records.iter_mut().find(|r| r.id() == id) else {
            debug!("event=repo_update key={} id={} status=not_found", T::KEY, id);
            return Ok(false);
        };
        patch(record);
        self.save()?;
        Ok(true)
    }

    /// Remove the record with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &RecordId) -> Result<bool, RepoError> {
        let Some(index) = self.position(id) else {
            debug!("event=repo_remove key={} id={} status=not_found", T::KEY, id);
            return Ok(false);
        };
        self.records.remove(index);
        self.save()?;
        Ok(true)
    }

    /// Put the records in the order given by `order`.
    ///
    /// `order` must name every current id exactly once; anything else is
    /// rejected before the collection or the store is touched.
    pub fn reorder(&mut self, order: &[RecordId]) -> Result<(), RepoError> {
        if !ordering::is_permutation(&self.ids(), order) {
            warn!(
                "event=repo_reorder key={} status=rejected expected={} got={}",
                T::KEY,
                self.records.len(),
                order.len()
            );
            return Err(RepoError::NotAPermutation { key: T::KEY });
        }
        let mut remaining = std::mem::take(&mut self.records);
        for id in order {
            if let Some(index) = remaining.iter().position(|r| r.id() == id) {
                self.records.push(remaining.swap_remove(index));
            }
        }
        self.save()
    }

    /// Drag-and-drop move, see [`ordering::move_item`].
    pub fn move_item(
        &mut self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<bool, RepoError> {
        if !ordering::move_item(&mut self.records, source, destination) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Write the entire sequence under `T::KEY`.
    pub fn save(&self) -> Result<(), RepoError> {
        let encoded = codec::encode_with_foreign(&self.records, &self.foreign)
            .map_err(|source| RepoError::Encode { key: T::KEY, source })?;
        self.store.set(T::KEY, &encoded)?;
        debug!(
            "event=repo_save key={} version={} records={} foreign={}",
            T::KEY,
            T::VERSION,
            self.records.len(),
            self.foreign.len()
        );
        Ok(())
    }

    fn check_unique(&self, record: &T) -> Result<(), RepoError> {
        if self.contains(record.id()) {
            return Err(RepoError::DuplicateId {
                key: T::KEY,
                id: record.id().clone(),
            });
        }
        Ok(())
    }
}

/// Read a collection, failing open to empty on any read or decode problem.
pub fn read_records<T: Record>(store: &dyn Store) -> Vec<T> {
    read_collection::<T>(store, T::KEY).0
}

/// Decode the array under `key` into `T`, returning the elements that did not
/// match alongside. Any shape may be used, including partial projections of a
/// record.
pub fn read_collection<T: DeserializeOwned>(store: &dyn Store, key: &str) -> (Vec<T>, Vec<Value>) {
    let raw = match store.get(key) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("event=repo_load key={} status=fallback reason=store_read error={}", key, err);
            return (Vec::new(), Vec::new());
        }
    };
    match codec::decode_collection::<T>(raw.as_deref()) {
        Decoded::Absent => (Vec::new(), Vec::new()),
        Decoded::Parsed { records, foreign } => {
            if !foreign.is_empty() {
                warn!(
                    "event=repo_load key={} status=partial loaded={} foreign={}",
                    key,
                    records.len(),
                    foreign.len()
                );
            }
            (records, foreign)
        }
        Decoded::Malformed(err) => {
            warn!("event=repo_load key={} status=fallback reason=malformed error={}", key, err);
            (Vec::new(), Vec::new())
        }
    }
}

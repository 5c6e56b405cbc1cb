use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use bit_types::ObjectId;
use tracing::debug;

use crate::error::StoreResult;
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Object store kept entirely in process memory.
///
/// Used by tests and by callers that assemble versions before handing them
/// to a persistent backend.
#[derive(Default)]
pub struct InMemoryObjectStore {
    records: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn write(&self, id: &ObjectId, object: &StoredObject) -> StoreResult<()> {
        object.check_key(id)?;
        match self.records.write().expect("lock poisoned").entry(*id) {
            Entry::Occupied(_) => {
                debug!(id = %id.short_hex(), "record already present");
            }
            Entry::Vacant(slot) => {
                debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "stored record");
                slot.insert(object.clone());
            }
        }
        Ok(())
    }

    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        Ok(self.records.read().expect("lock poisoned").get(id).cloned())
    }
}

impl fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("records", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::object::ObjectKind;

    fn keyed(kind: ObjectKind, data: &[u8]) -> (ObjectId, StoredObject) {
        let object = StoredObject::new(kind, data.to_vec());
        (object.compute_id(), object)
    }

    #[test]
    fn write_then_read() {
        let store = InMemoryObjectStore::new();
        let (id, object) = keyed(ObjectKind::Source, b"module.exports = 1;");
        store.write(&id, &object).unwrap();
        assert_eq!(store.read(&id).unwrap(), Some(object));
    }

    #[test]
    fn unknown_key_reads_none() {
        let store = InMemoryObjectStore::new();
        assert!(store.read(&ObjectId::from_bytes(b"nothing")).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn repeated_write_keeps_one_record() {
        let store = InMemoryObjectStore::new();
        let (id, object) = keyed(ObjectKind::Version, b"{}");
        store.write(&id, &object).unwrap();
        store.write(&id, &object).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn kind_is_part_of_the_key() {
        let store = InMemoryObjectStore::new();
        let (source_id, source) = keyed(ObjectKind::Source, b"{}");
        let (version_id, version) = keyed(ObjectKind::Version, b"{}");
        store.write(&source_id, &source).unwrap();
        store.write(&version_id, &version).unwrap();
        assert_ne!(source_id, version_id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn wrong_key_is_refused() {
        let store = InMemoryObjectStore::new();
        let (_, object) = keyed(ObjectKind::Source, b"content-a");
        let (other_id, _) = keyed(ObjectKind::Source, b"content-b");
        assert!(matches!(
            store.write(&other_id, &object),
            Err(StoreError::HashMismatch { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn racing_writers_store_once() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryObjectStore::new());
        let (id, object) = keyed(ObjectKind::Source, b"shared");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let object = object.clone();
                thread::spawn(move || store.write(&id, &object).unwrap())
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn debug_shows_record_count() {
        let store = InMemoryObjectStore::new();
        let (id, object) = keyed(ObjectKind::Source, b"x");
        store.write(&id, &object).unwrap();
        assert_eq!(format!("{store:?}"), "InMemoryObjectStore { records: 1 }");
    }
}

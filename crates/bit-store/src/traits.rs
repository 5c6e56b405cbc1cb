use bit_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;

/// Persists object bytes under their content hash.
///
/// The caller computes the key; a backend only checks that the key matches
/// the object (see [`StoredObject::check_key`]). Writing an object that is
/// already present succeeds and leaves one record, also when two writers
/// race.
pub trait ObjectStore: Send + Sync {
    fn write(&self, id: &ObjectId, object: &StoredObject) -> StoreResult<()>;

    /// `Ok(None)` when nothing is stored under `id`.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;
}

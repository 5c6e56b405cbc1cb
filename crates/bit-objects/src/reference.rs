use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bit_store::{ObjectKind, ObjectStore};
use bit_types::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{ObjectError, Result};
use crate::object::Object;
use crate::source::Source;
use crate::version::Version;

/// A content-addressed pointer to a stored object.
///
/// A `Ref` holds only the target's hash; the bytes are always looked up in a
/// store. The first successful [`resolve`](Self::resolve) caches the decoded
/// object on this instance.
///
/// Equality, ordering, and hashing consider the hash alone. Serialized as the
/// 64-character hex digest.
pub struct Ref {
    hash: ObjectId,
    /// Held across the store read so concurrent resolutions issue one read.
    resolved: Mutex<Option<Object>>,
}

impl Ref {
    /// Reference the object with a known hash. No I/O.
    pub fn of(hash: ObjectId) -> Self {
        Self {
            hash,
            resolved: Mutex::new(None),
        }
    }

    /// Reference the object whose hex digest is `s`.
    pub fn from_hex(s: &str) -> std::result::Result<Self, bit_types::TypeError> {
        ObjectId::from_hex(s).map(Self::of)
    }

    pub fn hash(&self) -> ObjectId {
        self.hash
    }

    /// Returns `true` once an object has been cached on this ref.
    pub fn is_resolved(&self) -> bool {
        self.slot().is_some()
    }

    /// The cache slot. It is only filled after a successful read, so a
    /// panic inside a store leaves it valid and the poison is ignored.
    fn slot(&self) -> MutexGuard<'_, Option<Object>> {
        self.resolved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up, decode, and cache the referenced object.
    ///
    /// Fails with [`ObjectError::MissingReference`] when the store has no
    /// object under this hash. Failures are not cached.
    pub fn resolve(&self, store: &dyn ObjectStore) -> Result<Object> {
        let mut slot = self.slot();
        if let Some(object) = slot.as_ref() {
            return Ok(object.clone());
        }

        let stored = store
            .read(&self.hash)?
            .ok_or(ObjectError::MissingReference(self.hash))?;
        stored.check_key(&self.hash)?;

        let object = Object::from_stored_object(&stored)?;
        debug!(id = %self.hash.short_hex(), kind = %object.kind(), "resolved ref");
        *slot = Some(object.clone());
        Ok(object)
    }

    /// Resolve and require a [`Source`].
    pub fn resolve_source(&self, store: &dyn ObjectStore) -> Result<Arc<Source>> {
        match self.resolve(store)? {
            Object::Source(source) => Ok(source),
            other => Err(self.wrong_kind(ObjectKind::Source, other.kind())),
        }
    }

    /// Resolve and require a [`Version`].
    pub fn resolve_version(&self, store: &dyn ObjectStore) -> Result<Arc<Version>> {
        match self.resolve(store)? {
            Object::Version(version) => Ok(version),
            other => Err(self.wrong_kind(ObjectKind::Version, other.kind())),
        }
    }

    fn wrong_kind(&self, expected: ObjectKind, found: ObjectKind) -> ObjectError {
        ObjectError::malformed(
            expected,
            format!("ref {} points at a {found} object", self.hash),
        )
    }
}

impl From<ObjectId> for Ref {
    fn from(hash: ObjectId) -> Self {
        Self::of(hash)
    }
}

impl Clone for Ref {
    fn clone(&self) -> Self {
        let cached = self.slot().clone();
        Self {
            hash: self.hash,
            resolved: Mutex::new(cached),
        }
    }
}

impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Ref {}

impl PartialOrd for Ref {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ref {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl Hash for Ref {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({})", self.hash.short_hex())
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl Serialize for Ref {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.hash.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ref {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        ObjectId::deserialize(deserializer).map(Self::of)
    }
}

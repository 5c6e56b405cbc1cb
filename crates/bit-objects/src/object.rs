use std::sync::Arc;

use bit_store::{ObjectKind, ObjectStore, StoredObject};
use bit_types::ObjectId;
use tracing::debug;

use crate::error::Result;
use crate::reference::Ref;
use crate::source::Source;
use crate::version::Version;

/// Contract shared by every storable object kind.
///
/// Implementations must satisfy the round-trip law
/// `parse(x.to_buffer())?.to_buffer() == x.to_buffer()`, and `to_buffer` must
/// depend only on logical content so that `hash` is a pure function of it.
pub trait BitObject: Sized {
    /// Discriminant stored alongside the bytes.
    const KIND: ObjectKind;

    /// Canonical byte encoding.
    fn to_buffer(&self) -> Vec<u8>;

    /// Rebuild an object from its canonical encoding.
    fn parse(bytes: &[u8]) -> Result<Self>;

    /// Human-readable identity for logs and diffs. Not a store key.
    fn id(&self) -> String;

    /// Store key: the domain-separated digest of `to_buffer()`.
    fn hash(&self) -> ObjectId {
        Self::KIND.hasher().hash(&self.to_buffer())
    }

    fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(Self::KIND, self.to_buffer())
    }

    /// Persist this object and return a reference to it.
    ///
    /// Storing the same content twice yields the same ref and one record.
    fn store_in(&self, store: &dyn ObjectStore) -> Result<Ref> {
        let id = self.hash();
        store.write(&id, &self.to_stored_object())?;
        debug!(id = %id.short_hex(), kind = %Self::KIND, "stored object");
        Ok(Ref::of(id))
    }
}

/// An object of any kind, as returned by reference resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Source(Arc<Source>),
    Version(Arc<Version>),
}

impl Object {
    /// Decode a stored object, dispatching on its kind tag.
    pub fn from_stored_object(stored: &StoredObject) -> Result<Self> {
        match stored.kind {
            ObjectKind::Source => Ok(Self::Source(Arc::new(Source::parse(&stored.data)?))),
            ObjectKind::Version => Ok(Self::Version(Arc::new(Version::parse(&stored.data)?))),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Source(_) => ObjectKind::Source,
            Self::Version(_) => ObjectKind::Version,
        }
    }

    pub fn hash(&self) -> ObjectId {
        match self {
            Self::Source(source) => source.hash(),
            Self::Version(version) => version.hash(),
        }
    }

    pub fn to_buffer(&self) -> Vec<u8> {
        match self {
            Self::Source(source) => source.to_buffer(),
            Self::Version(version) => version.to_buffer(),
        }
    }

    pub fn id(&self) -> String {
        match self {
            Self::Source(source) => source.id(),
            Self::Version(version) => version.id(),
        }
    }

    pub fn as_source(&self) -> Option<&Arc<Source>> {
        match self {
            Self::Source(source) => Some(source),
            Self::Version(_) => None,
        }
    }

    pub fn as_version(&self) -> Option<&Arc<Version>> {
        match self {
            Self::Version(version) => Some(version),
            Self::Source(_) => None,
        }
    }
}

impl From<Source> for Object {
    fn from(source: Source) -> Self {
        Self::Source(Arc::new(source))
    }
}

impl From<Version> for Object {
    fn from(version: Version) -> Self {
        Self::Version(Arc::new(version))
    }
}

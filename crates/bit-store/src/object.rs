use std::str::FromStr;

use bit_crypto::ContentHasher;
use bit_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
///
/// The kind travels with the bytes so that a reader holding only a hash can
/// decide how to parse what the store returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raw file content.
    Source,
    /// Snapshot of one released state of a component.
    Version,
}

impl ObjectKind {
    /// The tag written in front of the data by on-disk backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Version => "version",
        }
    }

    /// The domain-separated hasher for objects of this kind.
    pub fn hasher(&self) -> ContentHasher {
        match self {
            Self::Source => ContentHasher::SOURCE,
            Self::Version => ContentHasher::VERSION,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "version" => Ok(Self::Version),
            other => Err(format!("unknown object kind {other:?}")),
        }
    }
}

/// A stored object: kind tag + serialized data + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// contents of the data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The canonical bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.data)
    }

    /// Fail with [`StoreError::HashMismatch`] unless `key` is this object's id.
    pub fn check_key(&self, key: &ObjectId) -> StoreResult<()> {
        let computed = self.compute_id();
        if computed == *key {
            Ok(())
        } else {
            Err(StoreError::HashMismatch {
                key: *key,
                computed,
            })
        }
    }
}

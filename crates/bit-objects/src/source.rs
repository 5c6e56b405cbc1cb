use std::fmt;

use bit_store::ObjectKind;
use bit_types::ObjectId;

use crate::error::Result;
use crate::object::BitObject;

/// Raw file content, addressed by its hash.
///
/// A source has no internal structure and no outgoing references; it is a
/// leaf of the object graph. Its canonical encoding is the content itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Source {
    content: Vec<u8>,
    hash: ObjectId,
}

impl Source {
    /// Wrap raw content, computing its hash once.
    pub fn from_raw_content(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        let hash = ObjectKind::Source.hasher().hash(&content);
        Self { content, hash }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl BitObject for Source {
    const KIND: ObjectKind = ObjectKind::Source;

    fn to_buffer(&self) -> Vec<u8> {
        self.content.clone()
    }

    fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_raw_content(bytes))
    }

    fn id(&self) -> String {
        self.hash.to_hex()
    }

    fn hash(&self) -> ObjectId {
        self.hash
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("hash", &self.hash)
            .field("len", &self.content.len())
            .finish()
    }
}

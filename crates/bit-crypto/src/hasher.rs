use bit_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// Only the two object kinds have hashers. The digest covers
/// `domain ++ ":" ++ data`. The tag is part of the on-disk
/// compatibility contract: changing it changes every object id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for raw source blobs.
    pub const SOURCE: Self = Self {
        domain: "bit-source-v1",
    };
    /// Hasher for component version snapshots.
    pub const VERSION: Self = Self {
        domain: "bit-version-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"hello world";
        assert_eq!(
            ContentHasher::SOURCE.hash(data),
            ContentHasher::SOURCE.hash(data)
        );
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        assert_ne!(
            ContentHasher::SOURCE.hash(data),
            ContentHasher::VERSION.hash(data)
        );
    }

    #[test]
    fn domain_separated_hash_differs_from_raw() {
        let raw = ObjectId::from_bytes(b"test");
        assert_ne!(raw, ContentHasher::SOURCE.hash(b"test"));
    }

    #[test]
    fn hash_matches_manual_prefix() {
        let expected = ObjectId::from_bytes(b"bit-source-v1:content-a");
        assert_eq!(ContentHasher::SOURCE.hash(b"content-a"), expected);
    }

    #[test]
    fn version_domain_matches_manual_prefix() {
        let expected = ObjectId::from_bytes(b"bit-version-v1:{}");
        assert_eq!(ContentHasher::VERSION.hash(b"{}"), expected);
    }
}

use bit_types::ObjectId;

/// Failures of a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Bytes offered or found under a key do not hash to that key.
    #[error("object under {key} hashes to {computed}")]
    HashMismatch { key: ObjectId, computed: ObjectId },

    #[error("object file for {id} is unreadable: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid store configuration: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

//! Storage backends for bit-scope objects.
//!
//! A backend keeps [`StoredObject`]s (kind tag plus canonical bytes) under
//! the domain-separated BLAKE3 hash of those bytes. It never looks inside the
//! bytes. Callers hash, backends check the key and persist:
//!
//! - [`InMemoryObjectStore`] keeps records in a `HashMap`.
//! - [`FsObjectStore`] keeps git-style loose object files under a root
//!   directory configured by [`FsStoreConfig`].

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use config::FsStoreConfig;
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{ObjectKind, StoredObject};
pub use traits::ObjectStore;

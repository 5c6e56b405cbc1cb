//! Content hashing for bit-scope.
//!
//! Every stored object is keyed by a domain-separated BLAKE3 hash of its
//! canonical bytes. The domain tag names the object kind, so a source blob and
//! a version whose encodings happen to coincide still get distinct ids.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;

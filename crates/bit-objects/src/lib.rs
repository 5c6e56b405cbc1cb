//! Immutable, content-addressed object model for bit-scope.
//!
//! Objects are identified by a domain-separated BLAKE3 hash of their canonical
//! bytes and point at each other only through those hashes.
//!
//! # Object Kinds
//!
//! - [`Source`] — raw file content; a leaf of the object graph
//! - [`Version`] — one immutable snapshot of a component: implementation and
//!   spec files, tool references, dependencies, and build/test outcome
//!
//! Both implement [`BitObject`]. [`Object`] is the tagged union produced when
//! bytes are read back from a store and the kind is only known at runtime.
//!
//! # References
//!
//! A [`Ref`] is a hash plus a lazily filled cache. [`Ref::resolve`] reads from
//! an [`ObjectStore`](bit_store::ObjectStore) passed by the caller; concurrent
//! resolutions of one `Ref` share a single store read.
//!
//! # Collaborators
//!
//! - [`Component`] supplies file names and package dependencies to
//!   [`Version::from_component`]
//! - [`DependencyResolver`] computes a version's dependency lists

pub mod component;
pub mod error;
pub mod object;
pub mod reference;
pub mod source;
pub mod version;

pub use component::{Component, ComponentManifest, DependencyResolver, ResolvedDependencies};
pub use error::{ObjectError, Result};
pub use object::{BitObject, Object};
pub use reference::Ref;
pub use source::Source;
pub use version::{CheckStatus, FileRef, Version};

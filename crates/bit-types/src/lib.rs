//! Foundation types for bit-scope.
//!
//! This crate provides the identity types shared by every other bit-scope
//! crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash)
//! - [`BitId`] — Human-readable component identity (`scope/box/name@version`)

pub mod bit_id;
pub mod error;
pub mod object;

pub use bit_id::BitId;
pub use error::TypeError;
pub use object::ObjectId;

//! Pluggable storage layer for metadoc model objects.
//!
//! This crate defines the storage contract the object model is written
//! against and ships one backend. A store holds typed objects addressed by
//! [`ObjectUri`](metadoc_types::ObjectUri), each with a map of property
//! slots; a slot is scalar-valued or collection-valued for its lifetime.
//!
//! # Storage Backends
//!
//! All backends implement the [`ModelStore`] trait:
//!
//! - [`InMemoryModelStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A property slot never changes shape: scalar stays scalar, collection
//!    stays collection.
//! 2. Collection reads on never-written properties behave as empty.
//! 3. Generated identifiers are unique within the store per kind.
//! 4. Multi-operation sequences are fenced with [`StoreLock`] critical
//!    sections; single operations are individually atomic.
//! 5. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod lock;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use lock::{StoreId, StoreLock};
pub use memory::InMemoryModelStore;
pub use traits::ModelStore;

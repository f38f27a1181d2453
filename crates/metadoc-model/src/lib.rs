//! Generic typed object access over metadoc stores.
//!
//! This crate is the layer domain types are built on: a [`ModelObject`]
//! handle mediates every property read and write against the abstract store
//! contract, multi-valued properties surface as live [`ModelCollection`]
//! views, and values crossing store boundaries are routed through the copy
//! engine transparently.
//!
//! # Key Types
//!
//! - [`ModelObject`] — typed accessor bound to one stored object
//! - [`ModelValue`] — the domain-side value union
//! - [`ModelCollection`] / [`ModelSet`] — live views with no local buffering
//! - [`ModelUpdate`] / [`apply_updates`] — batched writes under one lock
//! - [`Verifiable`] / [`TypeTagged`] / [`UriEnum`] — capability traits
//!   domain types implement
//!
//! # Design Rules
//!
//! 1. Handles hold no property data; every read hits the store.
//! 2. `None` written to a scalar property removes it; sequence values
//!    replace the whole stored collection.
//! 3. Cross-store writes require an attached copy manager and copy before
//!    storing the reference.
//! 4. Equivalence is structural and quotients over the domain's absence
//!    conventions; verification traversal is cycle-guarded by visited ids.

pub mod collection;
mod convert;
pub mod error;
pub mod object;
pub mod value;
pub mod verify;

pub use collection::{ElementType, ModelCollection, ModelSet};
pub use error::{ModelError, ModelResult};
pub use object::{apply_updates, ModelObject, ModelUpdate};
pub use value::{ModelValue, UriEnum};
pub use verify::{verify_collection, TypeTagged, Verifiable};

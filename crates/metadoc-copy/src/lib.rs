//! Cross-store copy engine for metadoc objects.
//!
//! Stores are isolated: an object in one store can only reference objects in
//! the same store. [`CopyManager`] bridges them, copying an object and its
//! reference closure into a destination store while translating identifiers
//! to fit the destination's namespace and addressing scheme.
//!
//! # Design Rules
//!
//! 1. Materialize, record, copy properties -- in that order. The ledger
//!    entry written before property copy is what terminates cycles.
//! 2. The ledger key is `(source store, destination store, source URI)`;
//!    relations are directional.
//! 3. Anonymous identifiers never survive a copy; listed-license URIs
//!    always do.
//! 4. A store failure mid-copy aborts and is propagated; the destination
//!    may retain a partially populated object and its ledger entry.

pub mod error;
pub mod manager;

pub use error::{CopyError, CopyResult};
pub use manager::CopyManager;

//! Foundation types for the metadoc document-mapping core.
//!
//! This crate defines the identity and value model shared by every other
//! metadoc crate: how stored objects are addressed, how their property slots
//! are named, and which values those slots may hold.
//!
//! # Key Types
//!
//! - [`ObjectUri`] — absolute address of a stored object (namespace + local id)
//! - [`IdKind`] — identifier classification driving copy-time translation
//! - [`SpecVersion`] — current vs. legacy-compatible addressing generation
//! - [`PropertyDescriptor`] — stable name of one field slot on an object
//! - [`StoredValue`] — the closed union of storable scalar values
//! - [`TypedRef`] — a typed pointer to another stored object

pub mod descriptor;
pub mod error;
pub mod identity;
pub mod value;
pub mod vocab;

pub use descriptor::PropertyDescriptor;
pub use error::{TypeError, TypeResult};
pub use identity::{IdKind, ObjectUri, SpecVersion};
pub use value::{StoredValue, TypedRef};

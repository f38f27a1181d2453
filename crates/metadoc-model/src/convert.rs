//! Conversion between the domain value union and the stored value union.
//!
//! The storage direction runs cross-store values through the copy engine;
//! the probe variant never mutates and is used by containment checks, where
//! "not representable in this store" just means "not contained".

use std::sync::Arc;

use metadoc_copy::CopyManager;
use metadoc_store::ModelStore;
use metadoc_types::{SpecVersion, StoredValue, TypedRef};

use crate::error::{ModelError, ModelResult};
use crate::object::ModelObject;
use crate::value::ModelValue;

/// Convert a domain value to its stored representation for `store`.
///
/// An object bound to a different store is copied into `store` first;
/// without a copy manager that is an error. Sequence values have no scalar
/// stored form and are rejected here (the accessor routes them to the
/// collection-replace path before reaching this).
pub(crate) fn to_stored(
    value: &ModelValue,
    store: &Arc<dyn ModelStore>,
    namespace: &str,
    spec_version: SpecVersion,
    copy_manager: Option<&Arc<CopyManager>>,
) -> ModelResult<StoredValue> {
    match value {
        ModelValue::Str(s) => Ok(StoredValue::Str(s.clone())),
        ModelValue::Bool(b) => Ok(StoredValue::Bool(*b)),
        ModelValue::Int(i) => Ok(StoredValue::Int(*i)),
        ModelValue::Individual(uri) => Ok(StoredValue::Individual(uri.clone())),
        ModelValue::Object(object) => {
            if object.store_id() == store.store_id() {
                Ok(StoredValue::Ref(object.typed_ref()))
            } else {
                let manager = copy_manager
                    .ok_or_else(|| ModelError::CopyingDisabled(object.object_uri()))?;
                let copied = manager.copy(
                    store.as_ref(),
                    object.store().as_ref(),
                    &object.object_uri(),
                    object.type_name(),
                    spec_version,
                    Some(namespace),
                )?;
                Ok(StoredValue::Ref(copied))
            }
        }
        ModelValue::Collection(_) | ModelValue::List(_) => Err(ModelError::WrongType {
            property: metadoc_types::PropertyDescriptor::new("<scalar>"),
            expected: "scalar value".to_string(),
            actual: value.kind_name().to_string(),
        }),
    }
}

/// Convert a domain value to its stored representation without mutating any
/// store. Returns `None` when the value has no representation in `store`
/// (a foreign object that was never copied there, or a sequence value).
pub(crate) fn probe_stored(
    value: &ModelValue,
    store: &Arc<dyn ModelStore>,
    copy_manager: Option<&Arc<CopyManager>>,
) -> Option<StoredValue> {
    match value {
        ModelValue::Str(s) => Some(StoredValue::Str(s.clone())),
        ModelValue::Bool(b) => Some(StoredValue::Bool(*b)),
        ModelValue::Int(i) => Some(StoredValue::Int(*i)),
        ModelValue::Individual(uri) => Some(StoredValue::Individual(uri.clone())),
        ModelValue::Object(object) => {
            if object.store_id() == store.store_id() {
                Some(StoredValue::Ref(object.typed_ref()))
            } else {
                let copied = copy_manager?.copied_object_uri(
                    object.store_id(),
                    store.store_id(),
                    &object.object_uri(),
                )?;
                Some(StoredValue::Ref(TypedRef::new(
                    copied,
                    object.type_name(),
                    object.spec_version(),
                )))
            }
        }
        ModelValue::Collection(_) | ModelValue::List(_) => None,
    }
}

/// Resolve a stored value back into a domain value bound to `store`.
///
/// References become live object handles; the namespace is split from the
/// reference URI, falling back to the reader's namespace for anonymous ids.
/// The handle construction type-checks against the store's type tag.
pub(crate) fn to_model(
    value: StoredValue,
    store: &Arc<dyn ModelStore>,
    namespace: &str,
    copy_manager: Option<&Arc<CopyManager>>,
) -> ModelResult<ModelValue> {
    match value {
        StoredValue::Str(s) => Ok(ModelValue::Str(s)),
        StoredValue::Bool(b) => Ok(ModelValue::Bool(b)),
        StoredValue::Int(i) => Ok(ModelValue::Int(i)),
        StoredValue::Individual(uri) => Ok(ModelValue::Individual(uri)),
        StoredValue::Ref(reference) => {
            let (ns, id) = match reference.uri.split_fragment() {
                Some((ns, local)) => (ns.to_string(), local.to_string()),
                None => (namespace.to_string(), reference.uri.clone().into_string()),
            };
            let mut object = ModelObject::new(
                store.clone(),
                ns,
                id,
                reference.type_name,
                reference.spec_version,
                false,
            )?;
            if let Some(manager) = copy_manager {
                object = object.with_copy_manager(manager.clone());
            }
            Ok(ModelValue::Object(object))
        }
    }
}

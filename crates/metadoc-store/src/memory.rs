use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use metadoc_types::{
    vocab, IdKind, ObjectUri, PropertyDescriptor, SpecVersion, StoredValue, TypedRef,
};

use crate::error::{StoreError, StoreResult};
use crate::lock::{StoreId, StoreLock};
use crate::traits::ModelStore;

/// One property slot: scalar or collection for its whole lifetime.
#[derive(Clone, Debug)]
enum PropertySlot {
    Scalar(StoredValue),
    Collection(Vec<StoredValue>),
}

#[derive(Clone, Debug)]
struct StoredObject {
    type_name: String,
    #[allow(dead_code)]
    spec_version: SpecVersion,
    slots: HashMap<PropertyDescriptor, PropertySlot>,
}

/// In-memory, `HashMap`-based model store.
///
/// Intended for tests and embedding. Objects are held behind a
/// `parking_lot::RwLock`; the critical-section primitive uses a separate
/// lock so individual operations never contend with an open section they
/// are running under.
pub struct InMemoryModelStore {
    id: StoreId,
    objects: RwLock<HashMap<ObjectUri, StoredObject>>,
    next_serial: AtomicU64,
    critical: Arc<RwLock<()>>,
}

impl InMemoryModelStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            id: StoreId::next(),
            objects: RwLock::new(HashMap::new()),
            next_serial: AtomicU64::new(1),
            critical: Arc::new(RwLock::new(())),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Return a sorted list of all object URIs in the store.
    pub fn all_uris(&self) -> Vec<ObjectUri> {
        let map = self.objects.read();
        let mut uris: Vec<ObjectUri> = map.keys().cloned().collect();
        uris.sort();
        uris
    }

    fn serial(&self) -> u64 {
        self.next_serial.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore for InMemoryModelStore {
    fn store_id(&self) -> StoreId {
        self.id
    }

    fn exists(&self, uri: &ObjectUri) -> StoreResult<bool> {
        Ok(self.objects.read().contains_key(uri))
    }

    fn create(&self, object: &TypedRef) -> StoreResult<()> {
        let mut map = self.objects.write();
        if map.contains_key(&object.uri) {
            return Err(StoreError::AlreadyExists(object.uri.clone()));
        }
        debug!(store = %self.id, uri = %object.uri, type_name = %object.type_name, "create object");
        map.insert(
            object.uri.clone(),
            StoredObject {
                type_name: object.type_name.clone(),
                spec_version: object.spec_version,
                slots: HashMap::new(),
            },
        );
        Ok(())
    }

    fn type_of(&self, uri: &ObjectUri) -> StoreResult<Option<String>> {
        Ok(self.objects.read().get(uri).map(|o| o.type_name.clone()))
    }

    fn property_descriptors(&self, uri: &ObjectUri) -> StoreResult<Vec<PropertyDescriptor>> {
        let map = self.objects.read();
        let object = map.get(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        let mut descriptors: Vec<PropertyDescriptor> = object.slots.keys().cloned().collect();
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(descriptors)
    }

    fn is_collection_property(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<bool> {
        let map = self.objects.read();
        let object = map.get(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        Ok(matches!(
            object.slots.get(property),
            Some(PropertySlot::Collection(_))
        ))
    }

    fn get_value(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<Option<StoredValue>> {
        let map = self.objects.read();
        let object = map.get(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object.slots.get(property) {
            None => Ok(None),
            Some(PropertySlot::Scalar(value)) => Ok(Some(value.clone())),
            Some(PropertySlot::Collection(_)) => Err(StoreError::NotScalar {
                uri: uri.clone(),
                property: property.clone(),
            }),
        }
    }

    fn set_value(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: StoredValue,
    ) -> StoreResult<()> {
        let mut map = self.objects.write();
        let object = map.get_mut(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        if let Some(PropertySlot::Collection(_)) = object.slots.get(property) {
            return Err(StoreError::NotScalar {
                uri: uri.clone(),
                property: property.clone(),
            });
        }
        object
            .slots
            .insert(property.clone(), PropertySlot::Scalar(value));
        Ok(())
    }

    fn remove_property(&self, uri: &ObjectUri, property: &PropertyDescriptor) -> StoreResult<()> {
        let mut map = self.objects.write();
        let object = map.get_mut(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        object.slots.remove(property);
        Ok(())
    }

    fn list_values(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<Vec<StoredValue>> {
        let map = self.objects.read();
        let object = map.get(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object.slots.get(property) {
            None => Ok(Vec::new()),
            Some(PropertySlot::Collection(values)) => Ok(values.clone()),
            Some(PropertySlot::Scalar(_)) => Err(StoreError::NotCollection {
                uri: uri.clone(),
                property: property.clone(),
            }),
        }
    }

    fn add_to_collection(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: StoredValue,
    ) -> StoreResult<bool> {
        let mut map = self.objects.write();
        let object = map.get_mut(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object
            .slots
            .entry(property.clone())
            .or_insert_with(|| PropertySlot::Collection(Vec::new()))
        {
            PropertySlot::Collection(values) => {
                values.push(value);
                Ok(true)
            }
            PropertySlot::Scalar(_) => Err(StoreError::NotCollection {
                uri: uri.clone(),
                property: property.clone(),
            }),
        }
    }

    fn remove_from_collection(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: &StoredValue,
    ) -> StoreResult<bool> {
        let mut map = self.objects.write();
        let object = map.get_mut(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object.slots.get_mut(property) {
            None => Ok(false),
            Some(PropertySlot::Collection(values)) => {
                match values.iter().position(|v| v == value) {
                    Some(idx) => {
                        values.remove(idx);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            Some(PropertySlot::Scalar(_)) => Err(StoreError::NotCollection {
                uri: uri.clone(),
                property: property.clone(),
            }),
        }
    }

    fn clear_collection(&self, uri: &ObjectUri, property: &PropertyDescriptor) -> StoreResult<()> {
        let mut map = self.objects.write();
        let object = map.get_mut(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object.slots.get(property) {
            Some(PropertySlot::Scalar(_)) => Err(StoreError::NotCollection {
                uri: uri.clone(),
                property: property.clone(),
            }),
            _ => {
                object
                    .slots
                    .insert(property.clone(), PropertySlot::Collection(Vec::new()));
                Ok(())
            }
        }
    }

    fn collection_size(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<usize> {
        let map = self.objects.read();
        let object = map.get(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object.slots.get(property) {
            None => Ok(0),
            Some(PropertySlot::Collection(values)) => Ok(values.len()),
            Some(PropertySlot::Scalar(_)) => Err(StoreError::NotCollection {
                uri: uri.clone(),
                property: property.clone(),
            }),
        }
    }

    fn collection_contains(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: &StoredValue,
    ) -> StoreResult<bool> {
        let map = self.objects.read();
        let object = map.get(uri).ok_or_else(|| StoreError::NotFound(uri.clone()))?;
        match object.slots.get(property) {
            None => Ok(false),
            Some(PropertySlot::Collection(values)) => Ok(values.contains(value)),
            Some(PropertySlot::Scalar(_)) => Err(StoreError::NotCollection {
                uri: uri.clone(),
                property: property.clone(),
            }),
        }
    }

    fn next_id(&self, kind: IdKind, _namespace: Option<&str>) -> StoreResult<String> {
        let serial = self.serial();
        match kind {
            IdKind::Anonymous => Ok(format!("{}{}", vocab::ANONYMOUS_ID_PREFIX, serial)),
            IdKind::LicenseRef => Ok(format!("{}gen{}", vocab::LICENSE_REF_PREFIX, serial)),
            IdKind::DocumentRef => Ok(format!("{}gen{}", vocab::DOCUMENT_REF_PREFIX, serial)),
            IdKind::ElementId => Ok(format!("{}gen{}", vocab::ELEMENT_REF_PREFIX, serial)),
            other => Err(StoreError::UnsupportedIdKind(other)),
        }
    }

    fn enter_critical_section(&self, read_only: bool) -> StoreResult<StoreLock> {
        Ok(if read_only {
            StoreLock::read(&self.critical)
        } else {
            StoreLock::write(&self.critical)
        })
    }
}

impl std::fmt::Debug for InMemoryModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryModelStore")
            .field("id", &self.id)
            .field("object_count", &self.len())
            .finish()
    }
}

use metadoc_types::{IdKind, ObjectUri, PropertyDescriptor, StoredValue, TypedRef};

use crate::error::StoreResult;
use crate::lock::{StoreId, StoreLock};

/// Storage backend for typed model objects.
///
/// A store owns a set of objects addressed by [`ObjectUri`], each carrying a
/// type tag and a map of property slots. All implementations must satisfy
/// these invariants:
///
/// - A property slot is *either* scalar-valued or collection-valued for the
///   lifetime of that `(object, descriptor)` pair; operations of the wrong
///   shape fail with `NotScalar` / `NotCollection`.
/// - Collection reads on a never-written property behave as an empty
///   collection; `add_to_collection` creates the slot lazily.
/// - `next_id` results are unique within the store for the requested kind.
/// - All backend errors are propagated, never silently ignored.
/// - Implementations are thread-safe (`Send + Sync`); callers needing
///   multi-operation atomicity fence the sequence with
///   [`enter_critical_section`](ModelStore::enter_critical_section).
pub trait ModelStore: Send + Sync {
    /// Process-unique identity of this store instance.
    fn store_id(&self) -> StoreId;

    /// Whether an object exists at the given URI.
    fn exists(&self, uri: &ObjectUri) -> StoreResult<bool>;

    /// Create a new object with the given URI, type tag, and spec version.
    ///
    /// Fails with `AlreadyExists` if the URI is occupied.
    fn create(&self, object: &TypedRef) -> StoreResult<()>;

    /// The type tag the object was created with, or `None` if absent.
    fn type_of(&self, uri: &ObjectUri) -> StoreResult<Option<String>>;

    /// Classify an identifier. The default derives the kind from the URI's
    /// shape; backends with their own id registries may override.
    fn id_kind(&self, uri: &ObjectUri) -> IdKind {
        uri.id_kind()
    }

    /// All property descriptors currently present on the object.
    fn property_descriptors(&self, uri: &ObjectUri) -> StoreResult<Vec<PropertyDescriptor>>;

    /// Whether the property slot is collection-valued. Absent slots report
    /// `false`.
    fn is_collection_property(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<bool>;

    /// Read a scalar property value. Returns `Ok(None)` when unset.
    fn get_value(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<Option<StoredValue>>;

    /// Write a scalar property value, creating the slot if necessary.
    fn set_value(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: StoredValue,
    ) -> StoreResult<()>;

    /// Remove a property and its value if present.
    fn remove_property(&self, uri: &ObjectUri, property: &PropertyDescriptor) -> StoreResult<()>;

    /// All values of a collection property, in insertion order.
    fn list_values(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<Vec<StoredValue>>;

    /// Append a value to a collection property, creating the slot if
    /// necessary. Returns `true` if the collection changed.
    fn add_to_collection(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: StoredValue,
    ) -> StoreResult<bool>;

    /// Remove the first occurrence of a value from a collection property.
    /// Returns `true` if the value was present.
    fn remove_from_collection(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: &StoredValue,
    ) -> StoreResult<bool>;

    /// Remove all values from a collection property.
    fn clear_collection(&self, uri: &ObjectUri, property: &PropertyDescriptor) -> StoreResult<()>;

    /// Number of values in a collection property. Absent slots report zero.
    fn collection_size(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
    ) -> StoreResult<usize>;

    /// Whether a collection property contains the given value.
    fn collection_contains(
        &self,
        uri: &ObjectUri,
        property: &PropertyDescriptor,
        value: &StoredValue,
    ) -> StoreResult<bool>;

    /// Generate a fresh identifier of the given kind, unique within this
    /// store for that kind.
    ///
    /// For `Anonymous` the result is a complete opaque URI; for the
    /// namespaced kinds it is a bare local id the caller prepends a
    /// namespace to. `namespace`, when given, lets backends scope
    /// uniqueness per namespace.
    fn next_id(&self, kind: IdKind, namespace: Option<&str>) -> StoreResult<String>;

    /// Enter a critical section fencing a multi-step sequence of store
    /// calls. `read_only` sections may run concurrently with each other and
    /// may nest; write sections are exclusive. The section ends when the
    /// returned guard is dropped.
    fn enter_critical_section(&self, read_only: bool) -> StoreResult<StoreLock>;
}

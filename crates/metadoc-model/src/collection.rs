//! Live collection views over store-backed multi-valued properties.
//!
//! A [`ModelCollection`] holds no element data of its own: every read and
//! write goes straight to the backing store, so all views over the same
//! `(store, object, property)` observe the same state with no caching lag.

use std::sync::Arc;

use metadoc_copy::CopyManager;
use metadoc_store::ModelStore;
use metadoc_types::{vocab, ObjectUri, PropertyDescriptor, SpecVersion, StoredValue};

use crate::convert;
use crate::error::{ModelError, ModelResult};
use crate::value::ModelValue;

/// Element-type constraint for a collection view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementType {
    Str,
    Bool,
    Int,
    /// Objects with exactly this type tag.
    Object(String),
    /// Objects of any type.
    AnyObject,
    /// License objects, additionally admitting the none/no-assertion
    /// sentinels.
    License,
}

impl ElementType {
    fn admits_stored(&self, value: &StoredValue) -> bool {
        match (self, value) {
            (ElementType::Str, StoredValue::Str(_)) => true,
            (ElementType::Bool, StoredValue::Bool(_)) => true,
            (ElementType::Int, StoredValue::Int(_)) => true,
            (ElementType::Object(tag), StoredValue::Ref(r)) => r.type_name == *tag,
            (ElementType::AnyObject, StoredValue::Ref(_)) => true,
            (ElementType::License, StoredValue::Ref(_)) => true,
            (ElementType::License, StoredValue::Individual(uri)) => {
                uri == vocab::URI_VALUE_NONE || uri == vocab::URI_VALUE_NOASSERTION
            }
            _ => false,
        }
    }

    fn admits_model(&self, value: &ModelValue) -> bool {
        match (self, value) {
            (ElementType::Str, ModelValue::Str(_)) => true,
            (ElementType::Bool, ModelValue::Bool(_)) => true,
            (ElementType::Int, ModelValue::Int(_)) => true,
            (ElementType::Object(tag), ModelValue::Object(o)) => o.type_name() == tag,
            (ElementType::AnyObject, ModelValue::Object(_)) => true,
            (ElementType::License, ModelValue::Object(_)) => true,
            (ElementType::License, ModelValue::Individual(uri)) => {
                uri == vocab::URI_VALUE_NONE || uri == vocab::URI_VALUE_NOASSERTION
            }
            _ => false,
        }
    }

    fn name(&self) -> String {
        match self {
            ElementType::Str => "string".to_string(),
            ElementType::Bool => "boolean".to_string(),
            ElementType::Int => "integer".to_string(),
            ElementType::Object(tag) => format!("object <{tag}>"),
            ElementType::AnyObject => "object".to_string(),
            ElementType::License => "license".to_string(),
        }
    }
}

/// A collection-shaped view over one property of one stored object.
#[derive(Clone)]
pub struct ModelCollection {
    store: Arc<dyn ModelStore>,
    namespace: String,
    object_uri: ObjectUri,
    descriptor: PropertyDescriptor,
    element_type: Option<ElementType>,
    spec_version: SpecVersion,
    copy_manager: Option<Arc<CopyManager>>,
}

impl ModelCollection {
    /// Bind a view to `(store, object, property)`.
    ///
    /// Fails `NotFound` if the object is absent and `TypeConflict` when an
    /// element type is requested that already-committed elements do not
    /// satisfy.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ModelStore>,
        namespace: String,
        object_uri: ObjectUri,
        descriptor: PropertyDescriptor,
        element_type: Option<ElementType>,
        spec_version: SpecVersion,
        copy_manager: Option<Arc<CopyManager>>,
    ) -> ModelResult<Self> {
        if !store.exists(&object_uri)? {
            return Err(ModelError::NotFound(object_uri));
        }
        if let Some(wanted) = &element_type {
            if store.is_collection_property(&object_uri, &descriptor)? {
                for value in store.list_values(&object_uri, &descriptor)? {
                    if !wanted.admits_stored(&value) {
                        return Err(ModelError::TypeConflict {
                            uri: object_uri,
                            existing: stored_kind_name(&value).to_string(),
                            requested: wanted.name(),
                        });
                    }
                }
            }
        }
        Ok(Self {
            store,
            namespace,
            object_uri,
            descriptor,
            element_type,
            spec_version,
            copy_manager,
        })
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// Whether two views are bound to the same slot of the same object in
    /// the same store.
    pub fn same_binding(&self, other: &ModelCollection) -> bool {
        self.store.store_id() == other.store.store_id()
            && self.object_uri == other.object_uri
            && self.descriptor == other.descriptor
    }

    /// Live element count.
    pub fn len(&self) -> ModelResult<usize> {
        Ok(self
            .store
            .collection_size(&self.object_uri, &self.descriptor)?)
    }

    pub fn is_empty(&self) -> ModelResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Whether the collection contains `value`. A value with no
    /// representation in this store is simply not contained.
    pub fn contains(&self, value: &ModelValue) -> ModelResult<bool> {
        match convert::probe_stored(value, &self.store, self.copy_manager.as_ref()) {
            None => Ok(false),
            Some(stored) => Ok(self.store.collection_contains(
                &self.object_uri,
                &self.descriptor,
                &stored,
            )?),
        }
    }

    /// Materialize a one-shot snapshot of the elements, in stored order.
    ///
    /// Fail-fast: the first element violating the view's element type
    /// aborts the whole read with `WrongType`.
    pub fn to_vec(&self) -> ModelResult<Vec<ModelValue>> {
        let stored = self
            .store
            .list_values(&self.object_uri, &self.descriptor)?;
        let mut elements = Vec::with_capacity(stored.len());
        for value in stored {
            let element = convert::to_model(
                value,
                &self.store,
                &self.namespace,
                self.copy_manager.as_ref(),
            )?;
            if let Some(wanted) = &self.element_type {
                if !wanted.admits_model(&element) {
                    return Err(ModelError::WrongType {
                        property: self.descriptor.clone(),
                        expected: wanted.name(),
                        actual: element.kind_name().to_string(),
                    });
                }
            }
            elements.push(element);
        }
        Ok(elements)
    }

    /// Iterate a snapshot of the current elements.
    pub fn iter(&self) -> ModelResult<std::vec::IntoIter<ModelValue>> {
        Ok(self.to_vec()?.into_iter())
    }

    /// Append a value, writing through to the store. Cross-store objects
    /// are copied in first.
    pub fn add(&self, value: &ModelValue) -> ModelResult<bool> {
        if let Some(wanted) = &self.element_type {
            if !wanted.admits_model(value) {
                return Err(ModelError::WrongType {
                    property: self.descriptor.clone(),
                    expected: wanted.name(),
                    actual: value.kind_name().to_string(),
                });
            }
        }
        let stored = convert::to_stored(
            value,
            &self.store,
            &self.namespace,
            self.spec_version,
            self.copy_manager.as_ref(),
        )?;
        Ok(self
            .store
            .add_to_collection(&self.object_uri, &self.descriptor, stored)?)
    }

    /// Remove the first occurrence of a value.
    pub fn remove(&self, value: &ModelValue) -> ModelResult<bool> {
        match convert::probe_stored(value, &self.store, self.copy_manager.as_ref()) {
            None => Ok(false),
            Some(stored) => Ok(self.store.remove_from_collection(
                &self.object_uri,
                &self.descriptor,
                &stored,
            )?),
        }
    }

    /// Repeated [`add`](Self::add); not atomic, a failure mid-sequence
    /// leaves earlier elements committed.
    pub fn add_all(&self, values: &[ModelValue]) -> ModelResult<bool> {
        let mut changed = false;
        for value in values {
            changed |= self.add(value)?;
        }
        Ok(changed)
    }

    /// Repeated [`remove`](Self::remove); not atomic.
    pub fn remove_all(&self, values: &[ModelValue]) -> ModelResult<bool> {
        let mut changed = false;
        for value in values {
            changed |= self.remove(value)?;
        }
        Ok(changed)
    }

    /// Remove every element not present in `keep`.
    pub fn retain_all(&self, keep: &[ModelValue]) -> ModelResult<bool> {
        let mut changed = false;
        for element in self.to_vec()? {
            if !keep.contains(&element) {
                changed |= self.remove(&element)?;
            }
        }
        Ok(changed)
    }

    /// One bulk store clear.
    pub fn clear(&self) -> ModelResult<()> {
        Ok(self
            .store
            .clear_collection(&self.object_uri, &self.descriptor)?)
    }
}

impl std::fmt::Debug for ModelCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCollection")
            .field("object_uri", &self.object_uri)
            .field("descriptor", &self.descriptor)
            .field("element_type", &self.element_type)
            .field("store", &self.store.store_id())
            .finish()
    }
}

/// A duplicate-suppressing wrapper over [`ModelCollection`].
///
/// `add`/`add_all` check containment and insert under one write critical
/// section, so concurrent adders cannot both insert the same element.
#[derive(Clone, Debug)]
pub struct ModelSet {
    inner: ModelCollection,
}

impl ModelSet {
    pub fn new(inner: ModelCollection) -> Self {
        Self { inner }
    }

    /// The underlying live collection view.
    pub fn as_collection(&self) -> &ModelCollection {
        &self.inner
    }

    /// Add a value unless an equal one is already present. Returns whether
    /// the collection changed.
    pub fn add(&self, value: &ModelValue) -> ModelResult<bool> {
        let _section = self.inner.store.enter_critical_section(false)?;
        if self.inner.contains(value)? {
            return Ok(false);
        }
        self.inner.add(value)
    }

    /// Repeated duplicate-suppressing add.
    pub fn add_all(&self, values: &[ModelValue]) -> ModelResult<bool> {
        let mut changed = false;
        for value in values {
            changed |= self.add(value)?;
        }
        Ok(changed)
    }

    pub fn len(&self) -> ModelResult<usize> {
        self.inner.len()
    }

    pub fn is_empty(&self) -> ModelResult<bool> {
        self.inner.is_empty()
    }

    pub fn contains(&self, value: &ModelValue) -> ModelResult<bool> {
        self.inner.contains(value)
    }

    pub fn remove(&self, value: &ModelValue) -> ModelResult<bool> {
        self.inner.remove(value)
    }

    pub fn to_vec(&self) -> ModelResult<Vec<ModelValue>> {
        self.inner.to_vec()
    }

    pub fn clear(&self) -> ModelResult<()> {
        self.inner.clear()
    }
}

fn stored_kind_name(value: &StoredValue) -> &'static str {
    match value {
        StoredValue::Str(_) => "string",
        StoredValue::Bool(_) => "boolean",
        StoredValue::Int(_) => "integer",
        StoredValue::Individual(_) => "individual",
        StoredValue::Ref(_) => "object reference",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ModelObject;
    use metadoc_store::InMemoryModelStore;

    const NS: &str = "https://ex.org/doc#";
    const NS2: &str = "https://ex.org/doc-two#";

    fn store() -> Arc<dyn ModelStore> {
        Arc::new(InMemoryModelStore::new())
    }

    fn prop(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::new(name)
    }

    fn pkg(store: &Arc<dyn ModelStore>, id: &str) -> ModelObject {
        ModelObject::create(store.clone(), NS, id, "Package", SpecVersion::Current).unwrap()
    }

    fn view(object: &ModelObject, name: &str, element_type: Option<ElementType>) -> ModelCollection {
        object.collection(&prop(name), element_type).unwrap()
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    #[test]
    fn binding_to_missing_object_fails() {
        let s = store();
        let err = ModelCollection::new(
            s,
            NS.to_string(),
            ObjectUri::new("https://ex.org/doc#SPDXRef-nope"),
            prop("attributions"),
            None,
            SpecVersion::Current,
            None,
        );
        assert!(matches!(err, Err(ModelError::NotFound(_))));
    }

    #[test]
    fn binding_checks_committed_element_types() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let strings = view(&object, "attributions", Some(ElementType::Str));
        strings.add(&"a".into()).unwrap();

        let err = object.collection(&prop("attributions"), Some(ElementType::Int));
        assert!(matches!(err, Err(ModelError::TypeConflict { .. })));
        // The matching element type still binds.
        assert!(object
            .collection(&prop("attributions"), Some(ElementType::Str))
            .is_ok());
    }

    // -----------------------------------------------------------------------
    // Write-through
    // -----------------------------------------------------------------------

    #[test]
    fn mutations_are_visible_to_other_views_immediately() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let writer = view(&object, "attributions", None);
        let reader = view(&object, "attributions", None);

        writer.add(&"a".into()).unwrap();
        assert_eq!(reader.len().unwrap(), 1);
        assert!(reader.contains(&"a".into()).unwrap());

        // A view constructed after the write sees it too.
        let late = view(&object, "attributions", None);
        assert_eq!(late.to_vec().unwrap(), vec![ModelValue::Str("a".into())]);
    }

    #[test]
    fn snapshot_preserves_stored_order() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let c = view(&object, "attributions", None);
        c.add_all(&["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(
            c.to_vec().unwrap(),
            vec![
                ModelValue::Str("a".into()),
                ModelValue::Str("b".into()),
                ModelValue::Str("c".into())
            ]
        );
    }

    #[test]
    fn remove_and_clear() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let c = view(&object, "attributions", None);
        c.add_all(&["a".into(), "b".into()]).unwrap();

        assert!(c.remove(&"a".into()).unwrap());
        assert!(!c.remove(&"a".into()).unwrap());
        assert_eq!(c.len().unwrap(), 1);

        c.clear().unwrap();
        assert!(c.is_empty().unwrap());
    }

    #[test]
    fn retain_all_keeps_only_listed() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let c = view(&object, "attributions", None);
        c.add_all(&["a".into(), "b".into(), "c".into()]).unwrap();
        c.retain_all(&["b".into()]).unwrap();
        assert_eq!(c.to_vec().unwrap(), vec![ModelValue::Str("b".into())]);
    }

    // -----------------------------------------------------------------------
    // Element typing
    // -----------------------------------------------------------------------

    #[test]
    fn add_rejects_wrong_element_type() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let c = view(&object, "attributions", Some(ElementType::Str));
        assert!(matches!(
            c.add(&ModelValue::Int(3)),
            Err(ModelError::WrongType { .. })
        ));
    }

    #[test]
    fn iteration_fails_fast_on_wrong_type() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        // Bind the typed view first, then commit a bad element through an
        // untyped one.
        let typed = view(&object, "sources", Some(ElementType::Str));
        let untyped = view(&object, "sources", None);
        untyped.add(&"ok".into()).unwrap();
        untyped.add(&ModelValue::Int(9)).unwrap();
        assert!(matches!(typed.to_vec(), Err(ModelError::WrongType { .. })));
    }

    #[test]
    fn license_type_admits_sentinels() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let c = view(&object, "seenLicenses", Some(ElementType::License));
        c.add(&ModelValue::none()).unwrap();
        c.add(&ModelValue::no_assertion()).unwrap();
        assert_eq!(c.len().unwrap(), 2);
        // But not arbitrary individuals.
        assert!(matches!(
            c.add(&ModelValue::Individual("https://ex.org/terms#other".into())),
            Err(ModelError::WrongType { .. })
        ));
    }

    #[test]
    fn object_elements_resolve_to_handles() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let file =
            ModelObject::create(s.clone(), NS, "SPDXRef-file", "File", SpecVersion::Current)
                .unwrap();
        let c = view(&object, "hasFiles", Some(ElementType::Object("File".into())));
        c.add(&file.clone().into()).unwrap();

        match c.to_vec().unwrap().pop() {
            Some(ModelValue::Object(resolved)) => assert_eq!(resolved, file),
            other => panic!("expected object element, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Cross-store values
    // -----------------------------------------------------------------------

    #[test]
    fn foreign_uncopied_object_is_not_contained() {
        let a = store();
        let b = store();
        let object = pkg(&a, "SPDXRef-pkg");
        let foreign =
            ModelObject::create(b, NS2, "SPDXRef-file", "File", SpecVersion::Current).unwrap();
        let c = view(&object, "hasFiles", None);
        assert!(!c.contains(&foreign.clone().into()).unwrap());
        assert!(!c.remove(&foreign.into()).unwrap());
    }

    // -----------------------------------------------------------------------
    // ModelSet
    // -----------------------------------------------------------------------

    #[test]
    fn set_suppresses_duplicates() {
        let s = store();
        let object = pkg(&s, "SPDXRef-pkg");
        let set = object.set_view(&prop("attributions"), None).unwrap();
        assert!(set.add(&"a".into()).unwrap());
        assert!(!set.add(&"a".into()).unwrap());
        assert!(set.add(&"b".into()).unwrap());
        assert_eq!(set.len().unwrap(), 2);

        assert!(set.add_all(&["a".into(), "c".into()]).unwrap());
        assert_eq!(set.len().unwrap(), 3);
    }
}

//! The generic object accessor.
//!
//! [`ModelObject`] is the handle every domain type composes over: it binds a
//! `(store, namespace, id)` identity and mediates all property reads and
//! writes against the store contract. Handles are cheap to clone; all state
//! lives in the store.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use metadoc_copy::CopyManager;
use metadoc_store::ModelStore;
use metadoc_types::{
    vocab, IdKind, ObjectUri, PropertyDescriptor, SpecVersion, TypeError, TypedRef,
};

use crate::collection::{ElementType, ModelCollection, ModelSet};
use crate::convert;
use crate::error::{ModelError, ModelResult};
use crate::value::{ModelValue, UriEnum};

/// A typed handle to one stored object.
#[derive(Clone)]
pub struct ModelObject {
    store: Arc<dyn ModelStore>,
    namespace: String,
    id: String,
    type_name: String,
    spec_version: SpecVersion,
    copy_manager: Option<Arc<CopyManager>>,
    strict: bool,
}

impl ModelObject {
    /// Bind to an object, creating it when `create` is set.
    ///
    /// An id accidentally passed with the namespace prefix attached is
    /// stripped back to its local form. Binding to an existing object whose
    /// type tag differs fails with `TypeConflict`; binding to a missing
    /// object without `create` fails with `NotFound`.
    pub fn new(
        store: Arc<dyn ModelStore>,
        namespace: impl Into<String>,
        id: impl Into<String>,
        type_name: impl Into<String>,
        spec_version: SpecVersion,
        create: bool,
    ) -> ModelResult<Self> {
        let namespace = namespace.into();
        if !namespace.ends_with('#') && !namespace.ends_with('/') {
            return Err(ModelError::Type(TypeError::BadNamespace(namespace)));
        }
        let mut id = id.into();
        if let Some(local) = id.strip_prefix(&namespace) {
            id = local.to_string();
        }
        let object = Self {
            store,
            namespace,
            id,
            type_name: type_name.into(),
            spec_version,
            copy_manager: None,
            strict: true,
        };
        let uri = object.object_uri();
        if create {
            let _section = object.store.enter_critical_section(false)?;
            if object.store.exists(&uri)? {
                object.check_type(&uri)?;
            } else {
                debug!(uri = %uri, type_name = %object.type_name, "creating object");
                object
                    .store
                    .create(&TypedRef::new(uri, &object.type_name, spec_version))?;
            }
        } else if object.store.exists(&uri)? {
            object.check_type(&uri)?;
        } else {
            return Err(ModelError::NotFound(uri));
        }
        Ok(object)
    }

    /// Bind to an existing object.
    pub fn open(
        store: Arc<dyn ModelStore>,
        namespace: impl Into<String>,
        id: impl Into<String>,
        type_name: impl Into<String>,
        spec_version: SpecVersion,
    ) -> ModelResult<Self> {
        Self::new(store, namespace, id, type_name, spec_version, false)
    }

    /// Create (or rebind to) an object.
    pub fn create(
        store: Arc<dyn ModelStore>,
        namespace: impl Into<String>,
        id: impl Into<String>,
        type_name: impl Into<String>,
        spec_version: SpecVersion,
    ) -> ModelResult<Self> {
        Self::new(store, namespace, id, type_name, spec_version, true)
    }

    /// Attach a copy manager enabling cross-store writes through this handle.
    pub fn with_copy_manager(mut self, manager: Arc<CopyManager>) -> Self {
        self.copy_manager = Some(manager);
        self
    }

    /// Toggle strict validation. Honored by domain wrappers; the accessor
    /// itself carries the flag without interpreting it.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    pub fn store_id(&self) -> metadoc_store::StoreId {
        self.store.store_id()
    }

    pub fn copy_manager(&self) -> Option<&Arc<CopyManager>> {
        self.copy_manager.as_ref()
    }

    /// The absolute object URI: the id itself for anonymous and other
    /// absolute ids, `namespace + id` otherwise.
    pub fn object_uri(&self) -> ObjectUri {
        if self.id.starts_with(vocab::ANONYMOUS_ID_PREFIX) || self.id.contains("://") {
            ObjectUri::new(self.id.clone())
        } else {
            ObjectUri::new(format!("{}{}", self.namespace, self.id))
        }
    }

    /// This object as a typed reference value.
    pub fn typed_ref(&self) -> TypedRef {
        TypedRef::new(self.object_uri(), &self.type_name, self.spec_version)
    }

    fn check_type(&self, uri: &ObjectUri) -> ModelResult<()> {
        match self.store.type_of(uri)? {
            Some(existing) if existing != self.type_name => Err(ModelError::TypeConflict {
                uri: uri.clone(),
                existing,
                requested: self.type_name.clone(),
            }),
            _ => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Property access
    // -----------------------------------------------------------------------

    /// Read a property value.
    ///
    /// Collection-shaped slots produce a live [`ModelValue::Collection`]
    /// view; scalar slots are converted to their domain form. The
    /// shape-check-plus-fetch pair runs under a read critical section.
    pub fn get_value(&self, property: &PropertyDescriptor) -> ModelResult<Option<ModelValue>> {
        let uri = self.object_uri();
        let stored = {
            let _section = self.store.enter_critical_section(true)?;
            if !self.store.exists(&uri)? {
                return Err(ModelError::NotFound(uri));
            }
            if self.store.is_collection_property(&uri, property)? {
                let view = self.collection(property, None)?;
                return Ok(Some(ModelValue::Collection(view)));
            }
            self.store.get_value(&uri, property)?
        };
        match stored {
            None => Ok(None),
            Some(value) => Ok(Some(convert::to_model(
                value,
                &self.store,
                &self.namespace,
                self.copy_manager.as_ref(),
            )?)),
        }
    }

    /// Write a property value. `None` removes the property; a sequence
    /// value replaces the whole stored collection.
    pub fn set_value(
        &self,
        property: &PropertyDescriptor,
        value: Option<ModelValue>,
    ) -> ModelResult<()> {
        let uri = self.object_uri();
        match value {
            None => Ok(self.store.remove_property(&uri, property)?),
            Some(ModelValue::List(items)) => self.replace_collection(property, items),
            Some(ModelValue::Collection(view)) => {
                let items = view.to_vec()?;
                self.replace_collection(property, items)
            }
            Some(scalar) => {
                let stored = self.to_stored(&scalar)?;
                Ok(self.store.set_value(&uri, property, stored)?)
            }
        }
    }

    fn replace_collection(
        &self,
        property: &PropertyDescriptor,
        items: Vec<ModelValue>,
    ) -> ModelResult<()> {
        let uri = self.object_uri();
        self.store.clear_collection(&uri, property)?;
        for item in items {
            let stored = self.to_stored(&item)?;
            self.store.add_to_collection(&uri, property, stored)?;
        }
        Ok(())
    }

    fn to_stored(&self, value: &ModelValue) -> ModelResult<metadoc_types::StoredValue> {
        convert::to_stored(
            value,
            &self.store,
            &self.namespace,
            self.spec_version,
            self.copy_manager.as_ref(),
        )
    }

    // -----------------------------------------------------------------------
    // Typed getters
    // -----------------------------------------------------------------------

    /// Read a string property. The none/no-assertion sentinels convert to
    /// their literal string constants.
    pub fn get_string(&self, property: &PropertyDescriptor) -> ModelResult<Option<String>> {
        match self.get_value(property)? {
            None => Ok(None),
            Some(ModelValue::Str(s)) => Ok(Some(s)),
            Some(ModelValue::Individual(uri)) if uri == vocab::URI_VALUE_NONE => {
                Ok(Some(vocab::NONE_VALUE.to_string()))
            }
            Some(ModelValue::Individual(uri)) if uri == vocab::URI_VALUE_NOASSERTION => {
                Ok(Some(vocab::NOASSERTION_VALUE.to_string()))
            }
            Some(other) => Err(self.wrong_type(property, "string", &other)),
        }
    }

    /// Read a boolean property. Accepts `"true"`/`"false"` strings written
    /// by less-typed producers.
    pub fn get_bool(&self, property: &PropertyDescriptor) -> ModelResult<Option<bool>> {
        match self.get_value(property)? {
            None => Ok(None),
            Some(ModelValue::Bool(b)) => Ok(Some(b)),
            Some(ModelValue::Str(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(ModelValue::Str(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(self.wrong_type(property, "boolean", &other)),
        }
    }

    /// Read an integer property.
    pub fn get_int(&self, property: &PropertyDescriptor) -> ModelResult<Option<i64>> {
        match self.get_value(property)? {
            None => Ok(None),
            Some(ModelValue::Int(i)) => Ok(Some(i)),
            Some(other) => Err(self.wrong_type(property, "integer", &other)),
        }
    }

    /// Read an enumerant property through its [`UriEnum`] mapping.
    pub fn get_enum<E: UriEnum>(&self, property: &PropertyDescriptor) -> ModelResult<Option<E>> {
        match self.get_value(property)? {
            None => Ok(None),
            Some(ModelValue::Individual(uri)) => match E::from_uri(&uri) {
                Some(member) => Ok(Some(member)),
                None => Err(ModelError::UnknownSentinel(uri)),
            },
            Some(other) => Err(self.wrong_type(property, "enumerant", &other)),
        }
    }

    /// Read an object-reference property as a live handle.
    pub fn get_object(&self, property: &PropertyDescriptor) -> ModelResult<Option<ModelObject>> {
        match self.get_value(property)? {
            None => Ok(None),
            Some(ModelValue::Object(object)) => Ok(Some(object)),
            Some(other) => Err(self.wrong_type(property, "object reference", &other)),
        }
    }

    fn wrong_type(
        &self,
        property: &PropertyDescriptor,
        expected: &str,
        actual: &ModelValue,
    ) -> ModelError {
        ModelError::WrongType {
            property: property.clone(),
            expected: expected.to_string(),
            actual: actual.kind_name().to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    /// A live collection view over a multi-valued property.
    pub fn collection(
        &self,
        property: &PropertyDescriptor,
        element_type: Option<ElementType>,
    ) -> ModelResult<ModelCollection> {
        ModelCollection::new(
            self.store.clone(),
            self.namespace.clone(),
            self.object_uri(),
            property.clone(),
            element_type,
            self.spec_version,
            self.copy_manager.clone(),
        )
    }

    /// A duplicate-suppressing set view over a multi-valued property.
    pub fn set_view(
        &self,
        property: &PropertyDescriptor,
        element_type: Option<ElementType>,
    ) -> ModelResult<ModelSet> {
        Ok(ModelSet::new(self.collection(property, element_type)?))
    }

    /// Append one value to a collection property.
    pub fn add_to_collection(
        &self,
        property: &PropertyDescriptor,
        value: &ModelValue,
    ) -> ModelResult<bool> {
        let stored = self.to_stored(value)?;
        Ok(self
            .store
            .add_to_collection(&self.object_uri(), property, stored)?)
    }

    /// Remove one value from a collection property. A value with no
    /// representation in this store was never present.
    pub fn remove_from_collection(
        &self,
        property: &PropertyDescriptor,
        value: &ModelValue,
    ) -> ModelResult<bool> {
        match convert::probe_stored(value, &self.store, self.copy_manager.as_ref()) {
            None => Ok(false),
            Some(stored) => Ok(self.store.remove_from_collection(
                &self.object_uri(),
                property,
                &stored,
            )?),
        }
    }

    /// Remove every value from a collection property.
    pub fn clear_collection(&self, property: &PropertyDescriptor) -> ModelResult<()> {
        Ok(self.store.clear_collection(&self.object_uri(), property)?)
    }

    // -----------------------------------------------------------------------
    // Update batching
    // -----------------------------------------------------------------------

    /// A pending write: set (or, with `None`, remove) a property.
    pub fn update_set(
        &self,
        property: &PropertyDescriptor,
        value: Option<ModelValue>,
    ) -> ModelUpdate {
        let this = self.clone();
        let property = property.clone();
        ModelUpdate::new(move || this.set_value(&property, value))
    }

    /// A pending write: remove a property.
    pub fn update_remove(&self, property: &PropertyDescriptor) -> ModelUpdate {
        self.update_set(property, None)
    }

    /// A pending write: append to a collection property.
    pub fn update_add(&self, property: &PropertyDescriptor, value: ModelValue) -> ModelUpdate {
        let this = self.clone();
        let property = property.clone();
        ModelUpdate::new(move || this.add_to_collection(&property, &value).map(|_| ()))
    }

    /// A pending write: remove one value from a collection property.
    pub fn update_remove_from(
        &self,
        property: &PropertyDescriptor,
        value: ModelValue,
    ) -> ModelUpdate {
        let this = self.clone();
        let property = property.clone();
        ModelUpdate::new(move || this.remove_from_collection(&property, &value).map(|_| ()))
    }

    /// A pending write: clear a collection property.
    pub fn update_clear(&self, property: &PropertyDescriptor) -> ModelUpdate {
        let this = self.clone();
        let property = property.clone();
        ModelUpdate::new(move || this.clear_collection(&property))
    }

    // -----------------------------------------------------------------------
    // Structural equivalence
    // -----------------------------------------------------------------------

    /// Structural equivalence over the object graph.
    ///
    /// Two objects are equivalent iff they share a concrete type and every
    /// property present on either side matches under the quotient rules:
    /// absence matches an empty collection, a no-assertion sentinel or its
    /// literal string (and, for the files-analyzed flag, `true`); sentinels
    /// match their literal
    /// string constants; scalar strings compare after line-ending
    /// normalization and trimming; collections compare unordered by double
    /// containment, with elements matched by plain equality or recursive
    /// object equivalence.
    ///
    /// Collection matching is first-available-match, not a minimum-cost
    /// matching: several near-equal duplicate elements can defeat it. That
    /// approximation is part of the observable contract.
    pub fn equivalent(&self, other: &ModelObject) -> ModelResult<bool> {
        self.equivalent_with(other, false)
    }

    /// Structural equivalence, optionally skipping the related-element
    /// property. Recursion into the related-element property always sets
    /// the skip flag, which is what terminates relationship cycles; a cycle
    /// running through any other reference property is not guarded and will
    /// not terminate.
    pub fn equivalent_with(
        &self,
        other: &ModelObject,
        ignore_related: bool,
    ) -> ModelResult<bool> {
        if self.type_name != other.type_name {
            return Ok(false);
        }
        let mut names: BTreeSet<String> = BTreeSet::new();
        for descriptor in self.store.property_descriptors(&self.object_uri())? {
            names.insert(descriptor.name().to_string());
        }
        for descriptor in other.store.property_descriptors(&other.object_uri())? {
            names.insert(descriptor.name().to_string());
        }
        for name in names {
            if ignore_related && name == vocab::RELATED_ELEMENT_PROPERTY {
                continue;
            }
            let property = PropertyDescriptor::new(&name);
            let mine = self.get_value(&property)?;
            let theirs = other.get_value(&property)?;
            if !Self::values_equivalent(&property, mine.as_ref(), theirs.as_ref(), ignore_related)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn values_equivalent(
        property: &PropertyDescriptor,
        a: Option<&ModelValue>,
        b: Option<&ModelValue>,
        ignore_related: bool,
    ) -> ModelResult<bool> {
        match (a, b) {
            (None, None) => Ok(true),
            (Some(present), None) | (None, Some(present)) => {
                Self::equivalent_to_absent(property, present)
            }
            (Some(a), Some(b)) => Self::value_pair_equivalent(property, a, b, ignore_related),
        }
    }

    fn equivalent_to_absent(
        property: &PropertyDescriptor,
        value: &ModelValue,
    ) -> ModelResult<bool> {
        Ok(match value {
            ModelValue::Collection(view) => view.is_empty()?,
            ModelValue::List(items) => items.is_empty(),
            ModelValue::Individual(uri) => uri == vocab::URI_VALUE_NOASSERTION,
            ModelValue::Str(s) => s == vocab::NOASSERTION_VALUE,
            ModelValue::Bool(true) => property.name() == vocab::FILES_ANALYZED_PROPERTY,
            _ => false,
        })
    }

    fn value_pair_equivalent(
        property: &PropertyDescriptor,
        a: &ModelValue,
        b: &ModelValue,
        ignore_related: bool,
    ) -> ModelResult<bool> {
        match (a, b) {
            (ModelValue::Object(x), ModelValue::Object(y)) => {
                let ignore =
                    ignore_related || property.name() == vocab::RELATED_ELEMENT_PROPERTY;
                x.equivalent_with(y, ignore)
            }
            (ModelValue::Collection(x), ModelValue::Collection(y)) => {
                Self::lists_equivalent(property, &x.to_vec()?, &y.to_vec()?, ignore_related)
            }
            (ModelValue::Collection(x), ModelValue::List(y)) => {
                Self::lists_equivalent(property, &x.to_vec()?, y, ignore_related)
            }
            (ModelValue::List(x), ModelValue::Collection(y)) => {
                Self::lists_equivalent(property, x, &y.to_vec()?, ignore_related)
            }
            (ModelValue::List(x), ModelValue::List(y)) => {
                Self::lists_equivalent(property, x, y, ignore_related)
            }
            (ModelValue::Str(x), ModelValue::Str(y)) => Ok(normalized(x) == normalized(y)),
            (ModelValue::Individual(x), ModelValue::Individual(y)) => Ok(x == y),
            (ModelValue::Individual(uri), ModelValue::Str(s))
            | (ModelValue::Str(s), ModelValue::Individual(uri)) => {
                Ok(sentinel_matches_literal(uri, s))
            }
            _ => Ok(a == b),
        }
    }

    /// Unordered double-containment: equal length and every element of each
    /// side has some equivalent counterpart on the other.
    fn lists_equivalent(
        property: &PropertyDescriptor,
        xs: &[ModelValue],
        ys: &[ModelValue],
        ignore_related: bool,
    ) -> ModelResult<bool> {
        if xs.len() != ys.len() {
            return Ok(false);
        }
        for x in xs {
            if !Self::contains_equivalent(property, ys, x, ignore_related)? {
                return Ok(false);
            }
        }
        for y in ys {
            if !Self::contains_equivalent(property, xs, y, ignore_related)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn contains_equivalent(
        property: &PropertyDescriptor,
        haystack: &[ModelValue],
        needle: &ModelValue,
        ignore_related: bool,
    ) -> ModelResult<bool> {
        for candidate in haystack {
            if Self::list_item_matches(property, needle, candidate, ignore_related)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Element matching inside collections is narrower than the scalar
    /// quotient: plain equality (which covers same-sentinel URIs) or
    /// recursive object equivalence. String elements compare exactly, with
    /// no line-ending normalization.
    fn list_item_matches(
        property: &PropertyDescriptor,
        a: &ModelValue,
        b: &ModelValue,
        ignore_related: bool,
    ) -> ModelResult<bool> {
        match (a, b) {
            (ModelValue::Object(x), ModelValue::Object(y)) => {
                let ignore =
                    ignore_related || property.name() == vocab::RELATED_ELEMENT_PROPERTY;
                x.equivalent_with(y, ignore)
            }
            _ => Ok(a == b),
        }
    }

    // -----------------------------------------------------------------------
    // Copying
    // -----------------------------------------------------------------------

    /// Copy all of `source`'s properties onto this object, translating
    /// cross-store references through the attached copy manager.
    ///
    /// Copying from another store requires a copy manager; without one the
    /// call fails with [`ModelError::CopyingDisabled`].
    pub fn copy_from(&self, source: &ModelObject) -> ModelResult<()> {
        let manager = self
            .copy_manager
            .as_ref()
            .ok_or_else(|| ModelError::CopyingDisabled(source.object_uri()))?;
        manager.copy_to(
            self.store.as_ref(),
            &self.object_uri(),
            source.store.as_ref(),
            &source.object_uri(),
            &self.type_name,
            self.spec_version,
            Some(&self.namespace),
        )?;
        Ok(())
    }

    /// Materialize a copy of this object in `store`, keeping the object
    /// URI, and return a handle to it. Referenced objects are copied along
    /// and recorded in the attached copy manager's ledger.
    pub fn clone_to(&self, store: &Arc<dyn ModelStore>) -> ModelResult<ModelObject> {
        let manager = self
            .copy_manager
            .clone()
            .ok_or_else(|| ModelError::CopyingDisabled(self.object_uri()))?;
        manager.copy_to(
            store.as_ref(),
            &self.object_uri(),
            self.store.as_ref(),
            &self.object_uri(),
            &self.type_name,
            self.spec_version,
            Some(&self.namespace),
        )?;
        let mut copy = ModelObject::open(
            Arc::clone(store),
            self.namespace.clone(),
            self.id.clone(),
            self.type_name.clone(),
            self.spec_version,
        )?
        .with_copy_manager(manager);
        copy.set_strict(self.strict);
        Ok(copy)
    }
}

/// Identity comparison: same address, and for anonymous ids (unique only
/// within one store) additionally the same store.
impl PartialEq for ModelObject {
    fn eq(&self, other: &Self) -> bool {
        let uri = self.object_uri();
        if uri != other.object_uri() {
            return false;
        }
        uri.id_kind() != IdKind::Anonymous || self.store_id() == other.store_id()
    }
}

impl std::fmt::Debug for ModelObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelObject")
            .field("uri", &self.object_uri())
            .field("type_name", &self.type_name)
            .field("spec_version", &self.spec_version)
            .field("store", &self.store.store_id())
            .finish()
    }
}

impl std::fmt::Display for ModelObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.type_name, self.object_uri())
    }
}

/// One pending property write, applied later by [`apply_updates`].
pub struct ModelUpdate {
    apply: Box<dyn FnOnce() -> ModelResult<()> + Send>,
}

impl ModelUpdate {
    pub(crate) fn new(apply: impl FnOnce() -> ModelResult<()> + Send + 'static) -> Self {
        Self {
            apply: Box::new(apply),
        }
    }

    /// Apply this update now.
    pub fn apply(self) -> ModelResult<()> {
        (self.apply)()
    }
}

impl std::fmt::Debug for ModelUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModelUpdate")
    }
}

/// Apply a batch of pending updates inside one write critical section on
/// `store`. Not transactional: a failure mid-batch leaves earlier updates
/// committed.
pub fn apply_updates(store: &dyn ModelStore, updates: Vec<ModelUpdate>) -> ModelResult<()> {
    let _section = store.enter_critical_section(false)?;
    for update in updates {
        update.apply()?;
    }
    Ok(())
}

fn normalized(s: &str) -> String {
    s.replace("\r\n", "\n").trim().to_string()
}

fn sentinel_matches_literal(uri: &str, literal: &str) -> bool {
    (uri == vocab::URI_VALUE_NONE && literal == vocab::NONE_VALUE)
        || (uri == vocab::URI_VALUE_NOASSERTION && literal == vocab::NOASSERTION_VALUE)
}

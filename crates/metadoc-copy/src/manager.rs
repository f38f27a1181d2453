//! The copy engine.
//!
//! [`CopyManager`] copies objects between stores, translating identifiers
//! for the destination and following references recursively. A process-wide
//! ledger maps every `(source store, destination store, source URI)` triple
//! to the destination URI it resolved to, so repeated and cyclic copies
//! converge instead of duplicating.
//!
//! A single copy proceeds in a fixed order: materialize the destination
//! object, record the ledger entry, then copy property values. Recording
//! before property copy is what terminates reference cycles.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use metadoc_store::{ModelStore, StoreId};
use metadoc_types::{vocab, IdKind, ObjectUri, SpecVersion, StoredValue, TypedRef};

use crate::error::{CopyError, CopyResult};

/// Ledger key: one copy relation between a pair of stores.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LedgerKey {
    from: StoreId,
    to: StoreId,
    source: ObjectUri,
}

/// Copies objects between stores and remembers what it copied.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Default)]
pub struct CopyManager {
    ledger: DashMap<LedgerKey, ObjectUri>,
}

impl CopyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded copy relations.
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    /// The destination URI a source object was previously copied to between
    /// these two stores, if any.
    pub fn copied_object_uri(
        &self,
        from: StoreId,
        to: StoreId,
        source: &ObjectUri,
    ) -> Option<ObjectUri> {
        self.ledger
            .get(&LedgerKey {
                from,
                to,
                source: source.clone(),
            })
            .map(|entry| entry.value().clone())
    }

    /// Record that `source` in store `from` was copied to `destination` in
    /// store `to`. An existing entry for the same relation is overwritten,
    /// last writer wins.
    pub fn record_copy(
        &self,
        from: StoreId,
        to: StoreId,
        source: ObjectUri,
        destination: ObjectUri,
    ) {
        let key = LedgerKey { from, to, source };
        if let Some(previous) = self.ledger.insert(key.clone(), destination.clone()) {
            if previous != destination {
                warn!(
                    source = %key.source,
                    old = %previous,
                    new = %destination,
                    "copy ledger entry overwritten"
                );
            }
        }
    }

    /// Copy `source_uri` from one store to another, deriving the destination
    /// identifier from the addressing scheme of `to_spec`.
    ///
    /// A ledger hit returns the previously resolved destination without
    /// touching either store. On a miss the destination object is
    /// materialized and recorded atomically with respect to concurrent
    /// copies of the same source, then its properties are copied.
    pub fn copy(
        &self,
        to: &dyn ModelStore,
        from: &dyn ModelStore,
        source_uri: &ObjectUri,
        type_name: &str,
        to_spec: SpecVersion,
        to_namespace: Option<&str>,
    ) -> CopyResult<TypedRef> {
        let key = LedgerKey {
            from: from.store_id(),
            to: to.store_id(),
            source: source_uri.clone(),
        };
        let to_uri = match self.ledger.entry(key) {
            Entry::Occupied(entry) => {
                return Ok(TypedRef::new(entry.get().clone(), type_name, to_spec));
            }
            Entry::Vacant(entry) => {
                let to_uri = if to_spec.uses_legacy_addressing() {
                    self.derive_legacy(to, source_uri, type_name, to_namespace)?
                } else {
                    self.derive_current(to, source_uri, to_namespace)?
                };
                if !to.exists(&to_uri)? {
                    to.create(&TypedRef::new(to_uri.clone(), type_name, to_spec))?;
                }
                entry.insert(to_uri.clone());
                to_uri
            }
        };
        debug!(source = %source_uri, destination = %to_uri, "copying object");
        self.copy_properties(to, &to_uri, from, source_uri, to_spec, to_namespace)?;
        Ok(TypedRef::new(to_uri, type_name, to_spec))
    }

    /// Copy `from_uri` to an explicit destination URI.
    ///
    /// Copying an object onto itself (same store, same URI) is a no-op.
    /// Otherwise the destination is created if absent, the relation is
    /// recorded, and properties are copied.
    pub fn copy_to(
        &self,
        to: &dyn ModelStore,
        to_uri: &ObjectUri,
        from: &dyn ModelStore,
        from_uri: &ObjectUri,
        type_name: &str,
        to_spec: SpecVersion,
        to_namespace: Option<&str>,
    ) -> CopyResult<()> {
        if to.store_id() == from.store_id() && to_uri == from_uri {
            return Ok(());
        }
        if !to.exists(to_uri)? {
            to.create(&TypedRef::new(to_uri.clone(), type_name, to_spec))?;
        }
        self.record_copy(
            from.store_id(),
            to.store_id(),
            from_uri.clone(),
            to_uri.clone(),
        );
        self.copy_properties(to, to_uri, from, from_uri, to_spec, to_namespace)
    }

    // -----------------------------------------------------------------------
    // Destination identifier derivation
    // -----------------------------------------------------------------------

    /// Current addressing scheme: keep the source URI whenever the
    /// destination can accept it, mint a fresh id only on collision outside
    /// the destination namespace.
    fn derive_current(
        &self,
        to: &dyn ModelStore,
        source_uri: &ObjectUri,
        to_namespace: Option<&str>,
    ) -> CopyResult<ObjectUri> {
        match to.id_kind(source_uri) {
            IdKind::Anonymous => Ok(self.fresh_anonymous(to)?),
            IdKind::ListedLicense => Ok(source_uri.clone()),
            kind => {
                if !to.exists(source_uri)? {
                    return Ok(source_uri.clone());
                }
                match to_namespace {
                    Some(ns) if !source_uri.in_namespace(ns) => match kind {
                        IdKind::LicenseRef | IdKind::DocumentRef | IdKind::ElementId => {
                            self.mint_namespaced(to, kind, ns)
                        }
                        _ => Ok(self.fresh_anonymous(to)?),
                    },
                    _ => {
                        warn!(
                            uri = %source_uri,
                            "destination object already exists, its properties will be overwritten"
                        );
                        Ok(source_uri.clone())
                    }
                }
            }
        }
    }

    /// Legacy addressing scheme: identifiers are document-scoped, so every
    /// non-anonymous reference is rehomed under the destination namespace.
    /// The source's local fragment is kept when it is free and of the right
    /// kind; otherwise a fresh id of that kind is minted.
    fn derive_legacy(
        &self,
        to: &dyn ModelStore,
        source_uri: &ObjectUri,
        type_name: &str,
        to_namespace: Option<&str>,
    ) -> CopyResult<ObjectUri> {
        let external_ref = type_name == vocab::EXTERNAL_DOCUMENT_REF_TYPE;
        let kind = to.id_kind(source_uri);
        let wanted = match kind {
            IdKind::Anonymous => return Ok(self.fresh_anonymous(to)?),
            IdKind::ListedLicense => return Ok(source_uri.clone()),
            _ if external_ref => IdKind::DocumentRef,
            IdKind::LicenseRef | IdKind::DocumentRef | IdKind::ElementId => kind,
            IdKind::Literal | IdKind::Unknown => return Ok(self.fresh_anonymous(to)?),
        };
        let ns = to_namespace.ok_or_else(|| CopyError::NamespaceRequired(source_uri.clone()))?;
        if let Some((_, local)) = source_uri.split_fragment() {
            let candidate = ObjectUri::namespaced(ns, local)?;
            if IdKind::of(candidate.as_str()) == wanted && !to.exists(&candidate)? {
                return Ok(candidate);
            }
        }
        self.mint_namespaced(to, wanted, ns)
    }

    fn fresh_anonymous(&self, to: &dyn ModelStore) -> CopyResult<ObjectUri> {
        Ok(ObjectUri::new(to.next_id(IdKind::Anonymous, None)?))
    }

    fn mint_namespaced(
        &self,
        to: &dyn ModelStore,
        kind: IdKind,
        namespace: &str,
    ) -> CopyResult<ObjectUri> {
        let local = to.next_id(kind, Some(namespace))?;
        Ok(ObjectUri::namespaced(namespace, &local)?)
    }

    // -----------------------------------------------------------------------
    // Property copy
    // -----------------------------------------------------------------------

    /// Copy every property of `from_uri` onto `to_uri`.
    ///
    /// The source is snapshotted under a read critical section, released
    /// before any destination write. References into the same store are
    /// copied as-is; references across stores are copied recursively.
    fn copy_properties(
        &self,
        to: &dyn ModelStore,
        to_uri: &ObjectUri,
        from: &dyn ModelStore,
        from_uri: &ObjectUri,
        to_spec: SpecVersion,
        to_namespace: Option<&str>,
    ) -> CopyResult<()> {
        enum Slot {
            Scalar(StoredValue),
            Collection(Vec<StoredValue>),
        }

        let snapshot = {
            let _section = from.enter_critical_section(true)?;
            let mut slots = Vec::new();
            for descriptor in from.property_descriptors(from_uri)? {
                if from.is_collection_property(from_uri, &descriptor)? {
                    let values = from.list_values(from_uri, &descriptor)?;
                    slots.push((descriptor, Slot::Collection(values)));
                } else if let Some(value) = from.get_value(from_uri, &descriptor)? {
                    slots.push((descriptor, Slot::Scalar(value)));
                }
            }
            slots
        };

        for (descriptor, slot) in snapshot {
            match slot {
                Slot::Scalar(value) => {
                    let value = self.copy_value(to, from, value, to_spec, to_namespace)?;
                    to.set_value(to_uri, &descriptor, value)?;
                }
                Slot::Collection(values) => {
                    for value in values {
                        let value = self.copy_value(to, from, value, to_spec, to_namespace)?;
                        to.add_to_collection(to_uri, &descriptor, value)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Translate one stored value for the destination store.
    fn copy_value(
        &self,
        to: &dyn ModelStore,
        from: &dyn ModelStore,
        value: StoredValue,
        to_spec: SpecVersion,
        to_namespace: Option<&str>,
    ) -> CopyResult<StoredValue> {
        match value {
            StoredValue::Ref(reference) if to.store_id() != from.store_id() => {
                let copied = self.copy(
                    to,
                    from,
                    &reference.uri,
                    &reference.type_name,
                    to_spec,
                    to_namespace,
                )?;
                Ok(StoredValue::Ref(copied))
            }
            other => Ok(other),
        }
    }
}

impl std::fmt::Debug for CopyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyManager")
            .field("ledger_len", &self.ledger.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadoc_store::InMemoryModelStore;
    use metadoc_types::PropertyDescriptor;

    const NS1: &str = "https://ex.org/doc-one#";
    const NS2: &str = "https://ex.org/doc-two#";

    fn uri(namespace: &str, local: &str) -> ObjectUri {
        ObjectUri::namespaced(namespace, local).unwrap()
    }

    fn prop(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::new(name)
    }

    fn make_object(store: &InMemoryModelStore, u: &ObjectUri, type_name: &str) {
        store
            .create(&TypedRef::new(u.clone(), type_name, SpecVersion::Current))
            .unwrap();
    }

    // -----------------------------------------------------------------------
    // Ledger
    // -----------------------------------------------------------------------

    #[test]
    fn record_and_lookup() {
        let manager = CopyManager::new();
        let from = StoreId::next();
        let to = StoreId::next();
        let src = uri(NS1, "SPDXRef-a");
        let dst = uri(NS2, "SPDXRef-a");
        manager.record_copy(from, to, src.clone(), dst.clone());
        assert_eq!(manager.copied_object_uri(from, to, &src), Some(dst));
        // The relation is directional.
        assert_eq!(manager.copied_object_uri(to, from, &src), None);
    }

    #[test]
    fn record_overwrites_last_writer_wins() {
        let manager = CopyManager::new();
        let from = StoreId::next();
        let to = StoreId::next();
        let src = uri(NS1, "SPDXRef-a");
        manager.record_copy(from, to, src.clone(), uri(NS2, "SPDXRef-old"));
        manager.record_copy(from, to, src.clone(), uri(NS2, "SPDXRef-new"));
        assert_eq!(
            manager.copied_object_uri(from, to, &src),
            Some(uri(NS2, "SPDXRef-new"))
        );
        assert_eq!(manager.ledger_len(), 1);
    }

    // -----------------------------------------------------------------------
    // Deriving copy, current scheme
    // -----------------------------------------------------------------------

    #[test]
    fn copy_reuses_free_source_uri() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");
        from.set_value(&src, &prop("name"), "widget".into()).unwrap();

        let copied = manager
            .copy(&to, &from, &src, "Package", SpecVersion::Current, Some(NS2))
            .unwrap();
        assert_eq!(copied.uri, src);
        assert_eq!(to.type_of(&src).unwrap().as_deref(), Some("Package"));
        assert_eq!(
            to.get_value(&src, &prop("name")).unwrap(),
            Some(StoredValue::Str("widget".into()))
        );
    }

    #[test]
    fn copy_is_idempotent() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");

        let first = manager
            .copy(&to, &from, &src, "Package", SpecVersion::Current, Some(NS2))
            .unwrap();
        let second = manager
            .copy(&to, &from, &src, "Package", SpecVersion::Current, Some(NS2))
            .unwrap();
        assert_eq!(first.uri, second.uri);
        assert_eq!(manager.ledger_len(), 1);
        assert_eq!(to.len(), 1);
    }

    #[test]
    fn copy_mints_new_id_on_foreign_collision() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");
        // Same URI already taken in the destination by an unrelated object.
        make_object(&to, &src, "File");

        let copied = manager
            .copy(&to, &from, &src, "Package", SpecVersion::Current, Some(NS2))
            .unwrap();
        assert_ne!(copied.uri, src);
        assert!(copied.uri.in_namespace(NS2));
        assert_eq!(copied.uri.id_kind(), IdKind::ElementId);
    }

    #[test]
    fn anonymous_ids_are_not_preserved() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = ObjectUri::new(from.next_id(IdKind::Anonymous, None).unwrap());
        make_object(&from, &src, "Checksum");

        let copied = manager
            .copy(&to, &from, &src, "Checksum", SpecVersion::Current, None)
            .unwrap();
        assert_ne!(copied.uri, src);
        assert_eq!(copied.uri.id_kind(), IdKind::Anonymous);
        assert!(to.exists(&copied.uri).unwrap());
    }

    #[test]
    fn listed_licenses_keep_their_uri() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = ObjectUri::new("https://spdx.org/licenses/Apache-2.0");
        make_object(&from, &src, "ListedLicense");

        for spec in [SpecVersion::Current, SpecVersion::Legacy] {
            let copied = manager
                .copy(&to, &from, &src, "ListedLicense", spec, None)
                .unwrap();
            assert_eq!(copied.uri, src);
        }
    }

    #[test]
    fn references_are_copied_recursively() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let pkg = uri(NS1, "SPDXRef-pkg");
        let file = uri(NS1, "SPDXRef-file");
        make_object(&from, &pkg, "Package");
        make_object(&from, &file, "File");
        from.set_value(
            &pkg,
            &prop("hasFile"),
            TypedRef::new(file.clone(), "File", SpecVersion::Current).into(),
        )
        .unwrap();

        manager
            .copy(&to, &from, &pkg, "Package", SpecVersion::Current, Some(NS2))
            .unwrap();
        assert!(to.exists(&file).unwrap());
        assert_eq!(manager.ledger_len(), 2);
    }

    #[test]
    fn reference_cycles_terminate_with_one_entry_per_object() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let a = uri(NS1, "SPDXRef-a");
        let b = uri(NS1, "SPDXRef-b");
        make_object(&from, &a, "Element");
        make_object(&from, &b, "Element");
        from.set_value(
            &a,
            &prop("related"),
            TypedRef::new(b.clone(), "Element", SpecVersion::Current).into(),
        )
        .unwrap();
        from.set_value(
            &b,
            &prop("related"),
            TypedRef::new(a.clone(), "Element", SpecVersion::Current).into(),
        )
        .unwrap();

        manager
            .copy(&to, &from, &a, "Element", SpecVersion::Current, Some(NS2))
            .unwrap();
        assert_eq!(manager.ledger_len(), 2);
        assert_eq!(to.len(), 2);
        // The copied cycle points back at the copied objects, not the source.
        match to.get_value(&a, &prop("related")).unwrap() {
            Some(StoredValue::Ref(r)) => assert_eq!(r.uri, b),
            other => panic!("expected reference, got {other:?}"),
        }
    }

    #[test]
    fn same_store_references_copy_as_is() {
        let manager = CopyManager::new();
        let store = InMemoryModelStore::new();
        let pkg = uri(NS1, "SPDXRef-pkg");
        let file = uri(NS1, "SPDXRef-file");
        make_object(&store, &pkg, "Package");
        make_object(&store, &file, "File");
        store
            .set_value(
                &pkg,
                &prop("hasFile"),
                TypedRef::new(file.clone(), "File", SpecVersion::Current).into(),
            )
            .unwrap();

        let dst = uri(NS1, "SPDXRef-copy");
        manager
            .copy_to(
                &store,
                &dst,
                &store,
                &pkg,
                "Package",
                SpecVersion::Current,
                Some(NS1),
            )
            .unwrap();
        match store.get_value(&dst, &prop("hasFile")).unwrap() {
            Some(StoredValue::Ref(r)) => assert_eq!(r.uri, file),
            other => panic!("expected reference, got {other:?}"),
        }
        // Only the explicit copy is in the ledger.
        assert_eq!(manager.ledger_len(), 1);
    }

    // -----------------------------------------------------------------------
    // Explicit-destination copy
    // -----------------------------------------------------------------------

    #[test]
    fn self_copy_is_a_no_op() {
        let manager = CopyManager::new();
        let store = InMemoryModelStore::new();
        let u = uri(NS1, "SPDXRef-pkg");
        make_object(&store, &u, "Package");
        store.set_value(&u, &prop("name"), "widget".into()).unwrap();

        manager
            .copy_to(
                &store,
                &u,
                &store,
                &u,
                "Package",
                SpecVersion::Current,
                Some(NS1),
            )
            .unwrap();
        assert_eq!(manager.ledger_len(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn copy_to_collections_preserve_order() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");
        let p = prop("attributions");
        for text in ["first", "second", "third"] {
            from.add_to_collection(&src, &p, text.into()).unwrap();
        }

        let dst = uri(NS2, "SPDXRef-pkg");
        manager
            .copy_to(
                &to,
                &dst,
                &from,
                &src,
                "Package",
                SpecVersion::Current,
                Some(NS2),
            )
            .unwrap();
        assert_eq!(
            to.list_values(&dst, &p).unwrap(),
            vec![
                StoredValue::Str("first".into()),
                StoredValue::Str("second".into()),
                StoredValue::Str("third".into())
            ]
        );
    }

    // -----------------------------------------------------------------------
    // Legacy addressing scheme
    // -----------------------------------------------------------------------

    #[test]
    fn legacy_requires_destination_namespace() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");

        let err = manager.copy(&to, &from, &src, "Package", SpecVersion::Legacy, None);
        assert!(matches!(err, Err(CopyError::NamespaceRequired(_))));
    }

    #[test]
    fn legacy_keeps_local_fragment_when_free() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");

        let copied = manager
            .copy(&to, &from, &src, "Package", SpecVersion::Legacy, Some(NS2))
            .unwrap();
        assert_eq!(copied.uri, uri(NS2, "SPDXRef-pkg"));
    }

    #[test]
    fn legacy_mints_fresh_id_when_fragment_taken() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "SPDXRef-pkg");
        make_object(&from, &src, "Package");
        make_object(&to, &uri(NS2, "SPDXRef-pkg"), "File");

        let copied = manager
            .copy(&to, &from, &src, "Package", SpecVersion::Legacy, Some(NS2))
            .unwrap();
        assert_ne!(copied.uri, uri(NS2, "SPDXRef-pkg"));
        assert!(copied.uri.in_namespace(NS2));
        assert_eq!(copied.uri.id_kind(), IdKind::ElementId);
    }

    #[test]
    fn legacy_external_document_refs_become_document_refs() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "other-document");
        make_object(&from, &src, vocab::EXTERNAL_DOCUMENT_REF_TYPE);

        let copied = manager
            .copy(
                &to,
                &from,
                &src,
                vocab::EXTERNAL_DOCUMENT_REF_TYPE,
                SpecVersion::Legacy,
                Some(NS2),
            )
            .unwrap();
        assert!(copied.uri.in_namespace(NS2));
        assert_eq!(copied.uri.id_kind(), IdKind::DocumentRef);
    }

    #[test]
    fn legacy_unclassified_ids_go_anonymous() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();
        let src = uri(NS1, "something-odd");
        make_object(&from, &src, "Annotation");

        let copied = manager
            .copy(&to, &from, &src, "Annotation", SpecVersion::Legacy, Some(NS2))
            .unwrap();
        assert_eq!(copied.uri.id_kind(), IdKind::Anonymous);
    }

    // -----------------------------------------------------------------------
    // End-to-end scenario
    // -----------------------------------------------------------------------

    #[test]
    fn package_with_license_and_checksums_copies_completely() {
        let manager = CopyManager::new();
        let from = InMemoryModelStore::new();
        let to = InMemoryModelStore::new();

        let pkg = uri(NS1, "SPDXRef-pkg");
        let license = uri(NS1, "LicenseRef-custom");
        make_object(&from, &pkg, "Package");
        make_object(&from, &license, "License");
        from.set_value(
            &pkg,
            &prop("licenseConcluded"),
            TypedRef::new(license.clone(), "License", SpecVersion::Legacy).into(),
        )
        .unwrap();
        for algo in ["SHA1", "SHA256"] {
            let checksum = ObjectUri::new(from.next_id(IdKind::Anonymous, None).unwrap());
            make_object(&from, &checksum, "Checksum");
            from.set_value(&checksum, &prop("algorithm"), algo.into())
                .unwrap();
            from.add_to_collection(
                &pkg,
                &prop("checksums"),
                TypedRef::new(checksum, "Checksum", SpecVersion::Legacy).into(),
            )
            .unwrap();
        }

        let copied = manager
            .copy(&to, &from, &pkg, "Package", SpecVersion::Legacy, Some(NS2))
            .unwrap();

        // Package, license, and both checksums all arrive, once each.
        assert_eq!(to.len(), 4);
        assert_eq!(manager.ledger_len(), 4);
        assert_eq!(copied.uri, uri(NS2, "SPDXRef-pkg"));
        assert_eq!(to.collection_size(&copied.uri, &prop("checksums")).unwrap(), 2);
        match to.get_value(&copied.uri, &prop("licenseConcluded")).unwrap() {
            Some(StoredValue::Ref(r)) => {
                assert_eq!(r.uri, uri(NS2, "LicenseRef-custom"));
                assert!(to.exists(&r.uri).unwrap());
            }
            other => panic!("expected license reference, got {other:?}"),
        }
    }
}

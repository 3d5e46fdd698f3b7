//! Canonical name resolution.
//!
//! A [`CanonicalNameResolver`] maps handles of a fixed module set to their
//! canonical (documentation identifier) names and back. The index covering
//! every type, field, method (accessors included), property and event of the
//! modules is built on first use and then shared read-only.
//!
//! Name lookups try the exact spelling first and fall back to a
//! case-insensitive match, which returns the handle of the correctly-cased
//! indexed name. Nested generic types and their members are also found under
//! the spelling that keeps only the innermost arity (`T:N.Outer.Inner`2`).

mod name;

pub use name::{
    explicit_qualifier, innermost_arity_identifier, is_open_definition, member_name,
    type_identifier, type_name, validate, NamePrefix,
};

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{MetadocError, MetadocResult};
use crate::metadata::{Handle, Metadata, ModuleId, TypeDefId, TypeSig};
use crate::reference::{ReferenceData, ReferenceFactory, TypeReference};

#[derive(Debug, Default)]
struct NameIndex {
    by_handle: HashMap<Handle, String>,
    by_name: HashMap<String, Handle>,
    by_folded_name: HashMap<String, Handle>,
}

impl NameIndex {
    fn insert(&mut self, handle: Handle, name: String) {
        self.by_folded_name
            .entry(name.to_lowercase())
            .or_insert_with(|| handle.clone());
        self.by_name
            .entry(name.clone())
            .or_insert_with(|| handle.clone());
        self.by_handle.insert(handle, name);
    }

    /// Make `alias` find `handle` without changing the name it reports.
    fn insert_alias(&mut self, handle: &Handle, alias: String) {
        self.by_folded_name
            .entry(alias.to_lowercase())
            .or_insert_with(|| handle.clone());
        self.by_name.entry(alias).or_insert_with(|| handle.clone());
    }
}

/// Bidirectional index between handles and canonical names.
#[derive(Debug)]
pub struct CanonicalNameResolver<'m> {
    factory: ReferenceFactory<'m>,
    modules: Vec<ModuleId>,
    index: OnceLock<NameIndex>,
}

impl<'m> CanonicalNameResolver<'m> {
    /// Create a resolver searching `modules`.
    ///
    /// Fails with `InvalidArgument` if the set is empty or contains a module
    /// the store did not issue.
    pub fn new(metadata: &'m Metadata, modules: &[ModuleId]) -> MetadocResult<Self> {
        if modules.is_empty() {
            return Err(MetadocError::invalid_argument(
                "modules",
                "at least one module is required",
            ));
        }
        let mut unique = Vec::with_capacity(modules.len());
        for module in modules {
            if metadata.module(*module).is_none() {
                return Err(MetadocError::invalid_argument(
                    "modules",
                    format!("{module} is not part of this metadata store"),
                ));
            }
            if !unique.contains(module) {
                unique.push(*module);
            }
        }
        Ok(CanonicalNameResolver {
            factory: ReferenceFactory::new(metadata),
            modules: unique,
            index: OnceLock::new(),
        })
    }

    /// A resolver over every module of the store.
    pub fn for_all_modules(metadata: &'m Metadata) -> MetadocResult<Self> {
        let modules: Vec<ModuleId> = metadata.modules().map(|m| m.id).collect();
        CanonicalNameResolver::new(metadata, &modules)
    }

    pub fn factory(&self) -> &ReferenceFactory<'m> {
        &self.factory
    }

    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// The canonical name of `handle`.
    ///
    /// Handles outside the indexed modules (constructed types, members of
    /// referenced modules) get a freshly composed name. Module handles have
    /// no canonical name and are rejected.
    pub fn canonical_name(&self, handle: &Handle) -> MetadocResult<String> {
        if let Some(name) = self.index().by_handle.get(handle) {
            return Ok(name.clone());
        }
        self.compose(handle)
    }

    /// The canonical name of a type mention.
    pub fn canonical_type_name(&self, sig: &TypeSig) -> MetadocResult<String> {
        self.canonical_name(&Handle::Type(sig.clone()))
    }

    /// Find the handle named by `name`.
    ///
    /// Fails if the name is blank or malformed; returns `None` if no
    /// indexed entity has that name.
    pub fn try_find_handle(&self, name: &str) -> MetadocResult<Option<Handle>> {
        validate(name)?;
        let index = self.index();
        if let Some(handle) = index.by_name.get(name) {
            return Ok(Some(handle.clone()));
        }
        Ok(index.by_folded_name.get(&name.to_lowercase()).cloned())
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.index().by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every indexed handle with its name, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&Handle, &str)> {
        self.index()
            .by_handle
            .iter()
            .map(|(handle, name)| (handle, name.as_str()))
    }

    fn compose(&self, handle: &Handle) -> MetadocResult<String> {
        match self.factory.create(handle)? {
            ReferenceData::Type(reference) => Ok(type_name(&reference)),
            ReferenceData::Member(reference) => Ok(member_name(&reference)),
            ReferenceData::Module(_) | ReferenceData::Namespace(_) => {
                Err(MetadocError::invalid_argument(
                    "handle",
                    "modules and namespaces have no canonical name",
                ))
            }
        }
    }

    fn index(&self) -> &NameIndex {
        self.index.get_or_init(|| {
            let index = self.build_index();
            debug!(
                modules = self.modules.len(),
                names = index.by_handle.len(),
                aliases = index.by_name.len().saturating_sub(index.by_handle.len()),
                "built canonical name index"
            );
            index
        })
    }

    fn build_index(&self) -> NameIndex {
        let metadata = self.factory.metadata();
        let mut index = NameIndex::default();
        let mut aliases = Vec::new();
        let mut pending: Vec<TypeDefId> = self
            .modules
            .iter()
            .filter_map(|id| metadata.module(*id))
            .flat_map(|module| module.types.iter().copied())
            .collect();

        while let Some(type_id) = pending.pop() {
            let Some(def) = metadata.type_def(type_id) else {
                continue;
            };
            let members = std::iter::once(Handle::from(type_id))
                .chain(def.fields.iter().map(|id| Handle::Field(*id)))
                .chain(def.methods.iter().map(|id| Handle::Method(*id)))
                .chain(def.properties.iter().map(|id| Handle::Property(*id)))
                .chain(def.events.iter().map(|id| Handle::Event(*id)));
            for handle in members {
                // Signatures with a wrong generic argument count cannot be named.
                match self.compose(&handle) {
                    Ok(name) => {
                        if let Some(alias) = self.innermost_arity_alias(&handle, &name) {
                            aliases.push((handle.clone(), alias));
                        }
                        index.insert(handle, name);
                    }
                    Err(err) => debug!(?handle, %err, "skipped unnameable entity"),
                }
            }
            pending.extend(def.nested_types.iter().copied());
        }
        // Canonical names take precedence over aliases.
        for (handle, alias) in aliases {
            index.insert_alias(&handle, alias);
        }
        index
    }

    /// `name` respelled with only the innermost arity of its declaring type,
    /// when that type is nested inside a generic type.
    fn innermost_arity_alias(&self, handle: &Handle, name: &str) -> Option<String> {
        let declaring = match self.factory.create(handle).ok()? {
            ReferenceData::Type(TypeReference::Named(named)) => named,
            ReferenceData::Member(member) => member.declaring_type().clone(),
            _ => return None,
        };
        declaring.declaring_type.as_ref()?;
        let full = type_identifier(&declaring);
        let short = innermost_arity_identifier(&declaring);
        if full == short {
            return None;
        }
        let (prefix, identifier) = name.split_at_checked(2)?;
        let rest = identifier.strip_prefix(full.as_str())?;
        Some(format!("{prefix}{short}{rest}"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Sample;

    mod construction_tests {
        use super::*;

        #[test]
        fn empty_module_set_is_rejected() {
            let sample = Sample::new();
            let err = CanonicalNameResolver::new(&sample.metadata, &[]).unwrap_err();
            assert!(matches!(
                err,
                MetadocError::InvalidArgument { ref parameter, .. } if parameter == "modules"
            ));
        }

        #[test]
        fn absent_module_is_rejected() {
            let sample = Sample::new();
            let result = CanonicalNameResolver::new(
                &sample.metadata,
                &[sample.module, ModuleId::new(99)],
            );
            assert!(result.is_err());
        }

        #[test]
        fn duplicate_modules_are_collapsed() {
            let sample = Sample::new();
            let resolver =
                CanonicalNameResolver::new(&sample.metadata, &[sample.module, sample.module])
                    .unwrap();
            assert_eq!(resolver.modules(), &[sample.module]);
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn index_covers_accessors() {
            let sample = Sample::new();
            let resolver = sample.resolver();
            let getter = sample
                .metadata
                .property(sample.test_class_indexer)
                .and_then(|p| p.getter)
                .unwrap();

            assert_eq!(
                resolver.canonical_name(&Handle::Method(getter)).unwrap(),
                "M:N.TestClass`1.get_Item(System.Int32,System.String)"
            );
        }

        #[test]
        fn module_handle_has_no_name() {
            let sample = Sample::new();
            let resolver = sample.resolver();
            assert!(resolver
                .canonical_name(&Handle::Module(sample.module))
                .is_err());
        }

        #[test]
        fn nested_generic_members_resolve_under_innermost_arity() {
            let sample = Sample::new();
            let resolver = sample.resolver();
            let inner = Handle::from(sample.inner);

            assert_eq!(
                resolver.try_find_handle("T:N.Outer.Inner`2").unwrap(),
                Some(inner.clone())
            );
            assert_eq!(resolver.canonical_name(&inner).unwrap(), "T:N.Outer`1.Inner`2");
            assert_eq!(
                resolver
                    .try_find_handle(
                        "M:N.Outer.Inner`2.TestMethod``1(System.Int32,System.Byte[],\
                         N.Outer{`0}.Inner{System.Byte[],\
                         System.Collections.Generic.IEnumerable{System.String}},``0)"
                    )
                    .unwrap(),
                Some(Handle::Method(sample.inner_test_method))
            );
        }

        #[test]
        fn unknown_name_is_none() {
            let sample = Sample::new();
            let resolver = sample.resolver();
            assert_eq!(resolver.try_find_handle("T:N.DoesNotExist").unwrap(), None);
        }

        #[test]
        fn corlib_types_fall_back_to_composition() {
            let sample = Sample::new();
            let resolver = sample.resolver();

            assert_eq!(
                resolver
                    .canonical_type_name(&TypeSig::named(sample.corlib.int32))
                    .unwrap(),
                "T:System.Int32"
            );
            assert_eq!(
                resolver
                    .canonical_type_name(&TypeSig::array(TypeSig::named(sample.corlib.byte)))
                    .unwrap(),
                "T:System.Byte[]"
            );
        }
    }
}

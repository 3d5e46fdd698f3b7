//! Declaration-graph builder.
//!
//! Walks one module of a [`Metadata`] store and produces a
//! [`DeclarationGraph`]: the assembly, its namespaces, every kept type (nested
//! types included) and every declared member, with access modifiers, dispatch
//! flags, shadowing, generic parameters, attributes and resolved interface
//! implementations.
//!
//! Building is all-or-nothing. A shape the builder cannot classify (an
//! interface with a base type, an enum without a `value__` field, a delegate
//! without `Invoke`, an accessor-less property) fails the whole call with
//! [`MetadocError::Unclassifiable`]; no partial graph is returned.
//!
//! Documentation starts out empty on every node. [`attach_documentation`]
//! seeds it from a [`DocumentationSource`], and [`crate::apply`] merges
//! additions on top.

mod inheritance;
mod members;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::canonical::CanonicalNameResolver;
use crate::config::GraphConfig;
use crate::declarations::{
    AssemblyDeclaration, ClassData, DeclarationGraph, DelegateData, EnumData, InterfaceData,
    MemberCollections, MemberDeclId, NamespaceDeclId, NamespaceDeclaration, NamespaceKind, NodeId,
    StructData, TypeCollections, TypeDeclId, TypeDeclaration, TypeKind, TypeKindTag,
};
use crate::docs::DocumentationSource;
use crate::error::{MetadocError, MetadocResult};
use crate::metadata::{
    Accessibility, Handle, Metadata, MethodDef, ModuleDef, ModuleId, TypeDef, TypeDefId,
};
use crate::reference::ReferenceFactory;

/// Name of the field holding an enum's underlying value.
const ENUM_VALUE_FIELD: &str = "value__";
/// Name of a delegate's signature method.
const DELEGATE_INVOKE: &str = "Invoke";

/// Builds declaration graphs from a metadata store.
#[derive(Debug)]
pub struct DeclarationGraphBuilder<'m> {
    resolver: CanonicalNameResolver<'m>,
    config: GraphConfig,
}

impl<'m> DeclarationGraphBuilder<'m> {
    /// A builder naming entities against every module of `metadata`.
    pub fn new(metadata: &'m Metadata) -> MetadocResult<Self> {
        Ok(DeclarationGraphBuilder::with_resolver(
            CanonicalNameResolver::for_all_modules(metadata)?,
        ))
    }

    /// A builder using an existing resolver (and its module set).
    pub fn with_resolver(resolver: CanonicalNameResolver<'m>) -> Self {
        DeclarationGraphBuilder {
            resolver,
            config: GraphConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn resolver(&self) -> &CanonicalNameResolver<'m> {
        &self.resolver
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ========================================================================
    // Entry Points
    // ========================================================================

    /// Build the graph of `module`.
    pub fn build(&self, module: ModuleId) -> MetadocResult<DeclarationGraph> {
        let module_def = self.metadata().module(module).ok_or_else(|| {
            MetadocError::invalid_argument(
                "module",
                format!("{module} is not part of this metadata store"),
            )
        })?;
        let mut graph = DeclarationGraph::new(self.assembly_declaration(module_def)?);
        let mut namespaces: HashMap<String, NamespaceDeclId> = HashMap::new();

        for type_id in &module_def.types {
            let def = self.type_def(*type_id)?;
            if !self.keeps_type(def) {
                trace!(type_name = %def.name, "skipped type");
                continue;
            }
            let namespace = match namespaces.get(&def.namespace) {
                Some(id) => *id,
                None => {
                    let id = self.add_namespace(&mut graph, module, &def.namespace)?;
                    namespaces.insert(def.namespace.clone(), id);
                    id
                }
            };
            self.build_type_into(&mut graph, *type_id, namespace, None)?;
        }

        debug!(
            module = %module_def.name,
            namespaces = namespaces.len(),
            nodes = graph.node_count(),
            "built declaration graph"
        );
        Ok(graph)
    }

    /// Build the graph of a single type (and its nested types).
    ///
    /// The graph holds the type's assembly and namespace so back-references
    /// resolve; the namespace lists only this type.
    pub fn build_type(&self, type_id: TypeDefId) -> MetadocResult<(DeclarationGraph, TypeDeclId)> {
        let def = self.metadata().type_def(type_id).ok_or_else(|| {
            MetadocError::invalid_argument(
                "type",
                format!("{type_id} is not part of this metadata store"),
            )
        })?;
        let module_def = self.module_def(def.module)?;
        let mut graph = DeclarationGraph::new(self.assembly_declaration(module_def)?);
        let namespace = self.add_namespace(&mut graph, def.module, &def.namespace)?;
        let id = self.build_type_into(&mut graph, type_id, namespace, None)?;
        Ok((graph, id))
    }

    /// Build the graph of `module` and seed its documentation from `source`.
    pub fn build_with_documentation(
        &self,
        module: ModuleId,
        source: &dyn DocumentationSource,
    ) -> MetadocResult<DeclarationGraph> {
        let mut graph = self.build(module)?;
        attach_documentation(&mut graph, source);
        Ok(graph)
    }

    // ========================================================================
    // Assembly and Namespaces
    // ========================================================================

    fn assembly_declaration(&self, module: &ModuleDef) -> MetadocResult<AssemblyDeclaration> {
        let dependencies = module
            .references
            .iter()
            .map(|id| self.factory().module_reference(*id))
            .collect::<MetadocResult<Vec<_>>>()?;
        Ok(AssemblyDeclaration {
            name: module.name.clone(),
            version: module.version.clone(),
            culture: module.culture.clone(),
            public_key_token: module.public_key_token.clone(),
            attributes: self.attributes(&module.attributes)?,
            dependencies,
            namespaces: Vec::new(),
            reference: self.factory().module_reference(module.id)?,
        })
    }

    fn add_namespace(
        &self,
        graph: &mut DeclarationGraph,
        module: ModuleId,
        name: &str,
    ) -> MetadocResult<NamespaceDeclId> {
        let kind = if name.is_empty() {
            NamespaceKind::Global
        } else {
            NamespaceKind::Named(name.to_string())
        };
        let id = graph.next_namespace_id();
        graph.insert_namespace(NamespaceDeclaration {
            id,
            kind,
            reference: self.factory().namespace_reference(module, name)?,
            types: TypeCollections::default(),
        });
        debug!(namespace = %name, %id, "added namespace");
        Ok(id)
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn build_type_into(
        &self,
        graph: &mut DeclarationGraph,
        type_id: TypeDefId,
        namespace: NamespaceDeclId,
        declaring: Option<TypeDeclId>,
    ) -> MetadocResult<TypeDeclId> {
        let def = self.type_def(type_id)?;
        let tag = self.classify(def)?;
        let id = graph.next_type_id();

        let declaration = TypeDeclaration {
            id,
            name: def.name.clone(),
            namespace,
            declaring_type: declaring,
            access: def.access.into(),
            attributes: self.attributes(&def.attributes)?,
            generic_parameters: self.generic_parameters(&def.generic_params)?,
            canonical_name: self.resolver.canonical_name(&Handle::from(type_id))?,
            reference: self.factory().named_reference(type_id)?,
            kind: self.type_kind(def, tag)?,
        };
        graph.insert_type(declaration);

        let owner = match declaring {
            Some(outer) => graph.type_mut(outer).and_then(|t| t.nested_mut()),
            None => graph.namespace_mut(namespace).map(|ns| &mut ns.types),
        };
        if let Some(collections) = owner {
            collections.push(tag, id);
        }

        match tag {
            TypeKindTag::Enum => self.add_enum_constants(graph, id, def)?,
            TypeKindTag::Delegate => {}
            TypeKindTag::Interface => {
                self.add_members(graph, id, def)?;
            }
            TypeKindTag::Class | TypeKindTag::Struct => {
                let declared = self.add_members(graph, id, def)?;
                let implementations = self.interface_implementations(def, &declared)?;
                if let Some(declaration) = graph.type_mut(id) {
                    declaration.set_interface_implementations(implementations);
                }
            }
        }

        for nested in &def.nested_types {
            let nested_def = self.type_def(*nested)?;
            if !self.keeps_type(nested_def) {
                trace!(type_name = %nested_def.name, "skipped nested type");
                continue;
            }
            self.build_type_into(graph, *nested, namespace, Some(id))?;
        }

        debug!(
            type_name = %self.metadata().full_name(type_id),
            kind = %tag,
            %id,
            "built type"
        );
        Ok(id)
    }

    /// Determine the kind of a type from its shape.
    fn classify(&self, def: &TypeDef) -> MetadocResult<TypeKindTag> {
        let metadata = self.metadata();
        if def.is_interface {
            if def.base_type.is_some() {
                return Err(self.unclassifiable(def, "interface has a base type"));
            }
            return Ok(TypeKindTag::Interface);
        }
        let Some(base) = &def.base_type else {
            return Ok(TypeKindTag::Class);
        };

        if metadata.is_sig_named(base, "System", "Enum") {
            if !def
                .fields
                .iter()
                .filter_map(|id| metadata.field(*id))
                .any(|f| f.name == ENUM_VALUE_FIELD && !f.is_static)
            {
                return Err(self.unclassifiable(def, "enum has no value__ field"));
            }
            return Ok(TypeKindTag::Enum);
        }
        if metadata.is_sig_named(base, "System", "ValueType")
            && !metadata.is_type_named(def.id, "System", "Enum")
        {
            return Ok(TypeKindTag::Struct);
        }
        if metadata.is_sig_named(base, "System", "MulticastDelegate") {
            if self.delegate_invoke(def).is_none() {
                return Err(self.unclassifiable(def, "delegate has no Invoke method"));
            }
            return Ok(TypeKindTag::Delegate);
        }
        Ok(TypeKindTag::Class)
    }

    /// The payload of a type declaration, with empty member collections.
    fn type_kind(&self, def: &TypeDef, tag: TypeKindTag) -> MetadocResult<TypeKind> {
        let factory = self.factory();
        let interfaces = def
            .interfaces
            .iter()
            .map(|sig| factory.type_reference(sig))
            .collect::<MetadocResult<Vec<_>>>()?;

        Ok(match tag {
            TypeKindTag::Enum => {
                let value_field = def
                    .fields
                    .iter()
                    .filter_map(|id| self.metadata().field(*id))
                    .find(|f| f.name == ENUM_VALUE_FIELD)
                    .ok_or_else(|| self.unclassifiable(def, "enum has no value__ field"))?;
                TypeKind::Enum(EnumData {
                    underlying_type: factory.type_reference(&value_field.field_type)?,
                    constants: Vec::new(),
                })
            }
            TypeKindTag::Delegate => {
                let invoke = self
                    .delegate_invoke(def)
                    .ok_or_else(|| self.unclassifiable(def, "delegate has no Invoke method"))?;
                TypeKind::Delegate(DelegateData {
                    parameters: self.parameters(&invoke.parameters)?,
                    return_data: self.return_data(invoke)?,
                })
            }
            TypeKindTag::Interface => TypeKind::Interface(InterfaceData {
                base_interfaces: interfaces,
                members: MemberCollections::default(),
                nested: TypeCollections::default(),
            }),
            TypeKindTag::Class => {
                let is_static = def.is_abstract && def.is_sealed;
                TypeKind::Class(ClassData {
                    base_class: def
                        .base_type
                        .as_ref()
                        .map(|sig| factory.type_reference(sig))
                        .transpose()?,
                    interfaces,
                    is_abstract: def.is_abstract && !is_static,
                    is_sealed: def.is_sealed && !is_static,
                    is_static,
                    members: MemberCollections::default(),
                    nested: TypeCollections::default(),
                    interface_implementations: Vec::new(),
                })
            }
            TypeKindTag::Struct => TypeKind::Struct(StructData {
                interfaces,
                members: MemberCollections::default(),
                nested: TypeCollections::default(),
                interface_implementations: Vec::new(),
            }),
        })
    }

    fn delegate_invoke(&self, def: &TypeDef) -> Option<&'m MethodDef> {
        def.methods
            .iter()
            .filter_map(|id| self.metadata().method(*id))
            .find(|m| m.name == DELEGATE_INVOKE && !m.is_static)
    }

    // ========================================================================
    // Filters
    // ========================================================================

    fn keeps_type(&self, def: &TypeDef) -> bool {
        if def.is_compiler_generated() && !self.config.include_compiler_generated {
            return false;
        }
        self.config.include_non_public || !is_non_public(def.access)
    }

    /// Whether a member survives the configured filters. Explicit interface
    /// implementations are always kept.
    fn keeps_member(&self, name: &str, access: Accessibility, is_explicit: bool) -> bool {
        if is_explicit {
            return true;
        }
        if name.starts_with('<') && !self.config.include_compiler_generated {
            return false;
        }
        self.config.include_non_public || !is_non_public(access)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    fn metadata(&self) -> &'m Metadata {
        self.resolver.factory().metadata()
    }

    fn factory(&self) -> &ReferenceFactory<'m> {
        self.resolver.factory()
    }

    fn module_def(&self, id: ModuleId) -> MetadocResult<&'m ModuleDef> {
        self.metadata()
            .module(id)
            .ok_or_else(|| MetadocError::invalid_argument("module", format!("{id} is absent")))
    }

    fn type_def(&self, id: TypeDefId) -> MetadocResult<&'m TypeDef> {
        self.metadata()
            .type_def(id)
            .ok_or_else(|| MetadocError::invalid_argument("type", format!("{id} is absent")))
    }

    fn unclassifiable(&self, def: &TypeDef, reason: &str) -> MetadocError {
        MetadocError::unclassifiable(self.metadata().full_name(def.id), reason)
    }
}

/// Private, internal and private-protected entities are invisible outside
/// their assembly.
fn is_non_public(access: Accessibility) -> bool {
    matches!(
        access,
        Accessibility::Private | Accessibility::Assembly | Accessibility::FamilyAndAssembly
    )
}

/// Seed the documentation of every node from `source`.
///
/// Namespaces are looked up as `N:Name`; types and members by canonical name.
/// The assembly has no canonical name and keeps its current documentation.
pub fn attach_documentation(graph: &mut DeclarationGraph, source: &dyn DocumentationSource) {
    let keys: Vec<(NodeId, String)> = graph
        .namespaces()
        .map(|ns| (NodeId::Namespace(ns.id), ns.canonical_name()))
        .chain(
            graph
                .types()
                .map(|t| (NodeId::Type(t.id), t.canonical_name.clone())),
        )
        .chain(
            graph
                .members()
                .map(|m| (NodeId::Member(m.id), m.canonical_name.clone())),
        )
        .collect();

    let mut attached = 0usize;
    for (node, key) in keys {
        if let Some(documentation) = source.try_find(&key) {
            if let Some(slot) = graph.documentation_mut(node) {
                *slot = documentation.clone();
                attached += 1;
            }
        }
    }
    debug!(attached, "attached documentation");
}

/// Member declarations created for one type, keyed by the metadata entity.
pub(crate) type DeclaredMembers = HashMap<Handle, MemberDeclId>;

#[cfg(test)]
mod tests {
    use super::*;
    use metadoc_core::fixtures::Sample;
    use crate::metadata::{FieldDef, TypeSig};

    fn builder(sample: &Sample) -> DeclarationGraphBuilder<'_> {
        DeclarationGraphBuilder::with_resolver(sample.resolver())
    }

    mod classify_tests {
        use super::*;

        #[test]
        fn sample_types_get_their_kinds() {
            let sample = Sample::new();
            let builder = builder(&sample);
            let kind = |id: TypeDefId| {
                builder
                    .classify(sample.metadata.type_def(id).unwrap())
                    .unwrap()
            };

            assert_eq!(kind(sample.test_enum), TypeKindTag::Enum);
            assert_eq!(kind(sample.test_delegate), TypeKindTag::Delegate);
            assert_eq!(kind(sample.test_interface), TypeKindTag::Interface);
            assert_eq!(kind(sample.test_class), TypeKindTag::Class);
            assert_eq!(kind(sample.test_struct), TypeKindTag::Struct);
            assert_eq!(kind(sample.global_type), TypeKindTag::Class);
        }

        #[test]
        fn enum_and_value_type_roots_are_classes() {
            let sample = Sample::new();
            let builder = builder(&sample);
            let kind = |id: TypeDefId| {
                builder
                    .classify(sample.metadata.type_def(id).unwrap())
                    .unwrap()
            };

            assert_eq!(kind(sample.corlib.enum_type), TypeKindTag::Class);
            assert_eq!(kind(sample.corlib.value_type), TypeKindTag::Class);
            assert_eq!(kind(sample.corlib.int32), TypeKindTag::Struct);
        }

        #[test]
        fn enum_without_value_field_is_unclassifiable() {
            let mut sample = Sample::new();
            let broken = sample.metadata.add_type(
                sample.module,
                TypeDef::new("N", "Broken").with_base(TypeSig::named(sample.corlib.enum_type)),
            );
            sample.metadata.add_field(
                broken,
                FieldDef::constant(
                    "A",
                    TypeSig::named(broken),
                    crate::metadata::ConstantValue::Int32(0),
                ),
            );

            let err = builder(&sample).build(sample.module).unwrap_err();
            assert!(matches!(err, MetadocError::Unclassifiable { .. }));
            assert!(err.to_string().contains("N.Broken"));
        }

        #[test]
        fn interface_with_base_is_unclassifiable() {
            let mut sample = Sample::new();
            let object = sample.corlib.object;
            sample.metadata.add_type(
                sample.module,
                TypeDef::interface("N", "IBroken").with_base(TypeSig::named(object)),
            );

            let err = builder(&sample).build(sample.module).unwrap_err();
            assert!(matches!(err, MetadocError::Unclassifiable { .. }));
        }
    }

    mod entry_tests {
        use super::*;

        #[test]
        fn absent_module_is_invalid_argument() {
            let sample = Sample::new();
            let err = builder(&sample).build(ModuleId::new(99)).unwrap_err();
            assert!(matches!(err, MetadocError::InvalidArgument { .. }));
        }

        #[test]
        fn absent_type_is_invalid_argument() {
            let sample = Sample::new();
            let err = builder(&sample).build_type(TypeDefId::new(9999)).unwrap_err();
            assert!(matches!(err, MetadocError::InvalidArgument { .. }));
        }

        #[test]
        fn build_type_places_type_in_its_namespace() {
            let sample = Sample::new();
            let (graph, id) = builder(&sample).build_type(sample.test_enum).unwrap();

            let declaration = graph.type_decl(id).unwrap();
            let namespace = graph.namespace(declaration.namespace).unwrap();
            assert_eq!(namespace.name(), "N");
            assert_eq!(namespace.declared_types(), vec![id]);
            assert_eq!(graph.assembly().name, "Sample");
        }

        #[test]
        fn global_namespace_is_distinguished() {
            let sample = Sample::new();
            let graph = builder(&sample).build(sample.module).unwrap();

            let global = graph.find_namespace("").unwrap();
            assert!(global.is_global());
            let types: Vec<&str> = global
                .declared_types()
                .iter()
                .map(|id| graph.type_decl(*id).unwrap().name.as_str())
                .collect();
            assert_eq!(types, vec!["GlobalType"]);
        }
    }
}

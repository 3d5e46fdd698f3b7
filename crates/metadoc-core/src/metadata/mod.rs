//! Metadata store: the reflection source the rest of metadoc reads.
//!
//! This module provides an in-memory, append-only model of compiled modules:
//! - [`ModuleDef`]: assembly manifests with their references
//! - [`TypeDef`]: type definitions, nested types and their members
//! - [`FieldDef`], [`MethodDef`], [`PropertyDef`], [`EventDef`]: members
//! - [`GenericParamDef`]: generic parameters of types and methods
//! - [`TypeSig`] / [`Handle`]: structural mentions of the above
//!
//! Loaders (a binary reader, a test fixture) populate a [`Metadata`] through
//! the `add_*` methods, which allocate ids and wire declaring entities. After
//! that the store is only read.
//!
//! # Ids
//!
//! Ids are dense `u32` indices into per-kind arenas. An id that was not issued
//! by a store is "absent": lookups return `None` and public entry points of the
//! reference, canonical-name and builder layers reject it with
//! [`MetadocError::InvalidArgument`](crate::error::MetadocError).

mod defs;
mod sig;

pub use defs::{
    Accessibility, EventDef, FieldDef, GenericOwner, GenericParamDef, MethodDef, ModuleDef,
    ParamDef, PropertyDef, TypeDef, CONSTRUCTOR_NAME, STATIC_CONSTRUCTOR_NAME,
};
pub use sig::{
    AttributeArgument, AttributeInfo, AttributeValue, ConstantValue, Handle,
    NamedAttributeArgument, TypeSig,
};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ============================================================================
// ID Types
// ============================================================================

macro_rules! metadata_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id.
            pub fn new(id: u32) -> Self {
                $name(id)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

metadata_id!(
    /// Unique identifier for a module within a store.
    ModuleId,
    "mod"
);
metadata_id!(
    /// Unique identifier for a type definition within a store.
    TypeDefId,
    "type"
);
metadata_id!(
    /// Unique identifier for a field within a store.
    FieldId,
    "field"
);
metadata_id!(
    /// Unique identifier for a method (including constructors and accessors).
    MethodId,
    "method"
);
metadata_id!(
    /// Unique identifier for a property within a store.
    PropertyId,
    "prop"
);
metadata_id!(
    /// Unique identifier for an event within a store.
    EventId,
    "event"
);
metadata_id!(
    /// Unique identifier for a generic parameter within a store.
    GenericParamId,
    "gparam"
);

// ============================================================================
// Store
// ============================================================================

/// In-memory metadata for a set of modules.
#[derive(Debug, Default)]
pub struct Metadata {
    modules: Vec<ModuleDef>,
    types: Vec<TypeDef>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    properties: Vec<PropertyDef>,
    events: Vec<EventDef>,
    generic_params: Vec<GenericParamDef>,
}

impl Metadata {
    /// Create an empty store.
    pub fn new() -> Self {
        Metadata::default()
    }

    // ========================================================================
    // Insert Operations
    // ========================================================================

    /// Add a module.
    pub fn add_module(&mut self, mut module: ModuleDef) -> ModuleId {
        let id = ModuleId::new(self.modules.len() as u32);
        module.id = id;
        self.modules.push(module);
        id
    }

    /// Record that `module` references `referenced`.
    ///
    /// # Panics
    ///
    /// Panics if `module` was not issued by this store.
    pub fn add_module_reference(&mut self, module: ModuleId, referenced: ModuleId) {
        self.modules[module.index()].references.push(referenced);
    }

    /// Add a top-level type to `module`.
    ///
    /// # Panics
    ///
    /// Panics if `module` was not issued by this store.
    pub fn add_type(&mut self, module: ModuleId, mut def: TypeDef) -> TypeDefId {
        let id = TypeDefId::new(self.types.len() as u32);
        def.id = id;
        def.module = module;
        def.declaring_type = None;
        self.modules[module.index()].types.push(id);
        self.types.push(def);
        id
    }

    /// Add a type nested in `declaring`. The nested type reports the
    /// declaring type's module and namespace.
    ///
    /// # Panics
    ///
    /// Panics if `declaring` was not issued by this store.
    pub fn add_nested_type(&mut self, declaring: TypeDefId, mut def: TypeDef) -> TypeDefId {
        let id = TypeDefId::new(self.types.len() as u32);
        let outer = &mut self.types[declaring.index()];
        def.id = id;
        def.module = outer.module;
        def.namespace = outer.namespace.clone();
        def.declaring_type = Some(declaring);
        outer.nested_types.push(id);
        self.types.push(def);
        id
    }

    /// Add a field to `declaring`.
    ///
    /// # Panics
    ///
    /// Panics if `declaring` was not issued by this store.
    pub fn add_field(&mut self, declaring: TypeDefId, mut def: FieldDef) -> FieldId {
        let id = FieldId::new(self.fields.len() as u32);
        def.id = id;
        def.declaring_type = declaring;
        self.types[declaring.index()].fields.push(id);
        self.fields.push(def);
        id
    }

    /// Add a method, constructor or accessor to `declaring`.
    ///
    /// # Panics
    ///
    /// Panics if `declaring` was not issued by this store.
    pub fn add_method(&mut self, declaring: TypeDefId, mut def: MethodDef) -> MethodId {
        let id = MethodId::new(self.methods.len() as u32);
        def.id = id;
        def.declaring_type = declaring;
        self.types[declaring.index()].methods.push(id);
        self.methods.push(def);
        id
    }

    /// Add a property to `declaring`. Its accessors must already be added.
    ///
    /// # Panics
    ///
    /// Panics if `declaring` was not issued by this store.
    pub fn add_property(&mut self, declaring: TypeDefId, mut def: PropertyDef) -> PropertyId {
        let id = PropertyId::new(self.properties.len() as u32);
        def.id = id;
        def.declaring_type = declaring;
        self.types[declaring.index()].properties.push(id);
        self.properties.push(def);
        id
    }

    /// Add an event to `declaring`. Its accessors must already be added.
    ///
    /// # Panics
    ///
    /// Panics if `declaring` was not issued by this store.
    pub fn add_event(&mut self, declaring: TypeDefId, mut def: EventDef) -> EventId {
        let id = EventId::new(self.events.len() as u32);
        def.id = id;
        def.declaring_type = declaring;
        self.types[declaring.index()].events.push(id);
        self.events.push(def);
        id
    }

    /// Add a generic parameter to a type or method and assign its position.
    ///
    /// Type parameters are positioned after every parameter of the declaring
    /// type chain, so outer types must receive their parameters first.
    ///
    /// # Panics
    ///
    /// Panics if the owner was not issued by this store.
    pub fn add_generic_param(
        &mut self,
        owner: GenericOwner,
        mut def: GenericParamDef,
    ) -> GenericParamId {
        let id = GenericParamId::new(self.generic_params.len() as u32);
        def.id = id;
        def.owner = owner;
        match owner {
            GenericOwner::Type(type_id) => {
                let inherited = self.types[type_id.index()]
                    .declaring_type
                    .map(|outer| self.generic_arity(outer))
                    .unwrap_or(0);
                let own = &mut self.types[type_id.index()].generic_params;
                def.position = inherited + own.len();
                own.push(id);
            }
            GenericOwner::Method(method_id) => {
                let own = &mut self.methods[method_id.index()].generic_params;
                def.position = own.len();
                own.push(id);
            }
        }
        self.generic_params.push(def);
        id
    }

    /// Add a type constraint to an existing generic parameter. Constraints may
    /// mention the parameter's owner, so they are often added afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `param` was not issued by this store.
    pub fn add_generic_constraint(&mut self, param: GenericParamId, constraint: TypeSig) {
        self.generic_params[param.index()].constraints.push(constraint);
    }

    /// Set the base type of an existing type (for self-referencing bases).
    ///
    /// # Panics
    ///
    /// Panics if `type_id` was not issued by this store.
    pub fn set_base_type(&mut self, type_id: TypeDefId, base: TypeSig) {
        self.types[type_id.index()].base_type = Some(base);
    }

    /// Append a parameter to an existing method (for parameters typed by the
    /// method's own generic parameters).
    ///
    /// # Panics
    ///
    /// Panics if `method` was not issued by this store.
    pub fn add_parameter(&mut self, method: MethodId, param: ParamDef) {
        self.methods[method.index()].parameters.push(param);
    }

    /// Set the return type of an existing method.
    ///
    /// # Panics
    ///
    /// Panics if `method` was not issued by this store.
    pub fn set_return_type(&mut self, method: MethodId, return_type: TypeSig) {
        self.methods[method.index()].return_type = return_type;
    }

    /// Add an implemented interface to an existing type.
    ///
    /// # Panics
    ///
    /// Panics if `type_id` was not issued by this store.
    pub fn add_interface(&mut self, type_id: TypeDefId, interface: TypeSig) {
        self.types[type_id.index()].interfaces.push(interface);
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn module(&self, id: ModuleId) -> Option<&ModuleDef> {
        self.modules.get(id.index())
    }

    pub fn type_def(&self, id: TypeDefId) -> Option<&TypeDef> {
        self.types.get(id.index())
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldDef> {
        self.fields.get(id.index())
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodDef> {
        self.methods.get(id.index())
    }

    pub fn property(&self, id: PropertyId) -> Option<&PropertyDef> {
        self.properties.get(id.index())
    }

    pub fn event(&self, id: EventId) -> Option<&EventDef> {
        self.events.get(id.index())
    }

    pub fn generic_param(&self, id: GenericParamId) -> Option<&GenericParamDef> {
        self.generic_params.get(id.index())
    }

    /// All modules in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDef> {
        self.modules.iter()
    }

    /// Number of type definitions across all modules.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Find a top-level type by namespace and simple name across all modules.
    pub fn find_type(&self, namespace: &str, name: &str) -> Option<TypeDefId> {
        self.types
            .iter()
            .find(|t| t.declaring_type.is_none() && t.namespace == namespace && t.name == name)
            .map(|t| t.id)
    }

    /// Find a top-level type by namespace and simple name within one module.
    pub fn find_type_in(&self, module: ModuleId, namespace: &str, name: &str) -> Option<TypeDefId> {
        self.module(module)?
            .types
            .iter()
            .copied()
            .find(|id| {
                self.type_def(*id)
                    .is_some_and(|t| t.namespace == namespace && t.name == name)
            })
    }

    /// Find a nested type by simple name and own arity.
    pub fn find_nested_type(
        &self,
        declaring: TypeDefId,
        name: &str,
        own_arity: usize,
    ) -> Option<TypeDefId> {
        self.type_def(declaring)?
            .nested_types
            .iter()
            .copied()
            .find(|id| {
                self.type_def(*id)
                    .is_some_and(|t| t.name == name && t.generic_params.len() == own_arity)
            })
    }

    // ========================================================================
    // Derived Queries
    // ========================================================================

    /// Total generic arity of a type, including its declaring types' parameters.
    pub fn generic_arity(&self, id: TypeDefId) -> usize {
        let mut arity = 0;
        let mut current = self.type_def(id);
        while let Some(def) = current {
            arity += def.generic_params.len();
            current = def.declaring_type.and_then(|outer| self.type_def(outer));
        }
        arity
    }

    /// Dotted full name (`Namespace.Outer.Inner`) for diagnostics.
    pub fn full_name(&self, id: TypeDefId) -> String {
        let mut chain = Vec::new();
        let mut current = self.type_def(id);
        let mut namespace = "";
        while let Some(def) = current {
            chain.push(def.name.as_str());
            namespace = def.namespace.as_str();
            current = def.declaring_type.and_then(|outer| self.type_def(outer));
        }
        chain.reverse();
        let names = chain.join(".");
        if namespace.is_empty() {
            names
        } else {
            format!("{namespace}.{names}")
        }
    }

    /// Whether `id` is the top-level type `namespace.name`.
    pub fn is_type_named(&self, id: TypeDefId, namespace: &str, name: &str) -> bool {
        self.type_def(id).is_some_and(|t| {
            t.declaring_type.is_none() && t.namespace == namespace && t.name == name
        })
    }

    /// Whether the signature names the top-level type `namespace.name`.
    pub fn is_sig_named(&self, sig: &TypeSig, namespace: &str, name: &str) -> bool {
        sig.definition()
            .is_some_and(|def| self.is_type_named(def, namespace, name))
    }

    /// Replace type-owned generic parameters in `sig` with `type_args`
    /// (indexed by absolute position). Method parameters are left in place.
    pub fn substitute(&self, sig: &TypeSig, type_args: &[TypeSig]) -> TypeSig {
        if type_args.is_empty() {
            return sig.clone();
        }
        match sig {
            TypeSig::Named { def, args } => TypeSig::Named {
                def: *def,
                args: args.iter().map(|a| self.substitute(a, type_args)).collect(),
            },
            TypeSig::Array { item, rank } => TypeSig::Array {
                item: Box::new(self.substitute(item, type_args)),
                rank: *rank,
            },
            TypeSig::Pointer(inner) => TypeSig::pointer(self.substitute(inner, type_args)),
            TypeSig::ByRef(inner) => TypeSig::by_ref(self.substitute(inner, type_args)),
            TypeSig::GenericParam(id) => match self.generic_param(*id) {
                Some(param) if matches!(param.owner, GenericOwner::Type(_)) => type_args
                    .get(param.position)
                    .cloned()
                    .unwrap_or_else(|| sig.clone()),
                _ => sig.clone(),
            },
            TypeSig::Void | TypeSig::Dynamic => sig.clone(),
        }
    }

    /// Accessor methods (property getters/setters, event adders/removers) of a type.
    pub fn accessor_methods(&self, id: TypeDefId) -> HashSet<MethodId> {
        let mut accessors = HashSet::new();
        let Some(def) = self.type_def(id) else {
            return accessors;
        };
        for property in def.properties.iter().filter_map(|p| self.property(*p)) {
            accessors.extend(property.getter);
            accessors.extend(property.setter);
        }
        for event in def.events.iter().filter_map(|e| self.event(*e)) {
            accessors.extend(event.adder);
            accessors.extend(event.remover);
        }
        accessors
    }

    /// Whether every id inside the handle was issued by this store.
    pub fn contains(&self, handle: &Handle) -> bool {
        match handle {
            Handle::Module(id) => self.module(*id).is_some(),
            Handle::Type(sig) => self.contains_sig(sig),
            Handle::Field(id) => self.field(*id).is_some(),
            Handle::Method(id) => self.method(*id).is_some(),
            Handle::Property(id) => self.property(*id).is_some(),
            Handle::Event(id) => self.event(*id).is_some(),
        }
    }

    /// Whether every id inside the signature was issued by this store.
    pub fn contains_sig(&self, sig: &TypeSig) -> bool {
        match sig {
            TypeSig::Named { def, args } => {
                self.type_def(*def).is_some() && args.iter().all(|a| self.contains_sig(a))
            }
            TypeSig::Array { item, .. } => self.contains_sig(item),
            TypeSig::Pointer(inner) | TypeSig::ByRef(inner) => self.contains_sig(inner),
            TypeSig::GenericParam(id) => self.generic_param(*id).is_some(),
            TypeSig::Void | TypeSig::Dynamic => true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_module() -> (Metadata, ModuleId) {
        let mut metadata = Metadata::new();
        let module = metadata.add_module(ModuleDef::new("Sample", "1.0.0.0"));
        (metadata, module)
    }

    mod insert_tests {
        use super::*;

        #[test]
        fn add_type_registers_top_level_type() {
            let (mut metadata, module) = store_with_module();
            let id = metadata.add_type(module, TypeDef::new("N", "Widget"));

            assert_eq!(metadata.module(module).unwrap().types, vec![id]);
            assert_eq!(metadata.type_def(id).unwrap().module, module);
            assert_eq!(metadata.find_type("N", "Widget"), Some(id));
        }

        #[test]
        fn nested_type_takes_declaring_namespace() {
            let (mut metadata, module) = store_with_module();
            let outer = metadata.add_type(module, TypeDef::new("N", "Outer"));
            let inner = metadata.add_nested_type(outer, TypeDef::nested("Inner"));

            let def = metadata.type_def(inner).unwrap();
            assert_eq!(def.namespace, "N");
            assert_eq!(def.declaring_type, Some(outer));
            assert!(metadata.module(module).unwrap().types.contains(&outer));
            assert!(!metadata.module(module).unwrap().types.contains(&inner));
            assert_eq!(metadata.full_name(inner), "N.Outer.Inner");
        }

        #[test]
        fn generic_positions_count_declaring_parameters() {
            let (mut metadata, module) = store_with_module();
            let outer = metadata.add_type(module, TypeDef::new("N", "Outer"));
            let t =
                metadata.add_generic_param(GenericOwner::Type(outer), GenericParamDef::new("T"));
            let inner = metadata.add_nested_type(outer, TypeDef::nested("Inner"));
            let u =
                metadata.add_generic_param(GenericOwner::Type(inner), GenericParamDef::new("U"));
            let v =
                metadata.add_generic_param(GenericOwner::Type(inner), GenericParamDef::new("V"));

            assert_eq!(metadata.generic_param(t).unwrap().position, 0);
            assert_eq!(metadata.generic_param(u).unwrap().position, 1);
            assert_eq!(metadata.generic_param(v).unwrap().position, 2);
            assert_eq!(metadata.generic_arity(inner), 3);
            assert_eq!(metadata.type_def(inner).unwrap().generic_params.len(), 2);
        }

        #[test]
        fn method_generic_positions_start_at_zero() {
            let (mut metadata, module) = store_with_module();
            let outer = metadata.add_type(module, TypeDef::new("N", "Outer"));
            metadata.add_generic_param(GenericOwner::Type(outer), GenericParamDef::new("T"));
            let method = metadata.add_method(outer, MethodDef::new("Map"));
            let tm = metadata
                .add_generic_param(GenericOwner::Method(method), GenericParamDef::new("TM"));

            assert_eq!(metadata.generic_param(tm).unwrap().position, 0);
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn substitute_replaces_type_parameters_only() {
            let (mut metadata, module) = store_with_module();
            let int32 = metadata.add_type(module, TypeDef::new("System", "Int32"));
            let base = metadata.add_type(module, TypeDef::new("N", "Base"));
            let t = metadata.add_generic_param(GenericOwner::Type(base), GenericParamDef::new("T"));
            let method = metadata.add_method(base, MethodDef::new("M"));
            let tm = metadata
                .add_generic_param(GenericOwner::Method(method), GenericParamDef::new("TM"));

            let sig = TypeSig::array(TypeSig::param(t));
            let substituted = metadata.substitute(&sig, &[TypeSig::named(int32)]);
            assert_eq!(substituted, TypeSig::array(TypeSig::named(int32)));

            let method_param = TypeSig::param(tm);
            assert_eq!(
                metadata.substitute(&method_param, &[TypeSig::named(int32)]),
                method_param
            );
        }

        #[test]
        fn accessor_methods_collects_property_and_event_accessors() {
            let (mut metadata, module) = store_with_module();
            let int32 = metadata.add_type(module, TypeDef::new("System", "Int32"));
            let widget = metadata.add_type(module, TypeDef::new("N", "Widget"));
            let getter = metadata.add_method(
                widget,
                MethodDef::special("get_Size").returning(TypeSig::named(int32)),
            );
            let plain = metadata.add_method(widget, MethodDef::new("Resize"));
            metadata.add_property(
                widget,
                PropertyDef::new("Size", TypeSig::named(int32)).with_getter(getter),
            );

            let accessors = metadata.accessor_methods(widget);
            assert!(accessors.contains(&getter));
            assert!(!accessors.contains(&plain));
        }

        #[test]
        fn contains_rejects_ids_from_elsewhere() {
            let (metadata, module) = store_with_module();
            assert!(metadata.contains(&Handle::Module(module)));
            assert!(!metadata.contains(&Handle::Module(ModuleId::new(7))));
            assert!(!metadata.contains(&Handle::Type(TypeSig::array(TypeSig::named(
                TypeDefId::new(3)
            )))));
            assert!(metadata.contains(&Handle::Type(TypeSig::Void)));
        }
    }
}

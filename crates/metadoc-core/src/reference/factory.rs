//! Conversion between live handles and reference data.

use tracing::trace;

use super::{
    ArrayTypeReference, ByRefTypeReference, ConstructorReference, DeclaringMethodReference,
    EventReference, FieldReference, GenericMethodParameterReference,
    GenericTypeParameterReference, MemberReference, MethodReference, ModuleReference,
    NamedTypeReference, NamespaceReference, PointerTypeReference, PropertyReference,
    ReferenceData, TypeReference,
};
use crate::error::{MetadocError, MetadocResult};
use crate::metadata::{
    EventDef, EventId, FieldDef, FieldId, GenericOwner, GenericParamDef, GenericParamId, Handle,
    Metadata, MethodDef, MethodId, ModuleDef, ModuleId, ParamDef, PropertyDef, PropertyId,
    TypeDef, TypeDefId, TypeSig,
};

/// How far generic method parameters describe their declaring method.
///
/// A method's signature can mention its own generic parameters, so the
/// signature text of a declaring method is rendered with `Shallow` references
/// that leave the signature blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Full,
    Shallow,
}

/// Builds [`ReferenceData`] from handles of one [`Metadata`] store and maps
/// reference data back to handles.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceFactory<'m> {
    metadata: &'m Metadata,
}

impl<'m> ReferenceFactory<'m> {
    pub fn new(metadata: &'m Metadata) -> Self {
        ReferenceFactory { metadata }
    }

    /// The store this factory reads.
    pub fn metadata(&self) -> &'m Metadata {
        self.metadata
    }

    // ========================================================================
    // Handle -> Reference
    // ========================================================================

    /// Create the reference data for a live handle.
    ///
    /// Fails with `InvalidArgument` if the handle mentions an id this store did
    /// not issue.
    pub fn create(&self, handle: &Handle) -> MetadocResult<ReferenceData> {
        if !self.metadata.contains(handle) {
            return Err(MetadocError::invalid_argument(
                "handle",
                format!("{handle:?} is not part of this metadata store"),
            ));
        }
        let reference = match handle {
            Handle::Module(id) => ReferenceData::Module(self.module_reference(*id)?),
            Handle::Type(sig) => ReferenceData::Type(self.type_reference(sig)?),
            Handle::Field(id) => ReferenceData::Member(self.field_reference(*id)?),
            Handle::Method(id) => ReferenceData::Member(self.method_reference(*id)?),
            Handle::Property(id) => {
                ReferenceData::Member(MemberReference::Property(self.property_reference(*id)?))
            }
            Handle::Event(id) => {
                ReferenceData::Member(MemberReference::Event(self.event_reference(*id)?))
            }
        };
        trace!(?handle, "created reference data");
        Ok(reference)
    }

    pub fn module_reference(&self, id: ModuleId) -> MetadocResult<ModuleReference> {
        let module = self.module_def(id)?;
        Ok(ModuleReference {
            name: module.name.clone(),
            version: module.version.clone(),
            culture: module.culture.clone(),
            public_key_token: module.public_key_token.clone(),
        })
    }

    pub fn namespace_reference(
        &self,
        module: ModuleId,
        namespace: &str,
    ) -> MetadocResult<NamespaceReference> {
        Ok(NamespaceReference {
            name: namespace.to_string(),
            module: self.module_reference(module)?,
        })
    }

    /// Reference data for a type mention.
    pub fn type_reference(&self, sig: &TypeSig) -> MetadocResult<TypeReference> {
        self.build_type(sig, Depth::Full)
    }

    /// Reference data for a type definition. Generic definitions list their
    /// own parameters as arguments.
    pub fn named_reference(&self, def: TypeDefId) -> MetadocResult<NamedTypeReference> {
        self.build_named(def, &[], Depth::Full)
    }

    /// A constant (literal field) or field reference.
    pub fn field_reference(&self, id: FieldId) -> MetadocResult<MemberReference> {
        let field = self.field_def(id)?;
        let reference = FieldReference {
            name: field.name.clone(),
            declaring_type: self.named_reference(field.declaring_type)?,
        };
        Ok(if field.is_literal {
            MemberReference::Constant(reference)
        } else {
            MemberReference::Field(reference)
        })
    }

    /// A constructor or method reference.
    pub fn method_reference(&self, id: MethodId) -> MetadocResult<MemberReference> {
        let method = self.method_def(id)?;
        let declaring_type = self.named_reference(method.declaring_type)?;
        let parameter_types = self.parameter_types(&method.parameters)?;

        if method.is_constructor() {
            return Ok(MemberReference::Constructor(ConstructorReference {
                declaring_type,
                is_static: method.is_static,
                parameter_types,
            }));
        }

        let generic_arguments = method
            .generic_params
            .iter()
            .map(|param| self.build_generic_param(*param, Depth::Full))
            .collect::<MetadocResult<Vec<_>>>()?;

        Ok(MemberReference::Method(MethodReference {
            name: method.name.clone(),
            declaring_type,
            generic_arguments,
            parameter_types,
            return_type: Box::new(self.type_reference(&method.return_type)?),
            explicit_interface: self.explicit_interface(method.explicit_interface.as_ref())?,
            is_conversion_operator: method.is_conversion_operator(),
        }))
    }

    pub fn property_reference(&self, id: PropertyId) -> MetadocResult<PropertyReference> {
        let property = self.property_def(id)?;
        Ok(PropertyReference {
            name: property.name.clone(),
            declaring_type: self.named_reference(property.declaring_type)?,
            parameter_types: self.parameter_types(&self.index_parameters(property)?)?,
            explicit_interface: self.explicit_interface(property.explicit_interface.as_ref())?,
        })
    }

    pub fn event_reference(&self, id: EventId) -> MetadocResult<EventReference> {
        let event = self.event_def(id)?;
        Ok(EventReference {
            name: event.name.clone(),
            declaring_type: self.named_reference(event.declaring_type)?,
            explicit_interface: self.explicit_interface(event.explicit_interface.as_ref())?,
        })
    }

    /// Index parameters of a property: the getter's parameters, or the
    /// setter's without the trailing value parameter.
    pub fn index_parameters(&self, property: &PropertyDef) -> MetadocResult<Vec<ParamDef>> {
        if let Some(getter) = property.getter {
            return Ok(self.method_def(getter)?.parameters.clone());
        }
        if let Some(setter) = property.setter {
            let parameters = &self.method_def(setter)?.parameters;
            let count = parameters.len().saturating_sub(1);
            return Ok(parameters[..count].to_vec());
        }
        Ok(Vec::new())
    }

    // ========================================================================
    // Matching and Resolution
    // ========================================================================

    /// Whether `reference` identifies the live `handle`.
    ///
    /// Comparison is structural, so reference data built from another store
    /// with the same shapes also matches. Handles foreign to this store never
    /// match.
    pub fn matches(&self, reference: &ReferenceData, handle: &Handle) -> bool {
        match self.create(handle) {
            Ok(created) => created == *reference,
            Err(_) => false,
        }
    }

    /// Re-derive the live handle described by `reference`.
    ///
    /// Returns `None` when nothing in the store matches, and for namespace
    /// references, which have no handle.
    pub fn to_handle(&self, reference: &ReferenceData) -> Option<Handle> {
        match reference {
            ReferenceData::Module(module) => self.find_module(module).map(Handle::Module),
            ReferenceData::Type(ty) => self.find_sig(ty).map(Handle::Type),
            ReferenceData::Member(member) => self.find_member(member),
            ReferenceData::Namespace(_) => None,
        }
    }

    fn find_module(&self, reference: &ModuleReference) -> Option<ModuleId> {
        self.metadata
            .modules()
            .find(|module| {
                module.name == reference.name
                    && module.version == reference.version
                    && module.culture == reference.culture
                    && module.public_key_token == reference.public_key_token
            })
            .map(|module| module.id)
    }

    /// Locate the definition named by `reference`, ignoring generic arguments.
    fn find_definition(&self, reference: &NamedTypeReference) -> Option<TypeDefId> {
        match &reference.declaring_type {
            Some(declaring) => {
                let outer = self.find_definition(declaring)?;
                self.metadata.find_nested_type(
                    outer,
                    &reference.name,
                    self.own_arity_of(reference, outer),
                )
            }
            None => {
                let module = self.find_module(&reference.module)?;
                self.metadata
                    .find_type_in(module, &reference.namespace, &reference.name)
            }
        }
    }

    /// Own arity for a nested lookup: definition-form references carry no
    /// arguments, so fall back to any nested type with that name.
    fn own_arity_of(&self, reference: &NamedTypeReference, outer: TypeDefId) -> usize {
        if !reference.generic_arguments.is_empty() {
            return reference.generic_arguments.len();
        }
        self.metadata
            .type_def(outer)
            .and_then(|def| {
                def.nested_types
                    .iter()
                    .filter_map(|id| self.metadata.type_def(*id))
                    .find(|nested| nested.name == reference.name)
            })
            .map(|nested| nested.generic_params.len())
            .unwrap_or(0)
    }

    fn find_sig(&self, reference: &TypeReference) -> Option<TypeSig> {
        match reference {
            TypeReference::Named(named) => {
                let def = self.find_definition(named)?;
                let args = self.find_arguments(named)?;
                if args == self.open_arguments(def).ok()? {
                    Some(TypeSig::named(def))
                } else {
                    Some(TypeSig::generic(def, args))
                }
            }
            TypeReference::Array(array) => Some(TypeSig::array_of_rank(
                self.find_sig(&array.item_type)?,
                array.rank,
            )),
            TypeReference::Pointer(pointer) => {
                Some(TypeSig::pointer(self.find_sig(&pointer.referent_type)?))
            }
            TypeReference::ByRef(by_ref) => {
                Some(TypeSig::by_ref(self.find_sig(&by_ref.referent_type)?))
            }
            TypeReference::GenericTypeParameter(param) => {
                let mut current = self.find_definition(&param.declaring_type);
                while let Some(id) = current {
                    let def = self.metadata.type_def(id)?;
                    let found = def.generic_params.iter().copied().find(|p| {
                        self.metadata
                            .generic_param(*p)
                            .is_some_and(|g| g.position == param.position)
                    });
                    if let Some(found) = found {
                        return Some(TypeSig::param(found));
                    }
                    current = def.declaring_type;
                }
                None
            }
            TypeReference::GenericMethodParameter(param) => {
                let method = &param.declaring_method;
                let declaring = self.find_definition(&method.declaring_type)?;
                let def = self.metadata.type_def(declaring)?;
                def.methods
                    .iter()
                    .filter_map(|id| self.metadata.method(*id))
                    .filter(|candidate| candidate.name == method.name)
                    .find(|candidate| {
                        self.signature_text(candidate).ok().as_deref()
                            == Some(method.signature.as_str())
                    })
                    .and_then(|candidate| candidate.generic_params.get(param.position).copied())
                    .map(TypeSig::param)
            }
            TypeReference::Void => Some(TypeSig::Void),
            TypeReference::Dynamic => Some(TypeSig::Dynamic),
        }
    }

    /// Generic arguments of a named reference across its declaring chain.
    fn find_arguments(&self, reference: &NamedTypeReference) -> Option<Vec<TypeSig>> {
        let mut args = match &reference.declaring_type {
            Some(declaring) => self.find_arguments(declaring)?,
            None => Vec::new(),
        };
        for argument in &reference.generic_arguments {
            args.push(self.find_sig(argument)?);
        }
        Some(args)
    }

    fn find_member(&self, reference: &MemberReference) -> Option<Handle> {
        let declaring = self.find_definition(reference.declaring_type())?;
        let def = self.metadata.type_def(declaring)?;
        let target = ReferenceData::Member(reference.clone());
        let candidates: Vec<Handle> = match reference {
            MemberReference::Constant(_) | MemberReference::Field(_) => {
                def.fields.iter().map(|id| Handle::Field(*id)).collect()
            }
            MemberReference::Constructor(_) | MemberReference::Method(_) => {
                def.methods.iter().map(|id| Handle::Method(*id)).collect()
            }
            MemberReference::Property(_) => {
                def.properties.iter().map(|id| Handle::Property(*id)).collect()
            }
            MemberReference::Event(_) => def.events.iter().map(|id| Handle::Event(*id)).collect(),
        };
        candidates
            .into_iter()
            .find(|candidate| self.matches(&target, candidate))
    }

    // ========================================================================
    // Builders
    // ========================================================================

    fn build_type(&self, sig: &TypeSig, depth: Depth) -> MetadocResult<TypeReference> {
        Ok(match sig {
            TypeSig::Named { def, args } => {
                TypeReference::Named(self.build_named(*def, args, depth)?)
            }
            TypeSig::Array { item, rank } => TypeReference::Array(ArrayTypeReference {
                item_type: Box::new(self.build_type(item, depth)?),
                rank: *rank,
            }),
            TypeSig::Pointer(referent) => TypeReference::Pointer(PointerTypeReference {
                referent_type: Box::new(self.build_type(referent, depth)?),
            }),
            TypeSig::ByRef(referent) => TypeReference::ByRef(ByRefTypeReference {
                referent_type: Box::new(self.build_type(referent, depth)?),
            }),
            TypeSig::GenericParam(param) => self.build_generic_param(*param, depth)?,
            TypeSig::Void => TypeReference::Void,
            TypeSig::Dynamic => TypeReference::Dynamic,
        })
    }

    fn build_named(
        &self,
        id: TypeDefId,
        args: &[TypeSig],
        depth: Depth,
    ) -> MetadocResult<NamedTypeReference> {
        let def = self.type_def(id)?;
        let arity = self.metadata.generic_arity(id);

        let open;
        let args = if args.is_empty() && arity > 0 {
            open = self.open_arguments(id)?;
            open.as_slice()
        } else {
            args
        };
        if args.len() != arity {
            return Err(MetadocError::invalid_argument(
                "handle",
                format!(
                    "'{}' takes {arity} generic arguments, {} supplied",
                    self.metadata.full_name(id),
                    args.len()
                ),
            ));
        }

        let (outer_args, own_args) = args.split_at(arity - def.generic_params.len());
        let declaring_type = def
            .declaring_type
            .map(|outer| self.build_named(outer, outer_args, depth).map(Box::new))
            .transpose()?;
        let generic_arguments = own_args
            .iter()
            .map(|arg| self.build_type(arg, depth))
            .collect::<MetadocResult<Vec<_>>>()?;

        Ok(NamedTypeReference {
            name: def.name.clone(),
            namespace: def.namespace.clone(),
            declaring_type,
            generic_arguments,
            module: self.module_reference(def.module)?,
        })
    }

    /// A definition with no generic arguments at any level; used as the owner
    /// of generic parameters.
    fn definition_reference(&self, id: TypeDefId) -> MetadocResult<NamedTypeReference> {
        let def = self.type_def(id)?;
        let declaring_type = def
            .declaring_type
            .map(|outer| self.definition_reference(outer).map(Box::new))
            .transpose()?;
        Ok(NamedTypeReference {
            name: def.name.clone(),
            namespace: def.namespace.clone(),
            declaring_type,
            generic_arguments: Vec::new(),
            module: self.module_reference(def.module)?,
        })
    }

    fn build_generic_param(
        &self,
        id: GenericParamId,
        depth: Depth,
    ) -> MetadocResult<TypeReference> {
        let param = self.generic_param_def(id)?;
        Ok(match param.owner {
            GenericOwner::Type(owner) => {
                TypeReference::GenericTypeParameter(GenericTypeParameterReference {
                    name: param.name.clone(),
                    position: param.position,
                    declaring_type: Box::new(self.definition_reference(owner)?),
                })
            }
            GenericOwner::Method(owner) => {
                let method = self.method_def(owner)?;
                let signature = match depth {
                    Depth::Full => self.signature_text(method)?,
                    Depth::Shallow => String::new(),
                };
                TypeReference::GenericMethodParameter(GenericMethodParameterReference {
                    name: param.name.clone(),
                    position: param.position,
                    declaring_method: DeclaringMethodReference {
                        declaring_type: Box::new(self.definition_reference(method.declaring_type)?),
                        name: method.name.clone(),
                        signature,
                    },
                })
            }
        })
    }

    /// The parameter list of a method in type-signature form.
    fn signature_text(&self, method: &MethodDef) -> MetadocResult<String> {
        let parts = method
            .parameters
            .iter()
            .map(|p| self.build_type(&p.param_type, Depth::Shallow).map(|t| t.to_string()))
            .collect::<MetadocResult<Vec<_>>>()?;
        Ok(parts.join(","))
    }

    fn parameter_types(&self, parameters: &[ParamDef]) -> MetadocResult<Vec<TypeReference>> {
        parameters
            .iter()
            .map(|p| self.type_reference(&p.param_type))
            .collect()
    }

    fn explicit_interface(
        &self,
        interface: Option<&TypeSig>,
    ) -> MetadocResult<Option<Box<TypeReference>>> {
        interface
            .map(|sig| self.type_reference(sig).map(Box::new))
            .transpose()
    }

    /// The parameters of a generic definition's declaring chain, outermost
    /// first, as signatures.
    fn open_arguments(&self, id: TypeDefId) -> MetadocResult<Vec<TypeSig>> {
        let def = self.type_def(id)?;
        let mut args = match def.declaring_type {
            Some(outer) => self.open_arguments(outer)?,
            None => Vec::new(),
        };
        args.extend(def.generic_params.iter().copied().map(TypeSig::param));
        Ok(args)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    fn module_def(&self, id: ModuleId) -> MetadocResult<&'m ModuleDef> {
        self.metadata
            .module(id)
            .ok_or_else(|| absent("module", id))
    }

    fn type_def(&self, id: TypeDefId) -> MetadocResult<&'m TypeDef> {
        self.metadata.type_def(id).ok_or_else(|| absent("type", id))
    }

    fn field_def(&self, id: FieldId) -> MetadocResult<&'m FieldDef> {
        self.metadata.field(id).ok_or_else(|| absent("field", id))
    }

    fn method_def(&self, id: MethodId) -> MetadocResult<&'m MethodDef> {
        self.metadata.method(id).ok_or_else(|| absent("method", id))
    }

    fn property_def(&self, id: PropertyId) -> MetadocResult<&'m PropertyDef> {
        self.metadata
            .property(id)
            .ok_or_else(|| absent("property", id))
    }

    fn event_def(&self, id: EventId) -> MetadocResult<&'m EventDef> {
        self.metadata.event(id).ok_or_else(|| absent("event", id))
    }

    fn generic_param_def(&self, id: GenericParamId) -> MetadocResult<&'m GenericParamDef> {
        self.metadata
            .generic_param(id)
            .ok_or_else(|| absent("generic parameter", id))
    }
}

fn absent(kind: &str, id: impl std::fmt::Display) -> MetadocError {
    MetadocError::invalid_argument(kind, format!("{id} is not part of this metadata store"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Sample;

    mod create_tests {
        use super::*;

        #[test]
        fn same_handle_gives_equal_references() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);
            let handle = Handle::from(sample.test_class);

            let first = factory.create(&handle).unwrap();
            let second = factory.create(&handle).unwrap();
            assert_eq!(first, second);
            assert!(factory.matches(&first, &handle));
        }

        #[test]
        fn literal_fields_become_constants() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);

            let member1 = factory.field_reference(sample.enum_member1).unwrap();
            assert!(matches!(member1, MemberReference::Constant(_)));
            assert_eq!(member1.declaring_type().name, "TestEnum");
        }

        #[test]
        fn open_definition_lists_its_parameters() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);

            let inner = factory.named_reference(sample.inner).unwrap();
            assert_eq!(inner.generic_arguments.len(), 2);
            assert_eq!(inner.total_arity(), 3);
            assert_eq!(inner.to_string(), "N.Outer{`0}.Inner{`1,`2}");
        }

        #[test]
        fn dynamic_and_void_collapse_to_sentinels() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);

            let dynamic = factory.create(&Handle::Type(TypeSig::Dynamic)).unwrap();
            let object = Handle::from(sample.corlib.object);
            assert!(factory.matches(&dynamic, &object));
            assert_eq!(
                factory.create(&Handle::Type(TypeSig::Void)).unwrap(),
                ReferenceData::Type(TypeReference::Void)
            );
        }

        #[test]
        fn absent_handle_is_invalid_argument() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);

            let err = factory
                .create(&Handle::Method(MethodId::new(u32::MAX)))
                .unwrap_err();
            assert!(matches!(err, MetadocError::InvalidArgument { .. }));
            assert!(!factory.matches(
                &ReferenceData::Type(TypeReference::Void),
                &Handle::Field(FieldId::new(u32::MAX))
            ));
        }

        #[test]
        fn method_generic_parameter_names_its_method() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);

            let MemberReference::Method(method) =
                factory.method_reference(sample.inner_test_method).unwrap()
            else {
                panic!("expected a method reference");
            };
            let TypeReference::GenericMethodParameter(tm) = &method.generic_arguments[0] else {
                panic!("expected a generic method parameter");
            };
            assert_eq!(tm.name, "TM");
            assert_eq!(tm.declaring_method.name, "TestMethod");
            assert!(tm.declaring_method.signature.starts_with("System.Int32,System.Byte[],"));
        }
    }

    mod to_handle_tests {
        use super::*;

        fn round_trip(sample: &Sample, handle: Handle) {
            let factory = ReferenceFactory::new(&sample.metadata);
            let reference = factory.create(&handle).unwrap();
            let resolved = factory.to_handle(&reference).expect("handle should resolve");
            assert!(factory.matches(&reference, &resolved), "{handle:?}");
        }

        #[test]
        fn types_and_members_resolve_back() {
            let sample = Sample::new();
            round_trip(&sample, Handle::from(sample.test_enum));
            round_trip(&sample, Handle::from(sample.inner));
            round_trip(&sample, Handle::from(sample.enum_member1));
            round_trip(&sample, Handle::from(sample.inner_test_method));
            round_trip(&sample, Handle::from(sample.test_class_indexer));
            round_trip(&sample, Handle::Module(sample.module));
        }

        #[test]
        fn open_definition_resolves_to_bare_signature() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);
            let reference = factory.create(&Handle::from(sample.inner)).unwrap();

            assert_eq!(
                factory.to_handle(&reference),
                Some(Handle::Type(TypeSig::named(sample.inner)))
            );
        }

        #[test]
        fn namespace_has_no_handle() {
            let sample = Sample::new();
            let factory = ReferenceFactory::new(&sample.metadata);
            let namespace = factory.namespace_reference(sample.module, "N").unwrap();

            assert_eq!(factory.to_handle(&ReferenceData::Namespace(namespace)), None);
        }
    }
}

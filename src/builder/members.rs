//! Member declarations and the data blocks they carry.

use tracing::{trace, warn};

use super::{DeclarationGraphBuilder, DeclaredMembers, ENUM_VALUE_FIELD};
use crate::declarations::{
    AccessModifier, AccessorData, AttributeData, AttributeParameterData, ConstantData,
    ConstructorData, DeclarationGraph, DispatchFlags, EventData, FieldData, GenericParameterData,
    MemberDeclId, MemberDeclaration, MemberKind, MethodData, ParameterData, PassingMode,
    PropertyData, ReturnData, TypeDeclId, TypeKind, ValueData,
};
use crate::error::{MetadocError, MetadocResult};
use crate::metadata::{
    Accessibility, AttributeInfo, AttributeValue, ConstantValue, EventDef, EventId, FieldDef,
    FieldId, GenericParamDef, GenericParamId, Handle, MethodDef, MethodId, ParamDef, PropertyDef,
    PropertyId, TypeDef, TypeSig,
};
use crate::reference::{MemberReference, TypeReference};

/// What a member declaration is made of before it gets an id.
struct MemberParts {
    handle: Handle,
    name: String,
    access: AccessModifier,
    attributes: Vec<AttributeData>,
    is_shadowing: bool,
    kind: MemberKind,
}

impl<'m> DeclarationGraphBuilder<'m> {
    // ========================================================================
    // Member Collections
    // ========================================================================

    /// Add the declared members of an interface, class or struct.
    pub(super) fn add_members(
        &self,
        graph: &mut DeclarationGraph,
        type_id: TypeDeclId,
        def: &TypeDef,
    ) -> MetadocResult<DeclaredMembers> {
        let metadata = self.metadata();
        let inherited = self.inherited_signatures(def)?;
        let accessors = metadata.accessor_methods(def.id);
        let mut declared = DeclaredMembers::new();

        for field_id in &def.fields {
            let field = self.field_def(*field_id)?;
            if !self.keeps_member(&field.name, field.access, false) {
                continue;
            }
            let signature = self.signature(&field.name, 0, &[], &[])?;
            let parts = MemberParts {
                handle: Handle::Field(*field_id),
                name: field.name.clone(),
                access: field.access.into(),
                attributes: self.attributes(&field.attributes)?,
                is_shadowing: inherited.contains(&signature),
                kind: self.field_kind(field)?,
            };
            self.push_member(graph, type_id, parts, &mut declared)?;
        }

        for method_id in &def.methods {
            if accessors.contains(method_id) {
                continue;
            }
            let method = self.method_def(*method_id)?;
            let is_explicit = method.explicit_interface.is_some();
            if !self.keeps_member(&method.name, method.access, is_explicit) {
                continue;
            }
            let kind = if method.is_constructor() {
                MemberKind::Constructor(ConstructorData {
                    is_static: method.is_static,
                    parameters: self.parameters(&method.parameters)?,
                })
            } else {
                MemberKind::Method(MethodData {
                    flags: dispatch_flags(method, def.is_interface),
                    parameters: self.parameters(&method.parameters)?,
                    generic_parameters: self.generic_parameters(&method.generic_params)?,
                    return_data: self.return_data(method)?,
                    explicit_interface: self
                        .explicit_interface(method.explicit_interface.as_ref())?,
                })
            };
            let hides = !method.is_constructor()
                && !is_explicit
                && !is_override(method)
                && inherited.contains(&self.signature(
                    &method.name,
                    method.generic_params.len(),
                    &method.parameters,
                    &[],
                )?);
            let parts = MemberParts {
                handle: Handle::Method(*method_id),
                name: method.name.clone(),
                access: member_access(method.access, is_explicit),
                attributes: self.attributes(&method.attributes)?,
                is_shadowing: hides,
                kind,
            };
            self.push_member(graph, type_id, parts, &mut declared)?;
        }

        for property_id in &def.properties {
            let property = self.property_def(*property_id)?;
            let primary = self
                .primary_accessor(property.getter, property.setter)
                .ok_or_else(|| {
                    self.unclassifiable_member(def, &property.name, "property has no accessors")
                })?;
            let is_explicit = property.explicit_interface.is_some();
            if !self.keeps_member(&property.name, primary.access, is_explicit) {
                continue;
            }
            let index_parameters = self.factory().index_parameters(property)?;
            let hides = !is_explicit
                && !is_override(primary)
                && inherited.contains(&self.signature(&property.name, 0, &index_parameters, &[])?);
            let parts = MemberParts {
                handle: Handle::Property(*property_id),
                name: property.name.clone(),
                access: member_access(primary.access, is_explicit),
                attributes: self.attributes(&property.attributes)?,
                is_shadowing: hides,
                kind: MemberKind::Property(self.property_data(
                    property,
                    primary,
                    &index_parameters,
                    def.is_interface,
                )?),
            };
            self.push_member(graph, type_id, parts, &mut declared)?;
        }

        for event_id in &def.events {
            let event = self.event_def(*event_id)?;
            let adder = event
                .adder
                .map(|id| self.method_def(id))
                .transpose()?
                .ok_or_else(|| {
                    self.unclassifiable_member(def, &event.name, "event has no add accessor")
                })?;
            let is_explicit = event.explicit_interface.is_some();
            if !self.keeps_member(&event.name, adder.access, is_explicit) {
                continue;
            }
            let hides = !is_explicit
                && !is_override(adder)
                && inherited.contains(&self.signature(&event.name, 0, &[], &[])?);
            let parts = MemberParts {
                handle: Handle::Event(*event_id),
                name: event.name.clone(),
                access: member_access(adder.access, is_explicit),
                attributes: self.attributes(&event.attributes)?,
                is_shadowing: hides,
                kind: MemberKind::Event(self.event_data(event, adder, def.is_interface)?),
            };
            self.push_member(graph, type_id, parts, &mut declared)?;
        }

        Ok(declared)
    }

    /// Add the constants of an enum. Each constant is typed by the enum itself
    /// and keeps its enum-typed value.
    pub(super) fn add_enum_constants(
        &self,
        graph: &mut DeclarationGraph,
        type_id: TypeDeclId,
        def: &TypeDef,
    ) -> MetadocResult<()> {
        let enum_type = self.factory().type_reference(&TypeSig::named(def.id))?;
        let mut declared = DeclaredMembers::new();

        for field_id in &def.fields {
            let field = self.field_def(*field_id)?;
            if field.name == ENUM_VALUE_FIELD {
                continue;
            }
            let Some(value) = field.constant.as_ref().filter(|_| field.is_literal) else {
                return Err(self.unclassifiable_member(
                    def,
                    &field.name,
                    "enum member is not a constant",
                ));
            };
            let parts = MemberParts {
                handle: Handle::Field(*field_id),
                name: field.name.clone(),
                access: field.access.into(),
                attributes: self.attributes(&field.attributes)?,
                is_shadowing: false,
                kind: MemberKind::Constant(ConstantData {
                    constant_type: enum_type.clone(),
                    value: ValueData::Enum {
                        enum_type: enum_type.clone(),
                        value: value.clone(),
                    },
                }),
            };
            let id = self.push_member(graph, type_id, parts, &mut declared)?;
            if let Some(TypeKind::Enum(data)) = graph.type_mut(type_id).map(|t| &mut t.kind) {
                data.constants.push(id);
            }
        }
        Ok(())
    }

    fn push_member(
        &self,
        graph: &mut DeclarationGraph,
        type_id: TypeDeclId,
        parts: MemberParts,
        declared: &mut DeclaredMembers,
    ) -> MetadocResult<MemberDeclId> {
        let id = graph.next_member_id();
        let canonical_name = self.resolver.canonical_name(&parts.handle)?;
        let reference = self.member_reference(&parts.handle)?;

        if let Some(collections) = graph.type_mut(type_id).and_then(|t| t.members_mut()) {
            collections.push(&parts.kind, id);
        }
        trace!(member = %canonical_name, %id, shadowing = parts.is_shadowing, "added member");

        declared.insert(parts.handle, id);
        graph.insert_member(MemberDeclaration {
            id,
            name: parts.name,
            declaring_type: type_id,
            access: parts.access,
            attributes: parts.attributes,
            is_shadowing: parts.is_shadowing,
            canonical_name,
            reference,
            kind: parts.kind,
        });
        Ok(id)
    }

    // ========================================================================
    // Member Kinds
    // ========================================================================

    fn field_kind(&self, field: &FieldDef) -> MetadocResult<MemberKind> {
        let field_type = self.factory().type_reference(&field.field_type)?;
        if !field.is_literal {
            return Ok(MemberKind::Field(FieldData {
                field_type,
                is_static: field.is_static,
                is_read_only: field.is_init_only,
            }));
        }
        let value = match &field.constant {
            Some(value) => self.value_data(value, &field.field_type)?,
            None => ValueData::Null,
        };
        Ok(MemberKind::Constant(ConstantData {
            constant_type: field_type,
            value,
        }))
    }

    fn property_data(
        &self,
        property: &PropertyDef,
        primary: &MethodDef,
        index_parameters: &[ParamDef],
        in_interface: bool,
    ) -> MetadocResult<PropertyData> {
        let is_explicit = property.explicit_interface.is_some();
        Ok(PropertyData {
            property_type: self.factory().type_reference(&property.property_type)?,
            flags: dispatch_flags_for(primary, in_interface, is_explicit),
            parameters: self.parameters(index_parameters)?,
            getter: self.accessor_data(property.getter, is_explicit)?,
            setter: self.accessor_data(property.setter, is_explicit)?,
            explicit_interface: self.explicit_interface(property.explicit_interface.as_ref())?,
        })
    }

    fn event_data(
        &self,
        event: &EventDef,
        adder: &MethodDef,
        in_interface: bool,
    ) -> MetadocResult<EventData> {
        let is_explicit = event.explicit_interface.is_some();
        Ok(EventData {
            event_type: self.factory().type_reference(&event.event_type)?,
            flags: dispatch_flags_for(adder, in_interface, is_explicit),
            adder: self.accessor_data(event.adder, is_explicit)?,
            remover: self.accessor_data(event.remover, is_explicit)?,
            explicit_interface: self.explicit_interface(event.explicit_interface.as_ref())?,
        })
    }

    fn accessor_data(
        &self,
        accessor: Option<MethodId>,
        is_explicit: bool,
    ) -> MetadocResult<Option<AccessorData>> {
        let Some(id) = accessor else {
            return Ok(None);
        };
        let method = self.method_def(id)?;
        Ok(Some(AccessorData {
            access: member_access(method.access, is_explicit),
            attributes: self.attributes(&method.attributes)?,
        }))
    }

    /// The most accessible of a property's accessors.
    pub(super) fn primary_accessor(
        &self,
        getter: Option<MethodId>,
        setter: Option<MethodId>,
    ) -> Option<&'m MethodDef> {
        [getter, setter]
            .into_iter()
            .flatten()
            .filter_map(|id| self.metadata().method(id))
            .fold(None, |best: Option<&'m MethodDef>, candidate| match best {
                Some(current) if current.access.openness() >= candidate.access.openness() => {
                    Some(current)
                }
                _ => Some(candidate),
            })
    }

    // ========================================================================
    // Parameters and Generics
    // ========================================================================

    pub(super) fn parameters(&self, params: &[ParamDef]) -> MetadocResult<Vec<ParameterData>> {
        params.iter().map(|p| self.parameter(p)).collect()
    }

    fn parameter(&self, param: &ParamDef) -> MetadocResult<ParameterData> {
        let (parameter_type, passing_mode) = match &param.param_type {
            TypeSig::ByRef(referent) => {
                let mode = if param.is_out {
                    PassingMode::Out
                } else if param.is_in {
                    PassingMode::In
                } else {
                    PassingMode::InOut
                };
                (referent.as_ref(), mode)
            }
            other => (other, PassingMode::ByValue),
        };
        let default_value = param
            .default_value
            .as_ref()
            .map(|value| self.value_data(value, parameter_type))
            .transpose()?;

        Ok(ParameterData {
            name: param.name.clone(),
            parameter_type: self.factory().type_reference(parameter_type)?,
            passing_mode,
            has_default_value: default_value.is_some(),
            default_value,
            attributes: self.attributes(&param.attributes)?,
        })
    }

    pub(super) fn return_data(&self, method: &MethodDef) -> MetadocResult<ReturnData> {
        Ok(ReturnData {
            return_type: self.factory().type_reference(&method.return_type)?,
            attributes: self.attributes(&method.return_attributes)?,
        })
    }

    pub(super) fn generic_parameters(
        &self,
        ids: &[GenericParamId],
    ) -> MetadocResult<Vec<GenericParameterData>> {
        ids.iter()
            .map(|id| {
                let param = self.metadata().generic_param(*id).ok_or_else(|| {
                    MetadocError::invalid_argument("generic parameter", format!("{id} is absent"))
                })?;
                self.generic_parameter(param)
            })
            .collect()
    }

    /// `struct` shows up in metadata as a `System.ValueType` constraint plus
    /// the default-constructor flag; both are folded into the value-type flag.
    fn generic_parameter(&self, param: &GenericParamDef) -> MetadocResult<GenericParameterData> {
        let metadata = self.metadata();
        let value_type_constrained = param.not_nullable_value_type_constraint;

        let mut base_classes = Vec::new();
        let mut others = Vec::new();
        for constraint in &param.constraints {
            if value_type_constrained && metadata.is_sig_named(constraint, "System", "ValueType") {
                continue;
            }
            let reference = self.factory().type_reference(constraint)?;
            let is_class = constraint
                .definition()
                .and_then(|def| metadata.type_def(def))
                .is_some_and(|def| !def.is_interface);
            if is_class {
                base_classes.push(reference);
            } else {
                others.push(reference);
            }
        }
        base_classes.extend(others);

        Ok(GenericParameterData {
            name: param.name.clone(),
            position: param.position,
            is_covariant: param.is_covariant,
            is_contravariant: param.is_contravariant,
            has_reference_type_constraint: param.reference_type_constraint,
            has_non_nullable_value_type_constraint: value_type_constrained,
            has_default_constructor_constraint: param.default_constructor_constraint
                && !value_type_constrained,
            has_unmanaged_type_constraint: param.unmanaged_constraint,
            type_constraints: base_classes,
            attributes: self.attributes(&param.attributes)?,
        })
    }

    // ========================================================================
    // Attributes and Values
    // ========================================================================

    pub(super) fn attributes(
        &self,
        attributes: &[AttributeInfo],
    ) -> MetadocResult<Vec<AttributeData>> {
        attributes.iter().map(|a| self.attribute(a)).collect()
    }

    fn attribute(&self, info: &AttributeInfo) -> MetadocResult<AttributeData> {
        let factory = self.factory();
        let attribute_type = factory.type_reference(&info.attribute_type)?;
        let constructor = info.constructor.and_then(|id| self.metadata().method(id));

        let mut positional_parameters = Vec::with_capacity(info.positional.len());
        for (index, argument) in info.positional.iter().enumerate() {
            let Some(param) = constructor.and_then(|c| c.parameters.get(index)) else {
                warn!(
                    attribute = %attribute_type,
                    index,
                    "skipped positional attribute argument without a constructor parameter"
                );
                continue;
            };
            positional_parameters.push(AttributeParameterData {
                name: param.name.clone(),
                value: self.attribute_value(&argument.value, &argument.value_type)?,
                value_type: factory.type_reference(&argument.value_type)?,
            });
        }

        let named_parameters = info
            .named
            .iter()
            .map(|argument| {
                Ok(AttributeParameterData {
                    name: argument.name.clone(),
                    value: self.attribute_value(&argument.value, &argument.value_type)?,
                    value_type: factory.type_reference(&argument.value_type)?,
                })
            })
            .collect::<MetadocResult<Vec<_>>>()?;

        Ok(AttributeData {
            attribute_type,
            positional_parameters,
            named_parameters,
        })
    }

    fn attribute_value(
        &self,
        value: &AttributeValue,
        value_type: &TypeSig,
    ) -> MetadocResult<ValueData> {
        match value {
            AttributeValue::Constant(constant) => self.value_data(constant, value_type),
            AttributeValue::Type(sig) => Ok(ValueData::Type {
                value: self.factory().type_reference(sig)?,
            }),
            AttributeValue::Array(items) => {
                let item_type = match value_type {
                    TypeSig::Array { item, .. } => item.as_ref(),
                    other => other,
                };
                let items = items
                    .iter()
                    .map(|item| self.attribute_value(item, item_type))
                    .collect::<MetadocResult<Vec<_>>>()?;
                Ok(ValueData::Array { items })
            }
        }
    }

    /// A constant typed by `value_type`; values of enum types keep the enum.
    fn value_data(&self, value: &ConstantValue, value_type: &TypeSig) -> MetadocResult<ValueData> {
        if matches!(value, ConstantValue::Null) {
            return Ok(ValueData::Null);
        }
        if self.is_enum(value_type) {
            return Ok(ValueData::Enum {
                enum_type: self.factory().type_reference(value_type)?,
                value: value.clone(),
            });
        }
        Ok(ValueData::Constant {
            value: value.clone(),
        })
    }

    fn is_enum(&self, sig: &TypeSig) -> bool {
        let metadata = self.metadata();
        sig.definition()
            .and_then(|def| metadata.type_def(def))
            .and_then(|def| def.base_type.as_ref())
            .is_some_and(|base| metadata.is_sig_named(base, "System", "Enum"))
    }

    // ========================================================================
    // References and Lookups
    // ========================================================================

    pub(super) fn member_reference(&self, handle: &Handle) -> MetadocResult<MemberReference> {
        let factory = self.factory();
        match handle {
            Handle::Field(id) => factory.field_reference(*id),
            Handle::Method(id) => factory.method_reference(*id),
            Handle::Property(id) => Ok(MemberReference::Property(factory.property_reference(*id)?)),
            Handle::Event(id) => Ok(MemberReference::Event(factory.event_reference(*id)?)),
            Handle::Module(_) | Handle::Type(_) => Err(MetadocError::invalid_argument(
                "handle",
                format!("{handle:?} is not a member"),
            )),
        }
    }

    fn explicit_interface(
        &self,
        interface: Option<&TypeSig>,
    ) -> MetadocResult<Option<TypeReference>> {
        interface
            .map(|sig| self.factory().type_reference(sig))
            .transpose()
    }

    pub(super) fn field_def(&self, id: FieldId) -> MetadocResult<&'m FieldDef> {
        self.metadata()
            .field(id)
            .ok_or_else(|| MetadocError::invalid_argument("field", format!("{id} is absent")))
    }

    pub(super) fn method_def(&self, id: MethodId) -> MetadocResult<&'m MethodDef> {
        self.metadata()
            .method(id)
            .ok_or_else(|| MetadocError::invalid_argument("method", format!("{id} is absent")))
    }

    pub(super) fn property_def(&self, id: PropertyId) -> MetadocResult<&'m PropertyDef> {
        self.metadata()
            .property(id)
            .ok_or_else(|| MetadocError::invalid_argument("property", format!("{id} is absent")))
    }

    pub(super) fn event_def(&self, id: EventId) -> MetadocResult<&'m EventDef> {
        self.metadata()
            .event(id)
            .ok_or_else(|| MetadocError::invalid_argument("event", format!("{id} is absent")))
    }

    fn unclassifiable_member(&self, def: &TypeDef, member: &str, reason: &str) -> MetadocError {
        MetadocError::unclassifiable(
            format!("{}.{}", self.metadata().full_name(def.id), member),
            reason,
        )
    }
}

// ============================================================================
// Dispatch Flags
// ============================================================================

/// Whether the method reuses an inherited virtual slot.
pub(super) fn is_override(method: &MethodDef) -> bool {
    method.is_virtual && !method.is_new_slot
}

fn dispatch_flags(method: &MethodDef, in_interface: bool) -> DispatchFlags {
    dispatch_flags_for(method, in_interface, method.explicit_interface.is_some())
}

/// Source-level modifiers of a method (or of the accessor standing for a
/// property or event).
///
/// Interface members and explicit implementations carry no dispatch
/// modifiers. Implicit interface implementations are emitted virtual and
/// final in a new slot, which reads as non-virtual.
fn dispatch_flags_for(method: &MethodDef, in_interface: bool, is_explicit: bool) -> DispatchFlags {
    if in_interface || is_explicit {
        return DispatchFlags {
            is_static: method.is_static,
            ..DispatchFlags::default()
        };
    }
    let is_override = is_override(method);
    DispatchFlags {
        is_static: method.is_static,
        is_abstract: method.is_abstract,
        is_virtual: method.is_virtual
            && method.is_new_slot
            && !method.is_abstract
            && !method.is_final,
        is_override,
        is_sealed: is_override && method.is_final,
    }
}

/// Explicit implementations are reachable only through the interface.
fn member_access(access: Accessibility, is_explicit: bool) -> AccessModifier {
    if is_explicit {
        AccessModifier::Private
    } else {
        access.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_and_sealed_override_flags() {
        let flags = dispatch_flags(&MethodDef::new("M").as_override(), false);
        assert!(flags.is_override && !flags.is_virtual && !flags.is_sealed);

        let flags = dispatch_flags(&MethodDef::new("M").as_sealed_override(), false);
        assert!(flags.is_override && flags.is_sealed);
    }

    #[test]
    fn virtual_abstract_and_implicit_implementation_flags() {
        let flags = dispatch_flags(&MethodDef::new("M").as_virtual(), false);
        assert!(flags.is_virtual && !flags.is_override);

        let flags = dispatch_flags(&MethodDef::new("M").as_abstract(), false);
        assert!(flags.is_abstract && !flags.is_virtual);

        let flags = dispatch_flags(&MethodDef::new("M").as_interface_implementation(), false);
        assert_eq!(flags, DispatchFlags::default());
    }

    #[test]
    fn interface_and_explicit_members_have_no_dispatch_modifiers() {
        let flags = dispatch_flags(&MethodDef::new("M").as_abstract(), true);
        assert_eq!(flags, DispatchFlags::default());

        let explicit = MethodDef::new("M").explicitly_implementing(TypeSig::Void);
        assert_eq!(dispatch_flags(&explicit, false), DispatchFlags::default());
        assert_eq!(member_access(explicit.access, true), AccessModifier::Private);
    }
}

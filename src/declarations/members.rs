//! Member declarations and the data blocks shared by types and members.

use serde::Serialize;

use crate::metadata::{Accessibility, ConstantValue};
use crate::reference::{MemberReference, TypeReference};

use super::{MemberDeclId, TypeDeclId};

// ============================================================================
// Access Modifiers
// ============================================================================

/// Source-level access modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessModifier {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

impl From<Accessibility> for AccessModifier {
    fn from(access: Accessibility) -> Self {
        match access {
            Accessibility::Public => AccessModifier::Public,
            Accessibility::Family => AccessModifier::Protected,
            Accessibility::Assembly => AccessModifier::Internal,
            Accessibility::FamilyOrAssembly => AccessModifier::ProtectedInternal,
            Accessibility::FamilyAndAssembly => AccessModifier::PrivateProtected,
            Accessibility::Private => AccessModifier::Private,
        }
    }
}

// ============================================================================
// Values and Attributes
// ============================================================================

/// A constant, default or attribute argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueData {
    Null,
    Constant { value: ConstantValue },
    /// A value of an enum type; `value` is the underlying integral constant.
    Enum {
        enum_type: TypeReference,
        value: ConstantValue,
    },
    /// A `typeof(...)` value.
    Type { value: TypeReference },
    Array { items: Vec<ValueData> },
}

/// A named attribute argument, positional or named.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeParameterData {
    /// For positional arguments, the constructor parameter's name.
    pub name: String,
    pub value: ValueData,
    pub value_type: TypeReference,
}

/// An applied attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeData {
    pub attribute_type: TypeReference,
    pub positional_parameters: Vec<AttributeParameterData>,
    pub named_parameters: Vec<AttributeParameterData>,
}

// ============================================================================
// Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassingMode {
    ByValue,
    /// `in`
    In,
    /// `ref`
    InOut,
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterData {
    pub name: String,
    /// The parameter's type; by-reference parameters report the referent
    /// type and carry the reference in `passing_mode`.
    pub parameter_type: TypeReference,
    pub passing_mode: PassingMode,
    pub has_default_value: bool,
    pub default_value: Option<ValueData>,
    pub attributes: Vec<AttributeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnData {
    pub return_type: TypeReference,
    pub attributes: Vec<AttributeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericParameterData {
    pub name: String,
    pub position: usize,
    pub is_covariant: bool,
    pub is_contravariant: bool,
    pub has_reference_type_constraint: bool,
    pub has_non_nullable_value_type_constraint: bool,
    pub has_default_constructor_constraint: bool,
    pub has_unmanaged_type_constraint: bool,
    /// Base-class constraint first, then the rest in declaration order.
    pub type_constraints: Vec<TypeReference>,
    pub attributes: Vec<AttributeData>,
}

// ============================================================================
// Members
// ============================================================================

/// A declared member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDeclaration {
    pub id: MemberDeclId,
    pub name: String,
    pub declaring_type: TypeDeclId,
    pub access: AccessModifier,
    pub attributes: Vec<AttributeData>,
    /// Hides an inherited member with the same signature without overriding it.
    pub is_shadowing: bool,
    pub canonical_name: String,
    pub reference: MemberReference,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberKind {
    Constant(ConstantData),
    Field(FieldData),
    Constructor(ConstructorData),
    Event(EventData),
    Property(PropertyData),
    Method(MethodData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantData {
    pub constant_type: TypeReference,
    pub value: ValueData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldData {
    pub field_type: TypeReference,
    pub is_static: bool,
    pub is_read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorData {
    pub is_static: bool,
    pub parameters: Vec<ParameterData>,
}

/// Modifiers of members taking part in virtual dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchFlags {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_sealed: bool,
}

/// An accessor of a property or event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessorData {
    pub access: AccessModifier,
    pub attributes: Vec<AttributeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventData {
    pub event_type: TypeReference,
    pub flags: DispatchFlags,
    pub adder: Option<AccessorData>,
    pub remover: Option<AccessorData>,
    pub explicit_interface: Option<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyData {
    pub property_type: TypeReference,
    pub flags: DispatchFlags,
    /// Index parameters; empty for ordinary properties.
    pub parameters: Vec<ParameterData>,
    pub getter: Option<AccessorData>,
    pub setter: Option<AccessorData>,
    pub explicit_interface: Option<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodData {
    pub flags: DispatchFlags,
    pub parameters: Vec<ParameterData>,
    pub generic_parameters: Vec<GenericParameterData>,
    pub return_data: ReturnData,
    pub explicit_interface: Option<TypeReference>,
}

impl MemberDeclaration {
    /// Dispatch modifiers for events, properties and methods.
    pub fn flags(&self) -> Option<&DispatchFlags> {
        match &self.kind {
            MemberKind::Event(event) => Some(&event.flags),
            MemberKind::Property(property) => Some(&property.flags),
            MemberKind::Method(method) => Some(&method.flags),
            _ => None,
        }
    }

    pub fn is_static(&self) -> bool {
        match &self.kind {
            MemberKind::Constant(_) => true,
            MemberKind::Field(field) => field.is_static,
            MemberKind::Constructor(ctor) => ctor.is_static,
            _ => self.flags().is_some_and(|f| f.is_static),
        }
    }

    pub fn is_override(&self) -> bool {
        self.flags().is_some_and(|f| f.is_override)
    }

    /// The interface this member explicitly implements, if any.
    pub fn explicit_interface(&self) -> Option<&TypeReference> {
        match &self.kind {
            MemberKind::Event(event) => event.explicit_interface.as_ref(),
            MemberKind::Property(property) => property.explicit_interface.as_ref(),
            MemberKind::Method(method) => method.explicit_interface.as_ref(),
            _ => None,
        }
    }

    /// Parameters of constructors, methods and indexers.
    pub fn parameters(&self) -> &[ParameterData] {
        match &self.kind {
            MemberKind::Constructor(ctor) => &ctor.parameters,
            MemberKind::Property(property) => &property.parameters,
            MemberKind::Method(method) => &method.parameters,
            _ => &[],
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            MemberKind::Constant(_) => "constant",
            MemberKind::Field(_) => "field",
            MemberKind::Constructor(_) => "constructor",
            MemberKind::Event(_) => "event",
            MemberKind::Property(_) => "property",
            MemberKind::Method(_) => "method",
        }
    }
}

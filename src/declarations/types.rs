//! Type declarations.

use serde::Serialize;

use crate::reference::{MemberReference, NamedTypeReference, TypeReference};

use super::members::{
    AccessModifier, AttributeData, GenericParameterData, MemberKind, ParameterData, ReturnData,
};
use super::{MemberDeclId, NamespaceDeclId, TypeDeclId};

/// The five type kinds, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKindTag {
    Enum,
    Delegate,
    Interface,
    Class,
    Struct,
}

impl std::fmt::Display for TypeKindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeKindTag::Enum => "enum",
            TypeKindTag::Delegate => "delegate",
            TypeKindTag::Interface => "interface",
            TypeKindTag::Class => "class",
            TypeKindTag::Struct => "struct",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Types grouped by kind, as owned by a namespace or a declaring type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeCollections {
    pub enums: Vec<TypeDeclId>,
    pub delegates: Vec<TypeDeclId>,
    pub interfaces: Vec<TypeDeclId>,
    pub classes: Vec<TypeDeclId>,
    pub structs: Vec<TypeDeclId>,
}

impl TypeCollections {
    pub(crate) fn push(&mut self, kind: TypeKindTag, id: TypeDeclId) {
        match kind {
            TypeKindTag::Enum => self.enums.push(id),
            TypeKindTag::Delegate => self.delegates.push(id),
            TypeKindTag::Interface => self.interfaces.push(id),
            TypeKindTag::Class => self.classes.push(id),
            TypeKindTag::Struct => self.structs.push(id),
        }
    }

    /// Enums, delegates, interfaces, classes, then structs.
    pub fn declared_types(&self) -> Vec<TypeDeclId> {
        self.enums
            .iter()
            .chain(&self.delegates)
            .chain(&self.interfaces)
            .chain(&self.classes)
            .chain(&self.structs)
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
            && self.delegates.is_empty()
            && self.interfaces.is_empty()
            && self.classes.is_empty()
            && self.structs.is_empty()
    }
}

/// Members of an interface, class or struct grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberCollections {
    pub constants: Vec<MemberDeclId>,
    pub fields: Vec<MemberDeclId>,
    pub constructors: Vec<MemberDeclId>,
    pub events: Vec<MemberDeclId>,
    pub properties: Vec<MemberDeclId>,
    pub methods: Vec<MemberDeclId>,
}

impl MemberCollections {
    pub(crate) fn push(&mut self, kind: &MemberKind, id: MemberDeclId) {
        let list = match kind {
            MemberKind::Constant(_) => &mut self.constants,
            MemberKind::Field(_) => &mut self.fields,
            MemberKind::Constructor(_) => &mut self.constructors,
            MemberKind::Event(_) => &mut self.events,
            MemberKind::Property(_) => &mut self.properties,
            MemberKind::Method(_) => &mut self.methods,
        };
        list.push(id);
    }

    /// Events, properties, then methods.
    pub fn members(&self) -> Vec<MemberDeclId> {
        self.events
            .iter()
            .chain(&self.properties)
            .chain(&self.methods)
            .copied()
            .collect()
    }

    /// Every member, constants and fields included.
    pub fn all(&self) -> Vec<MemberDeclId> {
        self.constants
            .iter()
            .chain(&self.fields)
            .chain(&self.constructors)
            .chain(&self.events)
            .chain(&self.properties)
            .chain(&self.methods)
            .copied()
            .collect()
    }
}

// ============================================================================
// Interface Implementations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationKind {
    /// A public member of the type with the interface member's signature.
    Implicit,
    /// A member qualified with the interface.
    Explicit,
    /// A public member inherited from a base class.
    Inherited,
}

/// How one member of an implemented interface is satisfied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceImplementation {
    pub interface: TypeReference,
    pub interface_member: MemberReference,
    pub interface_member_name: String,
    pub implementation: MemberReference,
    pub implementation_name: String,
    /// The implementing declaration when it is declared by this type.
    pub implementing_member: Option<MemberDeclId>,
    pub kind: ImplementationKind,
}

// ============================================================================
// Type Declarations
// ============================================================================

/// A declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDeclaration {
    pub id: TypeDeclId,
    pub name: String,
    /// For nested types, the namespace of the outermost declaring type.
    pub namespace: NamespaceDeclId,
    pub declaring_type: Option<TypeDeclId>,
    pub access: AccessModifier,
    pub attributes: Vec<AttributeData>,
    /// Own generic parameters; declaring types' parameters are excluded.
    pub generic_parameters: Vec<GenericParameterData>,
    pub canonical_name: String,
    pub reference: NamedTypeReference,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Enum(EnumData),
    Delegate(DelegateData),
    Interface(InterfaceData),
    Class(ClassData),
    Struct(StructData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumData {
    pub underlying_type: TypeReference,
    pub constants: Vec<MemberDeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegateData {
    pub parameters: Vec<ParameterData>,
    pub return_data: ReturnData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceData {
    pub base_interfaces: Vec<TypeReference>,
    pub members: MemberCollections,
    pub nested: TypeCollections,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassData {
    /// `None` only for the root of the hierarchy.
    pub base_class: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_static: bool,
    pub members: MemberCollections,
    pub nested: TypeCollections,
    pub interface_implementations: Vec<InterfaceImplementation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructData {
    pub interfaces: Vec<TypeReference>,
    pub members: MemberCollections,
    pub nested: TypeCollections,
    pub interface_implementations: Vec<InterfaceImplementation>,
}

impl TypeDeclaration {
    pub fn kind_tag(&self) -> TypeKindTag {
        match self.kind {
            TypeKind::Enum(_) => TypeKindTag::Enum,
            TypeKind::Delegate(_) => TypeKindTag::Delegate,
            TypeKind::Interface(_) => TypeKindTag::Interface,
            TypeKind::Class(_) => TypeKindTag::Class,
            TypeKind::Struct(_) => TypeKindTag::Struct,
        }
    }

    /// Member collections of interfaces, classes and structs.
    pub fn members(&self) -> Option<&MemberCollections> {
        match &self.kind {
            TypeKind::Interface(data) => Some(&data.members),
            TypeKind::Class(data) => Some(&data.members),
            TypeKind::Struct(data) => Some(&data.members),
            TypeKind::Enum(_) | TypeKind::Delegate(_) => None,
        }
    }

    pub(crate) fn members_mut(&mut self) -> Option<&mut MemberCollections> {
        match &mut self.kind {
            TypeKind::Interface(data) => Some(&mut data.members),
            TypeKind::Class(data) => Some(&mut data.members),
            TypeKind::Struct(data) => Some(&mut data.members),
            TypeKind::Enum(_) | TypeKind::Delegate(_) => None,
        }
    }

    /// Nested types of interfaces, classes and structs.
    pub fn nested(&self) -> Option<&TypeCollections> {
        match &self.kind {
            TypeKind::Interface(data) => Some(&data.nested),
            TypeKind::Class(data) => Some(&data.nested),
            TypeKind::Struct(data) => Some(&data.nested),
            TypeKind::Enum(_) | TypeKind::Delegate(_) => None,
        }
    }

    pub(crate) fn nested_mut(&mut self) -> Option<&mut TypeCollections> {
        match &mut self.kind {
            TypeKind::Interface(data) => Some(&mut data.nested),
            TypeKind::Class(data) => Some(&mut data.nested),
            TypeKind::Struct(data) => Some(&mut data.nested),
            TypeKind::Enum(_) | TypeKind::Delegate(_) => None,
        }
    }

    /// Interface implementations of classes and structs.
    pub fn interface_implementations(&self) -> &[InterfaceImplementation] {
        match &self.kind {
            TypeKind::Class(data) => &data.interface_implementations,
            TypeKind::Struct(data) => &data.interface_implementations,
            _ => &[],
        }
    }

    pub(crate) fn set_interface_implementations(
        &mut self,
        implementations: Vec<InterfaceImplementation>,
    ) {
        match &mut self.kind {
            TypeKind::Class(data) => data.interface_implementations = implementations,
            TypeKind::Struct(data) => data.interface_implementations = implementations,
            _ => {}
        }
    }
}

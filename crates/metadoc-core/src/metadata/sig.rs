//! Structural signatures: type mentions, live handles and constant values.
//!
//! A [`TypeSig`] is how the metadata store mentions a type: a named definition
//! (optionally instantiated with generic arguments), a wrapper around another
//! signature (array, pointer, by-reference), a generic parameter, or one of the
//! `void`/`dynamic` sentinels. A [`Handle`] is any reflected entity the rest of
//! the system can ask about.

use serde::{Deserialize, Serialize};

use super::{EventId, FieldId, GenericParamId, MethodId, ModuleId, PropertyId, TypeDefId};

// ============================================================================
// Type Signatures
// ============================================================================

/// A type as mentioned by a signature (base type, parameter, constraint, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSig {
    /// A named type definition. `args` is the full generic argument list
    /// (declaring types' arguments first); empty for non-generic types and
    /// for open generic definitions.
    Named { def: TypeDefId, args: Vec<TypeSig> },
    /// An array. Rank 1 is a single-dimension (vector) array.
    Array { item: Box<TypeSig>, rank: u32 },
    /// An unmanaged pointer.
    Pointer(Box<TypeSig>),
    /// A by-reference type (`ref`/`out`/`in` parameters).
    ByRef(Box<TypeSig>),
    /// A generic parameter of a type or of a method.
    GenericParam(GenericParamId),
    /// The no-type sentinel.
    Void,
    /// A `dynamic`-typed mention.
    Dynamic,
}

impl TypeSig {
    /// A non-generic (or open generic) named type.
    pub fn named(def: TypeDefId) -> Self {
        TypeSig::Named {
            def,
            args: Vec::new(),
        }
    }

    /// A closed (or partially closed) generic instantiation.
    pub fn generic(def: TypeDefId, args: Vec<TypeSig>) -> Self {
        TypeSig::Named { def, args }
    }

    /// A single-dimension array of `item`.
    pub fn array(item: TypeSig) -> Self {
        TypeSig::Array {
            item: Box::new(item),
            rank: 1,
        }
    }

    /// A multi-dimension array of `item`.
    pub fn array_of_rank(item: TypeSig, rank: u32) -> Self {
        TypeSig::Array {
            item: Box::new(item),
            rank,
        }
    }

    /// A pointer to `referent`.
    pub fn pointer(referent: TypeSig) -> Self {
        TypeSig::Pointer(Box::new(referent))
    }

    /// A by-reference wrapper around `referent`.
    pub fn by_ref(referent: TypeSig) -> Self {
        TypeSig::ByRef(Box::new(referent))
    }

    /// A generic parameter mention.
    pub fn param(param: GenericParamId) -> Self {
        TypeSig::GenericParam(param)
    }

    /// Whether this is a by-reference wrapper.
    pub fn is_by_ref(&self) -> bool {
        matches!(self, TypeSig::ByRef(_))
    }

    /// The definition of a named type, if this is one.
    pub fn definition(&self) -> Option<TypeDefId> {
        match self {
            TypeSig::Named { def, .. } => Some(*def),
            _ => None,
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

/// A live reflected entity.
///
/// Handles are cheap to clone and compare; they are only meaningful together
/// with the [`Metadata`](super::Metadata) store that issued their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
    Module(ModuleId),
    Type(TypeSig),
    Field(FieldId),
    Method(MethodId),
    Property(PropertyId),
    Event(EventId),
}

impl From<TypeSig> for Handle {
    fn from(sig: TypeSig) -> Self {
        Handle::Type(sig)
    }
}

impl From<TypeDefId> for Handle {
    fn from(def: TypeDefId) -> Self {
        Handle::Type(TypeSig::named(def))
    }
}

impl From<FieldId> for Handle {
    fn from(id: FieldId) -> Self {
        Handle::Field(id)
    }
}

impl From<MethodId> for Handle {
    fn from(id: MethodId) -> Self {
        Handle::Method(id)
    }
}

impl From<PropertyId> for Handle {
    fn from(id: PropertyId) -> Self {
        Handle::Property(id)
    }
}

impl From<EventId> for Handle {
    fn from(id: EventId) -> Self {
        Handle::Event(id)
    }
}

// ============================================================================
// Constant Values
// ============================================================================

/// A constant stored in metadata (literal field, default parameter value,
/// attribute argument).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Char(char),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    String(String),
}

/// An attribute argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Constant(ConstantValue),
    /// A `typeof(...)` argument.
    Type(TypeSig),
    Array(Vec<AttributeValue>),
}

/// A positional attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArgument {
    pub value_type: TypeSig,
    pub value: AttributeValue,
}

/// A named (field or property) attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAttributeArgument {
    pub name: String,
    pub value_type: TypeSig,
    pub value: AttributeValue,
}

/// A declarative annotation applied to a module, type, member or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub attribute_type: TypeSig,
    /// The constructor used; provides names for positional arguments.
    pub constructor: Option<MethodId>,
    pub positional: Vec<AttributeArgument>,
    pub named: Vec<NamedAttributeArgument>,
}

impl AttributeInfo {
    /// An attribute applied with no arguments.
    pub fn new(attribute_type: TypeSig) -> Self {
        AttributeInfo {
            attribute_type,
            constructor: None,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Set the constructor the attribute was applied with.
    pub fn with_constructor(mut self, constructor: MethodId) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Append a positional argument.
    pub fn with_positional(mut self, value_type: TypeSig, value: AttributeValue) -> Self {
        self.positional.push(AttributeArgument { value_type, value });
        self
    }

    /// Append a named argument.
    pub fn with_named(
        mut self,
        name: impl Into<String>,
        value_type: TypeSig,
        value: AttributeValue,
    ) -> Self {
        self.named.push(NamedAttributeArgument {
            name: name.into(),
            value_type,
            value,
        });
        self
    }
}

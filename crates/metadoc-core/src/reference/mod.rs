//! Reference data: detached, structurally comparable identities of reflected
//! entities.
//!
//! Reference data is what the declaration graph stores wherever a type or
//! member is *mentioned* (a base type, a parameter type, an attribute type)
//! rather than *declared*. Values carry names and declaring chains instead of
//! store ids, so two values built independently for the same entity compare
//! equal, and a value can be matched against (or resolved back to) a live
//! [`Handle`](crate::metadata::Handle) through the [`ReferenceFactory`].
//!
//! # Families
//!
//! - [`TypeReference`]: named types, arrays, pointers, by-reference wrappers,
//!   generic parameters, `void` and `dynamic`
//! - [`MemberReference`]: constants, fields, constructors, events, properties
//!   and methods
//! - [`ModuleReference`] and [`NamespaceReference`]
//!
//! # Printing
//!
//! `Display` on [`TypeReference`] renders the type-signature form used inside
//! canonical name parameter lists (`System.Int32[]`, `N.Outer{``0}.Inner{...}`,
//! `` `0 ``, ` ``0 `, `System.Int32@`).
//!
//! # Dynamic
//!
//! [`TypeReference::Dynamic`] compares equal to `System.Object` and to
//! `System.Dynamic.IDynamicMetaObjectProvider`, the types a `dynamic` mention
//! is backed by. That comparison is not transitive, so `TypeReference` is only
//! `PartialEq`.

mod factory;

pub use factory::ReferenceFactory;

use std::fmt;

use serde::Serialize;

// ============================================================================
// Module and Namespace
// ============================================================================

/// Identity of a compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleReference {
    pub name: String,
    pub version: String,
    /// Empty for the neutral culture.
    pub culture: String,
    pub public_key_token: Option<String>,
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let culture = if self.culture.is_empty() {
            "neutral"
        } else {
            self.culture.as_str()
        };
        write!(
            f,
            "{}, Version={}, Culture={}, PublicKeyToken={}",
            self.name,
            self.version,
            culture,
            self.public_key_token.as_deref().unwrap_or("null")
        )
    }
}

/// Identity of a namespace within a module. The global namespace has an
/// empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamespaceReference {
    pub name: String,
    pub module: ModuleReference,
}

// ============================================================================
// Types
// ============================================================================

/// A type mention.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeReference {
    Named(NamedTypeReference),
    Array(ArrayTypeReference),
    Pointer(PointerTypeReference),
    ByRef(ByRefTypeReference),
    GenericTypeParameter(GenericTypeParameterReference),
    GenericMethodParameter(GenericMethodParameterReference),
    Void,
    Dynamic,
}

/// An ordinary named type, possibly a generic instantiation.
///
/// `generic_arguments` holds this level's own arguments only; the declaring
/// type carries its own. Open generic definitions list their parameters as
/// arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTypeReference {
    pub name: String,
    pub namespace: String,
    pub declaring_type: Option<Box<NamedTypeReference>>,
    pub generic_arguments: Vec<TypeReference>,
    pub module: ModuleReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayTypeReference {
    pub item_type: Box<TypeReference>,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerTypeReference {
    pub referent_type: Box<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByRefTypeReference {
    pub referent_type: Box<TypeReference>,
}

/// A generic parameter declared by a type.
///
/// `declaring_type` is the bare definition (no generic arguments), which keeps
/// the value finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericTypeParameterReference {
    pub name: String,
    pub position: usize,
    pub declaring_type: Box<NamedTypeReference>,
}

/// A generic parameter declared by a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericMethodParameterReference {
    pub name: String,
    pub position: usize,
    pub declaring_method: DeclaringMethodReference,
}

/// Identity of the method declaring a generic parameter: declaring type,
/// name and rendered parameter list (method parameters print positionally, so
/// the signature does not refer back to the method).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaringMethodReference {
    pub declaring_type: Box<NamedTypeReference>,
    pub name: String,
    pub signature: String,
}

impl PartialEq for TypeReference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeReference::Named(a), TypeReference::Named(b)) => a == b,
            (TypeReference::Array(a), TypeReference::Array(b)) => a == b,
            (TypeReference::Pointer(a), TypeReference::Pointer(b)) => a == b,
            (TypeReference::ByRef(a), TypeReference::ByRef(b)) => a == b,
            (TypeReference::GenericTypeParameter(a), TypeReference::GenericTypeParameter(b)) => {
                a == b
            }
            (
                TypeReference::GenericMethodParameter(a),
                TypeReference::GenericMethodParameter(b),
            ) => a == b,
            (TypeReference::Void, TypeReference::Void) => true,
            (TypeReference::Dynamic, TypeReference::Dynamic) => true,
            (TypeReference::Dynamic, TypeReference::Named(named))
            | (TypeReference::Named(named), TypeReference::Dynamic) => named.backs_dynamic(),
            _ => false,
        }
    }
}

impl NamedTypeReference {
    /// Whether this is one of the types a `dynamic` mention compares equal to.
    pub fn backs_dynamic(&self) -> bool {
        self.declaring_type.is_none()
            && self.generic_arguments.is_empty()
            && matches!(
                (self.namespace.as_str(), self.name.as_str()),
                ("System", "Object") | ("System.Dynamic", "IDynamicMetaObjectProvider")
            )
    }

    /// Whether this is the top-level type `namespace.name`.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.declaring_type.is_none() && self.namespace == namespace && self.name == name
    }

    /// The namespace of the outermost declaring type.
    pub fn root_namespace(&self) -> &str {
        match &self.declaring_type {
            Some(declaring) => declaring.root_namespace(),
            None => &self.namespace,
        }
    }

    /// Total number of generic arguments across the declaring chain.
    pub fn total_arity(&self) -> usize {
        self.generic_arguments.len()
            + self
                .declaring_type
                .as_ref()
                .map(|d| d.total_arity())
                .unwrap_or(0)
    }
}

impl TypeReference {
    /// The named reference, if this is one.
    pub fn as_named(&self) -> Option<&NamedTypeReference> {
        match self {
            TypeReference::Named(named) => Some(named),
            _ => None,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeReference]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for NamedTypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declaring_type {
            Some(declaring) => write!(f, "{declaring}.")?,
            None if !self.namespace.is_empty() => write!(f, "{}.", self.namespace)?,
            None => {}
        }
        f.write_str(&self.name)?;
        if !self.generic_arguments.is_empty() {
            f.write_str("{")?;
            write_joined(f, &self.generic_arguments)?;
            f.write_str("}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Named(named) => write!(f, "{named}"),
            TypeReference::Array(array) => {
                write!(f, "{}", array.item_type)?;
                if array.rank <= 1 {
                    f.write_str("[]")
                } else {
                    let bounds = vec!["0:"; array.rank as usize].join(",");
                    write!(f, "[{bounds}]")
                }
            }
            TypeReference::Pointer(pointer) => write!(f, "{}*", pointer.referent_type),
            TypeReference::ByRef(by_ref) => write!(f, "{}@", by_ref.referent_type),
            TypeReference::GenericTypeParameter(param) => write!(f, "`{}", param.position),
            TypeReference::GenericMethodParameter(param) => write!(f, "``{}", param.position),
            TypeReference::Void => f.write_str("System.Void"),
            TypeReference::Dynamic => f.write_str("System.Object"),
        }
    }
}

// ============================================================================
// Members
// ============================================================================

/// A member mention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberReference {
    Constant(FieldReference),
    Field(FieldReference),
    Constructor(ConstructorReference),
    Event(EventReference),
    Property(PropertyReference),
    Method(MethodReference),
}

/// A field or constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReference {
    pub name: String,
    pub declaring_type: NamedTypeReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorReference {
    pub declaring_type: NamedTypeReference,
    pub is_static: bool,
    pub parameter_types: Vec<TypeReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReference {
    pub name: String,
    pub declaring_type: NamedTypeReference,
    pub explicit_interface: Option<Box<TypeReference>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyReference {
    pub name: String,
    pub declaring_type: NamedTypeReference,
    pub parameter_types: Vec<TypeReference>,
    pub explicit_interface: Option<Box<TypeReference>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodReference {
    pub name: String,
    pub declaring_type: NamedTypeReference,
    pub generic_arguments: Vec<TypeReference>,
    pub parameter_types: Vec<TypeReference>,
    pub return_type: Box<TypeReference>,
    pub explicit_interface: Option<Box<TypeReference>>,
    /// Set for `op_Implicit`/`op_Explicit`, whose return type is part of
    /// their identity.
    pub is_conversion_operator: bool,
}

impl MemberReference {
    /// The type declaring the member.
    pub fn declaring_type(&self) -> &NamedTypeReference {
        match self {
            MemberReference::Constant(r) | MemberReference::Field(r) => &r.declaring_type,
            MemberReference::Constructor(r) => &r.declaring_type,
            MemberReference::Event(r) => &r.declaring_type,
            MemberReference::Property(r) => &r.declaring_type,
            MemberReference::Method(r) => &r.declaring_type,
        }
    }
}

// ============================================================================
// Reference Data
// ============================================================================

/// Any reference data value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ReferenceData {
    Type(TypeReference),
    Member(MemberReference),
    Module(ModuleReference),
    Namespace(NamespaceReference),
}

impl From<TypeReference> for ReferenceData {
    fn from(reference: TypeReference) -> Self {
        ReferenceData::Type(reference)
    }
}

impl From<MemberReference> for ReferenceData {
    fn from(reference: MemberReference) -> Self {
        ReferenceData::Member(reference)
    }
}

impl From<ModuleReference> for ReferenceData {
    fn from(reference: ModuleReference) -> Self {
        ReferenceData::Module(reference)
    }
}

impl From<NamespaceReference> for ReferenceData {
    fn from(reference: NamespaceReference) -> Self {
        ReferenceData::Namespace(reference)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn corlib() -> ModuleReference {
        ModuleReference {
            name: "System.Runtime".to_string(),
            version: "8.0.0.0".to_string(),
            culture: String::new(),
            public_key_token: Some("b03f5f7f11d50a3a".to_string()),
        }
    }

    fn system(name: &str) -> NamedTypeReference {
        NamedTypeReference {
            name: name.to_string(),
            namespace: "System".to_string(),
            declaring_type: None,
            generic_arguments: Vec::new(),
            module: corlib(),
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn arrays_render_rank() {
            let item = TypeReference::Named(system("Int32"));
            let vector = TypeReference::Array(ArrayTypeReference {
                item_type: Box::new(item.clone()),
                rank: 1,
            });
            let matrix = TypeReference::Array(ArrayTypeReference {
                item_type: Box::new(item),
                rank: 3,
            });

            assert_eq!(vector.to_string(), "System.Int32[]");
            assert_eq!(matrix.to_string(), "System.Int32[0:,0:,0:]");
        }

        #[test]
        fn wrappers_and_sentinels() {
            let by_ref = TypeReference::ByRef(ByRefTypeReference {
                referent_type: Box::new(TypeReference::Pointer(PointerTypeReference {
                    referent_type: Box::new(TypeReference::Named(system("Byte"))),
                })),
            });

            assert_eq!(by_ref.to_string(), "System.Byte*@");
            assert_eq!(TypeReference::Void.to_string(), "System.Void");
            assert_eq!(TypeReference::Dynamic.to_string(), "System.Object");
        }

        #[test]
        fn module_reference_display_uses_neutral_culture() {
            assert_eq!(
                corlib().to_string(),
                "System.Runtime, Version=8.0.0.0, Culture=neutral, PublicKeyToken=b03f5f7f11d50a3a"
            );
        }
    }

    mod equality_tests {
        use super::*;

        #[test]
        fn dynamic_equals_object_both_ways() {
            let object = TypeReference::Named(system("Object"));
            assert_eq!(TypeReference::Dynamic, object);
            assert_eq!(object, TypeReference::Dynamic);
            assert_ne!(TypeReference::Dynamic, TypeReference::Named(system("String")));
        }

        #[test]
        fn named_equality_is_structural() {
            let a = system("Int32");
            let b = system("Int32");
            assert_eq!(a, b);

            let mut other_module = system("Int32");
            other_module.module.version = "4.0.0.0".to_string();
            assert_ne!(a, other_module);
        }

        #[test]
        fn total_arity_counts_declaring_chain() {
            let mut outer = system("Outer");
            outer.generic_arguments.push(TypeReference::Named(system("Int32")));
            let mut inner = system("Inner");
            inner.declaring_type = Some(Box::new(outer));
            inner.generic_arguments.push(TypeReference::Named(system("Byte")));
            inner.generic_arguments.push(TypeReference::Named(system("Byte")));

            assert_eq!(inner.total_arity(), 3);
            assert_eq!(inner.root_namespace(), "System");
            assert_eq!(
                inner.to_string(),
                "System.Outer{System.Int32}.Inner{System.Byte,System.Byte}"
            );
        }
    }
}

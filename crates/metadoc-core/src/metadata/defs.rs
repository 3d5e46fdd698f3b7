//! Definition rows of the metadata store.
//!
//! Each row mirrors what a reflection source reports for one entity. The
//! chainable `with_*`/`as_*` constructors follow the flag combinations a
//! compiler emits, so `MethodDef::new("M").as_override()` is what an
//! `override` method looks like in metadata (virtual, reusing its slot).

use serde::{Deserialize, Serialize};

use super::sig::{AttributeInfo, ConstantValue, TypeSig};
use super::{EventId, FieldId, GenericParamId, MethodId, ModuleId, PropertyId, TypeDefId};

/// Name of instance constructors in metadata.
pub const CONSTRUCTOR_NAME: &str = ".ctor";
/// Name of static (type) constructors in metadata.
pub const STATIC_CONSTRUCTOR_NAME: &str = ".cctor";

// ============================================================================
// Accessibility
// ============================================================================

/// Visibility flags of a type or member as stored in metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Accessibility {
    #[default]
    Public,
    /// `protected`
    Family,
    /// `internal`
    Assembly,
    /// `protected internal`
    FamilyOrAssembly,
    /// `private protected`
    FamilyAndAssembly,
    Private,
}

impl Accessibility {
    /// Rank used to pick the most accessible of several accessors.
    pub fn openness(self) -> u8 {
        match self {
            Accessibility::Public => 5,
            Accessibility::FamilyOrAssembly => 4,
            Accessibility::Family => 3,
            Accessibility::Assembly => 2,
            Accessibility::FamilyAndAssembly => 1,
            Accessibility::Private => 0,
        }
    }
}

// ============================================================================
// Module
// ============================================================================

/// A compiled module (assembly manifest).
#[derive(Debug, Clone)]
pub struct ModuleDef {
    pub id: ModuleId,
    pub name: String,
    pub version: String,
    /// Empty for the neutral culture.
    pub culture: String,
    /// Lower-case hex, `None` for unsigned modules.
    pub public_key_token: Option<String>,
    /// Modules this one references.
    pub references: Vec<ModuleId>,
    /// Top-level types in declaration order.
    pub types: Vec<TypeDefId>,
    pub attributes: Vec<AttributeInfo>,
}

impl ModuleDef {
    /// A module with the given name and version, neutral culture, unsigned.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        ModuleDef {
            id: ModuleId::new(0),
            name: name.into(),
            version: version.into(),
            culture: String::new(),
            public_key_token: None,
            references: Vec::new(),
            types: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = culture.into();
        self
    }

    pub fn with_public_key_token(mut self, token: impl Into<String>) -> Self {
        self.public_key_token = Some(token.into());
        self
    }

    pub fn with_reference(mut self, module: ModuleId) -> Self {
        self.references.push(module);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }
}

// ============================================================================
// Type
// ============================================================================

/// A type definition.
///
/// The kind (enum, delegate, interface, class, struct) is not stored; it is
/// derived from `is_interface` and the base type, the way a reflection source
/// exposes it.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub id: TypeDefId,
    pub module: ModuleId,
    /// Namespace; nested types report their top-level type's namespace.
    pub namespace: String,
    /// Simple name without the generic arity suffix.
    pub name: String,
    pub declaring_type: Option<TypeDefId>,
    pub access: Accessibility,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub base_type: Option<TypeSig>,
    /// Every implemented interface, including those inherited by interfaces.
    pub interfaces: Vec<TypeSig>,
    /// Own generic parameters (declaring types' parameters excluded).
    pub generic_params: Vec<GenericParamId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    pub properties: Vec<PropertyId>,
    pub events: Vec<EventId>,
    pub nested_types: Vec<TypeDefId>,
    pub attributes: Vec<AttributeInfo>,
}

impl TypeDef {
    /// A public, non-abstract type with no base type.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDef {
            id: TypeDefId::new(0),
            module: ModuleId::new(0),
            namespace: namespace.into(),
            name: name.into(),
            declaring_type: None,
            access: Accessibility::Public,
            is_interface: false,
            is_abstract: false,
            is_sealed: false,
            base_type: None,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            nested_types: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// A nested type; namespace and module are taken from the declaring type
    /// when it is added to the store.
    pub fn nested(name: impl Into<String>) -> Self {
        TypeDef::new("", name)
    }

    /// An interface (abstract, no base type).
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut def = TypeDef::new(namespace, name);
        def.is_interface = true;
        def.is_abstract = true;
        def
    }

    pub fn with_base(mut self, base: TypeSig) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn with_interface(mut self, interface: TypeSig) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_access(mut self, access: Accessibility) -> Self {
        self.access = access;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn as_sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// `static class`: abstract and sealed.
    pub fn as_static(self) -> Self {
        self.as_abstract().as_sealed()
    }

    /// Whether the name marks a compiler-generated type.
    pub fn is_compiler_generated(&self) -> bool {
        self.name.starts_with('<')
    }
}

// ============================================================================
// Field
// ============================================================================

/// A field or a literal (constant) field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub id: FieldId,
    pub declaring_type: TypeDefId,
    pub name: String,
    pub field_type: TypeSig,
    pub access: Accessibility,
    pub is_static: bool,
    /// Compile-time constant (`const`, enum members).
    pub is_literal: bool,
    /// `readonly`
    pub is_init_only: bool,
    pub constant: Option<ConstantValue>,
    pub attributes: Vec<AttributeInfo>,
}

impl FieldDef {
    /// A public instance field.
    pub fn new(name: impl Into<String>, field_type: TypeSig) -> Self {
        FieldDef {
            id: FieldId::new(0),
            declaring_type: TypeDefId::new(0),
            name: name.into(),
            field_type,
            access: Accessibility::Public,
            is_static: false,
            is_literal: false,
            is_init_only: false,
            constant: None,
            attributes: Vec::new(),
        }
    }

    /// A public constant; literals are always static.
    pub fn constant(name: impl Into<String>, field_type: TypeSig, value: ConstantValue) -> Self {
        let mut field = FieldDef::new(name, field_type);
        field.is_static = true;
        field.is_literal = true;
        field.constant = Some(value);
        field
    }

    pub fn with_access(mut self, access: Accessibility) -> Self {
        self.access = access;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_read_only(mut self) -> Self {
        self.is_init_only = true;
        self
    }
}

// ============================================================================
// Method
// ============================================================================

/// A method, constructor or accessor.
#[derive(Debug, Clone)]
pub struct MethodDef {
    pub id: MethodId,
    pub declaring_type: TypeDefId,
    /// Simple name; explicit implementations keep the interface apart in
    /// `explicit_interface`.
    pub name: String,
    pub access: Accessibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    /// Cannot be overridden further.
    pub is_final: bool,
    /// Introduces a new virtual slot instead of reusing an inherited one.
    pub is_new_slot: bool,
    pub is_special_name: bool,
    pub return_type: TypeSig,
    pub return_attributes: Vec<AttributeInfo>,
    pub parameters: Vec<ParamDef>,
    pub generic_params: Vec<GenericParamId>,
    pub explicit_interface: Option<TypeSig>,
    pub attributes: Vec<AttributeInfo>,
}

impl MethodDef {
    /// A public, non-virtual instance method returning `void`.
    pub fn new(name: impl Into<String>) -> Self {
        MethodDef {
            id: MethodId::new(0),
            declaring_type: TypeDefId::new(0),
            name: name.into(),
            access: Accessibility::Public,
            is_static: false,
            is_abstract: false,
            is_virtual: false,
            is_final: false,
            is_new_slot: false,
            is_special_name: false,
            return_type: TypeSig::Void,
            return_attributes: Vec::new(),
            parameters: Vec::new(),
            generic_params: Vec::new(),
            explicit_interface: None,
            attributes: Vec::new(),
        }
    }

    /// A public instance constructor.
    pub fn constructor() -> Self {
        MethodDef::new(CONSTRUCTOR_NAME).as_special_name()
    }

    /// A static (type) constructor.
    pub fn static_constructor() -> Self {
        MethodDef::new(STATIC_CONSTRUCTOR_NAME)
            .as_special_name()
            .as_static()
            .with_access(Accessibility::Private)
    }

    /// An accessor or operator method (`get_X`, `op_Implicit`, ...).
    pub fn special(name: impl Into<String>) -> Self {
        MethodDef::new(name).as_special_name()
    }

    pub fn returning(mut self, return_type: TypeSig) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_param(mut self, param: ParamDef) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_access(mut self, access: Accessibility) -> Self {
        self.access = access;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_return_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.return_attributes.push(attribute);
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_special_name(mut self) -> Self {
        self.is_special_name = true;
        self
    }

    /// `virtual`: a new overridable slot.
    pub fn as_virtual(mut self) -> Self {
        self.is_virtual = true;
        self.is_new_slot = true;
        self
    }

    /// `abstract` (also how interface members are emitted).
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self.is_virtual = true;
        self.is_new_slot = true;
        self
    }

    /// `override`: virtual, reusing the inherited slot.
    pub fn as_override(mut self) -> Self {
        self.is_virtual = true;
        self.is_new_slot = false;
        self
    }

    /// `sealed override`.
    pub fn as_sealed_override(self) -> Self {
        let mut method = self.as_override();
        method.is_final = true;
        method
    }

    /// A non-virtual method that implicitly implements an interface member.
    pub fn as_interface_implementation(mut self) -> Self {
        self.is_virtual = true;
        self.is_new_slot = true;
        self.is_final = true;
        self
    }

    /// An explicit implementation of a member of `interface`.
    pub fn explicitly_implementing(mut self, interface: TypeSig) -> Self {
        self.access = Accessibility::Private;
        self.is_virtual = true;
        self.is_new_slot = true;
        self.is_final = true;
        self.explicit_interface = Some(interface);
        self
    }

    /// Whether this is an instance or static constructor.
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME || self.name == STATIC_CONSTRUCTOR_NAME
    }

    /// Whether this is a user-defined conversion operator.
    pub fn is_conversion_operator(&self) -> bool {
        self.is_special_name && (self.name == "op_Implicit" || self.name == "op_Explicit")
    }
}

/// A method parameter.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: String,
    /// By-reference parameters carry a [`TypeSig::ByRef`] here.
    pub param_type: TypeSig,
    pub is_in: bool,
    pub is_out: bool,
    pub is_optional: bool,
    pub default_value: Option<ConstantValue>,
    pub attributes: Vec<AttributeInfo>,
}

impl ParamDef {
    /// A by-value parameter.
    pub fn new(name: impl Into<String>, param_type: TypeSig) -> Self {
        ParamDef {
            name: name.into(),
            param_type,
            is_in: false,
            is_out: false,
            is_optional: false,
            default_value: None,
            attributes: Vec::new(),
        }
    }

    /// A `ref` parameter.
    pub fn by_ref(name: impl Into<String>, referent: TypeSig) -> Self {
        ParamDef::new(name, TypeSig::by_ref(referent))
    }

    /// An `out` parameter.
    pub fn out(name: impl Into<String>, referent: TypeSig) -> Self {
        let mut param = ParamDef::by_ref(name, referent);
        param.is_out = true;
        param
    }

    /// An `in` (read-only by-reference) parameter.
    pub fn in_ref(name: impl Into<String>, referent: TypeSig) -> Self {
        let mut param = ParamDef::by_ref(name, referent);
        param.is_in = true;
        param
    }

    /// An optional parameter with a default value.
    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.is_optional = true;
        self.default_value = Some(value);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }
}

// ============================================================================
// Property and Event
// ============================================================================

/// A property or indexer; flags and visibility come from its accessors.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub id: PropertyId,
    pub declaring_type: TypeDefId,
    pub name: String,
    pub property_type: TypeSig,
    pub getter: Option<MethodId>,
    pub setter: Option<MethodId>,
    pub explicit_interface: Option<TypeSig>,
    pub attributes: Vec<AttributeInfo>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, property_type: TypeSig) -> Self {
        PropertyDef {
            id: PropertyId::new(0),
            declaring_type: TypeDefId::new(0),
            name: name.into(),
            property_type,
            getter: None,
            setter: None,
            explicit_interface: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_getter(mut self, getter: MethodId) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn with_setter(mut self, setter: MethodId) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn with_explicit_interface(mut self, interface: TypeSig) -> Self {
        self.explicit_interface = Some(interface);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// An event; flags and visibility come from its adder.
#[derive(Debug, Clone)]
pub struct EventDef {
    pub id: EventId,
    pub declaring_type: TypeDefId,
    pub name: String,
    pub event_type: TypeSig,
    pub adder: Option<MethodId>,
    pub remover: Option<MethodId>,
    pub explicit_interface: Option<TypeSig>,
    pub attributes: Vec<AttributeInfo>,
}

impl EventDef {
    pub fn new(name: impl Into<String>, event_type: TypeSig) -> Self {
        EventDef {
            id: EventId::new(0),
            declaring_type: TypeDefId::new(0),
            name: name.into(),
            event_type,
            adder: None,
            remover: None,
            explicit_interface: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_accessors(mut self, adder: MethodId, remover: MethodId) -> Self {
        self.adder = Some(adder);
        self.remover = Some(remover);
        self
    }

    pub fn with_explicit_interface(mut self, interface: TypeSig) -> Self {
        self.explicit_interface = Some(interface);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }
}

// ============================================================================
// Generic Parameters
// ============================================================================

/// The entity declaring a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    Type(TypeDefId),
    Method(MethodId),
}

/// A generic parameter with its variance and constraints.
#[derive(Debug, Clone)]
pub struct GenericParamDef {
    pub id: GenericParamId,
    pub owner: GenericOwner,
    pub name: String,
    /// Absolute position; type parameters of nested types count their
    /// declaring types' parameters first.
    pub position: usize,
    pub is_covariant: bool,
    pub is_contravariant: bool,
    /// `class`
    pub reference_type_constraint: bool,
    /// `struct`
    pub not_nullable_value_type_constraint: bool,
    /// `new()`; compilers also set it for `struct`.
    pub default_constructor_constraint: bool,
    /// `unmanaged`
    pub unmanaged_constraint: bool,
    /// Type constraints in declaration order.
    pub constraints: Vec<TypeSig>,
    pub attributes: Vec<AttributeInfo>,
}

impl GenericParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        GenericParamDef {
            id: GenericParamId::new(0),
            owner: GenericOwner::Type(TypeDefId::new(0)),
            name: name.into(),
            position: 0,
            is_covariant: false,
            is_contravariant: false,
            reference_type_constraint: false,
            not_nullable_value_type_constraint: false,
            default_constructor_constraint: false,
            unmanaged_constraint: false,
            constraints: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// `out T`
    pub fn covariant(mut self) -> Self {
        self.is_covariant = true;
        self
    }

    /// `in T`
    pub fn contravariant(mut self) -> Self {
        self.is_contravariant = true;
        self
    }

    /// `where T : class`
    pub fn with_class_constraint(mut self) -> Self {
        self.reference_type_constraint = true;
        self
    }

    /// `where T : struct`, as compilers emit it.
    pub fn with_struct_constraint(mut self, value_type: TypeSig) -> Self {
        self.not_nullable_value_type_constraint = true;
        self.default_constructor_constraint = true;
        self.constraints.push(value_type);
        self
    }

    /// `where T : unmanaged`, as compilers emit it.
    pub fn with_unmanaged_constraint(self, value_type: TypeSig) -> Self {
        let mut param = self.with_struct_constraint(value_type);
        param.unmanaged_constraint = true;
        param
    }

    /// `where T : new()`
    pub fn with_new_constraint(mut self) -> Self {
        self.default_constructor_constraint = true;
        self
    }

    pub fn with_constraint(mut self, constraint: TypeSig) -> Self {
        self.constraints.push(constraint);
        self
    }
}

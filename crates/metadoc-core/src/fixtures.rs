//! Metadata fixtures shared by unit and integration tests.
//!
//! [`Corlib`] adds the handful of system types every module leans on
//! (`System.Object`, the primitive structs, `IDisposable`, the enumerable
//! interfaces, a few attributes). [`Sample`] adds a module `Sample` with
//! namespace `N` holding one of every shape the builder and the canonical
//! name grammar distinguish: enums, delegates, interfaces with shadowing,
//! an abstract base class, a generic class with overrides, shadowing members,
//! an indexer and explicit interface implementations, a struct with a
//! conversion operator, nested generic types, constrained and variant generic
//! parameters, and a type in the global namespace.

use crate::canonical::CanonicalNameResolver;
use crate::metadata::{
    Accessibility, AttributeInfo, AttributeValue, ConstantValue, EventDef, EventId, FieldDef,
    FieldId, GenericOwner, GenericParamDef, GenericParamId, Metadata, MethodDef, MethodId,
    ModuleDef, ModuleId, ParamDef, PropertyDef, PropertyId, TypeDef, TypeDefId, TypeSig,
};

fn named(def: TypeDefId) -> TypeSig {
    TypeSig::named(def)
}

/// Add a get-only (or get/set) property with its accessors.
fn add_property(
    metadata: &mut Metadata,
    owner: TypeDefId,
    name: &str,
    property_type: TypeSig,
    getter: MethodDef,
    setter: Option<MethodDef>,
) -> PropertyId {
    let get = metadata.add_method(owner, getter.returning(property_type.clone()));
    let mut property = PropertyDef::new(name, property_type.clone()).with_getter(get);
    if let Some(setter) = setter {
        let set =
            metadata.add_method(owner, setter.with_param(ParamDef::new("value", property_type)));
        property = property.with_setter(set);
    }
    metadata.add_property(owner, property)
}

/// Add an event with add/remove accessors shaped by `accessor`.
fn add_event(
    metadata: &mut Metadata,
    owner: TypeDefId,
    name: &str,
    event_type: TypeSig,
    accessor: impl Fn(MethodDef) -> MethodDef,
) -> EventId {
    let adder = metadata.add_method(
        owner,
        accessor(MethodDef::special(format!("add_{name}")))
            .with_param(ParamDef::new("value", event_type.clone())),
    );
    let remover = metadata.add_method(
        owner,
        accessor(MethodDef::special(format!("remove_{name}")))
            .with_param(ParamDef::new("value", event_type.clone())),
    );
    metadata.add_event(owner, EventDef::new(name, event_type).with_accessors(adder, remover))
}

// ============================================================================
// Corlib
// ============================================================================

/// Ids of the system types added by [`Corlib::add`].
#[derive(Debug, Clone)]
pub struct Corlib {
    pub module: ModuleId,
    pub object: TypeDefId,
    pub value_type: TypeDefId,
    pub enum_type: TypeDefId,
    pub delegate: TypeDefId,
    pub multicast_delegate: TypeDefId,
    pub attribute: TypeDefId,
    pub type_type: TypeDefId,
    pub int32: TypeDefId,
    pub int64: TypeDefId,
    pub byte: TypeDefId,
    pub boolean: TypeDefId,
    pub int_ptr: TypeDefId,
    pub string: TypeDefId,
    pub i_disposable: TypeDefId,
    pub i_enumerator: TypeDefId,
    pub i_enumerable: TypeDefId,
    pub i_enumerator_t: TypeDefId,
    pub i_enumerable_t: TypeDefId,
    pub i_dynamic_meta_object_provider: TypeDefId,
    pub event_handler: TypeDefId,
    pub flags_attribute: TypeDefId,
    pub flags_attribute_ctor: MethodId,
    pub obsolete_attribute: TypeDefId,
    pub obsolete_attribute_ctor: MethodId,
}

impl Corlib {
    pub fn add(metadata: &mut Metadata) -> Corlib {
        let module = metadata.add_module(
            ModuleDef::new("System.Runtime", "8.0.0.0").with_public_key_token("b03f5f7f11d50a3a"),
        );
        let object = metadata.add_type(module, TypeDef::new("System", "Object"));
        metadata.add_method(object, MethodDef::constructor());
        let to_string = metadata.add_method(object, MethodDef::new("ToString").as_virtual());

        let class = |namespace: &str, name: &str, base: TypeDefId| {
            TypeDef::new(namespace, name).with_base(named(base))
        };

        let value_type =
            metadata.add_type(module, class("System", "ValueType", object).as_abstract());
        let enum_type =
            metadata.add_type(module, class("System", "Enum", value_type).as_abstract());
        let delegate = metadata.add_type(module, class("System", "Delegate", object).as_abstract());
        let multicast_delegate = metadata.add_type(
            module,
            class("System", "MulticastDelegate", delegate).as_abstract(),
        );
        let attribute =
            metadata.add_type(module, class("System", "Attribute", object).as_abstract());
        let type_type = metadata.add_type(module, class("System", "Type", object).as_abstract());

        let int32 = metadata.add_type(module, class("System", "Int32", value_type).as_sealed());
        let int64 = metadata.add_type(module, class("System", "Int64", value_type).as_sealed());
        let byte = metadata.add_type(module, class("System", "Byte", value_type).as_sealed());
        let boolean = metadata.add_type(module, class("System", "Boolean", value_type).as_sealed());
        let int_ptr = metadata.add_type(module, class("System", "IntPtr", value_type).as_sealed());
        let string = metadata.add_type(module, class("System", "String", object).as_sealed());

        metadata.set_return_type(to_string, named(string));

        let i_disposable = metadata.add_type(module, TypeDef::interface("System", "IDisposable"));
        metadata.add_method(i_disposable, MethodDef::new("Dispose").as_abstract());

        let i_enumerator =
            metadata.add_type(module, TypeDef::interface("System.Collections", "IEnumerator"));
        add_property(
            metadata,
            i_enumerator,
            "Current",
            named(object),
            MethodDef::special("get_Current").as_abstract(),
            None,
        );
        metadata.add_method(
            i_enumerator,
            MethodDef::new("MoveNext").as_abstract().returning(named(boolean)),
        );

        let i_enumerable =
            metadata.add_type(module, TypeDef::interface("System.Collections", "IEnumerable"));
        metadata.add_method(
            i_enumerable,
            MethodDef::new("GetEnumerator")
                .as_abstract()
                .returning(named(i_enumerator)),
        );

        let i_enumerator_t = metadata.add_type(
            module,
            TypeDef::interface("System.Collections.Generic", "IEnumerator")
                .with_interface(named(i_disposable))
                .with_interface(named(i_enumerator)),
        );
        let t = metadata.add_generic_param(
            GenericOwner::Type(i_enumerator_t),
            GenericParamDef::new("T").covariant(),
        );
        add_property(
            metadata,
            i_enumerator_t,
            "Current",
            TypeSig::param(t),
            MethodDef::special("get_Current").as_abstract(),
            None,
        );

        let i_enumerable_t = metadata.add_type(
            module,
            TypeDef::interface("System.Collections.Generic", "IEnumerable")
                .with_interface(named(i_enumerable)),
        );
        let t = metadata.add_generic_param(
            GenericOwner::Type(i_enumerable_t),
            GenericParamDef::new("T").covariant(),
        );
        metadata.add_method(
            i_enumerable_t,
            MethodDef::new("GetEnumerator")
                .as_abstract()
                .returning(TypeSig::generic(i_enumerator_t, vec![TypeSig::param(t)])),
        );

        let i_dynamic_meta_object_provider = metadata.add_type(
            module,
            TypeDef::interface("System.Dynamic", "IDynamicMetaObjectProvider"),
        );

        let event_handler = metadata.add_type(
            module,
            class("System", "EventHandler", multicast_delegate).as_sealed(),
        );
        metadata.add_method(
            event_handler,
            MethodDef::constructor()
                .with_param(ParamDef::new("object", named(object)))
                .with_param(ParamDef::new("method", named(int_ptr))),
        );
        metadata.add_method(
            event_handler,
            MethodDef::new("Invoke")
                .as_virtual()
                .with_param(ParamDef::new("sender", named(object))),
        );

        let flags_attribute =
            metadata.add_type(module, class("System", "FlagsAttribute", attribute).as_sealed());
        let flags_attribute_ctor = metadata.add_method(flags_attribute, MethodDef::constructor());

        let obsolete_attribute =
            metadata.add_type(module, class("System", "ObsoleteAttribute", attribute).as_sealed());
        let obsolete_attribute_ctor = metadata.add_method(
            obsolete_attribute,
            MethodDef::constructor().with_param(ParamDef::new("message", named(string))),
        );
        add_property(
            metadata,
            obsolete_attribute,
            "DiagnosticId",
            named(string),
            MethodDef::special("get_DiagnosticId"),
            Some(MethodDef::special("set_DiagnosticId")),
        );

        Corlib {
            module,
            object,
            value_type,
            enum_type,
            delegate,
            multicast_delegate,
            attribute,
            type_type,
            int32,
            int64,
            byte,
            boolean,
            int_ptr,
            string,
            i_disposable,
            i_enumerator,
            i_enumerable,
            i_enumerator_t,
            i_enumerable_t,
            i_dynamic_meta_object_provider,
            event_handler,
            flags_attribute,
            flags_attribute_ctor,
            obsolete_attribute,
            obsolete_attribute_ctor,
        }
    }
}

// ============================================================================
// Sample
// ============================================================================

/// A store with [`Corlib`] and the `Sample` module.
#[derive(Debug)]
pub struct Sample {
    pub metadata: Metadata,
    pub corlib: Corlib,
    pub module: ModuleId,

    pub test_enum: TypeDefId,
    pub enum_member1: FieldId,
    pub test_flags: TypeDefId,
    pub test_attribute: TypeDefId,
    pub test_delegate: TypeDefId,

    pub base_interface: TypeDefId,
    pub base_interface_run: MethodId,
    pub test_interface: TypeDefId,
    pub test_interface_run: MethodId,
    pub variant_interface: TypeDefId,

    pub test_base_class: TypeDefId,
    pub base_virtual_method: MethodId,
    pub base_hidden: MethodId,
    pub base_secret: MethodId,

    pub test_class: TypeDefId,
    pub test_class_t: GenericParamId,
    pub test_class_max_count: FieldId,
    pub test_class_virtual_method: MethodId,
    pub test_class_abstract_method: MethodId,
    pub test_class_sealed_candidate: MethodId,
    pub test_class_hidden: MethodId,
    pub test_class_secret: MethodId,
    pub test_class_convert: MethodId,
    pub test_class_parse: MethodId,
    pub test_class_pad: MethodId,
    pub test_class_indexer: PropertyId,
    pub test_class_value: PropertyId,
    pub test_class_run: MethodId,
    pub test_class_explicit_run: MethodId,
    pub test_class_dispose: MethodId,
    pub test_class_generic_enumerator: MethodId,
    pub test_class_enumerator: MethodId,
    pub test_class_obsolete: MethodId,
    pub test_class_echo: MethodId,
    pub test_class_nested: TypeDefId,
    pub compiler_generated: TypeDefId,

    pub test_struct: TypeDefId,
    pub test_struct_length: PropertyId,
    pub test_struct_implicit: MethodId,
    pub test_struct_unsafe: MethodId,

    pub static_class: TypeDefId,
    pub internal_class: TypeDefId,
    pub outer: TypeDefId,
    pub outer_test_method: MethodId,
    pub inner: TypeDefId,
    pub inner_test_method: MethodId,
    pub constrained: TypeDefId,
    pub global_type: TypeDefId,
}

impl Default for Sample {
    fn default() -> Self {
        Sample::new()
    }
}

impl Sample {
    pub fn new() -> Sample {
        let mut metadata = Metadata::new();
        let corlib = Corlib::add(&mut metadata);
        let c = corlib.clone();
        let m = &mut metadata;

        let module = m.add_module(ModuleDef::new("Sample", "1.2.3.4").with_reference(c.module));
        let int32 = named(c.int32);
        let string = named(c.string);
        let byte = named(c.byte);

        // ---- enums ----------------------------------------------------------

        let test_enum = m.add_type(
            module,
            TypeDef::new("N", "TestEnum")
                .with_base(named(c.enum_type))
                .as_sealed(),
        );
        m.add_field(test_enum, FieldDef::new("value__", int32.clone()));
        let enum_member1 = m.add_field(
            test_enum,
            FieldDef::constant("Member1", named(test_enum), ConstantValue::Int32(0)),
        );
        m.add_field(
            test_enum,
            FieldDef::constant("Member2", named(test_enum), ConstantValue::Int32(1)),
        );
        m.add_field(
            test_enum,
            FieldDef::constant("Member3", named(test_enum), ConstantValue::Int32(2)),
        );

        let test_flags = m.add_type(
            module,
            TypeDef::new("N", "TestFlags")
                .with_base(named(c.enum_type))
                .as_sealed()
                .with_attribute(
                    AttributeInfo::new(named(c.flags_attribute))
                        .with_constructor(c.flags_attribute_ctor),
                ),
        );
        m.add_field(test_flags, FieldDef::new("value__", byte.clone()));
        for (name, value) in [("None", 0u8), ("Read", 1), ("Write", 2)] {
            m.add_field(
                test_flags,
                FieldDef::constant(name, named(test_flags), ConstantValue::Byte(value)),
            );
        }

        // ---- attribute and delegate ------------------------------------------

        let test_attribute = m.add_type(
            module,
            TypeDef::new("N", "TestAttribute")
                .with_base(named(c.attribute))
                .as_sealed(),
        );
        let test_attribute_ctor = m.add_method(
            test_attribute,
            MethodDef::constructor().with_param(ParamDef::new("kind", named(test_enum))),
        );
        add_property(
            m,
            test_attribute,
            "Target",
            named(c.type_type),
            MethodDef::special("get_Target"),
            Some(MethodDef::special("set_Target")),
        );

        let test_delegate = m.add_type(
            module,
            TypeDef::new("N", "TestDelegate")
                .with_base(named(c.multicast_delegate))
                .as_sealed(),
        );
        m.add_method(
            test_delegate,
            MethodDef::constructor()
                .with_param(ParamDef::new("object", named(c.object)))
                .with_param(ParamDef::new("method", named(c.int_ptr))),
        );
        m.add_method(
            test_delegate,
            MethodDef::new("Invoke")
                .as_virtual()
                .returning(named(c.boolean))
                .with_param(ParamDef::new("count", int32.clone()))
                .with_param(ParamDef::by_ref("text", string.clone())),
        );

        // ---- interfaces -------------------------------------------------------

        let base_interface = m.add_type(module, TypeDef::interface("N", "ITestBaseInterface"));
        add_property(
            m,
            base_interface,
            "Value",
            int32.clone(),
            MethodDef::special("get_Value").as_abstract(),
            None,
        );
        let base_interface_run = m.add_method(base_interface, MethodDef::new("Run").as_abstract());
        add_event(
            m,
            base_interface,
            "Changed",
            named(c.event_handler),
            MethodDef::as_abstract,
        );

        let test_interface = m.add_type(
            module,
            TypeDef::interface("N", "ITestInterface").with_interface(named(base_interface)),
        );
        let test_interface_run = m.add_method(test_interface, MethodDef::new("Run").as_abstract());
        m.add_method(
            test_interface,
            MethodDef::new("Compute")
                .as_abstract()
                .returning(int32.clone())
                .with_param(ParamDef::new("input", int32.clone())),
        );

        let variant_interface = m.add_type(module, TypeDef::interface("N", "IVariant"));
        let t_out = m.add_generic_param(
            GenericOwner::Type(variant_interface),
            GenericParamDef::new("TOut").covariant(),
        );
        let t_in = m.add_generic_param(
            GenericOwner::Type(variant_interface),
            GenericParamDef::new("TIn").contravariant(),
        );
        m.add_method(
            variant_interface,
            MethodDef::new("Map")
                .as_abstract()
                .returning(TypeSig::param(t_out))
                .with_param(ParamDef::new("input", TypeSig::param(t_in))),
        );

        // ---- base class -------------------------------------------------------

        let test_base_class = m.add_type(
            module,
            TypeDef::new("N", "TestBaseClass")
                .with_base(named(c.object))
                .as_abstract(),
        );
        m.add_method(
            test_base_class,
            MethodDef::constructor().with_access(Accessibility::Family),
        );
        m.add_field(test_base_class, FieldDef::new("Counter", int32.clone()));
        let base_virtual_method =
            m.add_method(test_base_class, MethodDef::new("VirtualMethod").as_virtual());
        m.add_method(test_base_class, MethodDef::new("AbstractMethod").as_abstract());
        let base_hidden = m.add_method(
            test_base_class,
            MethodDef::new("Hidden").with_param(ParamDef::new("count", int32.clone())),
        );
        m.add_method(test_base_class, MethodDef::new("SealedCandidate").as_virtual());
        let base_secret = m.add_method(
            test_base_class,
            MethodDef::new("Secret").with_access(Accessibility::Private),
        );
        add_property(
            m,
            test_base_class,
            "Name",
            string.clone(),
            MethodDef::special("get_Name").as_virtual(),
            Some(MethodDef::special("set_Name").as_virtual()),
        );
        add_event(m, test_base_class, "Changed", named(c.event_handler), |method| method);

        // ---- generic class ----------------------------------------------------

        let enumerable_of_string = TypeSig::generic(c.i_enumerable_t, vec![string.clone()]);
        let test_class = m.add_type(
            module,
            TypeDef::new("N", "TestClass")
                .with_base(named(test_base_class))
                .with_interface(named(test_interface))
                .with_interface(named(base_interface))
                .with_interface(named(c.i_disposable))
                .with_interface(enumerable_of_string.clone())
                .with_interface(named(c.i_enumerable)),
        );
        let test_class_t =
            m.add_generic_param(GenericOwner::Type(test_class), GenericParamDef::new("T"));
        let t = TypeSig::param(test_class_t);

        let test_class_max_count = m.add_field(
            test_class,
            FieldDef::constant("MaxCount", int32.clone(), ConstantValue::Int32(10)),
        );
        m.add_field(test_class, FieldDef::new("Field", t.clone()));
        m.add_field(
            test_class,
            FieldDef::new("Empty", string.clone()).as_static().as_read_only(),
        );
        m.add_field(
            test_class,
            FieldDef::new("items", TypeSig::array(byte.clone()))
                .with_access(Accessibility::Private),
        );

        m.add_method(test_class, MethodDef::constructor());
        m.add_method(
            test_class,
            MethodDef::constructor().with_param(ParamDef::new("value", t.clone())),
        );
        m.add_method(test_class, MethodDef::static_constructor());

        let test_class_virtual_method =
            m.add_method(test_class, MethodDef::new("VirtualMethod").as_override());
        let test_class_abstract_method =
            m.add_method(test_class, MethodDef::new("AbstractMethod").as_override());
        let test_class_sealed_candidate =
            m.add_method(test_class, MethodDef::new("SealedCandidate").as_sealed_override());
        let test_class_hidden = m.add_method(
            test_class,
            MethodDef::new("Hidden").with_param(ParamDef::new("count", int32.clone())),
        );
        let test_class_secret = m.add_method(test_class, MethodDef::new("Secret"));

        let test_class_convert = m.add_method(test_class, MethodDef::new("Convert"));
        let t_result = m.add_generic_param(
            GenericOwner::Method(test_class_convert),
            GenericParamDef::new("TResult"),
        );
        m.add_parameter(test_class_convert, ParamDef::new("input", t.clone()));
        m.set_return_type(test_class_convert, TypeSig::param(t_result));

        let test_class_parse = m.add_method(
            test_class,
            MethodDef::new("Parse")
                .as_static()
                .returning(named(c.boolean))
                .with_param(ParamDef::new("text", string.clone()))
                .with_param(ParamDef::out("value", int32.clone()))
                .with_param(ParamDef::by_ref("flags", byte.clone()))
                .with_param(ParamDef::in_ref("stamp", named(c.int64))),
        );
        let test_class_pad = m.add_method(
            test_class,
            MethodDef::new("Pad").with_param(
                ParamDef::new("width", int32.clone()).with_default(ConstantValue::Int32(4)),
            ),
        );

        let get_item = m.add_method(
            test_class,
            MethodDef::special("get_Item")
                .returning(string.clone())
                .with_param(ParamDef::new("index", int32.clone()))
                .with_param(ParamDef::new("key", string.clone())),
        );
        let set_item = m.add_method(
            test_class,
            MethodDef::special("set_Item")
                .with_param(ParamDef::new("index", int32.clone()))
                .with_param(ParamDef::new("key", string.clone()))
                .with_param(ParamDef::new("value", string.clone())),
        );
        let test_class_indexer = m.add_property(
            test_class,
            PropertyDef::new("Item", string.clone())
                .with_getter(get_item)
                .with_setter(set_item),
        );

        let test_class_value = add_property(
            m,
            test_class,
            "Value",
            int32.clone(),
            MethodDef::special("get_Value").as_interface_implementation(),
            None,
        );
        let test_class_run =
            m.add_method(test_class, MethodDef::new("Run").as_interface_implementation());
        let test_class_explicit_run = m.add_method(
            test_class,
            MethodDef::new("Run").explicitly_implementing(named(base_interface)),
        );
        m.add_method(
            test_class,
            MethodDef::new("Compute")
                .as_interface_implementation()
                .returning(int32.clone())
                .with_param(ParamDef::new("input", int32.clone())),
        );
        let test_class_dispose = m.add_method(
            test_class,
            MethodDef::new("Dispose").explicitly_implementing(named(c.i_disposable)),
        );
        let test_class_generic_enumerator = m.add_method(
            test_class,
            MethodDef::new("GetEnumerator")
                .explicitly_implementing(enumerable_of_string)
                .returning(TypeSig::generic(c.i_enumerator_t, vec![string.clone()])),
        );
        let test_class_enumerator = m.add_method(
            test_class,
            MethodDef::new("GetEnumerator")
                .explicitly_implementing(named(c.i_enumerable))
                .returning(named(c.i_enumerator)),
        );
        let test_class_obsolete = m.add_method(
            test_class,
            MethodDef::new("OldMethod").with_attribute(
                AttributeInfo::new(named(c.obsolete_attribute))
                    .with_constructor(c.obsolete_attribute_ctor)
                    .with_positional(
                        string.clone(),
                        AttributeValue::Constant(ConstantValue::String("Use Run".to_string())),
                    )
                    .with_named(
                        "DiagnosticId",
                        string.clone(),
                        AttributeValue::Constant(ConstantValue::String("MD0001".to_string())),
                    ),
            ),
        );
        let test_class_echo = m.add_method(
            test_class,
            MethodDef::new("Echo")
                .returning(TypeSig::Dynamic)
                .with_param(ParamDef::new("value", TypeSig::Dynamic)),
        );

        let test_class_nested = m.add_nested_type(
            test_class,
            TypeDef::nested("Nested").with_base(named(c.object)),
        );
        let compiler_generated = m.add_nested_type(
            test_class,
            TypeDef::nested("<>c")
                .with_base(named(c.object))
                .with_access(Accessibility::Private)
                .as_sealed(),
        );

        // ---- struct -------------------------------------------------------------

        let test_struct = m.add_type(
            module,
            TypeDef::new("N", "TestStruct")
                .with_base(named(c.value_type))
                .with_interface(named(c.i_disposable))
                .as_sealed()
                .with_attribute(
                    AttributeInfo::new(named(test_attribute))
                        .with_constructor(test_attribute_ctor)
                        .with_positional(
                            named(test_enum),
                            AttributeValue::Constant(ConstantValue::Int32(1)),
                        )
                        .with_named(
                            "Target",
                            named(c.type_type),
                            AttributeValue::Type(named(test_class)),
                        ),
                ),
        );
        m.add_field(test_struct, FieldDef::new("X", int32.clone()));
        m.add_field(test_struct, FieldDef::new("Y", int32.clone()));
        m.add_method(
            test_struct,
            MethodDef::constructor()
                .with_param(ParamDef::new("x", int32.clone()))
                .with_param(ParamDef::new("y", int32.clone())),
        );
        let test_struct_length = add_property(
            m,
            test_struct,
            "Length",
            int32.clone(),
            MethodDef::special("get_Length"),
            Some(MethodDef::special("set_Length").with_access(Accessibility::Private)),
        );
        m.add_method(
            test_struct,
            MethodDef::new("Dispose").as_interface_implementation(),
        );
        let test_struct_implicit = m.add_method(
            test_struct,
            MethodDef::special("op_Implicit")
                .as_static()
                .returning(int32.clone())
                .with_param(ParamDef::new("value", named(test_struct))),
        );
        let test_struct_unsafe = m.add_method(
            test_struct,
            MethodDef::new("Unsafe")
                .as_static()
                .with_param(ParamDef::new("pointer", TypeSig::pointer(int32.clone())))
                .with_param(ParamDef::new("grid", TypeSig::array_of_rank(byte.clone(), 2)))
                .with_param(ParamDef::new(
                    "jagged",
                    TypeSig::array(TypeSig::array(byte.clone())),
                )),
        );

        // ---- other classes ----------------------------------------------------

        let static_class = m.add_type(
            module,
            TypeDef::new("N", "TestStaticClass")
                .with_base(named(c.object))
                .as_static(),
        );
        m.add_method(static_class, MethodDef::new("Helper").as_static());

        let internal_class = m.add_type(
            module,
            TypeDef::new("N", "InternalHelper")
                .with_base(named(c.object))
                .with_access(Accessibility::Assembly),
        );

        let outer = m.add_type(module, TypeDef::new("N", "Outer").with_base(named(c.object)));
        let outer_t = m.add_generic_param(GenericOwner::Type(outer), GenericParamDef::new("T"));
        let inner = m.add_nested_type(outer, TypeDef::nested("Inner").with_base(named(c.object)));
        m.add_generic_param(GenericOwner::Type(inner), GenericParamDef::new("U"));
        m.add_generic_param(GenericOwner::Type(inner), GenericParamDef::new("V"));
        let inner_test_method = m.add_method(inner, MethodDef::new("TestMethod"));
        let tm = m.add_generic_param(
            GenericOwner::Method(inner_test_method),
            GenericParamDef::new("TM"),
        );
        m.add_parameter(inner_test_method, ParamDef::new("count", int32.clone()));
        m.add_parameter(inner_test_method, ParamDef::new("bytes", TypeSig::array(byte.clone())));
        m.add_parameter(
            inner_test_method,
            ParamDef::new(
                "inner",
                TypeSig::generic(
                    inner,
                    vec![
                        TypeSig::param(outer_t),
                        TypeSig::array(byte.clone()),
                        TypeSig::generic(c.i_enumerable_t, vec![string.clone()]),
                    ],
                ),
            ),
        );
        m.add_parameter(inner_test_method, ParamDef::new("item", TypeSig::param(tm)));

        let outer_test_method = m.add_method(outer, MethodDef::new("TestMethod"));
        m.add_generic_param(
            GenericOwner::Method(outer_test_method),
            GenericParamDef::new("TM"),
        );
        m.add_parameter(outer_test_method, ParamDef::new("count", int32.clone()));
        m.add_parameter(outer_test_method, ParamDef::new("bytes", TypeSig::array(byte.clone())));
        m.add_parameter(
            outer_test_method,
            ParamDef::new(
                "inner",
                TypeSig::generic(
                    inner,
                    vec![
                        TypeSig::param(outer_t),
                        TypeSig::array(byte.clone()),
                        TypeSig::generic(c.i_enumerable_t, vec![string.clone()]),
                    ],
                ),
            ),
        );

        let constrained = m.add_type(
            module,
            TypeDef::new("N", "Constrained").with_base(named(c.object)),
        );
        m.add_generic_param(
            GenericOwner::Type(constrained),
            GenericParamDef::new("TKey").with_struct_constraint(named(c.value_type)),
        );
        m.add_generic_param(
            GenericOwner::Type(constrained),
            GenericParamDef::new("TValue")
                .with_class_constraint()
                .with_new_constraint()
                .with_constraint(named(c.i_disposable))
                .with_constraint(named(test_base_class)),
        );

        let global_type = m.add_type(
            module,
            TypeDef::new("", "GlobalType").with_base(named(c.object)),
        );
        m.add_method(global_type, MethodDef::new("Touch"));

        Sample {
            metadata,
            corlib,
            module,
            test_enum,
            enum_member1,
            test_flags,
            test_attribute,
            test_delegate,
            base_interface,
            base_interface_run,
            test_interface,
            test_interface_run,
            variant_interface,
            test_base_class,
            base_virtual_method,
            base_hidden,
            base_secret,
            test_class,
            test_class_t,
            test_class_max_count,
            test_class_virtual_method,
            test_class_abstract_method,
            test_class_sealed_candidate,
            test_class_hidden,
            test_class_secret,
            test_class_convert,
            test_class_parse,
            test_class_pad,
            test_class_indexer,
            test_class_value,
            test_class_run,
            test_class_explicit_run,
            test_class_dispose,
            test_class_generic_enumerator,
            test_class_enumerator,
            test_class_obsolete,
            test_class_echo,
            test_class_nested,
            compiler_generated,
            test_struct,
            test_struct_length,
            test_struct_implicit,
            test_struct_unsafe,
            static_class,
            internal_class,
            outer,
            outer_test_method,
            inner,
            inner_test_method,
            constrained,
            global_type,
        }
    }

    /// A resolver over the `Sample` module only.
    pub fn resolver(&self) -> CanonicalNameResolver<'_> {
        CanonicalNameResolver::new(&self.metadata, &[self.module])
            .unwrap_or_else(|err| panic!("sample module must be resolvable: {err}"))
    }
}

//! Integration tests for canonical name resolution over the sample module.
//!
//! Set `RUST_LOG=metadoc_core=debug` to see index construction.

use metadoc_core::canonical::{validate, CanonicalNameResolver, NamePrefix};
use metadoc_core::error::MetadocError;
use metadoc_core::fixtures::Sample;
use metadoc_core::metadata::{Handle, TypeSig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn type_handle(sig: TypeSig) -> Handle {
    Handle::Type(sig)
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn every_indexed_name_resolves_back() {
    init_tracing();
    let sample = Sample::new();
    let resolver = sample.resolver();
    assert!(!resolver.is_empty());

    for (handle, name) in resolver.entries() {
        let found = resolver
            .try_find_handle(name)
            .unwrap()
            .unwrap_or_else(|| panic!("{name} did not resolve"));
        assert_eq!(resolver.canonical_name(&found).unwrap(), name);
        assert_eq!(resolver.canonical_name(handle).unwrap(), name);
    }
}

#[test]
fn every_lowercased_name_resolves_to_the_same_handle() {
    init_tracing();
    let sample = Sample::new();
    let resolver = sample.resolver();

    for (handle, name) in resolver.entries() {
        let lowered = name.to_lowercase();
        assert_eq!(
            resolver.try_find_handle(&lowered).unwrap().as_ref(),
            Some(handle),
            "{lowered} resolved differently from {name}"
        );
    }
}

#[test]
fn lookup_falls_back_to_case_insensitive_match() {
    init_tracing();
    let sample = Sample::new();
    let resolver = sample.resolver();

    let handle = resolver.try_find_handle("t:n.testenum").unwrap();
    assert_eq!(handle, Some(type_handle(TypeSig::named(sample.test_enum))));
}

#[test]
fn resolver_over_all_modules_names_corlib() {
    let sample = Sample::new();
    let resolver = CanonicalNameResolver::for_all_modules(&sample.metadata).unwrap();

    assert_eq!(resolver.modules().len(), 2);
    assert_eq!(
        resolver.try_find_handle("T:System.IDisposable").unwrap(),
        Some(type_handle(TypeSig::named(sample.corlib.i_disposable)))
    );
}

// ============================================================================
// Grammar
// ============================================================================

#[test]
fn enums_and_their_constants() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&type_handle(TypeSig::named(sample.test_enum)))
            .unwrap(),
        "T:N.TestEnum"
    );
    assert_eq!(
        resolver
            .canonical_name(&Handle::Field(sample.enum_member1))
            .unwrap(),
        "F:N.TestEnum.Member1"
    );
}

#[test]
fn nested_generic_types_carry_per_level_arity() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&type_handle(TypeSig::named(sample.inner)))
            .unwrap(),
        "T:N.Outer`1.Inner`2"
    );
    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.inner_test_method))
            .unwrap(),
        "M:N.Outer`1.Inner`2.TestMethod``1(System.Int32,System.Byte[],\
         N.Outer{`0}.Inner{System.Byte[],\
         System.Collections.Generic.IEnumerable{System.String}},``0)"
    );
}

#[test]
fn nested_generic_types_resolve_with_innermost_arity_only() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver.try_find_handle("T:N.Outer.Inner`2").unwrap(),
        Some(type_handle(TypeSig::named(sample.inner)))
    );
    assert_eq!(
        resolver.try_find_handle("t:n.outer.inner`2").unwrap(),
        Some(type_handle(TypeSig::named(sample.inner)))
    );
    // Top-level types have a single spelling.
    assert_eq!(resolver.try_find_handle("T:N.Outer").unwrap(), None);
}

#[test]
fn outer_generic_method_uses_type_parameter_positions() {
    let sample = Sample::new();
    let resolver = sample.resolver();
    let name = "M:N.Outer`1.TestMethod``1(System.Int32,System.Byte[],\
                N.Outer{`0}.Inner{System.Byte[],\
                System.Collections.Generic.IEnumerable{System.String}})";

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.outer_test_method))
            .unwrap(),
        name
    );
    assert_eq!(
        resolver.try_find_handle(name).unwrap(),
        Some(Handle::Method(sample.outer_test_method))
    );
}

#[test]
fn indexer_lists_index_parameters() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Property(sample.test_class_indexer))
            .unwrap(),
        "P:N.TestClass`1.Item(System.Int32,System.String)"
    );
}

#[test]
fn explicit_implementations_are_qualified_with_the_interface() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_class_generic_enumerator))
            .unwrap(),
        "M:N.TestClass`1.System#Collections#Generic#IEnumerable{System#String}#GetEnumerator"
    );
    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_class_dispose))
            .unwrap(),
        "M:N.TestClass`1.System#IDisposable#Dispose"
    );
    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_class_explicit_run))
            .unwrap(),
        "M:N.TestClass`1.N#ITestBaseInterface#Run"
    );
}

#[test]
fn conversion_operator_appends_return_type() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_struct_implicit))
            .unwrap(),
        "M:N.TestStruct.op_Implicit(N.TestStruct)~System.Int32"
    );
}

#[test]
fn pointers_and_arrays_in_parameter_lists() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_struct_unsafe))
            .unwrap(),
        "M:N.TestStruct.Unsafe(System.Int32*,System.Byte[0:,0:],System.Byte[][])"
    );
}

#[test]
fn by_reference_parameters_end_with_at() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_class_parse))
            .unwrap(),
        "M:N.TestClass`1.Parse(System.String,System.Int32@,System.Byte@,System.Int64@)"
    );
}

#[test]
fn generic_method_parameters_print_positionally() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_class_convert))
            .unwrap(),
        "M:N.TestClass`1.Convert``1(`0)"
    );
}

#[test]
fn dynamic_prints_as_object() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    assert_eq!(
        resolver
            .canonical_name(&Handle::Method(sample.test_class_echo))
            .unwrap(),
        "M:N.TestClass`1.Echo(System.Object)"
    );
}

// ============================================================================
// Malformed Names
// ============================================================================

#[test]
fn malformed_names_are_rejected() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    for name in [
        "t",
        "te",
        "missing_member_type_character_identifier",
        "T.wrong_separator",
        "K:x",
    ] {
        let err = resolver.try_find_handle(name).unwrap_err();
        assert!(
            matches!(err, MetadocError::MalformedCanonicalName { .. }),
            "{name}: {err}"
        );
    }
}

#[test]
fn blank_names_are_invalid_arguments() {
    let sample = Sample::new();
    let resolver = sample.resolver();

    for name in ["", "   "] {
        let err = resolver.try_find_handle(name).unwrap_err();
        assert!(matches!(err, MetadocError::InvalidArgument { .. }));
    }
}

#[test]
fn validate_reports_the_prefix() {
    assert_eq!(validate("M:N.X.Run").unwrap(), NamePrefix::Method);
    assert_eq!(validate("e:N.X.Changed").unwrap(), NamePrefix::Event);
}

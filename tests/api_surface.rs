//! Compile-only test that verifies all public re-exports exist.
//!
//! This test ensures that the public API surface is maintained. If any of
//! these imports fail to compile, it means a public type was accidentally
//! removed or renamed.

#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure (re-exported from metadoc-core)
// ============================================================================

// Error types and codes
use metadoc::error::{ErrorCode, MetadocError, MetadocResult};

// Metadata store
use metadoc::metadata::{
    Accessibility, AttributeArgument, AttributeInfo, AttributeValue, ConstantValue, EventDef,
    EventId, FieldDef, FieldId, GenericOwner, GenericParamDef, GenericParamId, Handle, Metadata,
    MethodDef, MethodId, ModuleDef, ModuleId, NamedAttributeArgument, ParamDef, PropertyDef,
    PropertyId, TypeDef, TypeDefId, TypeSig, CONSTRUCTOR_NAME, STATIC_CONSTRUCTOR_NAME,
};

// Reference data
use metadoc::reference::{
    ArrayTypeReference, ByRefTypeReference, ConstructorReference, DeclaringMethodReference,
    EventReference, FieldReference, GenericMethodParameterReference,
    GenericTypeParameterReference, MemberReference, MethodReference, ModuleReference,
    NamedTypeReference, NamespaceReference, PointerTypeReference, PropertyReference,
    ReferenceData, ReferenceFactory, TypeReference,
};

// Canonical names
use metadoc::canonical::{
    explicit_qualifier, innermost_arity_identifier, is_open_definition, member_name,
    type_identifier, type_name, validate, CanonicalNameResolver, NamePrefix,
};

// Parsed documentation
use metadoc::docs::{DocumentationCollection, DocumentationSource, MemberDocumentation};

// ============================================================================
// Declaration Graph
// ============================================================================

use metadoc::declarations::{
    AccessModifier, AccessorData, AssemblyDeclaration, AttributeData, AttributeParameterData,
    ClassData, ConstantData, ConstructorData, DeclarationGraph, DelegateData, DispatchFlags,
    EnumData, EventData, FieldData, GenericParameterData, ImplementationKind, InterfaceData,
    InterfaceImplementation, MemberCollections, MemberDeclId, MemberDeclaration, MemberKind,
    MethodData, NamespaceDeclId, NamespaceDeclaration, NamespaceKind, NodeId, ParameterData,
    PassingMode, PropertyData, ReturnData, StructData, TypeCollections, TypeDeclId,
    TypeDeclaration, TypeKind, TypeKindTag, ValueData,
};

// Builder
use metadoc::builder::{attach_documentation, DeclarationGraphBuilder};

// ============================================================================
// Documentation Merge and Configuration
// ============================================================================

use metadoc::apply::{
    apply_to_assembly, apply_to_member, apply_to_namespace, apply_to_type,
    AssemblyDocumentationAddition, AssemblyPatch, DocumentationAddition, DocumentationPatch,
    DocumentedNode,
};

use metadoc::config::{Config, GraphConfig, CONFIG_FILE_NAME};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // This test exists only to verify imports compile.
    // If you're here because this test broke, you may have
    // accidentally removed a public re-export.
    //
    // The imports above form the public API contract.
    // Any change that breaks these imports is a breaking change.

    // Use some types to avoid unused import warnings
    let _ = std::any::type_name::<Metadata>();
    let _ = std::any::type_name::<CanonicalNameResolver<'static>>();
    let _ = std::any::type_name::<DeclarationGraph>();
    let _ = std::any::type_name::<DeclarationGraphBuilder<'static>>();
    let _ = std::any::type_name::<MetadocError>();
    let _ = std::any::type_name::<DocumentationPatch>();
    let _ = std::any::type_name::<GraphConfig>();
}

#[test]
fn config_file_name_is_stable() {
    // The config file name is part of the public API contract
    assert_eq!(CONFIG_FILE_NAME, "metadoc.toml");
}

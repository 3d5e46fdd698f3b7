//! The declaration graph: assembly, namespaces, types and members.
//!
//! Nodes live in per-kind arenas owned by [`DeclarationGraph`] and refer to
//! each other by id. Ownership runs top-down (assembly → namespaces → types →
//! members and nested types); back-references (`TypeDeclaration::namespace`,
//! `MemberDeclaration::declaring_type`, ...) are plain ids into the same
//! graph.
//!
//! After the builder returns, the only mutable part of a graph is its
//! documentation side table, reachable through [`crate::apply`] and the
//! builder's documentation attachment.

mod members;
mod types;

pub use members::{
    AccessModifier, AccessorData, AttributeData, AttributeParameterData, ConstantData,
    ConstructorData, DispatchFlags, EventData, FieldData, GenericParameterData,
    MemberDeclaration, MemberKind, MethodData, ParameterData, PassingMode, PropertyData,
    ReturnData, ValueData,
};
pub use types::{
    ClassData, DelegateData, EnumData, ImplementationKind, InterfaceData,
    InterfaceImplementation, MemberCollections, StructData, TypeCollections, TypeDeclaration,
    TypeKind, TypeKindTag,
};

use std::collections::HashMap;

use serde::Serialize;

use crate::docs::MemberDocumentation;
use crate::reference::{ModuleReference, NamespaceReference};

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a namespace within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct NamespaceDeclId(pub u32);

impl NamespaceDeclId {
    pub fn new(id: u32) -> Self {
        NamespaceDeclId(id)
    }
}

impl std::fmt::Display for NamespaceDeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ns_{}", self.0)
    }
}

/// Unique identifier for a type declaration within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct TypeDeclId(pub u32);

impl TypeDeclId {
    pub fn new(id: u32) -> Self {
        TypeDeclId(id)
    }
}

impl std::fmt::Display for TypeDeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decl_{}", self.0)
    }
}

/// Unique identifier for a member declaration within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct MemberDeclId(pub u32);

impl MemberDeclId {
    pub fn new(id: u32) -> Self {
        MemberDeclId(id)
    }
}

impl std::fmt::Display for MemberDeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "member_{}", self.0)
    }
}

/// Any node of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "node", content = "id", rename_all = "snake_case")]
pub enum NodeId {
    Assembly,
    Namespace(NamespaceDeclId),
    Type(TypeDeclId),
    Member(MemberDeclId),
}

impl From<NamespaceDeclId> for NodeId {
    fn from(id: NamespaceDeclId) -> Self {
        NodeId::Namespace(id)
    }
}

impl From<TypeDeclId> for NodeId {
    fn from(id: TypeDeclId) -> Self {
        NodeId::Type(id)
    }
}

impl From<MemberDeclId> for NodeId {
    fn from(id: MemberDeclId) -> Self {
        NodeId::Member(id)
    }
}

// ============================================================================
// Assembly and Namespaces
// ============================================================================

/// The root of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyDeclaration {
    pub name: String,
    pub version: String,
    pub culture: String,
    pub public_key_token: Option<String>,
    pub attributes: Vec<AttributeData>,
    /// Referenced modules.
    pub dependencies: Vec<ModuleReference>,
    pub namespaces: Vec<NamespaceDeclId>,
    pub reference: ModuleReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum NamespaceKind {
    Named(String),
    /// The unnamed namespace.
    Global,
}

/// A namespace and the top-level types it declares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceDeclaration {
    pub id: NamespaceDeclId,
    pub kind: NamespaceKind,
    pub reference: NamespaceReference,
    pub types: TypeCollections,
}

impl NamespaceDeclaration {
    /// The namespace name; empty for the global namespace.
    pub fn name(&self) -> &str {
        match &self.kind {
            NamespaceKind::Named(name) => name,
            NamespaceKind::Global => "",
        }
    }

    pub fn is_global(&self) -> bool {
        self.kind == NamespaceKind::Global
    }

    /// Enums, delegates, interfaces, classes, then structs.
    pub fn declared_types(&self) -> Vec<TypeDeclId> {
        self.types.declared_types()
    }

    /// The documentation key of the namespace (`N:Name`).
    pub fn canonical_name(&self) -> String {
        format!("N:{}", self.name())
    }
}

// ============================================================================
// Graph
// ============================================================================

/// A built declaration graph.
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationGraph {
    assembly: AssemblyDeclaration,
    namespaces: Vec<NamespaceDeclaration>,
    types: Vec<TypeDeclaration>,
    members: Vec<MemberDeclaration>,
    #[serde(skip)]
    documentation: HashMap<NodeId, MemberDocumentation>,
}

impl DeclarationGraph {
    pub(crate) fn new(assembly: AssemblyDeclaration) -> Self {
        let mut documentation = HashMap::new();
        documentation.insert(NodeId::Assembly, MemberDocumentation::default());
        DeclarationGraph {
            assembly,
            namespaces: Vec::new(),
            types: Vec::new(),
            members: Vec::new(),
            documentation,
        }
    }

    // ========================================================================
    // Construction (builder only)
    // ========================================================================

    pub(crate) fn next_namespace_id(&self) -> NamespaceDeclId {
        NamespaceDeclId::new(self.namespaces.len() as u32)
    }

    pub(crate) fn next_type_id(&self) -> TypeDeclId {
        TypeDeclId::new(self.types.len() as u32)
    }

    pub(crate) fn next_member_id(&self) -> MemberDeclId {
        MemberDeclId::new(self.members.len() as u32)
    }

    pub(crate) fn insert_namespace(&mut self, namespace: NamespaceDeclaration) -> NamespaceDeclId {
        let id = namespace.id;
        self.documentation
            .insert(NodeId::Namespace(id), MemberDocumentation::default());
        self.assembly.namespaces.push(id);
        self.namespaces.push(namespace);
        id
    }

    pub(crate) fn insert_type(&mut self, declaration: TypeDeclaration) -> TypeDeclId {
        let id = declaration.id;
        self.documentation
            .insert(NodeId::Type(id), MemberDocumentation::default());
        self.types.push(declaration);
        id
    }

    pub(crate) fn insert_member(&mut self, declaration: MemberDeclaration) -> MemberDeclId {
        let id = declaration.id;
        self.documentation
            .insert(NodeId::Member(id), MemberDocumentation::default());
        self.members.push(declaration);
        id
    }

    pub(crate) fn namespace_mut(
        &mut self,
        id: NamespaceDeclId,
    ) -> Option<&mut NamespaceDeclaration> {
        self.namespaces.get_mut(id.0 as usize)
    }

    pub(crate) fn type_mut(&mut self, id: TypeDeclId) -> Option<&mut TypeDeclaration> {
        self.types.get_mut(id.0 as usize)
    }

    pub(crate) fn documentation_mut(&mut self, node: NodeId) -> Option<&mut MemberDocumentation> {
        self.documentation.get_mut(&node)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn assembly(&self) -> &AssemblyDeclaration {
        &self.assembly
    }

    pub fn namespace(&self, id: NamespaceDeclId) -> Option<&NamespaceDeclaration> {
        self.namespaces.get(id.0 as usize)
    }

    pub fn type_decl(&self, id: TypeDeclId) -> Option<&TypeDeclaration> {
        self.types.get(id.0 as usize)
    }

    pub fn member(&self, id: MemberDeclId) -> Option<&MemberDeclaration> {
        self.members.get(id.0 as usize)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceDeclaration> {
        self.namespaces.iter()
    }

    /// Every type, nested types included.
    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.iter()
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberDeclaration> {
        self.members.iter()
    }

    /// The namespace named `name` (empty for the global namespace).
    pub fn find_namespace(&self, name: &str) -> Option<&NamespaceDeclaration> {
        self.namespaces.iter().find(|ns| ns.name() == name)
    }

    /// The type with the given canonical name.
    pub fn find_type(&self, canonical_name: &str) -> Option<&TypeDeclaration> {
        self.types
            .iter()
            .find(|t| t.canonical_name == canonical_name)
    }

    /// The member with the given canonical name.
    pub fn find_member(&self, canonical_name: &str) -> Option<&MemberDeclaration> {
        self.members
            .iter()
            .find(|m| m.canonical_name == canonical_name)
    }

    /// The members declared by `id` with the given simple name.
    pub fn members_named<'a>(
        &'a self,
        id: TypeDeclId,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MemberDeclaration> + 'a {
        self.members
            .iter()
            .filter(move |m| m.declaring_type == id && m.name == name)
    }

    /// Documentation attached to a node; every node starts with an empty entry.
    pub fn documentation(&self, node: impl Into<NodeId>) -> Option<&MemberDocumentation> {
        self.documentation.get(&node.into())
    }

    /// Number of namespaces, types and members.
    pub fn node_count(&self) -> usize {
        self.namespaces.len() + self.types.len() + self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> ModuleReference {
        ModuleReference {
            name: "Sample".to_string(),
            version: "1.0.0.0".to_string(),
            culture: String::new(),
            public_key_token: None,
        }
    }

    fn empty_graph() -> DeclarationGraph {
        DeclarationGraph::new(AssemblyDeclaration {
            name: "Sample".to_string(),
            version: "1.0.0.0".to_string(),
            culture: String::new(),
            public_key_token: None,
            attributes: Vec::new(),
            dependencies: Vec::new(),
            namespaces: Vec::new(),
            reference: module(),
        })
    }

    #[test]
    fn inserted_namespace_joins_assembly_and_gets_documentation() {
        let mut graph = empty_graph();
        let id = graph.next_namespace_id();
        graph.insert_namespace(NamespaceDeclaration {
            id,
            kind: NamespaceKind::Global,
            reference: NamespaceReference {
                name: String::new(),
                module: module(),
            },
            types: TypeCollections::default(),
        });

        assert_eq!(graph.assembly().namespaces, vec![id]);
        assert!(graph.namespace(id).unwrap().is_global());
        assert_eq!(graph.find_namespace("").map(|ns| ns.id), Some(id));
        assert_eq!(graph.documentation(id), Some(&MemberDocumentation::default()));
        assert!(graph.documentation(NodeId::Assembly).is_some());
    }

    #[test]
    fn declared_types_follow_kind_order() {
        let mut types = TypeCollections::default();
        types.push(TypeKindTag::Struct, TypeDeclId::new(0));
        types.push(TypeKindTag::Class, TypeDeclId::new(1));
        types.push(TypeKindTag::Enum, TypeDeclId::new(2));
        types.push(TypeKindTag::Delegate, TypeDeclId::new(3));
        types.push(TypeKindTag::Interface, TypeDeclId::new(4));

        assert_eq!(
            types.declared_types(),
            vec![
                TypeDeclId::new(2),
                TypeDeclId::new(3),
                TypeDeclId::new(4),
                TypeDeclId::new(1),
                TypeDeclId::new(0),
            ]
        );
    }
}

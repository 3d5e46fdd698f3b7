//! Documentation merge.
//!
//! Additions supply replacement values for the four mergeable documentation
//! fields of a node: summary, remarks, examples and related members. Given an
//! ordered list of additions, each field independently takes its value from
//! the first addition that applies to the node and supplies that field;
//! fields no addition supplies keep their current value.
//!
//! Applying the same list twice gives the same result. Order matters.
//!
//! For the assembly, additions can also carry per-namespace additions, which
//! are merged into each namespace with the same rule.

use tracing::trace;

use crate::declarations::{
    AssemblyDeclaration, DeclarationGraph, MemberDeclId, MemberDeclaration, NamespaceDeclId,
    NamespaceDeclaration, NodeId, TypeDeclId, TypeDeclaration,
};
use crate::docs::MemberDocumentation;
use crate::error::{MetadocError, MetadocResult};

// ============================================================================
// Documented Nodes
// ============================================================================

/// A graph node documentation can be merged into.
pub trait DocumentedNode {
    /// The key identifying the node to additions: the assembly name, `N:Name`
    /// for namespaces, the canonical name for types and members.
    fn documentation_key(&self) -> String;
}

impl DocumentedNode for AssemblyDeclaration {
    fn documentation_key(&self) -> String {
        self.name.clone()
    }
}

impl DocumentedNode for NamespaceDeclaration {
    fn documentation_key(&self) -> String {
        self.canonical_name()
    }
}

impl DocumentedNode for TypeDeclaration {
    fn documentation_key(&self) -> String {
        self.canonical_name.clone()
    }
}

impl DocumentedNode for MemberDeclaration {
    fn documentation_key(&self) -> String {
        self.canonical_name.clone()
    }
}

// ============================================================================
// Additions
// ============================================================================

/// Replacement documentation for nodes of kind `N`.
pub trait DocumentationAddition<N: ?Sized> {
    /// Whether this addition takes part for `node`. Returning `false` skips
    /// it for every field.
    fn can_apply(&self, _node: &N) -> bool {
        true
    }

    fn summary(&self) -> Option<&str>;

    fn remarks(&self) -> Option<&str>;

    fn examples(&self) -> Option<&[String]>;

    fn related_members(&self) -> Option<&[String]>;
}

/// An assembly addition that also documents namespaces.
pub trait AssemblyDocumentationAddition: DocumentationAddition<AssemblyDeclaration> {
    /// Additions for the assembly's namespaces, in precedence order.
    fn namespace_additions(&self) -> Vec<&dyn DocumentationAddition<NamespaceDeclaration>>;
}

/// A concrete addition usable for any node kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentationPatch {
    /// Opt out of every merge this patch takes part in.
    pub skip: bool,
    /// Restrict the patch to the node with this documentation key.
    pub target: Option<String>,
    pub summary: Option<String>,
    pub remarks: Option<String>,
    pub examples: Option<Vec<String>>,
    pub related_members: Option<Vec<String>>,
}

impl DocumentationPatch {
    pub fn new() -> Self {
        DocumentationPatch::default()
    }

    /// A patch that never applies.
    pub fn skipped() -> Self {
        DocumentationPatch {
            skip: true,
            ..DocumentationPatch::default()
        }
    }

    pub fn for_target(mut self, key: impl Into<String>) -> Self {
        self.target = Some(key.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = Some(examples);
        self
    }

    pub fn with_related_members(mut self, related: Vec<String>) -> Self {
        self.related_members = Some(related);
        self
    }
}

impl<N: DocumentedNode + ?Sized> DocumentationAddition<N> for DocumentationPatch {
    fn can_apply(&self, node: &N) -> bool {
        !self.skip
            && self
                .target
                .as_deref()
                .is_none_or(|target| target == node.documentation_key())
    }

    fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    fn examples(&self) -> Option<&[String]> {
        self.examples.as_deref()
    }

    fn related_members(&self) -> Option<&[String]> {
        self.related_members.as_deref()
    }
}

/// An assembly patch with per-namespace patches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyPatch {
    pub patch: DocumentationPatch,
    pub namespaces: Vec<DocumentationPatch>,
}

impl AssemblyPatch {
    pub fn new(patch: DocumentationPatch) -> Self {
        AssemblyPatch {
            patch,
            namespaces: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, patch: DocumentationPatch) -> Self {
        self.namespaces.push(patch);
        self
    }
}

impl DocumentationAddition<AssemblyDeclaration> for AssemblyPatch {
    fn can_apply(&self, node: &AssemblyDeclaration) -> bool {
        DocumentationAddition::<AssemblyDeclaration>::can_apply(&self.patch, node)
    }

    fn summary(&self) -> Option<&str> {
        self.patch.summary.as_deref()
    }

    fn remarks(&self) -> Option<&str> {
        self.patch.remarks.as_deref()
    }

    fn examples(&self) -> Option<&[String]> {
        self.patch.examples.as_deref()
    }

    fn related_members(&self) -> Option<&[String]> {
        self.patch.related_members.as_deref()
    }
}

impl AssemblyDocumentationAddition for AssemblyPatch {
    fn namespace_additions(&self) -> Vec<&dyn DocumentationAddition<NamespaceDeclaration>> {
        self.namespaces
            .iter()
            .map(|patch| patch as &dyn DocumentationAddition<NamespaceDeclaration>)
            .collect()
    }
}

// ============================================================================
// Apply
// ============================================================================

/// Merge additions into the assembly and, through their namespace
/// additions, into every namespace.
///
/// Namespace additions of an assembly addition that does not apply are not
/// used either.
pub fn apply_to_assembly(
    graph: &mut DeclarationGraph,
    additions: &[&dyn AssemblyDocumentationAddition],
) -> MetadocResult<()> {
    require_additions(additions.len())?;
    let assembly = graph.assembly();
    let merged = merge(assembly, additions.iter().copied());
    let applying: Vec<&dyn AssemblyDocumentationAddition> = additions
        .iter()
        .copied()
        .filter(|a| a.can_apply(assembly))
        .collect();
    let namespaces = assembly.namespaces.clone();
    write(graph, NodeId::Assembly, merged);

    let namespace_additions: Vec<&dyn DocumentationAddition<NamespaceDeclaration>> = applying
        .into_iter()
        .flat_map(|a| a.namespace_additions())
        .collect();
    if namespace_additions.is_empty() {
        return Ok(());
    }
    for namespace in namespaces {
        apply_to_namespace(graph, namespace, &namespace_additions)?;
    }
    Ok(())
}

pub fn apply_to_namespace(
    graph: &mut DeclarationGraph,
    id: NamespaceDeclId,
    additions: &[&dyn DocumentationAddition<NamespaceDeclaration>],
) -> MetadocResult<()> {
    require_additions(additions.len())?;
    let node = graph
        .namespace(id)
        .ok_or_else(|| absent("namespace", id))?;
    let merged = merge(node, additions.iter().copied());
    write(graph, NodeId::Namespace(id), merged);
    Ok(())
}

pub fn apply_to_type(
    graph: &mut DeclarationGraph,
    id: TypeDeclId,
    additions: &[&dyn DocumentationAddition<TypeDeclaration>],
) -> MetadocResult<()> {
    require_additions(additions.len())?;
    let node = graph.type_decl(id).ok_or_else(|| absent("type", id))?;
    let merged = merge(node, additions.iter().copied());
    write(graph, NodeId::Type(id), merged);
    Ok(())
}

pub fn apply_to_member(
    graph: &mut DeclarationGraph,
    id: MemberDeclId,
    additions: &[&dyn DocumentationAddition<MemberDeclaration>],
) -> MetadocResult<()> {
    require_additions(additions.len())?;
    let node = graph.member(id).ok_or_else(|| absent("member", id))?;
    let merged = merge(node, additions.iter().copied());
    write(graph, NodeId::Member(id), merged);
    Ok(())
}

/// The winning value of each mergeable field; `None` leaves a field alone.
#[derive(Debug, Default)]
struct MergedFields {
    summary: Option<String>,
    remarks: Option<String>,
    examples: Option<Vec<String>>,
    related_members: Option<Vec<String>>,
}

fn merge<'a, N, A>(node: &N, additions: impl Iterator<Item = &'a A>) -> MergedFields
where
    N: ?Sized,
    A: ?Sized + DocumentationAddition<N> + 'a,
{
    let mut merged = MergedFields::default();
    for addition in additions.filter(|a| a.can_apply(node)) {
        if merged.summary.is_none() {
            merged.summary = addition.summary().map(str::to_string);
        }
        if merged.remarks.is_none() {
            merged.remarks = addition.remarks().map(str::to_string);
        }
        if merged.examples.is_none() {
            merged.examples = addition.examples().map(<[String]>::to_vec);
        }
        if merged.related_members.is_none() {
            merged.related_members = addition.related_members().map(<[String]>::to_vec);
        }
    }
    merged
}

fn write(graph: &mut DeclarationGraph, node: NodeId, merged: MergedFields) {
    let Some(documentation) = graph.documentation_mut(node) else {
        return;
    };
    let MemberDocumentation {
        summary,
        remarks,
        examples,
        related_members,
        ..
    } = documentation;
    if let Some(value) = merged.summary {
        *summary = value;
    }
    if let Some(value) = merged.remarks {
        *remarks = value;
    }
    if let Some(value) = merged.examples {
        *examples = value;
    }
    if let Some(value) = merged.related_members {
        *related_members = value;
    }
    trace!(?node, "applied documentation additions");
}

fn require_additions(count: usize) -> MetadocResult<()> {
    if count == 0 {
        return Err(MetadocError::invalid_argument(
            "additions",
            "at least one addition is required",
        ));
    }
    Ok(())
}

fn absent(what: &str, id: impl std::fmt::Display) -> MetadocError {
    MetadocError::invalid_argument(what, format!("{id} is not part of this graph"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node;

    impl DocumentedNode for Node {
        fn documentation_key(&self) -> String {
            "T:N.Node".to_string()
        }
    }

    #[test]
    fn first_supplying_addition_wins_per_field() {
        let first = DocumentationPatch::new().with_summary("S1");
        let second = DocumentationPatch::new()
            .with_summary("S2")
            .with_remarks("R2");

        let additions: Vec<&dyn DocumentationAddition<Node>> = vec![&first, &second];
        let merged = merge(&Node, additions.into_iter());

        assert_eq!(merged.summary.as_deref(), Some("S1"));
        assert_eq!(merged.remarks.as_deref(), Some("R2"));
        assert!(merged.examples.is_none());
        assert!(merged.related_members.is_none());
    }

    #[test]
    fn target_restricts_patch() {
        let matching = DocumentationPatch::new().for_target("T:N.Node");
        let other = DocumentationPatch::new().for_target("T:N.Other");

        assert!(DocumentationAddition::<Node>::can_apply(&matching, &Node));
        assert!(!DocumentationAddition::<Node>::can_apply(&other, &Node));
        assert!(!DocumentationAddition::<Node>::can_apply(
            &DocumentationPatch::skipped(),
            &Node
        ));
    }

    #[test]
    fn empty_additions_are_rejected() {
        let err = require_additions(0).unwrap_err();
        assert!(matches!(
            err,
            MetadocError::InvalidArgument { ref parameter, .. } if parameter == "additions"
        ));
    }
}

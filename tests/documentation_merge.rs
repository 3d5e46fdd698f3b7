//! Integration tests for merging documentation additions into a built graph.

mod support;

use metadoc::apply::{
    apply_to_assembly, apply_to_member, apply_to_namespace, apply_to_type,
    AssemblyDocumentationAddition, AssemblyPatch, DocumentationAddition, DocumentationPatch,
};
use metadoc::declarations::{
    MemberDeclId, MemberDeclaration, NamespaceDeclaration, NodeId, TypeDeclaration,
};
use metadoc::docs::{DocumentationCollection, MemberDocumentation};
use metadoc::error::MetadocError;
use metadoc_core::fixtures::Sample;

use support::{builder, member_named, sample_graph, type_named};

const RUN: &str = "M:N.TestClass`1.Run";
const HIDDEN: &str = "M:N.TestClass`1.Hidden(System.Int32)";

/// Applies only to static members.
struct StaticMembersOnly {
    remarks: String,
}

impl DocumentationAddition<MemberDeclaration> for StaticMembersOnly {
    fn can_apply(&self, node: &MemberDeclaration) -> bool {
        node.is_static()
    }

    fn summary(&self) -> Option<&str> {
        None
    }

    fn remarks(&self) -> Option<&str> {
        Some(&self.remarks)
    }

    fn examples(&self) -> Option<&[String]> {
        None
    }

    fn related_members(&self) -> Option<&[String]> {
        None
    }
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn first_applying_addition_wins() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let run = member_named(&graph, RUN).id;

    let skipped = DocumentationPatch::skipped().with_summary("S0");
    let first = DocumentationPatch::new().with_summary("S1");
    let second = DocumentationPatch::new().with_summary("S2");
    let additions: Vec<&dyn DocumentationAddition<MemberDeclaration>> =
        vec![&skipped, &first, &second];

    apply_to_member(&mut graph, run, &additions).unwrap();
    assert_eq!(graph.documentation(run).unwrap().summary, "S1");
}

#[test]
fn fields_are_merged_independently() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let class = type_named(&graph, "T:N.TestClass`1").id;

    let summary_only = DocumentationPatch::new().with_summary("S1");
    let summary_and_remarks = DocumentationPatch::new()
        .with_summary("S2")
        .with_remarks("R2");
    let examples = DocumentationPatch::new()
        .with_examples(vec!["new TestClass<int>()".to_string()])
        .with_related_members(vec![RUN.to_string()]);
    let additions: Vec<&dyn DocumentationAddition<TypeDeclaration>> =
        vec![&summary_only, &summary_and_remarks, &examples];

    apply_to_type(&mut graph, class, &additions).unwrap();

    let documentation = graph.documentation(class).unwrap();
    assert_eq!(documentation.summary, "S1");
    assert_eq!(documentation.remarks, "R2");
    assert_eq!(documentation.examples, vec!["new TestClass<int>()"]);
    assert_eq!(documentation.related_members, vec![RUN]);
}

#[test]
fn unsupplied_fields_keep_attached_documentation() {
    let sample = Sample::new();
    let source = DocumentationCollection::new().with(
        RUN,
        MemberDocumentation {
            summary: "Original.".to_string(),
            remarks: "Kept.".to_string(),
            returns: "Nothing.".to_string(),
            ..MemberDocumentation::default()
        },
    );
    let mut graph = builder(&sample)
        .build_with_documentation(sample.module, &source)
        .unwrap();
    let run = member_named(&graph, RUN).id;

    let patch = DocumentationPatch::new().with_summary("Replaced.");
    apply_to_member(&mut graph, run, &[&patch]).unwrap();

    let documentation = graph.documentation(run).unwrap();
    assert_eq!(documentation.summary, "Replaced.");
    assert_eq!(documentation.remarks, "Kept.");
    assert_eq!(documentation.returns, "Nothing.");
}

#[test]
fn applying_twice_changes_nothing() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let run = member_named(&graph, RUN).id;

    let first = DocumentationPatch::new().with_summary("S1");
    let second = DocumentationPatch::new().with_remarks("R2");
    let additions: Vec<&dyn DocumentationAddition<MemberDeclaration>> = vec![&first, &second];

    apply_to_member(&mut graph, run, &additions).unwrap();
    let once = graph.documentation(run).cloned();
    apply_to_member(&mut graph, run, &additions).unwrap();
    assert_eq!(graph.documentation(run).cloned(), once);
}

// ============================================================================
// Applicability
// ============================================================================

#[test]
fn targeted_patch_skips_other_nodes() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let run = member_named(&graph, RUN).id;
    let hidden = member_named(&graph, HIDDEN).id;

    let patch = DocumentationPatch::new().for_target(RUN).with_summary("Runs.");
    apply_to_member(&mut graph, run, &[&patch]).unwrap();
    apply_to_member(&mut graph, hidden, &[&patch]).unwrap();

    assert_eq!(graph.documentation(run).unwrap().summary, "Runs.");
    assert_eq!(graph.documentation(hidden).unwrap().summary, "");
}

#[test]
fn custom_additions_decide_applicability() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let parse = member_named(
        &graph,
        "M:N.TestClass`1.Parse(System.String,System.Int32@,System.Byte@,System.Int64@)",
    )
    .id;
    let run = member_named(&graph, RUN).id;

    let addition = StaticMembersOnly {
        remarks: "Thread-safe.".to_string(),
    };
    apply_to_member(&mut graph, parse, &[&addition]).unwrap();
    apply_to_member(&mut graph, run, &[&addition]).unwrap();

    assert_eq!(graph.documentation(parse).unwrap().remarks, "Thread-safe.");
    assert_eq!(graph.documentation(run).unwrap().remarks, "");
}

// ============================================================================
// Assembly and Namespaces
// ============================================================================

#[test]
fn assembly_additions_reach_namespaces() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);

    let patch = AssemblyPatch::new(DocumentationPatch::new().with_summary("The sample."))
        .with_namespace(
            DocumentationPatch::new()
                .for_target("N:N")
                .with_summary("Namespace N."),
        )
        .with_namespace(DocumentationPatch::new().with_remarks("Every namespace."));
    let additions: Vec<&dyn AssemblyDocumentationAddition> = vec![&patch];

    apply_to_assembly(&mut graph, &additions).unwrap();

    assert_eq!(
        graph.documentation(NodeId::Assembly).unwrap().summary,
        "The sample."
    );
    let named = graph.find_namespace("N").unwrap().id;
    let global = graph.find_namespace("").unwrap().id;
    assert_eq!(graph.documentation(named).unwrap().summary, "Namespace N.");
    assert_eq!(graph.documentation(named).unwrap().remarks, "Every namespace.");
    assert_eq!(graph.documentation(global).unwrap().summary, "");
    assert_eq!(graph.documentation(global).unwrap().remarks, "Every namespace.");
}

#[test]
fn skipped_assembly_addition_carries_no_namespace_additions() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);

    let skipped = AssemblyPatch::new(DocumentationPatch::skipped())
        .with_namespace(DocumentationPatch::new().with_summary("Ignored."));
    let applied = AssemblyPatch::new(DocumentationPatch::new().with_summary("Applied."));
    let additions: Vec<&dyn AssemblyDocumentationAddition> = vec![&skipped, &applied];

    apply_to_assembly(&mut graph, &additions).unwrap();

    assert_eq!(graph.documentation(NodeId::Assembly).unwrap().summary, "Applied.");
    let named = graph.find_namespace("N").unwrap().id;
    assert_eq!(graph.documentation(named).unwrap().summary, "");
}

#[test]
fn namespace_additions_apply_directly() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let global = graph.find_namespace("").unwrap().id;

    let patch = DocumentationPatch::new().with_summary("Types without a namespace.");
    let additions: Vec<&dyn DocumentationAddition<NamespaceDeclaration>> = vec![&patch];
    apply_to_namespace(&mut graph, global, &additions).unwrap();

    assert_eq!(
        graph.documentation(global).unwrap().summary,
        "Types without a namespace."
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn empty_additions_are_rejected() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);
    let run = member_named(&graph, RUN).id;

    let err = apply_to_member(&mut graph, run, &[]).unwrap_err();
    assert!(matches!(
        err,
        MetadocError::InvalidArgument { ref parameter, .. } if parameter == "additions"
    ));

    let err = apply_to_assembly(&mut graph, &[]).unwrap_err();
    assert!(matches!(err, MetadocError::InvalidArgument { .. }));
}

#[test]
fn absent_node_is_rejected() {
    let sample = Sample::new();
    let mut graph = sample_graph(&sample);

    let patch = DocumentationPatch::new().with_summary("Nowhere.");
    let err = apply_to_member(&mut graph, MemberDeclId::new(100_000), &[&patch]).unwrap_err();
    assert!(matches!(err, MetadocError::InvalidArgument { .. }));
}

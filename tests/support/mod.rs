//! Shared test support utilities.
//!
//! Builds the sample module's declaration graph and looks nodes up by
//! canonical name, so assertions read in terms of documentation ids.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use metadoc::builder::DeclarationGraphBuilder;
use metadoc::config::GraphConfig;
use metadoc::declarations::{DeclarationGraph, MemberDeclaration, TypeDeclaration};
use metadoc_core::fixtures::Sample;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per binary; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A builder over the sample module only.
pub fn builder(sample: &Sample) -> DeclarationGraphBuilder<'_> {
    DeclarationGraphBuilder::with_resolver(sample.resolver())
}

/// The sample module's graph with the default configuration.
pub fn sample_graph(sample: &Sample) -> DeclarationGraph {
    init_tracing();
    builder(sample)
        .build(sample.module)
        .unwrap_or_else(|err| panic!("sample module must build: {err}"))
}

/// The sample module's graph with `config`.
pub fn sample_graph_with(sample: &Sample, config: GraphConfig) -> DeclarationGraph {
    init_tracing();
    builder(sample)
        .with_config(config)
        .build(sample.module)
        .unwrap_or_else(|err| panic!("sample module must build: {err}"))
}

pub fn type_named<'g>(graph: &'g DeclarationGraph, canonical_name: &str) -> &'g TypeDeclaration {
    graph
        .find_type(canonical_name)
        .unwrap_or_else(|| panic!("no type {canonical_name}"))
}

pub fn member_named<'g>(
    graph: &'g DeclarationGraph,
    canonical_name: &str,
) -> &'g MemberDeclaration {
    graph
        .find_member(canonical_name)
        .unwrap_or_else(|| panic!("no member {canonical_name}"))
}

/// Simple names of a list of type ids, in order.
pub fn type_names(
    graph: &DeclarationGraph,
    ids: &[metadoc::declarations::TypeDeclId],
) -> Vec<String> {
    ids.iter()
        .map(|id| graph.type_decl(*id).map(|t| t.name.clone()).unwrap_or_default())
        .collect()
}

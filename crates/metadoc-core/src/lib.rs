//! Core infrastructure for metadoc.
//!
//! This crate provides the layers the declaration-graph builder reads:
//! - Metadata store modelling compiled modules (types, members, generics)
//! - Reference data: structural identities of mentioned types and members
//! - Canonical name resolution (documentation identifier strings)
//! - Parsed documentation lookup keyed by canonical name
//! - Error types and error codes

pub mod canonical;
pub mod docs;
pub mod error;
pub mod metadata;
pub mod reference;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

//! Metadoc: declaration graphs for documenting compiled modules
//!
//! Reads a metadata store describing compiled modules and produces an
//! immutable declaration graph (assembly, namespaces, types, members) with
//! canonical documentation names, then merges documentation into it.

// Core infrastructure - re-exported from metadoc-core
pub use metadoc_core::canonical;
pub use metadoc_core::docs;
pub use metadoc_core::error;
pub use metadoc_core::metadata;
pub use metadoc_core::reference;

// Declaration graph
pub mod builder;
pub mod declarations;

// Documentation merge and settings
pub mod apply;
pub mod config;

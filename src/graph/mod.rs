//! Graph module for build dependency modeling.
//!
//! This module provides the [`ModuleGraph`] struct: a directed graph of
//! build modules and external libraries, loaded once from declaration
//! records and immutable afterwards.
//!
//! # Example
//!
//! ```
//! use buildgraph::declaration::{DependencyTarget, ModuleDeclaration, Visibility};
//! use buildgraph::graph::ModuleGraph;
//!
//! let declarations = vec![
//!     ModuleDeclaration::new("files"),
//!     ModuleDeclaration::new("base-annotations"),
//!     ModuleDeclaration::new("build-cache-base")
//!         .with_dependency(Visibility::Api, DependencyTarget::module("files"))
//!         .with_dependency(
//!             Visibility::Implementation,
//!             DependencyTarget::module("base-annotations"),
//!         ),
//! ];
//!
//! let graph = ModuleGraph::from_declarations(&declarations).unwrap();
//! assert_eq!(graph.module_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! ```

mod module_graph;
mod visibility;

pub use module_graph::{GraphError, GraphResult, ModuleEdge, ModuleGraph, ModuleNode};

//! Declaration module for BuildGraph.
//!
//! This module provides the input model for build configuration: module
//! declaration records with typed dependency edges, plus a reader for
//! `*.module.json` declaration files.
//!
//! # Example
//!
//! ```
//! use buildgraph::declaration::module_file::parse_str;
//! use buildgraph::declaration::Visibility;
//!
//! let json = r#"{
//!     "name": "build-cache-base",
//!     "description": "Common shared build cache classes",
//!     "dependencies": [
//!         {"visibility": "api", "target": "files"},
//!         {"visibility": "implementation", "target": "base-annotations"}
//!     ]
//! }"#;
//!
//! let decl = parse_str(json).unwrap();
//! assert_eq!(decl.dependencies[0].visibility, Visibility::Api);
//! ```

pub mod module_file;
pub mod types;

// Re-export commonly used types for convenience
pub use module_file::{discover, parse_file, parse_str, validate, ParseError, ParseResult};

pub use types::{
    DependencyTarget, EdgeDeclaration, LibraryCoordinate, ModuleDeclaration, Visibility,
};

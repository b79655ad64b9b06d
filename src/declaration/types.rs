//! Shared types for module declarations.
//!
//! This module defines the core data structures used to represent
//! build-configuration declarations: modules, typed dependency edges,
//! and external library coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capability::Capability;
use crate::policy::IssuePolicy;

/// Represents a single module declaration record.
///
/// One record describes one module of the build: its identity, an
/// optional human-readable description, the capabilities attached to it,
/// its declared dependency edges, and the issue policy applied by
/// dependency analysis.
///
/// # Example
///
/// ```
/// use buildgraph::declaration::module_file::parse_str;
///
/// let json = r#"{
///     "name": "build-cache-base",
///     "description": "Common shared build cache classes",
///     "dependencies": [
///         {"visibility": "api", "target": "files"}
///     ]
/// }"#;
/// let decl = parse_str(json).unwrap();
/// assert_eq!(decl.name, "build-cache-base");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// The unique, path-like module identity (e.g., "build-cache-base").
    pub name: String,

    /// A brief description of what the module contains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Capabilities attached to this module, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,

    /// Declared dependency edges to other modules or external libraries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<EdgeDeclaration>,

    /// Issue policy applied to dependency-analysis findings for this module.
    #[serde(default, skip_serializing_if = "IssuePolicy::is_empty")]
    pub issues: IssuePolicy,
}

impl ModuleDeclaration {
    /// Creates a new declaration with the given identity and no edges.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            capabilities: Vec::new(),
            dependencies: Vec::new(),
            issues: IssuePolicy::new(),
        }
    }

    /// Sets the description, builder style.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a capability, builder style.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Adds a dependency edge, builder style.
    pub fn with_dependency(mut self, visibility: Visibility, target: DependencyTarget) -> Self {
        self.dependencies.push(EdgeDeclaration { visibility, target });
        self
    }

    /// Sets the issue policy, builder style.
    pub fn with_issues(mut self, issues: IssuePolicy) -> Self {
        self.issues = issues;
        self
    }

    /// Returns true if the module declares any dependency edges.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// Returns the number of declared dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns true if the module carries the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// A single declared dependency edge.
///
/// An edge relates the declaring module to a target with a visibility
/// kind that controls whether the target is exposed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDeclaration {
    /// Whether the target is exposed to consumers of the declaring module.
    pub visibility: Visibility,

    /// The module identity or library coordinate being depended on.
    pub target: DependencyTarget,
}

impl EdgeDeclaration {
    /// Creates a new edge declaration.
    pub fn new(visibility: Visibility, target: DependencyTarget) -> Self {
        Self { visibility, target }
    }

    /// Shorthand for an `api` edge to another module.
    pub fn api_module(name: impl Into<String>) -> Self {
        Self::new(Visibility::Api, DependencyTarget::module(name))
    }

    /// Shorthand for an `implementation` edge to another module.
    pub fn implementation_module(name: impl Into<String>) -> Self {
        Self::new(Visibility::Implementation, DependencyTarget::module(name))
    }
}

/// Categorizes the visibility of a dependency edge.
///
/// `api` targets are transitively exposed to consumers of the depending
/// module; `implementation` targets are visible only within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Transitively exposed to consumers of the depending module.
    Api,
    /// Hidden from consumers; visible only within the depending module.
    #[default]
    Implementation,
}

impl Visibility {
    /// Returns a short label for the visibility kind.
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Api => "api",
            Visibility::Implementation => "implementation",
        }
    }

    /// Returns true if targets behind this edge leak into consumers'
    /// compile visibility.
    pub fn is_exported(&self) -> bool {
        matches!(self, Visibility::Api)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The target of a dependency edge.
///
/// A target is either the identity of another module in the build or the
/// coordinate of an external library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyTarget {
    /// Another module of the build, by identity.
    Module(String),
    /// An external library coordinate.
    Library(LibraryCoordinate),
}

impl DependencyTarget {
    /// Creates a module target.
    pub fn module(name: impl Into<String>) -> Self {
        DependencyTarget::Module(name.into())
    }

    /// Creates a library target.
    pub fn library(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version_ref: impl Into<String>,
    ) -> Self {
        DependencyTarget::Library(LibraryCoordinate::new(group, artifact, version_ref))
    }

    /// Returns true if the target is another module.
    pub fn is_module(&self) -> bool {
        matches!(self, DependencyTarget::Module(_))
    }

    /// Returns the module identity, if the target is a module.
    pub fn as_module(&self) -> Option<&str> {
        match self {
            DependencyTarget::Module(name) => Some(name),
            DependencyTarget::Library(_) => None,
        }
    }
}

impl fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyTarget::Module(name) => write!(f, ":{}", name),
            DependencyTarget::Library(coord) => write!(f, "{}", coord),
        }
    }
}

/// The coordinate of an external library dependency.
///
/// The version is a reference into the build's version catalog, not a
/// resolved version number; resolution is owned by the surrounding build
/// host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryCoordinate {
    /// The group the library is published under (e.g., "org.slf4j").
    pub group: String,

    /// The artifact name (e.g., "slf4j-api").
    pub artifact: String,

    /// The version-catalog reference naming the version to use.
    #[serde(rename = "version")]
    pub version_ref: String,
}

impl LibraryCoordinate {
    /// Creates a new library coordinate.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version_ref: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version_ref: version_ref.into(),
        }
    }

    /// Returns the `group:artifact` key identifying the library
    /// independently of its version reference.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl fmt::Display for LibraryCoordinate {
    // The version reference is a catalog name, not part of the
    // library's identity.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Severity;

    #[test]
    fn test_visibility_label() {
        assert_eq!(Visibility::Api.label(), "api");
        assert_eq!(Visibility::Implementation.label(), "implementation");
    }

    #[test]
    fn test_visibility_is_exported() {
        assert!(Visibility::Api.is_exported());
        assert!(!Visibility::Implementation.is_exported());
    }

    #[test]
    fn test_visibility_default() {
        assert_eq!(Visibility::default(), Visibility::Implementation);
    }

    #[test]
    fn test_dependency_target_module() {
        let target = DependencyTarget::module("files");
        assert!(target.is_module());
        assert_eq!(target.as_module(), Some("files"));
        assert_eq!(format!("{}", target), ":files");
    }

    #[test]
    fn test_dependency_target_library() {
        let target = DependencyTarget::library("org.slf4j", "slf4j-api", "slf4j");
        assert!(!target.is_module());
        assert!(target.as_module().is_none());
        assert_eq!(format!("{}", target), "org.slf4j:slf4j-api");
    }

    #[test]
    fn test_library_coordinate_key() {
        let coord = LibraryCoordinate::new("com.google.code.findbugs", "jsr305", "jsr305");
        assert_eq!(coord.key(), "com.google.code.findbugs:jsr305");
    }

    #[test]
    fn test_module_declaration_builder() {
        let decl = ModuleDeclaration::new("build-cache-base")
            .with_description("Common shared build cache classes")
            .with_dependency(Visibility::Api, DependencyTarget::module("files"))
            .with_dependency(
                Visibility::Implementation,
                DependencyTarget::module("base-annotations"),
            );

        assert_eq!(decl.name, "build-cache-base");
        assert!(decl.has_dependencies());
        assert_eq!(decl.dependency_count(), 2);
        assert_eq!(decl.dependencies[0].visibility, Visibility::Api);
    }

    #[test]
    fn test_module_declaration_capability() {
        let decl =
            ModuleDeclaration::new("enterprise-workers").with_capability(Capability::UsedInWorkers);

        assert!(decl.has_capability(Capability::UsedInWorkers));
        assert!(!decl.has_capability(Capability::PublicLibraries));
    }

    #[test]
    fn test_module_declaration_issues() {
        let decl = ModuleDeclaration::new("enterprise-operations")
            .with_issues(IssuePolicy::fail_on_any());

        assert_eq!(decl.issues.resolve("unused-dependency"), Some(Severity::Fail));
    }

    #[test]
    fn test_edge_declaration_shorthands() {
        let api = EdgeDeclaration::api_module("files");
        assert_eq!(api.visibility, Visibility::Api);
        assert_eq!(api.target, DependencyTarget::module("files"));

        let implementation = EdgeDeclaration::implementation_module("base-annotations");
        assert_eq!(implementation.visibility, Visibility::Implementation);
    }

    #[test]
    fn test_target_serde_untagged() {
        let module: DependencyTarget = serde_json::from_str(r#""files""#).unwrap();
        assert_eq!(module, DependencyTarget::module("files"));

        let library: DependencyTarget = serde_json::from_str(
            r#"{"group": "org.slf4j", "artifact": "slf4j-api", "version": "slf4j"}"#,
        )
        .unwrap();
        assert_eq!(
            library,
            DependencyTarget::library("org.slf4j", "slf4j-api", "slf4j")
        );
    }
}

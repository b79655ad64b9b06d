//! Module graph implementation using petgraph.
//!
//! Provides the directed graph of build modules, their typed dependency
//! edges, and the loader that constructs the graph from declaration
//! records. The graph is built once when configuration is loaded and is
//! immutable afterwards; downstream consumers share it read-only.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use crate::capability::Capability;
use crate::declaration::{DependencyTarget, LibraryCoordinate, ModuleDeclaration, Visibility};
use crate::policy::IssuePolicy;

/// Errors that can occur during graph construction.
///
/// Structural errors abort the entire load - a graph with duplicated
/// identities or self-edges is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two declarations claim the same module identity.
    #[error("Duplicate module declaration: '{0}'")]
    DuplicateModule(String),

    /// A module declares a dependency edge on itself.
    #[error("Module '{0}' declares a dependency on itself")]
    SelfDependency(String),
}

/// Result type alias for graph construction.
pub type GraphResult<T> = Result<T, GraphError>;

/// A module node in the graph.
///
/// Modules referenced by an edge but not declared in the loaded set are
/// materialized as *external* nodes (`declared == false`); their own
/// configuration is owned by the surrounding build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// The unique module identity.
    pub name: String,
    /// Human-readable description, if declared.
    pub description: Option<String>,
    /// Capabilities attached to the module, in declaration order.
    pub capabilities: Vec<Capability>,
    /// Issue policy applied to the module's dependency analysis.
    pub policy: IssuePolicy,
    /// True if the module was declared in the loaded set.
    pub declared: bool,
}

impl ModuleNode {
    /// Returns true if the module is published as a public library.
    pub fn is_published(&self) -> bool {
        self.capabilities.iter().any(Capability::implies_publication)
    }

    /// Returns true if the module is only known through edges targeting it.
    pub fn is_external(&self) -> bool {
        !self.declared
    }
}

/// A node in the underlying graph: a build module or an external library.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GraphNode {
    Module(ModuleNode),
    Library(LibraryCoordinate),
}

impl GraphNode {
    fn as_module(&self) -> Option<&ModuleNode> {
        match self {
            GraphNode::Module(module) => Some(module),
            GraphNode::Library(_) => None,
        }
    }

    fn target(&self) -> DependencyTarget {
        match self {
            GraphNode::Module(module) => DependencyTarget::Module(module.name.clone()),
            GraphNode::Library(coord) => DependencyTarget::Library(coord.clone()),
        }
    }
}

/// Metadata carried on each dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeInfo {
    visibility: Visibility,
    implied: bool,
}

/// A dependency edge as seen from its source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEdge {
    /// The module identity or library coordinate depended on.
    pub target: DependencyTarget,
    /// Whether the target is exposed to consumers of the source module.
    pub visibility: Visibility,
    /// True if the edge was contributed by a capability rather than
    /// declared explicitly.
    pub implied: bool,
}

/// A directed graph of build modules and their typed dependencies.
///
/// Nodes are modules and external library coordinates; edges point from
/// the depending module to its dependency and carry a visibility kind.
/// Edge structure, not declaration order, defines dependency order.
///
/// # Example
///
/// ```
/// use buildgraph::declaration::{DependencyTarget, ModuleDeclaration, Visibility};
/// use buildgraph::graph::ModuleGraph;
///
/// let declarations = vec![
///     ModuleDeclaration::new("files"),
///     ModuleDeclaration::new("build-cache-base")
///         .with_dependency(Visibility::Api, DependencyTarget::module("files")),
/// ];
///
/// let graph = ModuleGraph::from_declarations(&declarations).unwrap();
/// assert_eq!(graph.module_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    /// The underlying directed graph.
    graph: DiGraph<GraphNode, EdgeInfo>,
    /// Maps module identities to their node indices for O(1) lookup.
    module_indices: HashMap<String, NodeIndex>,
    /// Maps library `group:artifact` keys to their node indices.
    library_indices: HashMap<String, NodeIndex>,
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            module_indices: HashMap::new(),
            library_indices: HashMap::new(),
        }
    }

    fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            module_indices: HashMap::with_capacity(nodes),
            library_indices: HashMap::new(),
        }
    }

    /// Builds the graph from a set of module declarations.
    ///
    /// Declarations become nodes before any edge is attached, so edge
    /// resolution never depends on declaration order; order matters only
    /// for duplicate detection. A module edge targeting an identity with
    /// no declaration materializes an external module node. After the
    /// declared edges of a module are attached, its capabilities
    /// contribute their implied library edges; implied edges identical
    /// to a declared edge are skipped.
    ///
    /// # Errors
    ///
    /// * [`GraphError::DuplicateModule`] if two declarations share an
    ///   identity - no graph is produced.
    /// * [`GraphError::SelfDependency`] if an edge targets its own
    ///   source - no graph is produced.
    pub fn from_declarations(declarations: &[ModuleDeclaration]) -> GraphResult<Self> {
        let mut graph = Self::with_capacity(declarations.len(), declarations.len() * 2);

        for decl in declarations {
            if graph.module_indices.contains_key(&decl.name) {
                return Err(GraphError::DuplicateModule(decl.name.clone()));
            }
            let node = ModuleNode {
                name: decl.name.clone(),
                description: decl.description.clone(),
                capabilities: decl.capabilities.clone(),
                policy: decl.issues.clone(),
                declared: true,
            };
            let idx = graph.graph.add_node(GraphNode::Module(node));
            graph.module_indices.insert(decl.name.clone(), idx);
        }

        for decl in declarations {
            let source = graph.module_indices[&decl.name];

            for edge in &decl.dependencies {
                let target = match &edge.target {
                    DependencyTarget::Module(name) => {
                        if name == &decl.name {
                            return Err(GraphError::SelfDependency(decl.name.clone()));
                        }
                        graph.ensure_module(name)
                    }
                    DependencyTarget::Library(coord) => graph.ensure_library(coord),
                };
                graph.attach_edge(source, target, edge.visibility, false);
            }

            for capability in &decl.capabilities {
                for implied in capability.implied_libraries() {
                    let target = graph.ensure_library(&implied.coordinate());
                    graph.attach_edge(source, target, implied.visibility, true);
                }
            }
        }

        log::debug!(
            "built module graph: {} modules, {} libraries, {} edges",
            graph.module_count(),
            graph.library_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn ensure_module(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.module_indices.get(name) {
            return idx;
        }
        let node = ModuleNode {
            name: name.to_string(),
            description: None,
            capabilities: Vec::new(),
            policy: IssuePolicy::new(),
            declared: false,
        };
        let idx = self.graph.add_node(GraphNode::Module(node));
        self.module_indices.insert(name.to_string(), idx);
        idx
    }

    fn ensure_library(&mut self, coord: &LibraryCoordinate) -> NodeIndex {
        if let Some(&idx) = self.library_indices.get(&coord.key()) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode::Library(coord.clone()));
        self.library_indices.insert(coord.key(), idx);
        idx
    }

    /// Attaches an edge unless an identical one already connects the pair.
    fn attach_edge(&mut self, from: NodeIndex, to: NodeIndex, visibility: Visibility, implied: bool) {
        let duplicate = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| edge.weight().visibility == visibility);
        if duplicate {
            log::debug!("skipping duplicate {} edge", visibility);
            return;
        }
        self.graph.add_edge(from, to, EdgeInfo { visibility, implied });
    }

    /// Gets a module node by identity.
    ///
    /// # Example
    ///
    /// ```
    /// use buildgraph::declaration::ModuleDeclaration;
    /// use buildgraph::graph::ModuleGraph;
    ///
    /// let declarations = vec![
    ///     ModuleDeclaration::new("files").with_description("Virtual file system"),
    /// ];
    /// let graph = ModuleGraph::from_declarations(&declarations).unwrap();
    ///
    /// let module = graph.get_module("files").unwrap();
    /// assert_eq!(module.description.as_deref(), Some("Virtual file system"));
    /// ```
    pub fn get_module(&self, name: &str) -> Option<&ModuleNode> {
        self.module_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
            .and_then(GraphNode::as_module)
    }

    /// Checks if a module exists in the graph (declared or external).
    pub fn contains_module(&self, name: &str) -> bool {
        self.module_indices.contains_key(name)
    }

    /// Gets the dependency edges of a module (outgoing edges).
    ///
    /// Returns an empty list for unknown modules. Consumers must not
    /// rely on the order of the returned edges.
    pub fn dependencies_of(&self, name: &str) -> Vec<ModuleEdge> {
        let Some(&idx) = self.module_indices.get(name) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| {
                let info = edge.weight();
                self.graph.node_weight(edge.target()).map(|node| ModuleEdge {
                    target: node.target(),
                    visibility: info.visibility,
                    implied: info.implied,
                })
            })
            .collect()
    }

    /// Gets the modules that depend on the given module or library key
    /// (incoming edges).
    pub fn dependents_of(&self, name: &str) -> Vec<&ModuleNode> {
        let idx = match self
            .module_indices
            .get(name)
            .or_else(|| self.library_indices.get(name))
        {
            Some(&idx) => idx,
            None => return Vec::new(),
        };

        self.graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .filter_map(GraphNode::as_module)
            .collect()
    }

    /// Gets the issue policy of a declared module.
    pub fn policy_of(&self, name: &str) -> Option<&IssuePolicy> {
        self.get_module(name).map(|module| &module.policy)
    }

    /// Returns true if the module is published as a public library.
    pub fn is_published(&self, name: &str) -> bool {
        self.get_module(name).is_some_and(ModuleNode::is_published)
    }

    /// Iterates over all module nodes, declared and external.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.graph.node_weights().filter_map(GraphNode::as_module)
    }

    /// Iterates over the declared module nodes.
    pub fn declared_modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules().filter(|module| module.declared)
    }

    /// Iterates over modules only known through edges targeting them.
    pub fn external_modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules().filter(|module| module.is_external())
    }

    /// Iterates over modules published as public libraries.
    pub fn published_modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules().filter(|module| module.is_published())
    }

    /// Iterates over the external library coordinates in the graph.
    pub fn libraries(&self) -> impl Iterator<Item = &LibraryCoordinate> {
        self.graph.node_weights().filter_map(|node| match node {
            GraphNode::Library(coord) => Some(coord),
            GraphNode::Module(_) => None,
        })
    }

    /// Returns the number of module nodes (declared and external).
    pub fn module_count(&self) -> usize {
        self.module_indices.len()
    }

    /// Returns the number of external library nodes.
    pub fn library_count(&self) -> usize {
        self.library_indices.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn edge_snapshot(&self) -> Vec<(String, DependencyTarget, &'static str, bool)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .filter_map(|edge| {
                let source = self.graph.node_weight(edge.source())?.as_module()?;
                let target = self.graph.node_weight(edge.target())?;
                Some((
                    source.name.clone(),
                    target.target(),
                    edge.weight().visibility.label(),
                    edge.weight().implied,
                ))
            })
            .collect();
        edges.sort();
        edges
    }

    fn module_snapshot(&self) -> Vec<&ModuleNode> {
        let mut modules: Vec<_> = self.modules().collect();
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        modules
    }
}

/// Structural equality: same modules, same libraries, same edges with the
/// same visibility kinds, regardless of node or edge order.
impl PartialEq for ModuleGraph {
    fn eq(&self, other: &Self) -> bool {
        self.module_snapshot() == other.module_snapshot()
            && self.library_count() == other.library_count()
            && self.edge_snapshot() == other.edge_snapshot()
    }
}

impl Eq for ModuleGraph {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::EdgeDeclaration;

    fn cache_declarations() -> Vec<ModuleDeclaration> {
        vec![
            ModuleDeclaration::new("files"),
            ModuleDeclaration::new("base-annotations"),
            ModuleDeclaration::new("build-cache-base")
                .with_description("Common shared build cache classes")
                .with_dependency(Visibility::Api, DependencyTarget::module("files"))
                .with_dependency(
                    Visibility::Implementation,
                    DependencyTarget::module("base-annotations"),
                )
                .with_dependency(
                    Visibility::Implementation,
                    DependencyTarget::library("org.slf4j", "slf4j-api", "slf4j"),
                ),
        ]
    }

    #[test]
    fn test_empty_graph() {
        let graph = ModuleGraph::from_declarations(&[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.module_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_build_cache_scenario() {
        let declarations = vec![
            ModuleDeclaration::new("files"),
            ModuleDeclaration::new("base-annotations"),
            ModuleDeclaration::new("build-cache-base")
                .with_dependency(Visibility::Api, DependencyTarget::module("files"))
                .with_dependency(
                    Visibility::Implementation,
                    DependencyTarget::module("base-annotations"),
                ),
        ];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        assert_eq!(graph.module_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let edges = graph.dependencies_of("build-cache-base");
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().any(|e| {
            e.visibility == Visibility::Api && e.target == DependencyTarget::module("files")
        }));
        assert!(edges.iter().any(|e| {
            e.visibility == Visibility::Implementation
                && e.target == DependencyTarget::module("base-annotations")
        }));
    }

    #[test]
    fn test_duplicate_module_aborts_load() {
        let declarations = vec![
            ModuleDeclaration::new("enterprise-operations"),
            ModuleDeclaration::new("enterprise-operations"),
        ];

        let err = ModuleGraph::from_declarations(&declarations).unwrap_err();

        assert_eq!(
            err,
            GraphError::DuplicateModule("enterprise-operations".to_string())
        );
        assert!(err.to_string().contains("enterprise-operations"));
    }

    #[test]
    fn test_self_dependency_aborts_load() {
        let declarations = vec![ModuleDeclaration::new("files")
            .with_dependency(Visibility::Api, DependencyTarget::module("files"))];

        let err = ModuleGraph::from_declarations(&declarations).unwrap_err();

        assert_eq!(err, GraphError::SelfDependency("files".to_string()));
    }

    #[test]
    fn test_every_declared_edge_appears_once() {
        let declarations = cache_declarations();
        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dependencies_of("build-cache-base").len(), 3);
    }

    #[test]
    fn test_repeated_identical_edge_is_deduplicated() {
        let declarations = vec![
            ModuleDeclaration::new("files"),
            ModuleDeclaration::new("build-cache-base")
                .with_dependency(Visibility::Api, DependencyTarget::module("files"))
                .with_dependency(Visibility::Api, DependencyTarget::module("files")),
        ];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_same_target_with_both_visibilities_keeps_both_edges() {
        let declarations = vec![
            ModuleDeclaration::new("files"),
            ModuleDeclaration::new("build-cache-base")
                .with_dependency(Visibility::Api, DependencyTarget::module("files"))
                .with_dependency(Visibility::Implementation, DependencyTarget::module("files")),
        ];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_edge_to_undeclared_module_materializes_external_node() {
        let declarations = vec![ModuleDeclaration::new("enterprise-operations")
            .with_dependency(Visibility::Api, DependencyTarget::module("build-operations"))];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        assert_eq!(graph.module_count(), 2);
        let external = graph.get_module("build-operations").unwrap();
        assert!(external.is_external());
        assert!(!graph.get_module("enterprise-operations").unwrap().is_external());
        assert_eq!(graph.external_modules().count(), 1);
    }

    #[test]
    fn test_declaration_order_does_not_affect_edges() {
        // The depending module is declared before its target.
        let declarations = vec![
            ModuleDeclaration::new("build-cache-base")
                .with_dependency(Visibility::Api, DependencyTarget::module("files")),
            ModuleDeclaration::new("files").with_description("Virtual file system"),
        ];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        // The target resolved to the declared node, not an external stub.
        let files = graph.get_module("files").unwrap();
        assert!(files.declared);
        assert_eq!(graph.module_count(), 2);
    }

    #[test]
    fn test_library_edges() {
        let graph = ModuleGraph::from_declarations(&cache_declarations()).unwrap();

        assert_eq!(graph.library_count(), 1);
        let libraries: Vec<_> = graph.libraries().collect();
        assert_eq!(libraries[0].key(), "org.slf4j:slf4j-api");

        let dependents = graph.dependents_of("org.slf4j:slf4j-api");
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].name, "build-cache-base");
    }

    #[test]
    fn test_dependents_of_module() {
        let graph = ModuleGraph::from_declarations(&cache_declarations()).unwrap();

        let dependents = graph.dependents_of("files");
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].name, "build-cache-base");

        assert!(graph.dependents_of("build-cache-base").is_empty());
    }

    #[test]
    fn test_worker_capability_contributes_implied_edge() {
        let declarations = vec![ModuleDeclaration::new("enterprise-workers")
            .with_capability(Capability::UsedInWorkers)];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        let edges = graph.dependencies_of("enterprise-workers");
        assert_eq!(edges.len(), 1);
        assert!(edges[0].implied);
        assert_eq!(edges[0].visibility, Visibility::Api);
        assert_eq!(
            edges[0].target,
            DependencyTarget::library("com.google.code.findbugs", "jsr305", "jsr305")
        );
    }

    #[test]
    fn test_implied_edge_deduplicates_against_declared() {
        // enterprise-workers declares api(jsr305) explicitly and also
        // carries used-in-workers, which implies the same edge.
        let declarations = vec![ModuleDeclaration::new("enterprise-workers")
            .with_capability(Capability::UsedInWorkers)
            .with_dependency(
                Visibility::Api,
                DependencyTarget::library("com.google.code.findbugs", "jsr305", "jsr305"),
            )];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        let edges = graph.dependencies_of("enterprise-workers");
        assert_eq!(edges.len(), 1);
        // The declared edge wins; the implied duplicate is skipped.
        assert!(!edges[0].implied);
    }

    #[test]
    fn test_published_modules() {
        let declarations = vec![
            ModuleDeclaration::new("build-cache-base")
                .with_capability(Capability::DistributionApi)
                .with_capability(Capability::PublicLibraries),
            ModuleDeclaration::new("files"),
        ];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        assert!(graph.is_published("build-cache-base"));
        assert!(!graph.is_published("files"));
        assert_eq!(graph.published_modules().count(), 1);
    }

    #[test]
    fn test_policy_of() {
        let declarations = vec![
            ModuleDeclaration::new("enterprise-operations")
                .with_issues(IssuePolicy::fail_on_any()),
            ModuleDeclaration::new("files"),
        ];

        let graph = ModuleGraph::from_declarations(&declarations).unwrap();

        assert_eq!(
            graph.policy_of("enterprise-operations"),
            Some(&IssuePolicy::fail_on_any())
        );
        assert_eq!(graph.policy_of("files"), Some(&IssuePolicy::new()));
        assert_eq!(graph.policy_of("missing"), None);
    }

    #[test]
    fn test_idempotent_loading() {
        let declarations = cache_declarations();

        let first = ModuleGraph::from_declarations(&declarations).unwrap();
        let second = ModuleGraph::from_declarations(&declarations).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_structural_inequality() {
        let first = ModuleGraph::from_declarations(&cache_declarations()).unwrap();

        let mut changed = cache_declarations();
        changed[2].dependencies[0] = EdgeDeclaration::implementation_module("files");
        let second = ModuleGraph::from_declarations(&changed).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_unknown_module_queries() {
        let graph = ModuleGraph::from_declarations(&cache_declarations()).unwrap();

        assert!(graph.get_module("missing").is_none());
        assert!(!graph.contains_module("missing"));
        assert!(graph.dependencies_of("missing").is_empty());
        assert!(graph.dependents_of("missing").is_empty());
    }
}

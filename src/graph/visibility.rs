//! Transitive visibility resolution over the module graph.
//!
//! `api` edges compose transitively: whatever a module exposes through an
//! `api` edge is also exposed to that module's own consumers.
//! `implementation` edges terminate visibility - their targets stay
//! private to the depending module.

use std::collections::{BTreeSet, HashSet};

use super::module_graph::ModuleGraph;
use crate::declaration::DependencyTarget;

impl ModuleGraph {
    /// Computes the set of targets a module exposes to its consumers.
    ///
    /// This is the closure of `api` edges starting at the module: its
    /// direct `api` targets plus, for every `api` module target, that
    /// module's own exported set. Cycle-safe; the module itself is never
    /// part of its exported set.
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
    ///     ModuleDeclaration::new("build-cache")
    ///         .with_dependency(Visibility::Api, DependencyTarget::module("build-cache-base")),
    /// ];
    /// let graph = ModuleGraph::from_declarations(&declarations).unwrap();
    ///
    /// // api edges compose: build-cache sees files through build-cache-base.
    /// let exported = graph.exported_targets("build-cache");
    /// assert!(exported.contains(&DependencyTarget::module("build-cache-base")));
    /// assert!(exported.contains(&DependencyTarget::module("files")));
    /// ```
    pub fn exported_targets(&self, module: &str) -> BTreeSet<DependencyTarget> {
        let mut exported = BTreeSet::new();
        let mut visited = HashSet::new();
        self.collect_exports(module, &mut exported, &mut visited);
        exported.remove(&DependencyTarget::module(module));
        exported
    }

    fn collect_exports(
        &self,
        module: &str,
        exported: &mut BTreeSet<DependencyTarget>,
        visited: &mut HashSet<String>,
    ) {
        if !visited.insert(module.to_string()) {
            return;
        }
        for edge in self.dependencies_of(module) {
            if !edge.visibility.is_exported() {
                continue;
            }
            if let DependencyTarget::Module(name) = &edge.target {
                self.collect_exports(name, exported, visited);
            }
            exported.insert(edge.target);
        }
    }

    /// Computes everything a module compiles against.
    ///
    /// A module sees all of its direct targets, regardless of visibility
    /// kind, plus the exported set of every direct module target. What
    /// its dependencies keep as `implementation` stays invisible.
    pub fn visible_targets(&self, module: &str) -> BTreeSet<DependencyTarget> {
        let mut visible = BTreeSet::new();
        for edge in self.dependencies_of(module) {
            if let DependencyTarget::Module(name) = &edge.target {
                visible.extend(self.exported_targets(name));
            }
            visible.insert(edge.target);
        }
        visible.remove(&DependencyTarget::module(module));
        visible
    }
}

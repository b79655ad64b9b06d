//! Report generation for loaded build configuration.
//!
//! This module renders the constructed module graph and policy
//! evaluation results in machine-readable (JSON) or human-readable
//! (Markdown) form.

pub mod json;
pub mod markdown;

use std::io::{self, Write};

use crate::capability::Capability;
use crate::graph::{ModuleEdge, ModuleGraph};
use crate::policy::{BuildReport, ModuleOutcome};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// JSON format - machine-readable, full data.
    Json,
    /// Markdown format - documentation/reporting.
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!(
                "Unknown report format: '{}'. Valid formats: json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// One module's row in a report.
#[derive(Debug, Clone)]
pub struct ModuleSummary {
    /// Module identity.
    pub name: String,
    /// Declared description, if any.
    pub description: Option<String>,
    /// Capabilities attached to the module.
    pub capabilities: Vec<Capability>,
    /// True if the module is published as a public library.
    pub published: bool,
    /// True if the module is only known through edges targeting it.
    pub external: bool,
    /// The module's dependency edges, sorted by target.
    pub edges: Vec<ModuleEdge>,
}

/// Data container for report generation.
///
/// Holds a render-ready snapshot of the graph and evaluation results.
#[derive(Debug, Clone)]
pub struct ReportData {
    /// Name of the build the declarations belong to.
    pub build_name: String,
    /// Number of module nodes (declared and external).
    pub module_count: usize,
    /// Number of external library nodes.
    pub library_count: usize,
    /// Number of dependency edges.
    pub edge_count: usize,
    /// Per-module rows, in name order.
    pub modules: Vec<ModuleSummary>,
    /// Policy evaluation outcomes, in name order.
    pub outcomes: Vec<ModuleOutcome>,
}

impl ReportData {
    /// Assembles report data from a graph and its evaluation results.
    pub fn new(build_name: impl Into<String>, graph: &ModuleGraph, report: &BuildReport) -> Self {
        let mut modules: Vec<ModuleSummary> = graph
            .modules()
            .map(|module| {
                let mut edges = graph.dependencies_of(&module.name);
                edges.sort_by_key(|edge| (edge.target.clone(), edge.visibility.label()));
                ModuleSummary {
                    name: module.name.clone(),
                    description: module.description.clone(),
                    capabilities: module.capabilities.clone(),
                    published: module.is_published(),
                    external: module.is_external(),
                    edges,
                }
            })
            .collect();
        modules.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            build_name: build_name.into(),
            module_count: graph.module_count(),
            library_count: graph.library_count(),
            edge_count: graph.edge_count(),
            modules,
            outcomes: report.outcomes.clone(),
        }
    }

    /// Returns the number of modules that passed evaluation.
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Returns the number of modules that failed evaluation.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    /// Returns the total number of surfaced warnings.
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.verdict.as_ref().ok())
            .map(|evaluation| evaluation.warnings.len())
            .sum()
    }
}

/// Trait for report renderers.
pub trait Reporter {
    /// Renders the report to the given writer.
    fn write_report<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()>;
}

/// Renders report data in the specified format.
pub fn render<W: Write>(format: ReportFormat, data: &ReportData, writer: &mut W) -> io::Result<()> {
    match format {
        ReportFormat::Json => json::JsonReporter.write_report(data, writer),
        ReportFormat::Markdown => markdown::MarkdownReporter.write_report(data, writer),
    }
}

//! JSON report implementation.
//!
//! Renders the module graph and evaluation results as JSON for
//! machine-readable consumption.

use super::{ReportData, Reporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter implementation.
pub struct JsonReporter;

/// Serializable module row for JSON output.
#[derive(Serialize)]
struct JsonModule {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    capabilities: Vec<String>,
    published: bool,
    external: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<JsonEdge>,
}

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge {
    target: String,
    visibility: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    implied: bool,
}

/// Serializable evaluation outcome for JSON output.
#[derive(Serialize)]
struct JsonOutcome {
    module: String,
    passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    violation: Option<JsonViolation>,
}

/// Serializable policy violation for JSON output.
#[derive(Serialize)]
struct JsonViolation {
    category: String,
    message: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    modules: usize,
    libraries: usize,
    edges: usize,
    passed: usize,
    failed: usize,
    warnings: usize,
}

/// Root JSON report structure.
#[derive(Serialize)]
struct JsonReport {
    build: String,
    summary: JsonSummary,
    modules: Vec<JsonModule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    evaluation: Vec<JsonOutcome>,
}

impl Reporter for JsonReporter {
    fn write_report<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        let modules: Vec<JsonModule> = data
            .modules
            .iter()
            .map(|module| JsonModule {
                name: module.name.clone(),
                description: module.description.clone(),
                capabilities: module
                    .capabilities
                    .iter()
                    .map(|c| c.label().to_string())
                    .collect(),
                published: module.published,
                external: module.external,
                dependencies: module
                    .edges
                    .iter()
                    .map(|edge| JsonEdge {
                        target: edge.target.to_string(),
                        visibility: edge.visibility.to_string(),
                        implied: edge.implied,
                    })
                    .collect(),
            })
            .collect();

        let evaluation: Vec<JsonOutcome> = data
            .outcomes
            .iter()
            .map(|outcome| JsonOutcome {
                module: outcome.module.clone(),
                passed: outcome.passed(),
                warnings: outcome
                    .verdict
                    .as_ref()
                    .map(|evaluation| {
                        evaluation.warnings.iter().map(ToString::to_string).collect()
                    })
                    .unwrap_or_default(),
                violation: outcome.verdict.as_ref().err().map(|violation| JsonViolation {
                    category: violation.category.clone(),
                    message: violation.message.clone(),
                }),
            })
            .collect();

        let report = JsonReport {
            build: data.build_name.clone(),
            summary: JsonSummary {
                modules: data.module_count,
                libraries: data.library_count,
                edges: data.edge_count,
                passed: data.passed_count(),
                failed: data.failed_count(),
                warnings: data.warning_count(),
            },
            modules,
            evaluation,
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

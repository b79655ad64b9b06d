//! Markdown report implementation.
//!
//! Renders the module graph and evaluation results as Markdown for
//! documentation and review.

use super::{ReportData, Reporter};
use std::io::{self, Write};

/// Markdown reporter implementation.
pub struct MarkdownReporter;

impl Reporter for MarkdownReporter {
    fn write_report<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Build Configuration Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Build:** {}", data.build_name)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Modules | {} |", data.module_count)?;
        writeln!(writer, "| External Libraries | {} |", data.library_count)?;
        writeln!(writer, "| Dependency Edges | {} |", data.edge_count)?;
        writeln!(writer, "| Modules Passed | {} |", data.passed_count())?;
        writeln!(writer, "| Modules Failed | {} |", data.failed_count())?;
        writeln!(writer, "| Warnings | {} |", data.warning_count())?;
        writeln!(writer)?;

        // Modules and their edges
        writeln!(writer, "## Modules")?;
        writeln!(writer)?;
        for module in &data.modules {
            let marker = if module.external { " (external)" } else { "" };
            writeln!(writer, "### {}{}", module.name, marker)?;
            writeln!(writer)?;

            if let Some(description) = &module.description {
                writeln!(writer, "{}", description)?;
                writeln!(writer)?;
            }

            if !module.capabilities.is_empty() {
                let labels: Vec<&str> =
                    module.capabilities.iter().map(|c| c.label()).collect();
                writeln!(writer, "Capabilities: {}", labels.join(", "))?;
                writeln!(writer)?;
            }

            if !module.edges.is_empty() {
                writeln!(writer, "| Target | Visibility |")?;
                writeln!(writer, "|--------|------------|")?;
                for edge in &module.edges {
                    let implied = if edge.implied { " (implied)" } else { "" };
                    writeln!(
                        writer,
                        "| {} | {}{} |",
                        edge.target, edge.visibility, implied
                    )?;
                }
                writeln!(writer)?;
            }
        }

        // Evaluation results
        if !data.outcomes.is_empty() {
            writeln!(writer, "## Dependency Analysis")?;
            writeln!(writer)?;
            for outcome in &data.outcomes {
                match &outcome.verdict {
                    Ok(evaluation) if evaluation.warnings.is_empty() => {
                        writeln!(writer, "- ✅ {}", outcome.module)?;
                    }
                    Ok(evaluation) => {
                        writeln!(
                            writer,
                            "- ⚠️ {} ({} warning(s))",
                            outcome.module,
                            evaluation.warnings.len()
                        )?;
                        for warning in &evaluation.warnings {
                            writeln!(writer, "  - {}", warning)?;
                        }
                    }
                    Err(violation) => {
                        writeln!(
                            writer,
                            "- ❌ {}: '{}' escalated to fail: {}",
                            outcome.module, violation.category, violation.message
                        )?;
                    }
                }
            }
        }

        Ok(())
    }
}

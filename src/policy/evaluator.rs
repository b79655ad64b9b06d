//! Policy evaluation for raised issues.
//!
//! Evaluation is all-or-nothing per module: the first issue whose
//! resolved severity is `fail` fails the module. A failing module never
//! aborts its siblings; the whole-build verdict is collected into a
//! [`BuildReport`].

use std::collections::HashMap;

use super::{Issue, IssuePolicy, Severity};
use crate::graph::ModuleGraph;

/// A matched issue whose severity resolved to `fail`.
///
/// Names the offending module and issue so the failure can be reported
/// upward without losing context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Module '{module}' failed dependency analysis: '{category}' escalated to fail: {message}")]
pub struct PolicyViolation {
    /// The module whose build fails.
    pub module: String,
    /// The category of the offending issue.
    pub category: String,
    /// The offending issue's message.
    pub message: String,
}

/// The passing outcome of evaluating one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Issues that matched a `warn` rule (or no rule at all) and were
    /// surfaced without failing the module.
    pub warnings: Vec<Issue>,
}

/// Result type alias for per-module evaluation.
pub type EvaluationResult = Result<Evaluation, PolicyViolation>;

/// Evaluates one module's issue policy against its raised issues.
///
/// Matching uses the exact issue category or the wildcard `any`; issues
/// matching neither default to `warn` so nothing disappears silently.
/// Only an explicit `ignore` rule drops an issue.
///
/// # Arguments
///
/// * `module` - Identity of the module under evaluation
/// * `policy` - The module's issue policy
/// * `issues` - Issues raised against the module by dependency analysis
///
/// # Returns
///
/// The passing [`Evaluation`], or the [`PolicyViolation`] for the first
/// issue escalated to failure.
///
/// # Example
///
/// ```
/// use buildgraph::policy::{evaluate, Issue, IssuePolicy};
///
/// let policy = IssuePolicy::fail_on_any();
///
/// // No raised issues: the wildcard has nothing to match.
/// assert!(evaluate("enterprise-workers", &policy, &[]).is_ok());
///
/// let issues = vec![Issue::new("unused-dependency", "declared but never used")];
/// let violation = evaluate("enterprise-workers", &policy, &issues).unwrap_err();
/// assert_eq!(violation.category, "unused-dependency");
/// ```
pub fn evaluate(module: &str, policy: &IssuePolicy, issues: &[Issue]) -> EvaluationResult {
    let mut warnings = Vec::new();

    for issue in issues {
        let severity = policy.resolve(&issue.category).unwrap_or(Severity::Warn);
        match severity {
            Severity::Fail => {
                return Err(PolicyViolation {
                    module: module.to_string(),
                    category: issue.category.clone(),
                    message: issue.message.clone(),
                });
            }
            Severity::Warn => {
                log::warn!("{}: {}", module, issue);
                warnings.push(issue.clone());
            }
            Severity::Ignore => {
                log::debug!("{}: ignoring {}", module, issue);
            }
        }
    }

    Ok(Evaluation { warnings })
}

/// The evaluation outcome for a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    /// The evaluated module's identity.
    pub module: String,
    /// Pass with warnings, or the violation that failed the module.
    pub verdict: EvaluationResult,
}

impl ModuleOutcome {
    /// Returns true if the module passed evaluation.
    pub fn passed(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Whole-build evaluation results, one outcome per declared module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Per-module outcomes, in module-name order.
    pub outcomes: Vec<ModuleOutcome>,
}

impl BuildReport {
    /// Returns true if every module passed.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ModuleOutcome::passed)
    }

    /// Returns the identities of modules that failed, in name order.
    pub fn failed_modules(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.passed())
            .map(|outcome| outcome.module.as_str())
            .collect()
    }

    /// Iterates over the violations of failing modules.
    pub fn violations(&self) -> impl Iterator<Item = &PolicyViolation> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.verdict.as_ref().err())
    }

    /// Returns the total number of surfaced warnings across all modules.
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.verdict.as_ref().ok())
            .map(|evaluation| evaluation.warnings.len())
            .sum()
    }
}

/// Evaluates every declared module of a graph against its raised issues.
///
/// Modules are evaluated independently in name order; a failing module
/// does not abort its siblings. Issues raised against identities the
/// graph does not declare are logged and skipped - their build is owned
/// elsewhere.
///
/// # Arguments
///
/// * `graph` - The constructed module graph
/// * `issues` - Raised issues, keyed by module identity
pub fn evaluate_graph(graph: &ModuleGraph, issues: &HashMap<String, Vec<Issue>>) -> BuildReport {
    static NO_ISSUES: Vec<Issue> = Vec::new();

    for module in issues.keys() {
        if graph.get_module(module).map_or(true, |node| !node.declared) {
            log::warn!("issues raised against undeclared module '{}'", module);
        }
    }

    let mut names: Vec<&str> = graph
        .declared_modules()
        .map(|module| module.name.as_str())
        .collect();
    names.sort_unstable();

    let outcomes = names
        .into_iter()
        .map(|name| {
            let policy = graph.policy_of(name).cloned().unwrap_or_default();
            let raised = issues.get(name).unwrap_or(&NO_ISSUES);
            ModuleOutcome {
                module: name.to_string(),
                verdict: evaluate(name, &policy, raised),
            }
        })
        .collect();

    BuildReport { outcomes }
}

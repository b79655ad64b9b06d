//! Issue policies for dependency-analysis findings.
//!
//! Dependency analysis runs outside this crate and raises issues against
//! individual modules. Each module carries an [`IssuePolicy`] deciding how
//! those issues escalate: a mapping from issue category to a severity,
//! with a wildcard category `any` that matches every issue.
//!
//! # Example
//!
//! ```
//! use buildgraph::policy::{evaluate, Issue, IssuePolicy};
//!
//! let policy = IssuePolicy::fail_on_any();
//! let issues = vec![Issue::new("unused-dependency", "declared but never used")];
//!
//! let result = evaluate("enterprise-operations", &policy, &issues);
//! assert!(result.is_err());
//! ```

mod evaluator;

pub use evaluator::{
    evaluate, evaluate_graph, BuildReport, Evaluation, EvaluationResult, ModuleOutcome,
    PolicyViolation,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The wildcard category matching every raised issue.
pub const ANY_CATEGORY: &str = "any";

/// Severity outcome a policy assigns to an issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Drop matched issues entirely.
    Ignore,
    /// Surface matched issues without failing the module.
    Warn,
    /// Fail the module's build on any matched issue.
    Fail,
}

impl Severity {
    /// Returns the identifier used in declaration files.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ignore => "ignore",
            Severity::Warn => "warn",
            Severity::Fail => "fail",
        }
    }

    /// Returns true if issues at this severity fail the module.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fail)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A per-module mapping from issue category to severity.
///
/// Matching uses the exact category when present, falling back to the
/// wildcard [`ANY_CATEGORY`]. Once a category resolves to
/// [`Severity::Fail`], no issue of that category can be silently ignored
/// downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuePolicy {
    rules: BTreeMap<String, Severity>,
}

impl IssuePolicy {
    /// Creates an empty policy with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the policy escalating every issue category to failure.
    ///
    /// # Example
    ///
    /// ```
    /// use buildgraph::policy::{IssuePolicy, Severity};
    ///
    /// let policy = IssuePolicy::fail_on_any();
    /// assert_eq!(policy.resolve("version-conflict"), Some(Severity::Fail));
    /// ```
    pub fn fail_on_any() -> Self {
        Self::new().with_rule(ANY_CATEGORY, Severity::Fail)
    }

    /// Adds a rule, builder style.
    pub fn with_rule(mut self, category: impl Into<String>, severity: Severity) -> Self {
        self.set(category, severity);
        self
    }

    /// Sets the severity for a category, replacing any previous rule.
    pub fn set(&mut self, category: impl Into<String>, severity: Severity) {
        self.rules.insert(category.into(), severity);
    }

    /// Resolves the severity for an issue category.
    ///
    /// An exact category rule takes precedence over the wildcard; with
    /// neither present the category is unmatched and `None` is returned.
    pub fn resolve(&self, category: &str) -> Option<Severity> {
        self.rules
            .get(category)
            .or_else(|| self.rules.get(ANY_CATEGORY))
            .copied()
    }

    /// Returns true if the policy has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Iterates over the rules in category order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.rules.iter().map(|(category, severity)| (category.as_str(), *severity))
    }
}

/// An issue raised against a module by dependency analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The issue category (e.g., "unused-dependency").
    pub category: String,

    /// Human-readable description of the finding.
    pub message: String,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

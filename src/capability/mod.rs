//! Capability tags for cross-cutting build behavior.
//!
//! A capability selects behavior the surrounding build host applies to a
//! module: inclusion in the distribution API, publication as a public
//! library, or exposure to worker processes. The set of capabilities is
//! fixed; each tag is interpreted through a small dispatch table rather
//! than dynamic behavior injection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::declaration::{LibraryCoordinate, Visibility};

/// A capability tag attached to a module.
///
/// Identifiers are drawn from a fixed known set; unknown identifiers are
/// rejected when declarations are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// The module is part of the distribution's Java API surface.
    DistributionApi,
    /// The module is published as a public library.
    PublicLibraries,
    /// The module's classes are loaded into isolated worker processes.
    UsedInWorkers,
}

/// All known capability tags.
pub const KNOWN_CAPABILITIES: [Capability; 3] = [
    Capability::DistributionApi,
    Capability::PublicLibraries,
    Capability::UsedInWorkers,
];

/// A library edge implied by a capability, as a const-friendly coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpliedLibrary {
    /// Library group.
    pub group: &'static str,
    /// Library artifact name.
    pub artifact: &'static str,
    /// Version-catalog reference.
    pub version_ref: &'static str,
    /// Visibility of the implied edge.
    pub visibility: Visibility,
}

impl ImpliedLibrary {
    /// Converts the implied library into an owned coordinate.
    pub fn coordinate(&self) -> LibraryCoordinate {
        LibraryCoordinate::new(self.group, self.artifact, self.version_ref)
    }
}

// Worker processes run with an isolated classpath; the annotations
// library must be exposed there for the classes workers load.
const WORKER_SHARED_LIBRARIES: &[ImpliedLibrary] = &[ImpliedLibrary {
    group: "com.google.code.findbugs",
    artifact: "jsr305",
    version_ref: "jsr305",
    visibility: Visibility::Api,
}];

impl Capability {
    /// Returns the identifier used in declaration files.
    pub fn label(&self) -> &'static str {
        match self {
            Capability::DistributionApi => "distribution-api",
            Capability::PublicLibraries => "public-libraries",
            Capability::UsedInWorkers => "used-in-workers",
        }
    }

    /// Returns the library edges this capability implies on the module
    /// carrying it.
    pub fn implied_libraries(&self) -> &'static [ImpliedLibrary] {
        match self {
            Capability::UsedInWorkers => WORKER_SHARED_LIBRARIES,
            Capability::DistributionApi | Capability::PublicLibraries => &[],
        }
    }

    /// Returns true if modules carrying this capability are published as
    /// public libraries.
    pub fn implies_publication(&self) -> bool {
        matches!(self, Capability::PublicLibraries)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distribution-api" => Ok(Capability::DistributionApi),
            "public-libraries" => Ok(Capability::PublicLibraries),
            "used-in-workers" => Ok(Capability::UsedInWorkers),
            _ => Err(format!(
                "Unknown capability: '{}'. Known capabilities: distribution-api, public-libraries, used-in-workers",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_label() {
        assert_eq!(Capability::DistributionApi.label(), "distribution-api");
        assert_eq!(Capability::PublicLibraries.label(), "public-libraries");
        assert_eq!(Capability::UsedInWorkers.label(), "used-in-workers");
    }

    #[test]
    fn test_capability_from_str() {
        assert_eq!(
            "used-in-workers".parse::<Capability>().unwrap(),
            Capability::UsedInWorkers
        );
        assert!("time-travel".parse::<Capability>().is_err());
    }

    #[test]
    fn test_capability_from_str_roundtrip() {
        for capability in KNOWN_CAPABILITIES {
            assert_eq!(capability.label().parse::<Capability>().unwrap(), capability);
        }
    }

    #[test]
    fn test_capability_serde() {
        let parsed: Capability = serde_json::from_str(r#""public-libraries""#).unwrap();
        assert_eq!(parsed, Capability::PublicLibraries);

        let serialized = serde_json::to_string(&Capability::UsedInWorkers).unwrap();
        assert_eq!(serialized, r#""used-in-workers""#);
    }

    #[test]
    fn test_worker_capability_implies_library() {
        let implied = Capability::UsedInWorkers.implied_libraries();
        assert_eq!(implied.len(), 1);
        assert_eq!(implied[0].artifact, "jsr305");
        assert_eq!(implied[0].visibility, Visibility::Api);

        let coord = implied[0].coordinate();
        assert_eq!(coord.key(), "com.google.code.findbugs:jsr305");
    }

    #[test]
    fn test_other_capabilities_imply_no_libraries() {
        assert!(Capability::DistributionApi.implied_libraries().is_empty());
        assert!(Capability::PublicLibraries.implied_libraries().is_empty());
    }

    #[test]
    fn test_publication() {
        assert!(Capability::PublicLibraries.implies_publication());
        assert!(!Capability::DistributionApi.implies_publication());
        assert!(!Capability::UsedInWorkers.implies_publication());
    }
}

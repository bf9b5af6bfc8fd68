//! Common types for artifacts and services

use serde::Serialize;

/// The artifacts that carry a version declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactKind {
    /// Terraform validation block (variables.tf)
    #[serde(rename = "variables_tf")]
    Variables,
    /// Catalog document (ibm_catalog.json)
    #[serde(rename = "ibm_catalog")]
    Catalog,
    /// Generated Go test (tests/pr_test.go)
    #[serde(rename = "test_file")]
    TestSource,
}

impl ArtifactKind {
    /// All kinds, primary first
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Variables,
        ArtifactKind::Catalog,
        ArtifactKind::TestSource,
    ];

    /// Returns the string representation of the artifact kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Variables => "variables_tf",
            ArtifactKind::Catalog => "ibm_catalog",
            ArtifactKind::TestSource => "test_file",
        }
    }

    /// The primary artifact must exist and is the reference for the current set
    pub fn is_primary(&self) -> bool {
        matches!(self, ArtifactKind::Variables)
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variables_tf" => Ok(ArtifactKind::Variables),
            "ibm_catalog" => Ok(ArtifactKind::Catalog),
            "test_file" => Ok(ArtifactKind::TestSource),
            _ => Err(()),
        }
    }
}

/// Service type together with the variable that holds its version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// e.g., "postgresql", "enterprisedb"
    pub service_type: String,
    /// e.g., "postgresql_version", "edb_version"
    pub variable_name: String,
}

impl ServiceConfig {
    /// Map a service type to its Terraform variable name.
    ///
    /// Unknown services follow the `<service>_version` pattern.
    pub fn for_service(service_type: &str) -> Self {
        let variable_name = match service_type {
            "enterprisedb" => "edb_version".to_string(),
            other => format!("{other}_version"),
        };

        Self {
            service_type: service_type.to_string(),
            variable_name,
        }
    }
}

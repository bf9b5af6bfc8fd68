//! JSON reports printed by the CLI

use indexmap::IndexMap;
use serde::Serialize;

use crate::parser::types::{ArtifactKind, ServiceConfig};
use crate::version::types::VersionInfo;

/// Errors keyed by the artifact they belong to, in the order they happened
pub type ArtifactErrors = IndexMap<ArtifactKind, String>;

/// Versions currently declared by each artifact
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    pub service_type: String,
    pub variable_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_tf: Option<VersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ibm_catalog: Option<VersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_file: Option<VersionInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub errors: ArtifactErrors,
}

impl ExtractReport {
    pub fn new(service: &ServiceConfig) -> Self {
        Self {
            service_type: service.service_type.clone(),
            variable_name: service.variable_name.clone(),
            ..Default::default()
        }
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&VersionInfo> {
        match kind {
            ArtifactKind::Variables => self.variables_tf.as_ref(),
            ArtifactKind::Catalog => self.ibm_catalog.as_ref(),
            ArtifactKind::TestSource => self.test_file.as_ref(),
        }
    }

    pub fn set(&mut self, kind: ArtifactKind, info: VersionInfo) {
        let slot = match kind {
            ArtifactKind::Variables => &mut self.variables_tf,
            ArtifactKind::Catalog => &mut self.ibm_catalog,
            ArtifactKind::TestSource => &mut self.test_file,
        };
        *slot = Some(info);
    }
}

/// Outcome of applying one update request to every artifact
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub updated_files: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub errors: ArtifactErrors,
}

impl UpdateReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Full result of a sync run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub service_type: String,
    pub variable_name: String,
    pub current_versions: Vec<String>,
    pub api_versions: Vec<String>,
    pub preferred_version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub new_versions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deprecated_versions: Vec<String>,
    pub has_changes: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updated_files: Vec<String>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub errors: ArtifactErrors,
}

impl SyncReport {
    /// False when the primary artifact could not be updated
    pub fn is_success(&self) -> bool {
        !self.errors.contains_key(&ArtifactKind::Variables)
    }

    /// Fold per-artifact outcomes of the update stage into the report
    pub fn absorb(&mut self, update: UpdateReport) {
        self.updated_files.extend(update.updated_files);
        self.skipped.extend(update.skipped);
        self.errors.extend(update.errors);
    }
}

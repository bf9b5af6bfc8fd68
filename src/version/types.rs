//! Common version types shared by extractors, updaters and the reconciler

use serde::Serialize;

use crate::version::compare::{dedup_versions, latest_of, sort_ascending};

/// Normalized version information extracted from a single artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// Unique versions in ascending order
    pub versions: Vec<String>,
    /// Highest version, independent of any "default" marker in the artifact
    pub latest_version: String,
}

impl VersionInfo {
    /// Build from raw tokens: duplicates are removed and the result sorted ascending.
    ///
    /// Returns `None` when no tokens were given.
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut versions = dedup_versions(tokens);
        sort_ascending(&mut versions);
        let latest_version = latest_of(&versions)?;
        Some(Self {
            versions,
            latest_version,
        })
    }

    /// A set holding exactly one version.
    pub fn single(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            versions: vec![version.clone()],
            latest_version: version,
        }
    }
}

/// What an updater should write for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Terraform variable / catalog key (e.g., "postgresql_version")
    pub variable_name: String,
    /// Full set of supported versions, deduplicated, in input order
    pub new_versions: Vec<String>,
    /// Version written wherever only a single version is recorded
    pub latest_version: String,
}

impl UpdateRequest {
    /// Create a request. Duplicate versions are dropped; when `latest` is not
    /// given it is derived as the maximum of `versions`.
    pub fn new<I, S>(variable_name: impl Into<String>, versions: I, latest: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let new_versions = dedup_versions(versions);
        let latest_version = latest
            .filter(|v| !v.is_empty())
            .or_else(|| latest_of(&new_versions))
            .unwrap_or_default();

        Self {
            variable_name: variable_name.into(),
            new_versions,
            latest_version,
        }
    }

    /// New versions sorted ascending
    pub fn versions_ascending(&self) -> Vec<String> {
        let mut versions = self.new_versions.clone();
        sort_ascending(&mut versions);
        versions
    }

    /// Whether `current` holds exactly the requested versions (order ignored)
    pub fn matches_versions(&self, current: &[String]) -> bool {
        self.versions_ascending() == VersionInfo::from_tokens(current.iter().cloned())
            .map(|info| info.versions)
            .unwrap_or_default()
    }
}

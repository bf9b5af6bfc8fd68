//! Source trait for fetching the authoritative list of deployable versions

#[cfg(test)]
use mockall::automock;

use serde::Serialize;

use crate::version::error::SourceError;

/// Versions a service can currently be deployed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployableVersions {
    /// Versions sorted ascending
    pub versions: Vec<String>,
    /// Version the provider recommends (falls back to the highest)
    pub preferred_version: String,
}

/// Trait for fetching the authoritative version list of a managed service
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetches all deployable versions for a service type
    ///
    /// # Arguments
    /// * `service_type` - The service name (e.g., "postgresql", "enterprisedb")
    ///
    /// # Returns
    /// * `Ok(DeployableVersions)` - Versions ordered oldest to newest plus the preferred one
    /// * `Err(SourceError)` - If authentication or the fetch fails
    async fn fetch_versions(&self, service_type: &str) -> Result<DeployableVersions, SourceError>;
}

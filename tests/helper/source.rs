//! Version source test utilities

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use icd_version_sync::version::compare::latest_of;
use icd_version_sync::version::error::SourceError;
use icd_version_sync::version::source::{DeployableVersions, VersionSource};

/// Mock version source for testing
#[derive(Default)]
pub struct MockSource {
    services: HashMap<String, DeployableVersions>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register versions (oldest first) and the preferred one
    pub fn with_versions(mut self, service: &str, versions: Vec<&str>, preferred: &str) -> Self {
        self.services.insert(
            service.to_string(),
            DeployableVersions {
                versions: versions.into_iter().map(|v| v.to_string()).collect(),
                preferred_version: preferred.to_string(),
            },
        );
        self
    }

    /// Register versions and prefer the highest
    pub fn with_latest(self, service: &str, versions: Vec<&str>) -> Self {
        let owned: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        let preferred = latest_of(&owned).unwrap_or_default();
        self.with_versions(service, versions, &preferred)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionSource for MockSource {
    async fn fetch_versions(&self, service_type: &str) -> Result<DeployableVersions, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.services
            .get(service_type)
            .cloned()
            .ok_or_else(|| SourceError::ServiceNotFound(service_type.to_string()))
    }
}

//! Reconciliation of the repository against the authoritative version list
//!
//! ```text
//! FETCH ──▶ EXTRACT ──▶ DIFF ──┬──▶ no-op ─────────────┐
//!                              └──▶ UPDATE (or plan) ──┴──▶ REPORT
//! ```
//!
//! `variables.tf` is the primary artifact: it must be readable and its
//! versions are the "current" set. The catalog and the Go test are optional
//! and their failures only show up in the report.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::parser::traits::{ArtifactError, Extractor};
use crate::parser::types::{ArtifactKind, ServiceConfig};
use crate::parser::{CatalogExtractor, GoTestExtractor, HclExtractor};
use crate::sync::error::SyncError;
use crate::sync::report::{ExtractReport, SyncReport, UpdateReport};
use crate::sync::storage::ArtifactStore;
use crate::updater::traits::Updater;
use crate::updater::{CatalogUpdater, GoTestUpdater, HclUpdater};
use crate::version::source::VersionSource;
use crate::version::types::{UpdateRequest, VersionInfo};

/// Split two version lists into `(new, deprecated)`.
///
/// `new` keeps the order of `authoritative`, `deprecated` the order of `current`.
pub fn diff_versions(current: &[String], authoritative: &[String]) -> (Vec<String>, Vec<String>) {
    let current_set: IndexSet<&str> = current.iter().map(String::as_str).collect();
    let authoritative_set: IndexSet<&str> = authoritative.iter().map(String::as_str).collect();

    let new = authoritative_set
        .difference(&current_set)
        .map(|v| v.to_string())
        .collect();
    let deprecated = current_set
        .difference(&authoritative_set)
        .map(|v| v.to_string())
        .collect();

    (new, deprecated)
}

/// One artifact together with the format handlers for it
struct ArtifactHandler {
    kind: ArtifactKind,
    path: PathBuf,
    extractor: Box<dyn Extractor>,
    updater: Box<dyn Updater>,
}

impl ArtifactHandler {
    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Runs extraction, updates and full sync runs over an artifact store
pub struct Reconciler<S: ArtifactStore> {
    store: S,
    service: ServiceConfig,
    primary: ArtifactHandler,
    optional: Vec<ArtifactHandler>,
}

impl<S: ArtifactStore> Reconciler<S> {
    pub fn new(store: S, config: &SyncConfig, service: ServiceConfig) -> Self {
        let optional = ArtifactKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_primary())
            .map(|kind| Self::handler_for(kind, config))
            .collect();

        Self {
            store,
            service,
            primary: Self::handler_for(ArtifactKind::Variables, config),
            optional,
        }
    }

    /// Every artifact, primary first
    fn handlers(&self) -> impl Iterator<Item = &ArtifactHandler> {
        std::iter::once(&self.primary).chain(&self.optional)
    }

    fn handler_for(kind: ArtifactKind, config: &SyncConfig) -> ArtifactHandler {
        let paths = &config.artifacts;
        let (path, extractor, updater): (&Path, Box<dyn Extractor>, Box<dyn Updater>) = match kind
        {
            ArtifactKind::Variables => (
                paths.variables.as_path(),
                Box::new(HclExtractor::new()),
                Box::new(HclUpdater::new()),
            ),
            ArtifactKind::Catalog => (
                paths.catalog.as_path(),
                Box::new(CatalogExtractor::new()),
                Box::new(CatalogUpdater::new()),
            ),
            ArtifactKind::TestSource => (
                paths.test_source.as_path(),
                Box::new(GoTestExtractor::new(&config.test_constant)),
                Box::new(GoTestUpdater::new(&config.test_constant)),
            ),
        };

        ArtifactHandler {
            kind,
            path: path.to_path_buf(),
            extractor,
            updater,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// Read and extract one artifact. `Ok(None)` means the file does not exist.
    fn extract_artifact(
        &self,
        handler: &ArtifactHandler,
    ) -> Result<Option<VersionInfo>, ArtifactError> {
        if !self.store.exists(&handler.path) {
            return Ok(None);
        }

        let content = self.store.read_text(&handler.path)?;
        let info = handler
            .extractor
            .extract(&content, &self.service.variable_name)?;
        debug!("{}: {:?}", handler.name(), info.versions);
        Ok(Some(info))
    }

    /// Record the outcome of extracting one artifact in `report`
    fn record_extract(&self, handler: &ArtifactHandler, report: &mut ExtractReport) {
        match self.extract_artifact(handler) {
            Ok(Some(info)) => report.set(handler.kind, info),
            Ok(None) if handler.kind.is_primary() => {
                report
                    .errors
                    .insert(handler.kind, format!("{} not found", handler.name()));
            }
            Ok(None) => report
                .skipped
                .push(format!("{} (file not found)", handler.name())),
            Err(e) if !handler.kind.is_primary() && e.is_field_not_found() => {
                debug!(
                    "{} does not declare {}",
                    handler.name(),
                    self.service.variable_name
                );
                report
                    .skipped
                    .push(format!("{} (no version field)", handler.name()));
            }
            Err(e) => {
                warn!("Failed to extract {}: {}", handler.name(), e);
                report.errors.insert(handler.kind, e.to_string());
            }
        }
    }

    /// Extract the current versions of every artifact
    pub fn extract_all(&self) -> ExtractReport {
        let mut report = ExtractReport::new(&self.service);
        for handler in self.handlers() {
            self.record_extract(handler, &mut report);
        }
        report
    }

    /// Apply `request` to every artifact that exists.
    ///
    /// With `dry_run` the artifacts that would be touched are listed and
    /// nothing is read or written.
    pub fn apply_update(&self, request: &UpdateRequest, dry_run: bool) -> UpdateReport {
        let mut report = UpdateReport::default();

        for handler in self.handlers() {
            let name = handler.name();

            if !self.store.exists(&handler.path) {
                if handler.kind.is_primary() {
                    report.errors.insert(handler.kind, format!("{name} not found"));
                } else {
                    report.skipped.push(format!("{name} (file not found)"));
                }
                continue;
            }

            if dry_run {
                report.updated_files.push(name);
                continue;
            }

            match self.update_artifact(handler, request) {
                Ok(true) => {
                    info!("Updated {}", name);
                    report.updated_files.push(name);
                }
                Ok(false) => report.skipped.push(format!("{name} (already up to date)")),
                // Optional artifacts may not declare the field at all
                Err(e) if !handler.kind.is_primary() && e.is_field_not_found() => {
                    debug!("{} has no version to update", name);
                    report.skipped.push(format!("{name} (no version field)"));
                }
                Err(e) => {
                    warn!("Failed to update {}: {}", name, e);
                    report.errors.insert(handler.kind, e.to_string());
                }
            }
        }

        report
    }

    /// Rewrite one artifact. Returns whether its content changed.
    fn update_artifact(
        &self,
        handler: &ArtifactHandler,
        request: &UpdateRequest,
    ) -> Result<bool, ArtifactError> {
        let content = self.store.read_text(&handler.path)?;
        let updated = handler.updater.update(&content, request)?;

        if updated == content {
            return Ok(false);
        }

        self.store.write_text(&handler.path, &updated)?;
        Ok(true)
    }

    /// Bring every artifact in line with the versions reported by `source`
    pub async fn reconcile(
        &self,
        source: &dyn VersionSource,
        dry_run: bool,
    ) -> Result<SyncReport, SyncError> {
        let service_type = &self.service.service_type;

        info!("Fetching versions for {}", service_type);
        let deployable = source.fetch_versions(service_type).await?;
        info!("API versions: {:?}", deployable.versions);

        let mut extract = ExtractReport::new(&self.service);
        let primary = &self.primary;

        let current = match self.extract_artifact(primary) {
            Ok(Some(info)) => info,
            Ok(None) => {
                return Err(SyncError::PrimaryArtifact {
                    artifact: primary.name(),
                    source: ArtifactError::Io(format!("{} not found", primary.name())),
                });
            }
            Err(source) => {
                return Err(SyncError::PrimaryArtifact {
                    artifact: primary.name(),
                    source,
                });
            }
        };
        info!("Current versions: {:?}", current.versions);

        for handler in &self.optional {
            self.record_extract(handler, &mut extract);
        }

        let (new_versions, deprecated_versions) =
            diff_versions(&current.versions, &deployable.versions);
        let has_changes = !new_versions.is_empty() || !deprecated_versions.is_empty();

        let mut report = SyncReport {
            service_type: self.service.service_type.clone(),
            variable_name: self.service.variable_name.clone(),
            current_versions: current.versions,
            api_versions: deployable.versions.clone(),
            preferred_version: deployable.preferred_version.clone(),
            new_versions,
            deprecated_versions,
            has_changes,
            dry_run,
            skipped: extract.skipped,
            errors: extract.errors,
            ..Default::default()
        };

        if !has_changes {
            info!("No changes detected, versions are up to date");
            return Ok(report);
        }

        info!(
            "Changes detected: new {:?}, deprecated {:?}",
            report.new_versions, report.deprecated_versions
        );

        let request = UpdateRequest::new(
            &self.service.variable_name,
            deployable.versions,
            Some(deployable.preferred_version),
        );
        // Extraction outcomes are superseded by what the update stage reports
        report.skipped.clear();
        report.absorb(self.apply_update(&request, dry_run));

        if dry_run {
            info!("Dry run: would update {:?}", report.updated_files);
        }

        Ok(report)
    }
}

//! Fixture repository utilities

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use icd_version_sync::config::SyncConfig;
use icd_version_sync::parser::types::ServiceConfig;
use icd_version_sync::sync::{FsStore, Reconciler};

pub const VARIABLES_TF: &str = "variables.tf";
pub const IBM_CATALOG: &str = "ibm_catalog.json";
pub const PR_TEST: &str = "tests/pr_test.go";

fn fixture_dir(service: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(service)
}

/// Copy the fixture module of `service` into a fresh temporary directory
pub fn fixture_repo(service: &str) -> TempDir {
    fixture_repo_with(service, &[VARIABLES_TF, IBM_CATALOG, PR_TEST])
}

/// Copy only the listed artifacts of the fixture module
pub fn fixture_repo_with(service: &str, files: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let source = fixture_dir(service);

    for file in files {
        let target = temp_dir.path().join(file);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::copy(source.join(file), target).unwrap();
    }

    temp_dir
}

/// Original fixture content, for byte comparisons
pub fn fixture(service: &str, file: &str) -> String {
    std::fs::read_to_string(fixture_dir(service).join(file)).unwrap()
}

pub fn read(repo: &TempDir, file: &str) -> String {
    std::fs::read_to_string(repo.path().join(file)).unwrap()
}

pub fn create_test_reconciler(repo: &TempDir, service: &str) -> Reconciler<FsStore> {
    Reconciler::new(
        FsStore::new(repo.path()),
        &SyncConfig::default(),
        ServiceConfig::for_service(service),
    )
}

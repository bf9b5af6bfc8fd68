use serde::Deserialize;
use std::path::{Path, PathBuf};

use anyhow::Context;

// =============================================================================
// Defaults
// =============================================================================

/// IAM endpoint used to exchange the API key for a bearer token
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

/// IBM Cloud Databases API (us-south serves the global deployables list)
pub const DEFAULT_API_URL: &str = "https://api.us-south.databases.cloud.ibm.com";

/// Timeout for version source requests in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Constant holding the version exercised by the Go tests
pub const DEFAULT_TEST_CONSTANT: &str = "latestVersion";

/// Config file looked up in the repository root when `--config` is not given
pub const REPO_CONFIG_FILE: &str = ".icd-version-sync.json";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    pub artifacts: ArtifactPaths,
    pub source: SourceConfig,
    /// Name of the Go constant that records the latest tested version
    pub test_constant: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::default(),
            source: SourceConfig::default(),
            test_constant: DEFAULT_TEST_CONSTANT.to_string(),
        }
    }
}

impl SyncConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `<repo_root>/.icd-version-sync.json`
    /// is used when present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = repo_root.join(REPO_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Location of each artifact, relative to the repository root
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactPaths {
    pub variables: PathBuf,
    pub catalog: PathBuf,
    pub test_source: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            variables: PathBuf::from("variables.tf"),
            catalog: PathBuf::from("ibm_catalog.json"),
            test_source: PathBuf::from("tests/pr_test.go"),
        }
    }
}

/// Version source endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceConfig {
    pub iam_url: String,
    pub api_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            iam_url: DEFAULT_IAM_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

/// Returns the path to the data directory for icd-version-sync.
/// Uses $XDG_DATA_HOME/icd-version-sync if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/icd-version-sync,
/// or ./icd-version-sync if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("icd-version-sync.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("icd-version-sync")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn sync_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "artifacts": {
                "testSource": "tests/other_test.go"
            }
        }))
        .unwrap();

        assert_eq!(
            result.artifacts.test_source,
            PathBuf::from("tests/other_test.go")
        );
        assert_eq!(result.artifacts.variables, PathBuf::from("variables.tf"));
        assert_eq!(result.source, SourceConfig::default());
        assert_eq!(result.test_constant, DEFAULT_TEST_CONSTANT);
    }

    #[test]
    fn sync_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<SyncConfig>(json!({
            "artifacts": {
                "variables": "modules/db/variables.tf",
                "catalog": "catalog.json",
                "testSource": "tests/main_test.go"
            },
            "source": {
                "iamUrl": "http://localhost:1",
                "apiUrl": "http://localhost:2",
                "timeoutMs": 500
            },
            "testConstant": "preferredVersion"
        }))
        .unwrap();

        assert_eq!(
            result,
            SyncConfig {
                artifacts: ArtifactPaths {
                    variables: PathBuf::from("modules/db/variables.tf"),
                    catalog: PathBuf::from("catalog.json"),
                    test_source: PathBuf::from("tests/main_test.go"),
                },
                source: SourceConfig {
                    iam_url: "http://localhost:1".to_string(),
                    api_url: "http://localhost:2".to_string(),
                    timeout_ms: 500,
                },
                test_constant: "preferredVersion".to_string(),
            }
        );
    }

    #[test]
    fn load_returns_defaults_when_repo_has_no_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = SyncConfig::load(None, temp_dir.path()).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn load_reads_repo_config_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(REPO_CONFIG_FILE),
            r#"{"testConstant": "tfVersion"}"#,
        )
        .unwrap();

        let config = SyncConfig::load(None, temp_dir.path()).unwrap();
        assert_eq!(config.test_constant, "tfVersion");
    }

    #[test]
    fn load_fails_for_missing_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        assert!(SyncConfig::load(Some(&missing), temp_dir.path()).is_err());
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/icd-version-sync"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/icd-version-sync")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./icd-version-sync"));
    }
}

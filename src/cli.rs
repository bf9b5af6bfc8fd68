//! Command-line interface
//!
//! Every command prints a single JSON document on stdout. Progress goes
//! through `tracing` to stderr (or the log file), so the output can be piped
//! straight into CI tooling.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::{SyncConfig, log_path};
use crate::logging::{LogFormat, LogTarget};
use crate::parser::types::ServiceConfig;
use crate::sync::{FsStore, Reconciler};
use crate::version::source::{DeployableVersions, VersionSource};
use crate::version::sources::{IbmCloudSource, resolve_api_key};
use crate::version::types::UpdateRequest;

#[derive(Parser, Debug)]
#[command(name = "icd-version-sync")]
#[command(
    version,
    about = "Keep the supported ICD versions of a Terraform module in sync"
)]
pub struct Cli {
    /// ICD service type (e.g., postgresql, mysql, redis)
    #[arg(long, short = 's', global = true)]
    pub service_type: Option<String>,

    /// Path to the repository root
    #[arg(long, short = 'r', global = true, default_value = ".")]
    pub repo_root: PathBuf,

    /// Config file (defaults to <repo-root>/.icd-version-sync.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Write logs to a file instead of stderr (default location when no path is given)
    #[arg(long, global = true, num_args = 0..=1)]
    pub log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch deployable versions from the IBM Cloud Databases API
    Fetch {
        /// IBM Cloud API key (or set IBMCLOUD_API_KEY/TF_VAR_ibmcloud_api_key)
        #[arg(long)]
        ibmcloud_api_key: Option<String>,
    },

    /// Extract the versions currently declared by the repository
    Extract,

    /// Rewrite every artifact with the given versions
    Update {
        /// Comma-separated versions (e.g., 15,16,17,18)
        #[arg(long, short = 'v', value_delimiter = ',', required = true)]
        versions: Vec<String>,

        /// Version used as default and in tests (defaults to the highest)
        #[arg(long, short = 'l')]
        latest: Option<String>,

        /// Show what would be updated without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch, compare and update in one step
    Sync {
        /// IBM Cloud API key (or set IBMCLOUD_API_KEY/TF_VAR_ibmcloud_api_key)
        #[arg(long)]
        ibmcloud_api_key: Option<String>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub fn log_target(&self) -> LogTarget {
        match &self.log_file {
            None => LogTarget::Stderr,
            Some(Some(path)) => LogTarget::File(path.clone()),
            Some(None) => LogTarget::File(log_path()),
        }
    }

    fn service(&self) -> anyhow::Result<ServiceConfig> {
        let service_type = self
            .service_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context("--service-type is required")?;
        Ok(ServiceConfig::for_service(service_type))
    }
}

/// Output of the `fetch` command
#[derive(Debug, Serialize, PartialEq)]
pub struct FetchReport {
    pub service_type: String,
    pub variable_name: String,
    pub versions: Vec<String>,
    pub latest_version: String,
}

impl FetchReport {
    fn new(service: &ServiceConfig, deployable: DeployableVersions) -> Self {
        Self {
            service_type: service.service_type.clone(),
            variable_name: service.variable_name.clone(),
            versions: deployable.versions,
            latest_version: deployable.preferred_version,
        }
    }
}

/// Trim the `--versions` list and drop empty entries
fn normalize_versions(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn build_source(api_key: Option<&str>, config: &SyncConfig) -> anyhow::Result<IbmCloudSource> {
    let api_key = resolve_api_key(api_key)?;
    Ok(IbmCloudSource::new(api_key, &config.source)?)
}

/// Execute the parsed command
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let service = cli.service()?;
    let config = SyncConfig::load(cli.config.as_deref(), &cli.repo_root)?;
    let reconciler = Reconciler::new(FsStore::new(&cli.repo_root), &config, service.clone());

    match cli.command {
        Command::Fetch { ibmcloud_api_key } => {
            let source = build_source(ibmcloud_api_key.as_deref(), &config)?;
            info!("Fetching versions for {}", service.service_type);
            let deployable = runtime()?
                .block_on(source.fetch_versions(&service.service_type))
                .context("failed to fetch API versions")?;

            print_json(&FetchReport::new(&service, deployable))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Extract => {
            print_json(&reconciler.extract_all())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Update {
            versions,
            latest,
            dry_run,
        } => {
            let versions = normalize_versions(&versions);
            if versions.is_empty() {
                anyhow::bail!("versions list is empty");
            }

            let request = UpdateRequest::new(&service.variable_name, versions, latest);
            if dry_run {
                info!(
                    "Dry run: would update files with versions {:?} (latest: {})",
                    request.new_versions, request.latest_version
                );
            }

            let report = reconciler.apply_update(&request, dry_run);
            print_json(&report)?;
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Sync {
            ibmcloud_api_key,
            dry_run,
        } => {
            let source = build_source(ibmcloud_api_key.as_deref(), &config)?;
            let report = runtime()?.block_on(reconciler.reconcile(&source, dry_run))?;

            print_json(&report)?;
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

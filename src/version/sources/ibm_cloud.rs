//! IBM Cloud Databases client for fetching deployable versions
//!
//! Authentication goes through IAM: the API key is exchanged for a bearer
//! token, which is kept as a [`TokenLease`] until shortly before it expires.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::version::compare::{latest_of, sort_ascending};
use crate::version::error::SourceError;
use crate::version::source::{DeployableVersions, VersionSource};

const API_KEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Seconds shaved off the IAM `expires_in` so a token is never used right at its deadline
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Environment variables consulted for the API key, in order
const API_KEY_ENV_VARS: [&str; 2] = ["IBMCLOUD_API_KEY", "TF_VAR_ibmcloud_api_key"];

/// Resolve the API key from an explicit value or the environment.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, SourceError> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.is_empty())
        .ok_or(SourceError::MissingApiKey)
}

/// An IAM access token together with the instant it stops being usable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLease {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenLease {
    /// Lease for a token issued at `issued_at` that IAM says lives `expires_in` seconds
    pub fn new(access_token: String, expires_in: i64, issued_at: DateTime<Utc>) -> Self {
        let lifetime = TimeDelta::try_seconds(expires_in - TOKEN_EXPIRY_MARGIN_SECS)
            .unwrap_or(TimeDelta::zero());
        Self {
            access_token,
            expires_at: issued_at + lifetime,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct DeployablesResponse {
    deployables: Vec<Deployable>,
}

#[derive(Debug, Deserialize)]
struct Deployable {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    versions: Vec<DeployableVersion>,
}

#[derive(Debug, Deserialize)]
struct DeployableVersion {
    version: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    is_preferred: bool,
}

/// Version source backed by the IBM Cloud Databases `deployables` API
pub struct IbmCloudSource {
    client: Client,
    api_key: String,
    iam_url: String,
    api_url: String,
    lease: Mutex<Option<TokenLease>>,
}

impl IbmCloudSource {
    pub fn new(api_key: String, config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("icd-version-sync")
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_key,
            iam_url: config.iam_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            lease: Mutex::new(None),
        })
    }

    fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        let lease = self.lease.lock().ok()?;
        lease
            .as_ref()
            .filter(|lease| lease.is_valid_at(now))
            .map(|lease| lease.access_token.clone())
    }

    /// Return a valid access token, requesting a new one only when the lease ran out
    async fn access_token(&self) -> Result<String, SourceError> {
        if let Some(token) = self.cached_token(Utc::now()) {
            debug!("Reusing cached IAM token");
            return Ok(token);
        }

        let url = format!("{}/identity/token", self.iam_url);
        debug!("Requesting IAM token: {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", API_KEY_GRANT_TYPE),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        let lease = TokenLease::new(token.access_token, token.expires_in, Utc::now());
        let access_token = lease.access_token.clone();
        if let Ok(mut slot) = self.lease.lock() {
            *slot = Some(lease);
        }

        Ok(access_token)
    }
}

#[async_trait::async_trait]
impl VersionSource for IbmCloudSource {
    async fn fetch_versions(&self, service_type: &str) -> Result<DeployableVersions, SourceError> {
        let token = self.access_token().await?;

        let url = format!("{}/v5/ibm/deployables", self.api_url);
        debug!("Fetching deployables: {}", url);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::InvalidResponse(format!(
                "deployables request failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let deployables: DeployablesResponse = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        let Some(deployable) = deployables
            .deployables
            .into_iter()
            .find(|d| d.service_type.eq_ignore_ascii_case(service_type))
        else {
            return Err(SourceError::ServiceNotFound(service_type.to_string()));
        };

        let stable: Vec<DeployableVersion> = deployable
            .versions
            .into_iter()
            .filter(|v| v.status.is_empty() || v.status == "stable")
            .collect();

        let preferred = stable
            .iter()
            .find(|v| v.is_preferred)
            .map(|v| v.version.clone());
        let mut versions: Vec<String> = stable.into_iter().map(|v| v.version).collect();
        sort_ascending(&mut versions);

        let Some(preferred_version) = preferred.or_else(|| latest_of(&versions)) else {
            return Err(SourceError::ServiceNotFound(service_type.to_string()));
        };

        info!(
            "Found {} deployable versions for {} (preferred {})",
            versions.len(),
            service_type,
            preferred_version
        );

        Ok(DeployableVersions {
            versions,
            preferred_version,
        })
    }
}

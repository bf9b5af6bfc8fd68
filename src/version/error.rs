use thiserror::Error;

/// Failure of the authoritative version source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(
        "IBM Cloud API key required: use --ibmcloud-api-key or set IBMCLOUD_API_KEY/TF_VAR_ibmcloud_api_key env var"
    )]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token request failed ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No versions found for service type: {0}")]
    ServiceNotFound(String),
}

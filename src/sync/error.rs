use thiserror::Error;

use crate::parser::traits::ArtifactError;
use crate::version::error::SourceError;

/// Failure that aborts a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch versions: {0}")]
    UpstreamUnavailable(#[from] SourceError),

    #[error("failed to extract current versions from {artifact}: {source}")]
    PrimaryArtifact {
        artifact: String,
        source: ArtifactError,
    },
}

//! Extractor trait definition

use crate::version::types::VersionInfo;

/// Trait for reading the supported version set of a field out of one artifact
pub trait Extractor: Send + Sync {
    /// Extract the versions declared for `field` from `content`
    fn extract(&self, content: &str, field: &str) -> Result<VersionInfo, ArtifactError>;
}

/// Error type for extracting from and updating artifacts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// The field is structurally absent from the artifact
    #[error("no versions found for {field}")]
    FieldNotFound { field: String },

    /// The artifact does not satisfy the grammar of its own format
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The field exists but declares neither options nor a default value
    #[error("no version options found for {field}")]
    EmptyVersionSet { field: String },

    /// Reading or writing the artifact failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A field name produced a pattern the regex engine rejected
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Compile a pattern built around an (escaped) field name
pub(crate) fn field_regex(pattern: &str) -> Result<regex::Regex, ArtifactError> {
    regex::Regex::new(pattern).map_err(|e| ArtifactError::InvalidPattern(e.to_string()))
}

impl ArtifactError {
    pub fn field_not_found(field: &str) -> Self {
        ArtifactError::FieldNotFound {
            field: field.to_string(),
        }
    }

    /// Whether the error only means the artifact has nothing to offer for this field
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, ArtifactError::FieldNotFound { .. })
    }
}

//! Updater trait definition

use crate::parser::traits::ArtifactError;
use crate::version::types::UpdateRequest;

/// Trait for surgically rewriting the version declaration of one artifact
///
/// Implementations must leave every byte outside the version-bearing region
/// untouched, and return the input unchanged when there is nothing to do.
pub trait Updater: Send + Sync {
    /// Apply `request` to `content` and return the new text
    fn update(&self, content: &str, request: &UpdateRequest) -> Result<String, ArtifactError>;
}

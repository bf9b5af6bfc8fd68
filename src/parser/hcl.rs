//! variables.tf extractor
//!
//! Reads the supported versions out of the validation block of a Terraform
//! variable. Each version is one equality comparison inside `anytrue([...])`:
//!
//! ```text
//! validation {
//!   condition = anytrue([
//!     var.postgresql_version == null,
//!     var.postgresql_version == "17",
//!     var.postgresql_version == "16",
//!   ])
//! }
//! ```
//!
//! The `null` comparison is the "use the preferred version" sentinel and is
//! ignored. Comparisons outside that list (other conditions, locals) are not
//! versions.

use regex::Regex;
use tracing::debug;

use crate::parser::traits::{ArtifactError, Extractor, field_regex};
use crate::version::types::VersionInfo;

/// Extractor for Terraform validation blocks
pub struct HclExtractor;

impl HclExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HclExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// `condition = anytrue([` list holding one comparison per line for `field`.
///
/// Groups: 1 the opening line, 2 the comparison lines, 3 the closing `])`.
pub(crate) fn condition_list_regex(field: &str) -> Result<Regex, ArtifactError> {
    field_regex(&format!(
        r#"(condition\s*=\s*anytrue\(\[[ \t]*\r?\n)((?:[ \t]*var\.{field}\s*==\s*(?:null|"[^"]*"),?[ \t]*\r?\n)+)([ \t]*\]\))"#,
        field = regex::escape(field)
    ))
}

impl Extractor for HclExtractor {
    fn extract(&self, content: &str, field: &str) -> Result<VersionInfo, ArtifactError> {
        let list_re = condition_list_regex(field)?;
        let comparison_re = field_regex(&format!(
            r#"var\.{}\s*==\s*"([0-9]+(?:\.[0-9]+)*)""#,
            regex::escape(field)
        ))?;

        let tokens: Vec<&str> = list_re
            .captures_iter(content)
            .filter_map(|list| list.get(2))
            .flat_map(|body| comparison_re.captures_iter(body.as_str()))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();

        debug!("Found {} version comparisons for {}", tokens.len(), field);

        VersionInfo::from_tokens(tokens).ok_or_else(|| ArtifactError::field_not_found(field))
    }
}

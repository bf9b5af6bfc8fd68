//! ibm_catalog.json extractor
//!
//! The catalog nests configuration items under products and flavors:
//!
//! ```text
//! products[] -> flavors[] -> configuration[] -> { key, default_value, options[] }
//! ```
//!
//! The first configuration item whose `key` matches wins. Every flavor is
//! expected to declare the same versions, so later matches are never read.

use serde_json::Value;
use tracing::debug;

use crate::parser::traits::{ArtifactError, Extractor};
use crate::version::types::VersionInfo;

/// Extractor for catalog documents
pub struct CatalogExtractor;

impl CatalogExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatalogExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the catalog, mapping syntax errors to [`ArtifactError::MalformedDocument`]
pub(crate) fn parse_document(content: &str) -> Result<Value, ArtifactError> {
    serde_json::from_str(content)
        .map_err(|e| ArtifactError::MalformedDocument(format!("failed to parse catalog JSON: {e}")))
}

fn array_field<'a>(value: &'a Value, name: &str) -> &'a [Value] {
    value
        .get(name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Depth-first search for the first configuration item with `key == field`
pub(crate) fn find_config_item<'a>(document: &'a Value, field: &str) -> Option<&'a Value> {
    array_field(document, "products")
        .iter()
        .flat_map(|product| array_field(product, "flavors"))
        .flat_map(|flavor| array_field(flavor, "configuration"))
        .find(|item| item.get("key").and_then(Value::as_str) == Some(field))
}

/// Render a scalar as a version token. Strings are taken verbatim, numbers
/// through their JSON representation; anything else is not a version.
pub(crate) fn scalar_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Version tokens of the item's `options[].value` entries
pub(crate) fn option_values(item: &Value) -> Vec<String> {
    array_field(item, "options")
        .iter()
        .filter_map(|option| option.get("value").and_then(scalar_token))
        .collect()
}

impl Extractor for CatalogExtractor {
    fn extract(&self, content: &str, field: &str) -> Result<VersionInfo, ArtifactError> {
        let document = parse_document(content)?;
        let item = find_config_item(&document, field).ok_or_else(|| {
            debug!("Configuration key {} not found in catalog", field);
            ArtifactError::field_not_found(field)
        })?;

        let options = option_values(item);

        if !options.is_empty() {
            return VersionInfo::from_tokens(options).ok_or_else(|| ArtifactError::EmptyVersionSet {
                field: field.to_string(),
            });
        }

        // Single-version services (e.g., Redis) have no options, only a default
        item.get("default_value")
            .and_then(scalar_token)
            .filter(|v| !v.is_empty())
            .map(VersionInfo::single)
            .ok_or_else(|| ArtifactError::EmptyVersionSet {
                field: field.to_string(),
            })
    }
}

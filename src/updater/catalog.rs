//! ibm_catalog.json updater
//!
//! The catalog is never re-serialized. A first pass tracks brace depth to find
//! the line span of every configuration item owning `"key": "<field>"`, wherever
//! the key sits inside the item. A second pass rewrites, inside those spans only:
//! - the value of a `"default_value"` line (string or number)
//! - the whole `"options": [...]` array, with the requested versions
//!
//! The rendered array copies the layout of the one it replaces (inline
//! `{"displayname": .., "value": ..}` elements or one field per line) and its
//! indentation. Every flavor declaring the key is updated.
//!
//! The result is parsed again and must carry the requested versions; a layout
//! the scan cannot edit is an error rather than a silent no-op.

use std::ops::RangeInclusive;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::parser::catalog::{find_config_item, option_values, parse_document, scalar_token};
use crate::parser::traits::{ArtifactError, field_regex};
use crate::updater::scan::{carriage_return, code_chars, depth_delta, leading_whitespace};
use crate::updater::traits::Updater;
use crate::version::types::UpdateRequest;

/// Updater for catalog documents
pub struct CatalogUpdater {
    /// `"default_value": <string or number>`: prefix, value and trailing text
    default_value_re: Regex,
    /// `"options": [`: everything up to and including the bracket
    options_start_re: Regex,
    /// `"value": "..."` inside an option element
    option_value_re: Regex,
}

impl CatalogUpdater {
    pub fn new() -> Self {
        Self {
            default_value_re: Regex::new(
                r#"^(\s*"default_value"\s*:\s*)("[^"]*"|-?[0-9][0-9.]*)(.*)$"#,
            )
            .unwrap(),
            options_start_re: Regex::new(r#"^(\s*"options"\s*:\s*\[)"#).unwrap(),
            option_value_re: Regex::new(r#""value"\s*:\s*"([^"]*)""#).unwrap(),
        }
    }
}

impl Default for CatalogUpdater {
    fn default() -> Self {
        Self::new()
    }
}

/// How option elements are laid out in the original array
#[derive(Debug, Clone, PartialEq, Eq)]
enum OptionShape {
    /// Whole array on the `"options": [` line
    SingleLine,
    /// One `{"displayname": .., "value": ..}` per line
    Inline { element_indent: String },
    /// Braces and each field on their own lines
    Block {
        element_indent: String,
        field_indent: String,
    },
}

/// Original lines of an options array being replaced
struct OptionsBuffer<'a> {
    lines: Vec<&'a str>,
    /// `"options": [` prefix of the first line
    head: String,
    bracket_depth: i32,
}

impl<'a> OptionsBuffer<'a> {
    fn detect_shape(&self) -> OptionShape {
        if self.lines.len() == 1 {
            return OptionShape::SingleLine;
        }

        let body = &self.lines[1..];
        let Some(pos) = body.iter().position(|l| l.trim_start().starts_with('{')) else {
            let element_indent = format!("{}  ", leading_whitespace(&self.head));
            let field_indent = format!("{element_indent}  ");
            return OptionShape::Block {
                element_indent,
                field_indent,
            };
        };

        let element_line = body[pos];
        let element_indent = leading_whitespace(element_line).to_string();
        if element_line.contains("\"value\"") {
            return OptionShape::Inline { element_indent };
        }

        let field_indent = body
            .get(pos + 1)
            .map(|l| leading_whitespace(l).to_string())
            .filter(|indent| indent.len() > element_indent.len())
            .unwrap_or_else(|| format!("{element_indent}  "));

        OptionShape::Block {
            element_indent,
            field_indent,
        }
    }

    /// Text after the bracket that closes the array (usually `,` or nothing)
    fn trailing(&self) -> &'a str {
        let last = self.lines.last().copied().unwrap_or_default();
        last.rfind(']').map_or("", |idx| &last[idx + 1..])
    }

    fn closing_indent(&self) -> &'a str {
        match self.lines.as_slice() {
            [_, .., last] => leading_whitespace(last),
            _ => "",
        }
    }

    fn render(&self, versions: &[String], cr: &str) -> Vec<String> {
        let trailing = self.trailing();
        let element = |v: &str| format!(r#"{{"displayname": "{v}", "value": "{v}"}}"#);

        if versions.is_empty() {
            return vec![format!("{}]{}", self.head, trailing)];
        }

        let mut rendered = Vec::new();
        match self.detect_shape() {
            OptionShape::SingleLine => {
                let elements: Vec<String> = versions.iter().map(|v| element(v.as_str())).collect();
                rendered.push(format!("{}{}]{}", self.head, elements.join(", "), trailing));
                return rendered;
            }
            OptionShape::Inline { element_indent } => {
                rendered.push(format!("{}{cr}", self.head));
                for (i, v) in versions.iter().enumerate() {
                    let sep = if i + 1 < versions.len() { "," } else { "" };
                    rendered.push(format!("{element_indent}{}{sep}{cr}", element(v.as_str())));
                }
            }
            OptionShape::Block {
                element_indent,
                field_indent,
            } => {
                rendered.push(format!("{}{cr}", self.head));
                for (i, v) in versions.iter().enumerate() {
                    let sep = if i + 1 < versions.len() { "," } else { "" };
                    rendered.push(format!("{element_indent}{{{cr}"));
                    rendered.push(format!("{field_indent}\"displayname\": \"{v}\",{cr}"));
                    rendered.push(format!("{field_indent}\"value\": \"{v}\"{cr}"));
                    rendered.push(format!("{element_indent}}}{sep}{cr}"));
                }
            }
        }

        rendered.push(format!("{}]{}", self.closing_indent(), trailing));
        rendered
    }
}

/// Line spans of the objects that directly own a `key_re` match
fn owning_items(lines: &[&str], key_re: &Regex) -> Vec<RangeInclusive<usize>> {
    // Open objects: line of the opening brace, whether it owns the key
    let mut open: Vec<(usize, bool)> = Vec::new();
    let mut items = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let key_at = key_re.find(line).map(|m| m.start());

        for (pos, c) in code_chars(line) {
            match c {
                '"' if Some(pos) == key_at => {
                    if let Some(top) = open.last_mut() {
                        top.1 = true;
                    }
                }
                '{' => open.push((idx, false)),
                '}' => {
                    if let Some((start, true)) = open.pop() {
                        items.push(start..=idx);
                    }
                }
                _ => {}
            }
        }
    }

    items
}

impl CatalogUpdater {
    /// Emit either the original array or a freshly rendered one
    fn flush_options(
        &self,
        buffer: OptionsBuffer<'_>,
        request: &UpdateRequest,
        cr: &str,
        output: &mut Vec<String>,
    ) {
        let current: Vec<String> = buffer
            .lines
            .iter()
            .flat_map(|line| self.option_value_re.captures_iter(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect();

        if request.matches_versions(&current) {
            debug!("Options for {} already up to date", request.variable_name);
            output.extend(buffer.lines.iter().map(|l| l.to_string()));
        } else {
            output.extend(buffer.render(&request.versions_ascending(), cr));
        }
    }

    /// The `default_value` line with the latest version, or `None` when the
    /// line is not a default value or already holds it
    fn rewrite_default(&self, line: &str, latest: &str) -> Option<String> {
        let caps = self.default_value_re.captures(line)?;
        if latest.is_empty() || caps[2].trim_matches('"') == latest {
            return None;
        }
        Some(format!("{}\"{}\"{}", &caps[1], latest, &caps[3]))
    }
}

/// Whether `item` declares the requested versions and default
fn item_matches(item: &Value, request: &UpdateRequest) -> bool {
    let options_match = item.get("options").is_none_or(|options| {
        !options.is_array() || request.matches_versions(&option_values(item))
    });
    let default_matches = item
        .get("default_value")
        .and_then(scalar_token)
        .is_none_or(|default| {
            request.latest_version.is_empty() || default == request.latest_version
        });

    options_match && default_matches
}

impl Updater for CatalogUpdater {
    fn update(&self, content: &str, request: &UpdateRequest) -> Result<String, ArtifactError> {
        let field = &request.variable_name;

        let document = parse_document(content)?;
        if find_config_item(&document, field).is_none() {
            return Err(ArtifactError::field_not_found(field));
        }

        let key_re = field_regex(&format!(r#""key"\s*:\s*"{}""#, regex::escape(field)))?;
        let cr = carriage_return(content);
        let lines: Vec<&str> = content.split('\n').collect();
        let targets = owning_items(&lines, &key_re);

        let mut output: Vec<String> = Vec::new();
        let mut options: Option<OptionsBuffer> = None;

        for (idx, &line) in lines.iter().enumerate() {
            if let Some(mut buffer) = options.take() {
                buffer.lines.push(line);
                buffer.bracket_depth += depth_delta(line, '[', ']');
                if buffer.bracket_depth <= 0 {
                    self.flush_options(buffer, request, cr, &mut output);
                } else {
                    options = Some(buffer);
                }
                continue;
            }

            let in_target = targets.iter().any(|item| item.contains(&idx));
            if !in_target {
                output.push(line.to_string());
                continue;
            }

            if let Some(rewritten) = self.rewrite_default(line, &request.latest_version) {
                output.push(rewritten);
                continue;
            }

            if let Some(caps) = self.options_start_re.captures(line) {
                let buffer = OptionsBuffer {
                    lines: vec![line],
                    head: caps[1].to_string(),
                    bracket_depth: depth_delta(line, '[', ']'),
                };
                if buffer.bracket_depth <= 0 {
                    self.flush_options(buffer, request, cr, &mut output);
                } else {
                    options = Some(buffer);
                }
                continue;
            }

            output.push(line.to_string());
        }

        // Unterminated array: keep what was there
        if let Some(buffer) = options {
            output.extend(buffer.lines.iter().map(|l| l.to_string()));
        }

        let updated = output.join("\n");
        let document = parse_document(&updated)?;
        match find_config_item(&document, field) {
            Some(item) if item_matches(item, request) => Ok(updated),
            _ => Err(ArtifactError::MalformedDocument(format!(
                "could not locate the version fields of {field}"
            ))),
        }
    }
}

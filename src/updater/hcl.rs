//! variables.tf updater
//!
//! Rewrites two spots of the version variable and nothing else:
//! - the `anytrue([...])` comparison list, newest version first
//! - the first `error_message` inside the variable's own validation block
//!
//! ```text
//! variable "postgresql_version" {
//!   validation {
//!     condition = anytrue([
//!       var.postgresql_version == null,
//!       var.postgresql_version == "18",
//!       var.postgresql_version == "17"
//!     ])
//!     error_message = "Version must be 17 or 18. If no value passed, ..."
//!   }
//! }
//! ```

use regex::{Captures, Regex};
use tracing::debug;

use crate::parser::hcl::{HclExtractor, condition_list_regex};
use crate::parser::traits::{ArtifactError, Extractor, field_regex};
use crate::updater::scan::{carriage_return, depth_delta, leading_whitespace};
use crate::updater::traits::Updater;
use crate::version::compare::{format_prose_list, sort_descending};
use crate::version::types::UpdateRequest;

/// Build the validation error message for the given ascending versions
pub fn version_error_message(versions_ascending: &[String]) -> String {
    format!(
        "Version must be {}. If no value passed, the current ICD preferred version is used.",
        format_prose_list(versions_ascending)
    )
}

/// Updater for Terraform validation blocks
pub struct HclUpdater {
    /// Matches the error message line: prefix, quoted message, trailing text
    error_message_re: Regex,
    /// Matches the start of a validation block
    validation_re: Regex,
}

impl HclUpdater {
    pub fn new() -> Self {
        Self {
            error_message_re: Regex::new(r#"^(\s*error_message\s*=\s*)"(?:[^"\\]|\\.)*"(.*)$"#)
                .unwrap(),
            validation_re: Regex::new(r"^\s*validation\s*\{").unwrap(),
        }
    }

    /// Replace every comparison list for the field with the requested versions
    fn replace_condition_lists(
        &self,
        content: &str,
        request: &UpdateRequest,
    ) -> Result<String, ArtifactError> {
        let field = &request.variable_name;
        let condition_re = condition_list_regex(field)?;

        if !condition_re.is_match(content) {
            return Err(ArtifactError::FieldNotFound {
                field: field.to_string(),
            });
        }

        let mut descending = request.new_versions.clone();
        sort_descending(&mut descending);

        let replaced = condition_re.replace_all(content, |caps: &Captures| {
            let body = &caps[2];
            let indent = leading_whitespace(body);
            let cr = carriage_return(body);

            let mut lines = vec![format!("{indent}var.{field} == null,")];
            lines.extend(
                descending
                    .iter()
                    .map(|v| format!("{indent}var.{field} == \"{v}\",")),
            );
            if let Some(last) = lines.last_mut() {
                last.pop();
            }

            let body: String = lines
                .iter()
                .map(|line| format!("{line}{cr}\n"))
                .collect();

            format!("{}{}{}", &caps[1], body, &caps[3])
        });

        Ok(replaced.into_owned())
    }

    /// Rewrite the first error message inside `variable "<field>" { validation { ... } }`.
    ///
    /// Scope is tracked with an explicit brace depth, so error messages of
    /// sibling variables are never touched. Only the first hit is replaced.
    fn replace_error_message(
        &self,
        content: &str,
        field: &str,
        message: &str,
    ) -> Result<String, ArtifactError> {
        let variable_re = field_regex(&format!(
            r#"^\s*variable\s+"{}"\s*\{{"#,
            regex::escape(field)
        ))?;

        let mut in_target_variable = false;
        let mut in_validation = false;
        let mut replaced = false;
        let mut depth = 0;

        let lines: Vec<String> = content
            .split('\n')
            .map(|line| {
                if replaced {
                    return line.to_string();
                }

                if variable_re.is_match(line) {
                    in_target_variable = true;
                    in_validation = false;
                    depth = depth_delta(line, '{', '}');
                    return line.to_string();
                }

                if !in_target_variable {
                    return line.to_string();
                }

                depth += depth_delta(line, '{', '}');
                if self.validation_re.is_match(line) {
                    in_validation = true;
                }
                if depth <= 0 {
                    in_target_variable = false;
                    in_validation = false;
                    return line.to_string();
                }

                if in_validation {
                    if let Some(caps) = self.error_message_re.captures(line) {
                        replaced = true;
                        debug!("Replacing error_message for {}", field);
                        return format!("{}\"{}\"{}", &caps[1], message, &caps[2]);
                    }
                }

                line.to_string()
            })
            .collect();

        Ok(lines.join("\n"))
    }
}

impl Default for HclUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl Updater for HclUpdater {
    fn update(&self, content: &str, request: &UpdateRequest) -> Result<String, ArtifactError> {
        let field = &request.variable_name;

        if let Ok(current) = HclExtractor::new().extract(content, field) {
            if request.matches_versions(&current.versions) {
                debug!("{} already declares the requested versions", field);
                return Ok(content.to_string());
            }
        }

        let content = self.replace_condition_lists(content, request)?;
        let message = version_error_message(&request.versions_ascending());
        self.replace_error_message(&content, field, &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::types::VersionInfo;

    const POSTGRES_VARIABLE: &str = r#"variable "postgresql_version" {
  type        = string
  description = "Version of the PostgreSQL instance."
  default     = null

  validation {
    condition = anytrue([
      var.postgresql_version == null,
      var.postgresql_version == "17",
      var.postgresql_version == "16",
      var.postgresql_version == "15",
    ])
    error_message = "Version must be 15, 16 or 17. If no value passed, the current ICD preferred version is used."
  }
}"#;

    fn request(field: &str, versions: &[&str]) -> UpdateRequest {
        UpdateRequest::new(field, versions.iter().copied(), None)
    }

    #[test]
    fn update_adds_new_version_newest_first() {
        let result = HclUpdater::new()
            .update(
                POSTGRES_VARIABLE,
                &request("postgresql_version", &["15", "16", "17", "18"]),
            )
            .unwrap();

        let expected = r#"variable "postgresql_version" {
  type        = string
  description = "Version of the PostgreSQL instance."
  default     = null

  validation {
    condition = anytrue([
      var.postgresql_version == null,
      var.postgresql_version == "18",
      var.postgresql_version == "17",
      var.postgresql_version == "16",
      var.postgresql_version == "15"
    ])
    error_message = "Version must be 15, 16, 17 or 18. If no value passed, the current ICD preferred version is used."
  }
}"#;
        assert_eq!(result, expected);
    }

    #[test]
    fn update_removes_deprecated_versions() {
        let result = HclUpdater::new()
            .update(POSTGRES_VARIABLE, &request("postgresql_version", &["17", "16"]))
            .unwrap();

        assert!(result.contains(r#"var.postgresql_version == "17","#));
        assert!(result.contains(r#"var.postgresql_version == "16""#));
        assert!(!result.contains(r#"var.postgresql_version == "15""#));
        assert!(result.contains("Version must be 16 or 17."));
    }

    #[test]
    fn update_handles_dotted_versions() {
        let content = r#"variable "mysql_version" {
  type    = string
  default = null

  validation {
    condition = anytrue([
      var.mysql_version == null,
      var.mysql_version == "8.0",
    ])
    error_message = "Version must be 8.0."
  }
}"#;
        let result = HclUpdater::new()
            .update(content, &request("mysql_version", &["8.4", "8.0", "8.4"]))
            .unwrap();

        assert!(result.contains(
            "      var.mysql_version == \"8.4\",\n      var.mysql_version == \"8.0\"\n    ])"
        ));
        assert!(result.contains(
            "error_message = \"Version must be 8.0 or 8.4. If no value passed, the current ICD preferred version is used.\""
        ));
    }

    #[test]
    fn update_only_touches_error_message_of_target_variable() {
        let siblings = r#"

variable "member_host_flavor" {
  type        = string
  description = "Allocated host flavor per member."
  default     = null

  validation {
    condition     = var.member_host_flavor == null || can(regex("^[a-z]+\\.[0-9]+x[0-9]+\\.encrypted$", var.member_host_flavor))
    error_message = "Invalid host flavor. Must be null or format like 'b3c.4x16.encrypted'."
  }
}

variable "users" {
  type = list(object({
    name     = string
    password = string
  }))
  default = []

  validation {
    condition     = length(var.users) >= 0
    error_message = "Users must be a valid list."
  }
}"#;
        let content = format!("{POSTGRES_VARIABLE}{siblings}");
        let result = HclUpdater::new()
            .update(&content, &request("postgresql_version", &["16", "17", "18"]))
            .unwrap();

        assert!(result.contains("Version must be 16, 17 or 18."));
        assert!(result.ends_with(siblings));
    }

    #[test]
    fn update_replaces_only_first_error_message_in_variable() {
        let content = r#"variable "redis_version" {
  default = null

  validation {
    condition = anytrue([
      var.redis_version == null,
      var.redis_version == "7.2",
    ])
    error_message = "Version must be 7.2."
  }

  validation {
    condition     = var.redis_version != "6.2"
    error_message = "Redis 6.2 is no longer supported."
  }
}"#;
        let result = HclUpdater::new()
            .update(content, &request("redis_version", &["7.2", "7.4"]))
            .unwrap();

        assert!(result.contains("Version must be 7.2 or 7.4."));
        assert!(result.contains("error_message = \"Redis 6.2 is no longer supported.\""));
    }

    #[test]
    fn update_preserves_custom_indentation() {
        let content = "variable \"etcd_version\" {\n\tvalidation {\n\t\tcondition = anytrue([\n\t\t\tvar.etcd_version == null,\n\t\t\tvar.etcd_version == \"3.4\",\n\t\t])\n\t\terror_message = \"old\"\n\t}\n}\n";
        let result = HclUpdater::new()
            .update(content, &request("etcd_version", &["3.4", "3.5"]))
            .unwrap();

        assert_eq!(
            result,
            "variable \"etcd_version\" {\n\tvalidation {\n\t\tcondition = anytrue([\n\t\t\tvar.etcd_version == null,\n\t\t\tvar.etcd_version == \"3.5\",\n\t\t\tvar.etcd_version == \"3.4\"\n\t\t])\n\t\terror_message = \"Version must be 3.4 or 3.5. If no value passed, the current ICD preferred version is used.\"\n\t}\n}\n"
        );
    }

    #[test]
    fn update_is_noop_when_versions_unchanged() {
        let result = HclUpdater::new()
            .update(
                POSTGRES_VARIABLE,
                &request("postgresql_version", &["16", "15", "17"]),
            )
            .unwrap();

        assert_eq!(result, POSTGRES_VARIABLE);
    }

    #[test]
    fn update_is_idempotent() {
        let updater = HclUpdater::new();
        let req = request("postgresql_version", &["16", "17", "18"]);

        let once = updater.update(POSTGRES_VARIABLE, &req).unwrap();
        let twice = updater.update(&once, &req).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn update_round_trips_through_extractor() {
        let req = request("postgresql_version", &["18", "14", "16"]);
        let result = HclUpdater::new().update(POSTGRES_VARIABLE, &req).unwrap();

        let extracted = HclExtractor::new()
            .extract(&result, "postgresql_version")
            .unwrap();
        assert_eq!(
            extracted,
            VersionInfo::from_tokens(["14", "16", "18"]).unwrap()
        );
        assert_eq!(extracted.latest_version, req.latest_version);
    }

    #[test]
    fn update_returns_field_not_found_without_condition_list() {
        let content = "variable \"other_version\" {\n  type = string\n}";
        let result = HclUpdater::new().update(content, &request("postgresql_version", &["17"]));

        assert_eq!(
            result,
            Err(ArtifactError::field_not_found("postgresql_version"))
        );
    }

    #[test]
    fn update_preserves_crlf_line_endings() {
        let content = POSTGRES_VARIABLE.replace('\n', "\r\n");
        let result = HclUpdater::new()
            .update(&content, &request("postgresql_version", &["17", "18"]))
            .unwrap();

        assert!(!result.replace("\r\n", "").contains('\n'));
        assert!(result.contains("      var.postgresql_version == \"18\",\r\n"));
    }
}

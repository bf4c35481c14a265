//! Declarative input contracts and the validator that interprets them.
//!
//! An [`InputSchema`] is the single description of an operation's input. The
//! validator in this module enforces it; `registry::schema` turns the same
//! value into the JSON Schema advertised over MCP.

use crate::types::{ValidationError, ViolatedRule};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thunder_mcp_util::resolve_working_directory;

/// How a field's trimmed text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// A directory path; `.`/`./` and `~` are resolved during validation.
    Path,
}

/// A single-field constraint, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    MinLength(usize),
    Prefix { prefix: &'static str, case_insensitive: bool },
}

impl FieldRule {
    fn check(&self, field: &str, value: &str) -> Result<(), ValidationError> {
        match self {
            FieldRule::MinLength(min) => {
                if value.chars().count() < *min {
                    return Err(ValidationError::new(
                        field,
                        ViolatedRule::MinLength,
                        format!("{field} must be at least {min} characters"),
                    ));
                }
            }
            FieldRule::Prefix { prefix, case_insensitive } => {
                let matches = value.get(..prefix.len()).is_some_and(|head| {
                    if *case_insensitive {
                        head.eq_ignore_ascii_case(prefix)
                    } else {
                        head == *prefix
                    }
                });
                if !matches {
                    return Err(ValidationError::new(
                        field,
                        ViolatedRule::Prefix,
                        format!("{field} must start with '{prefix}'"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Declaration of one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
    pub rules: Vec<FieldRule>,
}

impl FieldSpec {
    /// An optional text field.
    pub fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            description,
            rules: Vec::new(),
        }
    }

    /// An optional directory field.
    pub fn path(name: &'static str, description: &'static str) -> Self {
        Self {
            kind: FieldKind::Path,
            ..Self::text(name, description)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.rules.push(FieldRule::MinLength(min));
        self
    }

    /// Require the trimmed value to start with `prefix`, ignoring ASCII case.
    pub fn prefix_ignore_case(mut self, prefix: &'static str) -> Self {
        self.rules.push(FieldRule::Prefix {
            prefix,
            case_insensitive: true,
        });
        self
    }
}

/// A constraint spanning several fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// `field` may only be present when `requires` is present too. Violations
    /// are reported against `requires`.
    Requires {
        field: &'static str,
        requires: &'static str,
        message: &'static str,
    },
}

/// Field set plus cross-field rules for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
    cross_rules: Vec<CrossFieldRule>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn rule(mut self, rule: CrossFieldRule) -> Self {
        self.cross_rules.push(rule);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn cross_rules(&self) -> &[CrossFieldRule] {
        &self.cross_rules
    }

    /// Validate raw MCP arguments.
    ///
    /// Text is trimmed before any rule runs; a blank optional field counts as
    /// absent. Keys the schema does not declare are ignored.
    pub fn validate(&self, raw: Option<&Map<String, Value>>) -> Result<ValidatedInput, ValidationError> {
        let mut values = IndexMap::new();

        for field in &self.fields {
            let raw_value = raw.and_then(|arguments| arguments.get(field.name)).filter(|value| !value.is_null());
            let text = match raw_value {
                None => None,
                Some(Value::String(text)) => Some(text.trim()),
                Some(_) => {
                    return Err(ValidationError::new(
                        field.name,
                        ViolatedRule::Type,
                        format!("{} must be a string", field.name),
                    ));
                }
            };

            let Some(text) = text.filter(|text| !text.is_empty()) else {
                if field.required {
                    return Err(ValidationError::new(
                        field.name,
                        ViolatedRule::Required,
                        format!("{} is required", field.name),
                    ));
                }
                continue;
            };

            for rule in &field.rules {
                rule.check(field.name, text)?;
            }

            let value = match field.kind {
                FieldKind::Text => FieldValue::Text(text.to_string()),
                FieldKind::Path => FieldValue::Path(resolve_working_directory(text)),
            };
            values.insert(field.name, value);
        }

        for rule in &self.cross_rules {
            match rule {
                CrossFieldRule::Requires { field, requires, message } => {
                    if values.contains_key(field) && !values.contains_key(requires) {
                        return Err(ValidationError::new(*requires, ViolatedRule::Requires, *message));
                    }
                }
            }
        }

        Ok(ValidatedInput { values })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Path(PathBuf),
}

/// Arguments that passed validation, trimmed and resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedInput {
    values: IndexMap<&'static str, FieldValue>,
}

impl ValidatedInput {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            FieldValue::Text(text) => Some(text),
            FieldValue::Path(_) => None,
        }
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        match self.values.get(name)? {
            FieldValue::Path(path) => Some(path),
            FieldValue::Text(_) => None,
        }
    }

    pub fn require_text(&self, name: &str) -> Result<&str, ValidationError> {
        self.text(name)
            .ok_or_else(|| ValidationError::new(name, ViolatedRule::Required, format!("{name} is required")))
    }

    pub fn require_path(&self, name: &str) -> Result<&Path, ValidationError> {
        self.path(name)
            .ok_or_else(|| ValidationError::new(name, ViolatedRule::Required, format!("{name} is required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(FieldSpec::text("curlInput", "curl").required().prefix_ignore_case("curl ").min_length(5))
            .field(FieldSpec::text("name", "name").required().min_length(2))
            .field(FieldSpec::text("collection", "collection"))
            .field(FieldSpec::text("folder", "folder"))
            .field(FieldSpec::path("projectDir", "dir").required())
            .rule(CrossFieldRule::Requires {
                field: "folder",
                requires: "collection",
                message: "folder needs collection",
            })
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn trims_and_resolves_valid_input() {
        let raw = args(json!({
            "curlInput": "  CURL https://x.example  ",
            "name": " t1 ",
            "collection": "   ",
            "projectDir": " /srv/api ",
            "extra": 42
        }));
        let input = schema().validate(Some(&raw)).expect("valid");
        assert_eq!(input.text("curlInput"), Some("CURL https://x.example"));
        assert_eq!(input.text("name"), Some("t1"));
        assert_eq!(input.text("collection"), None);
        assert_eq!(input.path("projectDir"), Some(Path::new("/srv/api")));
    }

    #[test]
    fn missing_arguments_report_first_required_field() {
        let error = schema().validate(None).unwrap_err();
        assert_eq!(error.field, "curlInput");
        assert_eq!(error.rule, ViolatedRule::Required);
    }

    #[test]
    fn prefix_violation_names_the_prefix() {
        let raw = args(json!({ "curlInput": "wget x", "name": "t1", "projectDir": "/tmp" }));
        let error = schema().validate(Some(&raw)).unwrap_err();
        assert_eq!(error.rule, ViolatedRule::Prefix);
        assert!(error.message.contains("'curl '"), "{}", error.message);
    }

    #[test]
    fn short_name_is_rejected() {
        let raw = args(json!({ "curlInput": "curl x", "name": "a", "projectDir": "/tmp" }));
        let error = schema().validate(Some(&raw)).unwrap_err();
        assert_eq!((error.field.as_str(), error.rule), ("name", ViolatedRule::MinLength));
    }

    #[test]
    fn non_string_values_are_type_errors() {
        let raw = args(json!({ "curlInput": 5, "name": "t1", "projectDir": "/tmp" }));
        let error = schema().validate(Some(&raw)).unwrap_err();
        assert_eq!(error.rule, ViolatedRule::Type);
    }

    #[test]
    fn folder_without_collection_is_reported_against_collection() {
        let raw = args(json!({ "curlInput": "curl x", "name": "t1", "folder": "f", "projectDir": "/tmp" }));
        let error = schema().validate(Some(&raw)).unwrap_err();
        assert_eq!(error.field, "collection");
        assert_eq!(error.rule, ViolatedRule::Requires);
        assert_eq!(error.message, "folder needs collection");
    }

    #[test]
    fn prefix_check_is_safe_on_multibyte_input() {
        let raw = args(json!({ "curlInput": "ćurl https://x", "name": "t1", "projectDir": "/tmp" }));
        let error = schema().validate(Some(&raw)).unwrap_err();
        assert_eq!(error.rule, ViolatedRule::Prefix);
    }
}

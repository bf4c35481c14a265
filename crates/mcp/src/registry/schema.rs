//! Converts an [`InputSchema`] into the JSON Schema object MCP advertises.

use crate::registry::contract::{CrossFieldRule, FieldRule, InputSchema};
use rmcp::model::JsonObject;
use serde_json::{Map, Value, json};

/// Build the `inputSchema` for `tools/list`.
///
/// Rules that JSON Schema can express are carried over: `minLength`, a
/// case-insensitive `pattern` for prefixes, `required`, and
/// `dependentRequired` for cross-field requirements.
pub fn to_json_schema(schema: &InputSchema) -> JsonObject {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in schema.fields() {
        let mut property = Map::new();
        property.insert("type".to_string(), json!("string"));
        property.insert("description".to_string(), json!(field.description));

        let min_length = field
            .rules
            .iter()
            .filter_map(|rule| match rule {
                FieldRule::MinLength(min) => Some(*min),
                FieldRule::Prefix { .. } => None,
            })
            .max()
            .or(field.required.then_some(1));
        if let Some(min_length) = min_length {
            property.insert("minLength".to_string(), json!(min_length));
        }

        if let Some(pattern) = field.rules.iter().find_map(|rule| match rule {
            FieldRule::Prefix { prefix, case_insensitive } => Some(prefix_pattern(prefix, *case_insensitive)),
            FieldRule::MinLength(_) => None,
        }) {
            property.insert("pattern".to_string(), json!(pattern));
        }

        if field.required {
            required.push(json!(field.name));
        }
        properties.insert(field.name.to_string(), Value::Object(property));
    }

    let mut dependent_required = Map::new();
    for rule in schema.cross_rules() {
        match rule {
            CrossFieldRule::Requires { field, requires, .. } => {
                let entry = dependent_required
                    .entry(field.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = entry {
                    items.push(json!(requires));
                }
            }
        }
    }

    let mut object = JsonObject::new();
    object.insert("type".to_string(), json!("object"));
    object.insert("properties".to_string(), Value::Object(properties));
    object.insert("required".to_string(), Value::Array(required));
    if !dependent_required.is_empty() {
        object.insert("dependentRequired".to_string(), Value::Object(dependent_required));
    }
    object
}

/// Regex for "starts with `prefix`", tolerating leading whitespace.
fn prefix_pattern(prefix: &str, case_insensitive: bool) -> String {
    let mut pattern = String::from("^\\s*");
    for ch in prefix.chars() {
        if case_insensitive && ch.is_ascii_alphabetic() {
            pattern.push('[');
            pattern.push(ch.to_ascii_uppercase());
            pattern.push(ch.to_ascii_lowercase());
            pattern.push(']');
        } else if "\\^$.|?*+()[]{}".contains(ch) {
            pattern.push('\\');
            pattern.push(ch);
        } else {
            pattern.push(ch);
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::contract::FieldSpec;

    #[test]
    fn carries_required_lengths_patterns_and_dependencies() {
        let schema = InputSchema::new()
            .field(FieldSpec::text("curlInput", "curl command").required().prefix_ignore_case("curl ").min_length(5))
            .field(FieldSpec::text("collection", "collection"))
            .field(FieldSpec::text("folder", "folder"))
            .field(FieldSpec::path("projectDir", "dir").required())
            .rule(CrossFieldRule::Requires {
                field: "folder",
                requires: "collection",
                message: "",
            });

        let object = Value::Object(to_json_schema(&schema));
        assert_eq!(object["type"], json!("object"));
        assert_eq!(object["required"], json!(["curlInput", "projectDir"]));
        assert_eq!(object["properties"]["curlInput"]["minLength"], json!(5));
        assert_eq!(object["properties"]["curlInput"]["pattern"], json!("^\\s*[Cc][Uu][Rr][Ll] "));
        assert_eq!(object["properties"]["projectDir"]["minLength"], json!(1));
        assert!(object["properties"]["folder"].get("minLength").is_none());
        assert_eq!(object["dependentRequired"], json!({ "folder": ["collection"] }));
    }

    #[test]
    fn pattern_escapes_regex_metacharacters() {
        assert_eq!(prefix_pattern("a.b", false), "^\\s*a\\.b");
    }
}

//! Structural validation of tool inputs against their JSON schemas.
//!
//! Covers the subset of JSON Schema the built-in tools declare: `type` on
//! the root and on properties, `required`, and `minLength` for strings.
//! Validation either passes or produces an enumerable list of violations so
//! the model can be told exactly which constraints it broke.

use std::fmt;

use serde_json::Value;

/// One violated constraint, with the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Field path, `$` for the root value.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate `raw` against `schema`.
///
/// Returns `Ok(())` when every declared constraint holds, otherwise the full
/// list of violations — validation does not stop at the first failure.
pub fn validate(schema: &Value, raw: &Value) -> Result<(), Vec<ConstraintViolation>> {
    let mut violations = Vec::new();
    check_value("$", schema, raw, &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Render a violation list as one constraint per line, for feeding back to
/// the model as a tool error result.
pub fn render_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_value(path: &str, schema: &Value, raw: &Value, out: &mut Vec<ConstraintViolation>) {
    if let Some(expected) = schema.get("type").and_then(|t| t.as_str()) {
        if !type_matches(expected, raw) {
            out.push(ConstraintViolation {
                path: path.to_string(),
                message: format!("expected {expected}, got {}", type_name(raw)),
            });
            return;
        }
    }

    match schema.get("type").and_then(|t| t.as_str()) {
        Some("object") => check_object(path, schema, raw, out),
        Some("string") => check_string(path, schema, raw, out),
        _ => {}
    }
}

fn check_object(path: &str, schema: &Value, raw: &Value, out: &mut Vec<ConstraintViolation>) {
    let obj = match raw.as_object() {
        Some(o) => o,
        None => return,
    };

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for name in required.iter().filter_map(|n| n.as_str()) {
            if !obj.contains_key(name) {
                out.push(ConstraintViolation {
                    path: format!("{path}.{name}"),
                    message: "required field missing".into(),
                });
            }
        }
    }

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, prop_schema) in props {
            if let Some(value) = obj.get(name) {
                check_value(&format!("{path}.{name}"), prop_schema, value, out);
            }
        }
    }
}

fn check_string(path: &str, schema: &Value, raw: &Value, out: &mut Vec<ConstraintViolation>) {
    let s = match raw.as_str() {
        Some(s) => s,
        None => return,
    };
    if let Some(min) = schema.get("minLength").and_then(|m| m.as_u64()) {
        if (s.chars().count() as u64) < min {
            out.push(ConstraintViolation {
                path: path.to_string(),
                message: format!("length {} is below minLength {min}", s.chars().count()),
            });
        }
    }
}

fn type_matches(expected: &str, v: &Value) -> bool {
    match expected {
        "object" => v.is_object(),
        "array" => v.is_array(),
        "string" => v.is_string(),
        "boolean" => v.is_boolean(),
        "integer" => v.is_i64() || v.is_u64(),
        "number" => v.is_number(),
        "null" => v.is_null(),
        _ => true,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn change_request_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "root_dir": { "type": "string", "minLength": 1 }
            },
            "required": ["root_dir"]
        })
    }

    #[test]
    fn valid_input_passes() {
        let raw = json!({ "root_dir": "/some/repo" });
        assert!(validate(&change_request_schema(), &raw).is_ok());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let raw = json!({});
        let errs = validate(&change_request_schema(), &raw).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "$.root_dir");
        assert!(errs[0].message.contains("required"));
    }

    #[test]
    fn empty_string_violates_min_length() {
        let raw = json!({ "root_dir": "" });
        let errs = validate(&change_request_schema(), &raw).unwrap_err();
        assert!(errs[0].message.contains("minLength"));
    }

    #[test]
    fn wrong_type_is_reported_with_both_types() {
        let raw = json!({ "root_dir": 42 });
        let errs = validate(&change_request_schema(), &raw).unwrap_err();
        assert_eq!(errs[0].message, "expected string, got number");
    }

    #[test]
    fn non_object_root_is_reported() {
        let errs = validate(&change_request_schema(), &json!("just a string")).unwrap_err();
        assert_eq!(errs[0].path, "$");
    }

    #[test]
    fn multiple_violations_all_reported() {
        let schema = json!({
            "type": "object",
            "properties": {
                "content": { "type": "string" },
                "append": { "type": "boolean" }
            },
            "required": ["content"]
        });
        let raw = json!({ "append": "yes" });
        let errs = validate(&schema, &raw).unwrap_err();
        assert_eq!(errs.len(), 2, "missing content and wrong append type: {errs:?}");
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let schema = json!({
            "type": "object",
            "properties": {
                "content": { "type": "string" },
                "filename": { "type": "string" }
            },
            "required": ["content"]
        });
        let raw = json!({ "content": "hi" });
        assert!(validate(&schema, &raw).is_ok());
    }

    #[test]
    fn render_joins_one_violation_per_line() {
        let v = vec![
            ConstraintViolation { path: "$.a".into(), message: "required field missing".into() },
            ConstraintViolation { path: "$.b".into(), message: "expected string, got null".into() },
        ];
        let rendered = render_violations(&v);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("$.a: "));
    }
}

//! Selection config validation with structured errors and suggestions.
//!
//! Used by the config editor before saving: metric rules (target, operator,
//! threshold, status) and overall rules (ordering, reachability).
//! Returns a [`ValidationResult`] with errors (block save) and warnings (advisory).
//! The engine itself never requires a config to pass validation.

mod fuzzy;
mod overall_checks;
mod rule_checks;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::SelectionConfig;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"rules[2].target"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`SelectionConfig`].
pub fn validate_config(config: &SelectionConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    rule_checks::validate_rules(&config.rules, &mut result);
    overall_checks::validate_overall_rules(config, &mut result);
    result
}

/// Structurally parse a config value and validate it. Parse errors are
/// reported as a single root-level error.
pub fn validate_value(value: Value) -> ValidationResult {
    match SelectionConfig::from_value(value) {
        Ok(config) => validate_config(&config),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", e.to_string());
            result
        }
    }
}

/// Parse raw YAML and validate.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(value) => validate_value(value),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}

/// Parse raw JSON and validate.
pub fn validate_json(json: &str) -> ValidationResult {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => validate_value(value),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("JSON parse error: {e}"));
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_YAML: &str = r#"
rules:
  - target: card_share
    operator: ">="
    threshold: 60
    message: Product card dominates
    status: bad
    color: red
  - target: live_daily
    operator: ">"
    threshold: 5
    message: Live sells every day
    status: good
    color: green
overallRules:
  - criteria: { bad: 1 }
    result: bad
  - criteria: { good: 1 }
    result: good
"#;

    #[test]
    fn valid_config_passes() {
        let result = validate_yaml(VALID_YAML);
        assert!(result.valid, "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
    }

    #[test]
    fn unknown_target_suggests_closest_key() {
        let result = validate_json(
            r#"{"rules": [{"target": "live_dialy", "operator": ">", "threshold": 1, "message": "m", "status": "good"}]}"#,
        );
        assert!(!result.valid);
        let err = &result.errors[0];
        assert_eq!(err.path, "rules[0].target");
        assert_eq!(err.suggestion.as_deref(), Some("live_daily"));
    }

    #[test]
    fn bad_operator_and_threshold_are_errors() {
        let result = validate_json(
            r#"{"rules": [{"target": "totalSales", "operator": "=", "threshold": "ten", "message": "m", "status": "bad"}]}"#,
        );
        let paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"rules[0].operator"), "{paths:?}");
        assert!(paths.contains(&"rules[0].threshold"), "{paths:?}");
    }

    #[test]
    fn structural_error_is_reported_at_root() {
        let result = validate_json(r#"{"rules": {}}"#);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "");
        assert!(result.errors[0].message.contains("must be a sequence"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = validate_json("{not json");
        assert!(!result.valid);
        assert!(result.errors[0].message.starts_with("JSON parse error"));
    }
}

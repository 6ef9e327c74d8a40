//! Metric rule checks: target, operator, threshold, message and status.

use crate::schema::{MetricKey, MetricRule, Operator, Status};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(super) fn validate_rules(rules: &[MetricRule], result: &mut ValidationResult) {
    if rules.is_empty() {
        result.warn("rules", "No metric rules defined; every product will get no findings");
        return;
    }

    for (i, rule) in rules.iter().enumerate() {
        let path = format!("rules[{i}]");
        validate_target(&rule.target, &format!("{path}.target"), result);

        if rule.operator == Operator::Unsupported {
            result.error(
                format!("{path}.operator"),
                "operator must be one of '<', '<=', '>', '>='",
            );
        }

        match &rule.threshold {
            None => result.error(format!("{path}.threshold"), "threshold is required"),
            Some(t) if t.value().is_none() => result.error(
                format!("{path}.threshold"),
                "threshold is not a finite number",
            ),
            Some(_) => {}
        }

        if rule.message.trim().is_empty() {
            result.warn(format!("{path}.message"), "message is empty; the finding will show no text");
        }

        if rule.status == Status::Normal {
            result.warn(
                format!("{path}.status"),
                "'normal' findings are shown but never count toward the overall verdict",
            );
        }
    }
}

/// Check that a target names a recognized metric, suggesting the closest key otherwise.
pub(super) fn validate_target(target: &str, path: &str, result: &mut ValidationResult) {
    if target.is_empty() {
        result.error(path, "target must not be empty");
        return;
    }
    if MetricKey::lookup(target).is_some() {
        return;
    }

    let names = MetricKey::all_names();
    let candidates: Vec<&str> = names.iter().map(String::as_str).collect();
    let message = format!("Unknown metric '{target}'; the rule would never match");
    match fuzzy_match(target, &candidates) {
        Some(suggestion) => result.error_with_suggestion(path, message, suggestion),
        None => result.error(path, message),
    }
}

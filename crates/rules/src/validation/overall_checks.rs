//! Overall rule checks: shadowing by earlier rules and unreachable criteria.

use crate::schema::{SelectionConfig, Status};

use super::ValidationResult;

pub(super) fn validate_overall_rules(config: &SelectionConfig, result: &mut ValidationResult) {
    let overall = &config.overall_rules;
    if overall.is_empty() {
        result.warn("overallRules", "No overall rules defined; every product will be 'normal'");
        return;
    }

    let last = overall.len() - 1;
    for (i, rule) in overall.iter().enumerate() {
        let path = format!("overallRules[{i}]");

        if rule.criteria.is_unconditional() && i < last {
            result.warn(
                format!("{path}.criteria"),
                format!(
                    "All criteria are 0 so this rule always matches; the {} rule(s) after it are never reached",
                    last - i
                ),
            );
        }

        if let Some(earlier) = overall[..i].iter().position(|prev| prev.criteria == rule.criteria) {
            result.warn(
                format!("{path}.criteria"),
                format!("Same criteria as overallRules[{earlier}], which always wins first"),
            );
        }

        for (status, min) in rule.criteria.requirements() {
            let producers = producing_rules(config, status);
            if producers < min as usize {
                result.warn(
                    format!("{path}.criteria.{status}"),
                    format!(
                        "Requires {min} '{status}' finding(s) but only {producers} metric rule(s) produce '{status}'"
                    ),
                );
            }
        }
    }
}

/// Upper bound on the number of findings with `status` a single evaluation can produce.
fn producing_rules(config: &SelectionConfig, status: Status) -> usize {
    config.rules.iter().filter(|r| r.status == status).count()
}

//! Metric rule evaluator.
//!
//! Every rule is tried in order against the period report; each rule whose
//! comparison holds contributes one finding. There is no short-circuiting and
//! no deduplication, so several rules on the same metric may all fire.

use tracing::{debug, warn};

use crate::attribution::PeriodReport;
use crate::schema::{Finding, MetricKey, MetricRule};

// ── Rule evaluator ──────────────────────────────────────────────────

/// Evaluate `rules` against `report`, returning findings in rule order.
pub fn evaluate(report: &PeriodReport, rules: &[MetricRule]) -> Vec<Finding> {
    rules
        .iter()
        .filter(|rule| rule_matches(report, rule))
        .map(Finding::from_rule)
        .collect()
}

/// Check a single rule against the report.
///
/// Unrecognized targets, unsupported operators and thresholds that do not
/// parse as numbers never match.
pub fn rule_matches(report: &PeriodReport, rule: &MetricRule) -> bool {
    let Some(key) = MetricKey::lookup(&rule.target) else {
        warn!(target_key = %rule.target, "skipping rule with unrecognized target");
        return false;
    };

    let Some(threshold) = rule.threshold.as_ref().and_then(|t| t.value()) else {
        debug!(target_key = %rule.target, "skipping rule with non-numeric threshold");
        return false;
    };

    let Some(value) = report.resolve(key).as_f64() else {
        return false;
    };

    rule.operator.compare(value, threshold)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::compute_report;
    use crate::schema::*;

    fn scenario_report() -> PeriodReport {
        let raw = RawPeriodMetrics {
            sales: 100,
            sales_amount: 500_000,
            live_sales: 40,
            live_sales_amount: 200_000,
            live_match_order_num: 20,
            video_sales: 10,
            video_sales_amount: 40_000,
            ..Default::default()
        };
        compute_report(&raw, 7, 45.0)
    }

    fn rule(target: &str, operator: Operator, threshold: f64, message: &str, status: Status) -> MetricRule {
        MetricRule {
            target: target.to_string(),
            operator,
            threshold: Some(Threshold::Number(threshold)),
            message: message.to_string(),
            status,
            color: "blue".to_string(),
        }
    }

    #[test]
    fn matching_rule_produces_finding() {
        let rules = vec![rule("card_share", Operator::Gte, 50.0, "card heavy", Status::Good)];
        let findings = evaluate(&scenario_report(), &rules);
        assert_eq!(
            findings,
            vec![Finding {
                target: "card_share".to_string(),
                message: "card heavy".to_string(),
                color: "blue".to_string(),
                status: Status::Good,
            }]
        );
    }

    #[test]
    fn non_matching_rule_is_silent() {
        let rules = vec![rule("card_share", Operator::Gt, 50.0, "card heavy", Status::Good)];
        assert!(evaluate(&scenario_report(), &rules).is_empty());
    }

    #[test]
    fn rule_order_is_preserved_without_dedup() {
        let rules = vec![
            rule("live_share", Operator::Gt, 30.0, "first", Status::Good),
            rule("video_sales", Operator::Lt, 1.0, "never", Status::Bad),
            rule("live_share", Operator::Gte, 40.0, "second", Status::Passed),
            rule("live_share", Operator::Gt, 30.0, "first", Status::Good),
        ];
        let findings = evaluate(&scenario_report(), &rules);
        let messages: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "first"]);
    }

    #[test]
    fn unknown_target_is_skipped() {
        let rules = vec![
            rule("card_margin", Operator::Gte, 0.0, "unknown", Status::Bad),
            rule("totalSales", Operator::Gte, 100.0, "volume ok", Status::Passed),
        ];
        let findings = evaluate(&scenario_report(), &rules);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].target, "totalSales");
    }

    #[test]
    fn unparseable_threshold_never_matches() {
        let mut r = rule("totalSales", Operator::Gte, 0.0, "x", Status::Bad);
        r.threshold = Some(Threshold::Text("lots".to_string()));
        assert!(!rule_matches(&scenario_report(), &r));

        r.threshold = None;
        assert!(!rule_matches(&scenario_report(), &r));

        r.threshold = Some(Threshold::Other(serde_json::Value::Bool(true)));
        assert!(!rule_matches(&scenario_report(), &r));

        r.threshold = Some(Threshold::Text("99".to_string()));
        assert!(rule_matches(&scenario_report(), &r));
    }

    #[test]
    fn unsupported_operator_never_matches() {
        let r = rule("totalSales", Operator::Unsupported, 0.0, "x", Status::Bad);
        assert!(!rule_matches(&scenario_report(), &r));
    }

    #[test]
    fn percent_and_extra_metrics_compare_numerically() {
        let report = scenario_report();
        assert!(rule_matches(&report, &rule("live_share", Operator::Lte, 40.0, "", Status::Normal)));
        assert!(rule_matches(&report, &rule("live_daily", Operator::Gt, 5.7, "", Status::Normal)));
        assert!(rule_matches(&report, &rule("liveSpec", Operator::Gte, 2.0, "", Status::Normal)));
        assert!(rule_matches(&report, &rule("liveSalesDiff", Operator::Gt, 0.0, "", Status::Normal)));
        assert!(!rule_matches(&report, &rule("live_price", Operator::Lt, 50.0, "", Status::Normal)));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let report = scenario_report();
        let rules = vec![
            rule("live_share", Operator::Gt, 30.0, "a", Status::Good),
            rule("card_daily", Operator::Gt, 1.0, "b", Status::Bad),
        ];
        assert_eq!(evaluate(&report, &rules), evaluate(&report, &rules));
    }
}

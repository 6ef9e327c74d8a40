//! End-to-end analysis: telemetry → report → findings → verdict.
//!
//! This is the boundary the HTTP and UI layers call. It accepts the JSON
//! request shape captured upstream and returns the JSON response shape the
//! dashboard renders.

use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use selection_core::Result;

use crate::attribution::{compute_report, ChannelStat, PeriodReport};
use crate::evaluator::evaluate;
use crate::schema::{lenient_f64, lenient_int, Finding, RawPeriodMetrics, SelectionConfig, Verdict};
use crate::verdict::{aggregate, StatusCounts};

/// Window size used when a request does not carry one.
pub const DEFAULT_DAYS: u32 = 7;

// ── Request ─────────────────────────────────────────────────────────

/// Telemetry and window parameters of one product analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    #[serde(default)]
    pub raw_period_metrics: RawPeriodMetrics,
    #[serde(default = "default_days", deserialize_with = "lenient_days")]
    pub days: u32,
    /// Unit price of the product itself, in major currency units.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reference_unit_price: f64,
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

fn lenient_days<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let days = lenient_int(deserializer)?;
    Ok(u32::try_from(days).unwrap_or(0))
}

/// A request as received from a collaborator, config still unparsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub input: AnalysisInput,
    /// The caller's own selection config, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_config: Option<Value>,
}

impl AnalysisRequest {
    pub fn parse(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The request's own config when present, otherwise `None`.
    ///
    /// A present but structurally invalid config is an error; it is never
    /// replaced by the fallback.
    pub fn config(&self) -> Result<Option<SelectionConfig>> {
        match &self.selection_config {
            None | Some(Value::Null) => Ok(None),
            Some(value) => SelectionConfig::from_value(value.clone()).map(Some),
        }
    }
}

// ── Response ────────────────────────────────────────────────────────

/// Wrapper matching the dashboard's `{ val }` shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct StatValue {
    pub val: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraStatsView {
    /// Live average price minus the reference unit price.
    pub live_sales_diff: StatValue,
    /// Live orders per matched anchor.
    pub spec_stat: StatValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub total_sales: i64,
    pub channels: [ChannelStat; 5],
    pub extra_stats: ExtraStatsView,
    pub advice: Vec<Finding>,
    pub overall_status: Verdict,
}

impl AnalysisResponse {
    fn assemble(report: PeriodReport, advice: Vec<Finding>, overall_status: Verdict) -> Self {
        Self {
            total_sales: report.total_sales,
            extra_stats: ExtraStatsView {
                live_sales_diff: StatValue {
                    val: report.extra.live_vs_card_price_diff,
                },
                spec_stat: StatValue {
                    val: report.extra.live_orders_per_anchor,
                },
            },
            channels: report.channels,
            advice,
            overall_status,
        }
    }
}

// ── Entry points ────────────────────────────────────────────────────

/// Run the full pipeline for one product.
pub fn analyze(input: &AnalysisInput, config: &SelectionConfig) -> AnalysisResponse {
    let report = compute_report(&input.raw_period_metrics, input.days, input.reference_unit_price);
    let advice = evaluate(&report, &config.rules);
    let outcome = aggregate(&advice, &config.overall_rules);

    log_outcome(&report, &advice, outcome.counts, outcome.verdict);
    AnalysisResponse::assemble(report, advice, outcome.verdict)
}

/// Analyze a request using its own config, or `fallback` when it has none.
pub fn analyze_request(request: &AnalysisRequest, fallback: &SelectionConfig) -> Result<AnalysisResponse> {
    let response = match request.config()? {
        Some(config) => analyze(&request.input, &config),
        None => analyze(&request.input, fallback),
    };
    Ok(response)
}

/// Analyze many products in parallel. Results keep the input order and a
/// failing request does not affect the others.
pub fn analyze_batch(requests: &[AnalysisRequest], fallback: &SelectionConfig) -> Vec<Result<AnalysisResponse>> {
    requests
        .par_iter()
        .map(|request| analyze_request(request, fallback))
        .collect()
}

/// Parse a JSON request and analyze it, returning the JSON response.
pub fn analyze_value(value: Value, fallback: &SelectionConfig) -> Result<Value> {
    let request = AnalysisRequest::parse(value)?;
    let response = analyze_request(&request, fallback)?;
    Ok(serde_json::to_value(response)?)
}

fn log_outcome(report: &PeriodReport, advice: &[Finding], counts: StatusCounts, verdict: Verdict) {
    debug!(
        days = report.days,
        total_sales = report.total_sales,
        findings = advice.len(),
        good = counts.good,
        passed = counts.passed,
        bad = counts.bad,
        verdict = %verdict,
        "selection analysis complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_json() -> Value {
        json!({
            "rawPeriodMetrics": {
                "sales": 100,
                "sales_amount": 500000,
                "live_sales": 40,
                "live_sales_amount": 200000,
                "live_match_order_num": 20,
                "video_sales": 10,
                "video_sales_amount": 40000,
                "image_text_sales": 0,
                "image_text_sales_amount": 0,
                "bind_shop_sales": 0,
                "bind_shop_sales_amount": 0
            },
            "days": 7,
            "referenceUnitPrice": 48.5,
            "selectionConfig": {
                "rules": [
                    {"target": "live_share", "operator": ">=", "threshold": 40, "message": "strong live", "status": "good", "color": "green"},
                    {"target": "card_share", "operator": ">", "threshold": 60, "message": "card dependent", "status": "bad", "color": "red"}
                ],
                "overallRules": [
                    {"criteria": {"bad": 1}, "result": "bad"},
                    {"criteria": {"good": 1}, "result": "good"}
                ]
            }
        })
    }

    #[test]
    fn analyze_value_produces_wire_shape() {
        let out = analyze_value(request_json(), &SelectionConfig::default()).unwrap();

        assert_eq!(out["totalSales"], 100);
        let channels = out["channels"].as_array().unwrap();
        assert_eq!(channels.len(), 5);
        assert_eq!(channels[0]["name"], "Product card");
        assert_eq!(channels[0]["volume"], 50);
        assert_eq!(channels[1]["sharePercent"], "40.00%");
        assert_eq!(channels[1]["dailyAverage"], "5.71");
        assert_eq!(channels[1]["averagePrice"], "50.00");
        assert_eq!(out["extraStats"]["specStat"]["val"], 2.0);
        assert_eq!(out["extraStats"]["liveSalesDiff"]["val"], 1.5);

        let advice = out["advice"].as_array().unwrap();
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0]["target"], "live_share");
        assert_eq!(advice[0]["status"], "good");
        assert_eq!(out["overallStatus"], "good");
    }

    #[test]
    fn fallback_config_used_when_request_has_none() {
        let mut value = request_json();
        value.as_object_mut().unwrap().remove("selectionConfig");
        let fallback = SelectionConfig::from_value(json!({
            "rules": [{"target": "totalSales", "operator": ">=", "threshold": 100, "status": "passed"}],
            "overallRules": [{"criteria": {"passed": 1}, "result": "passed"}]
        }))
        .unwrap();

        let out = analyze_value(value, &fallback).unwrap();
        assert_eq!(out["overallStatus"], "passed");
    }

    #[test]
    fn invalid_request_config_is_an_error() {
        let mut value = request_json();
        value["selectionConfig"] = json!({"rules": "oops"});
        let err = analyze_value(value, &SelectionConfig::default()).unwrap_err();
        assert!(err.to_string().contains("must be a sequence"), "{err}");
    }

    #[test]
    fn loosely_typed_config_fields_only_disable_their_rule() {
        let mut value = request_json();
        value["selectionConfig"] = json!({
            "rules": [
                {"target": "card_share", "operator": ">", "threshold": false, "status": "bad"},
                {"target": "live_share", "operator": ">=", "threshold": "40", "status": "good"}
            ],
            "overallRules": [
                {"criteria": {"bad": "1"}, "result": "bad"},
                {"criteria": {"good": "1"}, "result": "good"}
            ]
        });
        let out = analyze_value(value, &SelectionConfig::default()).unwrap();
        assert_eq!(out["advice"].as_array().unwrap().len(), 1);
        assert_eq!(out["overallStatus"], "good");
    }

    #[test]
    fn missing_days_defaults_and_bad_price_reads_zero() {
        let request = AnalysisRequest::parse(json!({
            "rawPeriodMetrics": {"sales": 14, "live_sales": 14, "live_sales_amount": 2800},
            "referenceUnitPrice": "unknown"
        }))
        .unwrap();
        assert_eq!(request.input.days, DEFAULT_DAYS);
        assert_eq!(request.input.reference_unit_price, 0.0);

        let response = analyze(&request.input, &SelectionConfig::default());
        assert_eq!(response.channels[1].daily_average, "2.00");
        assert_eq!(response.extra_stats.live_sales_diff.val, 2.0);
        assert_eq!(response.overall_status, Verdict::Normal);
        assert!(response.advice.is_empty());
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let good = AnalysisRequest::parse(request_json()).unwrap();
        let mut broken = good.clone();
        broken.selection_config = Some(json!(42));
        let mut empty = good.clone();
        empty.selection_config = None;

        let results = analyze_batch(&[good, broken, empty], &SelectionConfig::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().overall_status, Verdict::Good);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().overall_status, Verdict::Normal);
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let request = AnalysisRequest::parse(request_json()).unwrap();
        let fallback = SelectionConfig::default();
        let a = analyze_request(&request, &fallback).unwrap();
        let b = analyze_request(&request, &fallback).unwrap();
        assert_eq!(a, b);
    }
}

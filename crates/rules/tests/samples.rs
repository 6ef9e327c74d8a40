//! Integration tests running the sample requests in `data/selection/samples/`
//! through the full pipeline with the built-in default config.

use serde_json::Value;

use selection_rules::attribution::compute_report;
use selection_rules::loader::builtin_default;
use selection_rules::pipeline::{analyze_batch, analyze_request, AnalysisRequest};
use selection_rules::schema::{RawPeriodMetrics, Status, Verdict};
use selection_rules::validation::validate_config;

/// Resolve the samples directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn samples_dir() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data/selection/samples")
}

fn load_sample(filename: &str) -> Value {
    let path = samples_dir().join(filename);
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

// ── default-config.yml ──────────────────────────────────────

#[test]
fn default_config_is_valid() {
    let config = builtin_default().unwrap();
    let result = validate_config(&config);
    assert!(result.valid, "errors: {:?}", result.errors);
    assert_eq!(config.rules.len(), 9);
    assert_eq!(config.overall_rules.len(), 4);
}

// ── request.json ────────────────────────────────────────────

#[test]
fn single_request_with_default_config() {
    let request = AnalysisRequest::parse(load_sample("request.json")).unwrap();
    let response = analyze_request(&request, &builtin_default().unwrap()).unwrap();

    assert_eq!(response.total_sales, 100);
    let volumes: Vec<i64> = response.channels.iter().map(|c| c.volume).collect();
    assert_eq!(volumes, vec![50, 40, 10, 0, 0]);
    assert_eq!(response.channels[1].share_percent, "40.00%");
    assert_eq!(response.channels[1].daily_average, "5.71");
    assert_eq!(response.channels[1].average_price, "50.00");
    assert_eq!(response.extra_stats.spec_stat.val, 4.0);
    assert_eq!(response.extra_stats.live_sales_diff.val, -2.0);

    let targets: Vec<&str> = response.advice.iter().map(|f| f.target.as_str()).collect();
    assert_eq!(targets, vec!["live_share", "liveSpec"]);
    assert!(response.advice.iter().all(|f| f.status == Status::Good));
    assert_eq!(response.overall_status, Verdict::Good);
}

#[test]
fn response_serializes_to_dashboard_shape() {
    let request = AnalysisRequest::parse(load_sample("request.json")).unwrap();
    let response = analyze_request(&request, &builtin_default().unwrap()).unwrap();
    let value = serde_json::to_value(&response).unwrap();

    for key in ["totalSales", "channels", "extraStats", "advice", "overallStatus"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value["extraStats"]["liveSalesDiff"]["val"].is_number());
    assert!(value["extraStats"]["specStat"]["val"].is_number());
    assert_eq!(value["overallStatus"], "good");
}

// ── batch.json ──────────────────────────────────────────────

#[test]
fn batch_with_default_config() {
    let items = match load_sample("batch.json") {
        Value::Array(items) => items,
        other => panic!("expected array, got {other}"),
    };
    let requests: Vec<AnalysisRequest> = items
        .into_iter()
        .map(|v| AnalysisRequest::parse(v).unwrap())
        .collect();

    let results = analyze_batch(&requests, &builtin_default().unwrap());
    assert_eq!(results.len(), 3);

    assert_eq!(results[0].as_ref().unwrap().overall_status, Verdict::Good);

    let second = results[1].as_ref().unwrap();
    let targets: Vec<&str> = second.advice.iter().map(|f| f.target.as_str()).collect();
    assert_eq!(targets, vec!["live_share", "totalSales", "liveSalesDiff"]);
    assert_eq!(second.extra_stats.spec_stat.val, 0.0);
    assert_eq!(second.extra_stats.live_sales_diff.val, -20.0);
    assert_eq!(second.overall_status, Verdict::Bad);

    let err = results[2].as_ref().unwrap_err();
    assert!(err.to_string().contains("must be a sequence"), "{err}");
}

// ── Properties ──────────────────────────────────────────────

#[test]
fn channel_volumes_always_sum_to_total() {
    for sales in [0, 1, 17, 100, 9_999] {
        for live in [0, 3, 50, 200] {
            for video in [0, 7, 120] {
                let raw = RawPeriodMetrics {
                    sales,
                    live_sales: live,
                    video_sales: video,
                    image_text_sales: 2,
                    bind_shop_sales: 1,
                    ..Default::default()
                };
                let report = compute_report(&raw, 30, 0.0);
                let sum: i64 = report.channels.iter().map(|c| c.volume).sum();
                assert_eq!(sum, sales, "sales={sales} live={live} video={video}");
                for stat in &report.channels {
                    assert!(!stat.share_percent.contains("NaN") && !stat.share_percent.contains("inf"));
                    assert!(!stat.average_price.contains("NaN") && !stat.average_price.contains("inf"));
                }
            }
        }
    }
}

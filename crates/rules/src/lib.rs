//! Product selection metrics engine.
//!
//! This crate provides:
//! - Channel attribution of raw period telemetry (product card as residual)
//! - Ordered metric rule evaluation producing findings
//! - First-match verdict aggregation over finding counts
//! - An analysis pipeline with parallel batch evaluation
//! - A per-user config store with a built-in default and hot-reload
//! - Config validation with "did you mean" suggestions

pub mod attribution;
pub mod evaluator;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod validation;
pub mod verdict;

pub use attribution::{compute_report, safe_div, PeriodReport};
pub use evaluator::evaluate;
pub use pipeline::{analyze, analyze_batch, analyze_request, AnalysisRequest, AnalysisResponse};
pub use verdict::{aggregate, VerdictOutcome};

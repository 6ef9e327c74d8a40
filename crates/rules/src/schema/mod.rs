//! Selection schema types with serde deserialization.
//!
//! Defines the inputs and rule types of the selection engine:
//! - `RawPeriodMetrics`: lenient per-window telemetry from the capture layer
//! - `MetricKey`: the closed set of metrics a rule may target
//! - `MetricRule` / `Finding`: per-metric comparisons and their outcomes
//! - `OverallRule` / `Verdict`: count thresholds selecting the final verdict
//! - `SelectionConfig`: one user's ordered rule set

mod config;
mod metric;
mod overall;
mod rule;
mod telemetry;

pub use config::*;
pub use metric::*;
pub use overall::*;
pub use rule::*;
pub use telemetry::*;

pub(crate) use telemetry::{lenient_f64, lenient_int};

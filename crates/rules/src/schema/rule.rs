//! Metric comparison rules and the findings they produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single user-configured comparison against one report metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRule {
    /// Metric key, see [`MetricKey`](super::MetricKey). Kept as written so
    /// unrecognized keys survive a load/save cycle.
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub threshold: Option<Threshold>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Status,
    /// Display hint only.
    #[serde(default)]
    pub color: String,
}

/// Comparison operator of a metric rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    /// Missing, or any operator string not listed above. Never matches.
    #[default]
    #[serde(other)]
    Unsupported,
}

impl Operator {
    /// Apply the operator with standard floating-point semantics.
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Lt => value < threshold,
            Operator::Lte => value <= threshold,
            Operator::Gt => value > threshold,
            Operator::Gte => value >= threshold,
            Operator::Unsupported => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Lt => write!(f, "<"),
            Operator::Lte => write!(f, "<="),
            Operator::Gt => write!(f, ">"),
            Operator::Gte => write!(f, ">="),
            Operator::Unsupported => write!(f, "?"),
        }
    }
}

/// Rule threshold as entered in the editor: a number or numeric text.
///
/// Any other value (boolean, list, object) is kept as written so the rule
/// still loads; it just never matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Threshold {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Threshold {
    /// Numeric value of the threshold, `None` when it does not parse.
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Threshold::Number(n) => *n,
            Threshold::Text(s) => s.trim().parse::<f64>().ok()?,
            Threshold::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for Threshold {
    fn from(v: f64) -> Self {
        Threshold::Number(v)
    }
}

/// Severity attached to a finding.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Passed,
    Bad,
    /// Informational; also what any unrecognized status string reads as.
    #[default]
    #[serde(other)]
    Normal,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Good => write!(f, "good"),
            Status::Passed => write!(f, "passed"),
            Status::Bad => write!(f, "bad"),
            Status::Normal => write!(f, "normal"),
        }
    }
}

/// One matching rule's outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub target: String,
    pub message: String,
    pub color: String,
    pub status: Status,
}

impl Finding {
    pub(crate) fn from_rule(rule: &MetricRule) -> Self {
        Self {
            target: rule.target.clone(),
            message: rule.message.clone(),
            color: rule.color.clone(),
            status: rule.status,
        }
    }
}

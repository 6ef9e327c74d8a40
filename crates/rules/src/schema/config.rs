//! Selection config: the ordered metric rules and overall rules of one user.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use selection_core::{Result, SelectionError};

use super::{MetricRule, OverallRule};

/// Ordered rule set driving classification. Order is significant in both lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    pub rules: Vec<MetricRule>,
    pub overall_rules: Vec<OverallRule>,
}

impl SelectionConfig {
    /// Structurally check then deserialize a config value.
    ///
    /// The value must be an object whose `rules` and `overallRules` members
    /// are sequences (a missing member reads as empty). Any entry that does
    /// not deserialize rejects the whole config.
    pub fn from_value(value: Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            SelectionError::InvalidConfig(format!(
                "expected an object, found {}",
                json_type_name(&value)
            ))
        })?;

        for key in ["rules", "overallRules"] {
            match obj.get(key) {
                None | Some(Value::Array(_)) => {}
                Some(other) => {
                    return Err(SelectionError::InvalidConfig(format!(
                        "`{}` must be a sequence, found {}",
                        key,
                        json_type_name(other)
                    )))
                }
            }
        }

        let rules = parse_entries(obj.get("rules"), "rules")?;
        let overall_rules = parse_entries(obj.get("overallRules"), "overallRules")?;
        Ok(Self {
            rules,
            overall_rules,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::from_value(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_entries<T: serde::de::DeserializeOwned>(value: Option<&Value>, key: &str) -> Result<Vec<T>> {
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            T::deserialize(item).map_err(|e| {
                SelectionError::InvalidConfig(format!("{}[{}]: {}", key, i, e))
            })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}

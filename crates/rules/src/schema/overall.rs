//! Overall-verdict rules evaluated over finding counts.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient_int, Status};

/// Maps a minimum number of findings per severity to a verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverallRule {
    #[serde(default)]
    pub criteria: Criteria,
    pub result: Verdict,
}

/// Minimum finding counts; `0` means the severity is not checked.
///
/// Counts are read leniently: numeric text and floats are accepted, anything
/// else (or a negative count) reads as `0`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Criteria {
    #[serde(deserialize_with = "lenient_count")]
    pub good: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub passed: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub bad: u32,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = lenient_int(deserializer)?.clamp(0, i64::from(u32::MAX));
    Ok(count as u32)
}

impl Criteria {
    /// A criteria block with every field at `0` matches any counts.
    pub fn is_unconditional(&self) -> bool {
        self.good == 0 && self.passed == 0 && self.bad == 0
    }

    /// Non-zero requirements as `(status, minimum)` pairs.
    pub fn requirements(&self) -> impl Iterator<Item = (Status, u32)> {
        [
            (Status::Good, self.good),
            (Status::Passed, self.passed),
            (Status::Bad, self.bad),
        ]
        .into_iter()
        .filter(|(_, min)| *min > 0)
    }
}

/// Overall classification of a product.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Passed,
    Bad,
    /// No overall rule matched.
    #[default]
    Normal,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Good => write!(f, "good"),
            Verdict::Passed => write!(f, "passed"),
            Verdict::Bad => write!(f, "bad"),
            Verdict::Normal => write!(f, "normal"),
        }
    }
}

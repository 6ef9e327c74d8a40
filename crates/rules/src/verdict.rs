//! Verdict aggregator: finding counts to one overall classification.
//!
//! Contract: overall rules are scanned in order and the first rule whose
//! every non-zero criterion is met (`count >= minimum`) decides the verdict.
//! Later rules are not looked at once one matches. A rule with all criteria
//! at zero matches unconditionally. When nothing matches the verdict is
//! [`Verdict::Normal`].

use serde::{Deserialize, Serialize};

use crate::schema::{Finding, OverallRule, Status, Verdict};

/// Number of findings per counted severity. `normal` findings are not counted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub good: u32,
    pub passed: u32,
    pub bad: u32,
}

impl StatusCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.status {
                Status::Good => counts.good += 1,
                Status::Passed => counts.passed += 1,
                Status::Bad => counts.bad += 1,
                Status::Normal => {}
            }
        }
        counts
    }

    pub fn get(&self, status: Status) -> u32 {
        match status {
            Status::Good => self.good,
            Status::Passed => self.passed,
            Status::Bad => self.bad,
            Status::Normal => 0,
        }
    }

    /// Whether these counts meet every non-zero criterion of `rule`.
    pub fn satisfies(&self, rule: &OverallRule) -> bool {
        rule.criteria
            .requirements()
            .all(|(status, min)| self.get(status) >= min)
    }
}

/// Result of aggregation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerdictOutcome {
    pub verdict: Verdict,
    pub counts: StatusCounts,
}

/// Select the overall verdict for a set of findings.
pub fn aggregate(findings: &[Finding], overall_rules: &[OverallRule]) -> VerdictOutcome {
    let counts = StatusCounts::from_findings(findings);
    let verdict = overall_rules
        .iter()
        .find(|rule| counts.satisfies(rule))
        .map(|rule| rule.result)
        .unwrap_or(Verdict::Normal);
    VerdictOutcome { verdict, counts }
}

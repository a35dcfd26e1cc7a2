//! Run summary computed from the ordered outcomes

use serde::Serialize;

use super::outcome::{Stage, TestOutcome};

/// Aggregate pass/fail counts for a run
///
/// Every failed endpoint lands in exactly one bucket: the earliest stage
/// that failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub auth_failures: usize,
    pub connect_failures: usize,
    pub response_failures: usize,
}

impl RunSummary {
    /// Single pass over the outcomes
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let mut summary = RunSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.failed_stage() {
                None => summary.passed += 1,
                Some(Stage::Authentication) => summary.auth_failures += 1,
                Some(Stage::Connectivity) => summary.connect_failures += 1,
                Some(Stage::Response) => summary.response_failures += 1,
            }
        }
        summary.failed = summary.total - summary.passed;

        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn pass_rate(&self) -> f64 {
        percentage(self.passed, self.total)
    }

    pub fn fail_rate(&self) -> f64 {
        percentage(self.failed, self.total)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

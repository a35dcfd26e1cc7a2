//! Per-endpoint test outcome

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// The three checks, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Authentication,
    Connectivity,
    Response,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Authentication => "Authentication",
            Stage::Connectivity => "Connectivity",
            Stage::Response => "Response Status",
        };
        write!(f, "{label}")
    }
}

/// Result of testing one endpoint
///
/// The stage flags form a prefix: `connect_succeeded` implies
/// `auth_succeeded`, `response_succeeded` implies `connect_succeeded`.
/// Only the endpoint tester builds these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub endpoint_name: String,
    pub auth_succeeded: bool,
    pub connect_succeeded: bool,
    pub response_succeeded: bool,
    /// 0 unless the HTTP exchange completed
    pub status_code: u16,
    /// Empty on success
    pub error_message: String,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub overall_succeeded: bool,
}

impl TestOutcome {
    pub(crate) fn started(endpoint_name: &str) -> Self {
        Self {
            endpoint_name: endpoint_name.to_string(),
            auth_succeeded: false,
            connect_succeeded: false,
            response_succeeded: false,
            status_code: 0,
            error_message: String::new(),
            duration: Duration::ZERO,
            overall_succeeded: false,
        }
    }

    /// The earliest stage that failed, `None` for a passing outcome
    pub fn failed_stage(&self) -> Option<Stage> {
        if self.overall_succeeded {
            None
        } else if !self.auth_succeeded {
            Some(Stage::Authentication)
        } else if !self.connect_succeeded {
            Some(Stage::Connectivity)
        } else {
            Some(Stage::Response)
        }
    }

    /// Whether the stage flags respect the prefix ordering
    pub fn is_consistent(&self) -> bool {
        (!self.connect_succeeded || self.auth_succeeded)
            && (!self.response_succeeded || self.connect_succeeded)
            && self.overall_succeeded
                == (self.auth_succeeded && self.connect_succeeded && self.response_succeeded)
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

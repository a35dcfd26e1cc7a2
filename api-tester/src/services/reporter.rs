//! Console reporters
//!
//! `ConsoleReporter` prints human-readable progress as the run goes;
//! `JsonReporter` stays silent until the end and prints one JSON document.

use std::fmt::Display;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::core::{RunSummary, TestOutcome};
use crate::traits::Reporter;
use crate::types::Endpoint;

const RULE_WIDTH: usize = 80;

/// Human-readable reporter
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl ConsoleReporter<Vec<u8>> {
    /// Everything written so far
    pub fn captured(&self) -> String {
        match self.out.lock() {
            Ok(out) => String::from_utf8_lossy(&out).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn line(&self, text: impl Display) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(err) = writeln!(out, "{text}") {
            warn!(error = %err, "Failed to write report output");
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn run_started(&self, endpoint_count: usize) {
        self.line(format!("Loaded configuration with {endpoint_count} endpoint(s)"));
        self.line("=".repeat(RULE_WIDTH));
    }

    fn endpoint_started(&self, position: usize, total: usize, endpoint: &Endpoint) {
        self.line(format!("\n[{position}/{total}] Testing: {}", endpoint.name));
        self.line(format!("    URL: {}", endpoint.url));
        self.line(format!("    Method: {}", endpoint.method));
    }

    fn stage_progress(&self, message: &str) {
        self.line(format!("    {message}"));
    }

    fn response_body(&self, body: &str) {
        self.line(format!("    Response body: {body}"));
    }

    fn endpoint_finished(&self, outcome: &TestOutcome) {
        let duration = format_duration(outcome.duration);
        if outcome.overall_succeeded {
            self.line(format!("    ✓ PASS - All checks passed (Duration: {duration})"));
            return;
        }

        self.line(format!("    ✗ FAIL - {} (Duration: {duration})", outcome.error_message));
        self.line(format!("      • Authentication: {}", verdict(outcome.auth_succeeded)));
        self.line(format!("      • Connectivity: {}", verdict(outcome.connect_succeeded)));
        if outcome.connect_succeeded {
            self.line(format!(
                "      • Response Status: FAILED (Status Code: {})",
                outcome.status_code
            ));
        }
    }

    fn run_finished(&self, _outcomes: &[TestOutcome], summary: &RunSummary) {
        self.line(format!("\n{}", "=".repeat(RULE_WIDTH)));
        self.line("SUMMARY");
        self.line("-".repeat(RULE_WIDTH));
        self.line(format!("Total Endpoints:           {}", summary.total));
        self.line(format!(
            "Passed:                    {} ({:.1}%)",
            summary.passed,
            summary.pass_rate()
        ));
        self.line(format!(
            "Failed:                    {} ({:.1}%)",
            summary.failed,
            summary.fail_rate()
        ));
        self.line("");
        self.line(format!("  • Authentication Failures:  {}", summary.auth_failures));
        self.line(format!("  • Connectivity Failures:    {}", summary.connect_failures));
        self.line(format!("  • Response Failures:        {}", summary.response_failures));
        self.line("=".repeat(RULE_WIDTH));
    }
}

/// Machine-readable reporter; prints a single document when the run finishes
pub struct JsonReporter<W: Write + Send> {
    out: Mutex<W>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    summary: &'a RunSummary,
    results: &'a [TestOutcome],
}

impl JsonReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonReporter<Vec<u8>> {
    pub fn captured(&self) -> String {
        match self.out.lock() {
            Ok(out) => String::from_utf8_lossy(&out).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl<W: Write + Send> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn run_started(&self, _endpoint_count: usize) {}

    fn endpoint_started(&self, _position: usize, _total: usize, _endpoint: &Endpoint) {}

    fn stage_progress(&self, _message: &str) {}

    fn response_body(&self, _body: &str) {}

    fn endpoint_finished(&self, _outcome: &TestOutcome) {}

    fn run_finished(&self, outcomes: &[TestOutcome], summary: &RunSummary) {
        let report = JsonReport {
            passed: !summary.has_failures(),
            summary,
            results: outcomes,
        };

        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let written = serde_json::to_writer_pretty(&mut *out, &report)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(out));
        if let Err(err) = written {
            warn!(error = %err, "Failed to write JSON report");
        }
    }
}

fn verdict(passed: bool) -> &'static str {
    if passed {
        "PASSED"
    } else {
        "FAILED"
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{duration:.2?}")
}

//! Sequential run over all configured endpoints
//!
//! Endpoints are tested one at a time in declaration order. A failing
//! endpoint never stops the run; only cancellation does.

use shared::{logging, run_debug, run_info, run_warn, RunId};

use crate::core::cancel::CancelSignal;
use crate::core::endpoint_tester::EndpointTester;
use crate::core::outcome::TestOutcome;
use crate::core::summary::RunSummary;
use crate::error::{ConfigError, TesterResult};
use crate::traits::{ApiInvoker, Reporter, TokenAcquirer};
use crate::types::Endpoint;

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    /// In configuration order
    pub outcomes: Vec<TestOutcome>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.summary.has_failures()
    }

    /// Process exit status: 0 when every endpoint passed, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

/// Run orchestrator owning the endpoint tester and the reporter
pub struct TestRun<T, I, R>
where
    T: TokenAcquirer,
    I: ApiInvoker,
    R: Reporter,
{
    run_id: RunId,
    tester: EndpointTester<T, I>,
    reporter: R,
}

impl<T, I, R> TestRun<T, I, R>
where
    T: TokenAcquirer,
    I: ApiInvoker,
    R: Reporter,
{
    pub fn new(tester: EndpointTester<T, I>, reporter: R) -> Self {
        Self::with_run_id(RunId::new(), tester, reporter)
    }

    pub fn with_run_id(run_id: RunId, tester: EndpointTester<T, I>, reporter: R) -> Self {
        Self {
            run_id,
            tester,
            reporter,
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Test every endpoint and summarize
    ///
    /// The endpoint list must be non-empty; the configuration loader already
    /// guarantees this.
    pub async fn execute(&self, endpoints: &[Endpoint], cancel: &CancelSignal) -> TesterResult<RunReport> {
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints.into());
        }

        let total = endpoints.len();
        logging::log_startup(&self.run_id, &format!("test run over {total} endpoint(s)"));
        self.reporter.run_started(total);

        let mut outcomes = Vec::with_capacity(total);
        for (index, endpoint) in endpoints.iter().enumerate() {
            run_debug!(
                self.run_id,
                endpoint = %endpoint.name,
                method = %endpoint.method,
                "Testing endpoint {}/{}",
                index + 1,
                total
            );
            self.reporter.endpoint_started(index + 1, total, endpoint);

            let outcome = match self.tester.test_endpoint(endpoint, &self.reporter, cancel).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    run_warn!(self.run_id, endpoint = %endpoint.name, "Run aborted: {}", err);
                    return Err(err);
                }
            };

            self.reporter.endpoint_finished(&outcome);
            outcomes.push(outcome);
        }

        let summary = RunSummary::from_outcomes(&outcomes);
        self.reporter.run_finished(&outcomes, &summary);
        run_info!(
            self.run_id,
            passed = summary.passed,
            failed = summary.failed,
            "Run complete"
        );

        Ok(RunReport {
            run_id: self.run_id.clone(),
            outcomes,
            summary,
        })
    }
}

//! Three-stage check of a single endpoint
//!
//! Authenticate, invoke, classify. Each stage runs once, under its own
//! deadline, and the first failing stage ends the procedure. Stage failures
//! are recorded in the returned outcome; only run-level cancellation is
//! returned as an error.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::cancel::CancelSignal;
use crate::core::outcome::TestOutcome;
use crate::error::{AuthError, InvokeError, TesterError, TesterResult};
use crate::traits::{ApiInvoker, Reporter, TokenAcquirer};
use crate::types::{ApiRequest, ApiResponse, Endpoint, StageDeadlines};

/// Drives one endpoint through token acquisition and the API call
pub struct EndpointTester<T, I>
where
    T: TokenAcquirer,
    I: ApiInvoker,
{
    token_acquirer: T,
    api_invoker: I,
    deadlines: StageDeadlines,
    verbose: bool,
}

impl<T, I> EndpointTester<T, I>
where
    T: TokenAcquirer,
    I: ApiInvoker,
{
    /// Create a tester with default deadlines and quiet progress
    pub fn new(token_acquirer: T, api_invoker: I) -> Self {
        Self {
            token_acquirer,
            api_invoker,
            deadlines: StageDeadlines::default(),
            verbose: false,
        }
    }

    pub fn with_deadlines(mut self, deadlines: StageDeadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Surface stage transitions to the reporter
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn deadlines(&self) -> StageDeadlines {
        self.deadlines
    }

    /// Test one endpoint
    ///
    /// Returns `Err(TesterError::Cancelled)` if the run is cancelled while a
    /// stage is in flight; no outcome is produced in that case.
    pub async fn test_endpoint(
        &self,
        endpoint: &Endpoint,
        reporter: &dyn Reporter,
        cancel: &CancelSignal,
    ) -> TesterResult<TestOutcome> {
        let started = Instant::now();
        let mut outcome = TestOutcome::started(&endpoint.name);

        // Stage 1: authenticate
        self.progress(reporter, "→ Authenticating...");
        let token = match self.authenticate(endpoint, cancel).await? {
            Ok(token) => token,
            Err(err) => {
                warn!(endpoint = %endpoint.name, error = %err, "Authentication stage failed");
                outcome.error_message = format!("Authentication failed: {err}");
                outcome.duration = started.elapsed();
                return Ok(outcome);
            }
        };
        outcome.auth_succeeded = true;
        self.progress(reporter, "✓ Authentication successful");

        // Stage 2: invoke
        self.progress(reporter, "→ Making API request...");
        let request = ApiRequest::for_endpoint(endpoint, token);
        let response = match self.invoke(&request, cancel).await? {
            Ok(response) => response,
            Err(err) => {
                warn!(endpoint = %endpoint.name, error = %err, "Request stage failed");
                outcome.error_message = format!("Request failed: {err}");
                outcome.duration = started.elapsed();
                return Ok(outcome);
            }
        };
        outcome.connect_succeeded = true;
        outcome.status_code = response.status;
        self.progress(reporter, &format!("✓ Request completed (Status: {})", response.status));

        // Stage 3: classify
        if response.is_success() {
            outcome.response_succeeded = true;
            outcome.overall_succeeded = true;
            debug!(endpoint = %endpoint.name, status = response.status, "Endpoint passed");
        } else {
            warn!(endpoint = %endpoint.name, status = response.status, "Unexpected status code");
            outcome.error_message = format!("Unexpected status code: {}", response.status);
            if self.verbose && !response.body.is_empty() {
                reporter.response_body(&response.body_as_string());
            }
        }

        outcome.duration = started.elapsed();
        Ok(outcome)
    }

    async fn authenticate(
        &self,
        endpoint: &Endpoint,
        cancel: &CancelSignal,
    ) -> TesterResult<Result<String, AuthError>> {
        let deadline = self.deadlines.auth;
        let attempt = self.token_acquirer.acquire_token(&endpoint.credentials, deadline);

        Ok(match bounded(attempt, deadline, cancel).await? {
            Some(Ok(token)) if token.is_empty() => Err(AuthError::EmptyToken),
            Some(result) => result,
            None => Err(AuthError::DeadlineExceeded(deadline)),
        })
    }

    async fn invoke(
        &self,
        request: &ApiRequest,
        cancel: &CancelSignal,
    ) -> TesterResult<Result<ApiResponse, InvokeError>> {
        let deadline = self.deadlines.request;
        let attempt = self.api_invoker.invoke(request, deadline);

        Ok(bounded(attempt, deadline, cancel)
            .await?
            .unwrap_or(Err(InvokeError::DeadlineExceeded(deadline))))
    }

    fn progress(&self, reporter: &dyn Reporter, message: &str) {
        if self.verbose {
            reporter.stage_progress(message);
        }
    }
}

/// Run `future` until it completes, `deadline` passes, or the run is cancelled
///
/// `Ok(None)` means the deadline passed.
async fn bounded<F: Future>(
    future: F,
    deadline: Duration,
    cancel: &CancelSignal,
) -> TesterResult<Option<F::Output>> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TesterError::Cancelled),
        result = tokio::time::timeout(deadline, future) => Ok(result.ok()),
    }
}

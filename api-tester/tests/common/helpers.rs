//! Test helpers, builders and hand-written test doubles

use std::sync::Mutex;
use std::time::Duration;

use api_tester::{
    ApiInvoker, ApiRequest, ApiResponse, AuthError, CancelSignal, Credentials, Endpoint, EndpointTester,
    InvokeError, MockApiInvoker, MockReporter, MockTokenAcquirer, Reporter, RunReport, RunSummary,
    StageDeadlines, TestOutcome, TestRun, TokenAcquirer,
};
use async_trait::async_trait;

pub type MockTester = EndpointTester<MockTokenAcquirer, MockApiInvoker>;

/// Builder for endpoint testers wired to mockall doubles
///
/// Collaborators without a configured behaviour panic when called, so a
/// test only configures the stages it expects to reach.
pub struct TesterBuilder {
    acquirer: MockTokenAcquirer,
    invoker: MockApiInvoker,
    deadlines: StageDeadlines,
    verbose: bool,
}

impl Default for TesterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TesterBuilder {
    pub fn new() -> Self {
        Self {
            acquirer: MockTokenAcquirer::new(),
            invoker: MockApiInvoker::new(),
            deadlines: StageDeadlines::default(),
            verbose: false,
        }
    }

    /// Every token request succeeds with `token`
    pub fn with_token(mut self, token: &str) -> Self {
        let token = token.to_string();
        self.acquirer
            .expect_acquire_token()
            .returning(move |_, _| Ok(token.clone()));
        self
    }

    /// Every token request fails with `error`
    pub fn with_auth_error(mut self, error: AuthError) -> Self {
        self.acquirer
            .expect_acquire_token()
            .returning(move |_, _| Err(error.clone()));
        self
    }

    /// Every call answers with `status` and an empty body
    pub fn with_status(mut self, status: u16) -> Self {
        self.invoker.expect_invoke().returning(move |_, _| {
            Ok(ApiResponse {
                status,
                ..Default::default()
            })
        });
        self
    }

    pub fn with_response(mut self, response: ApiResponse) -> Self {
        self.invoker
            .expect_invoke()
            .returning(move |_, _| Ok(response.clone()));
        self
    }

    /// Every call fails with `error`
    pub fn with_invoke_error(mut self, error: InvokeError) -> Self {
        self.invoker
            .expect_invoke()
            .returning(move |_, _| Err(error.clone()));
        self
    }

    /// The API must never be called
    pub fn without_invoke(mut self) -> Self {
        self.invoker.expect_invoke().times(0);
        self
    }

    pub fn with_acquirer(mut self, acquirer: MockTokenAcquirer) -> Self {
        self.acquirer = acquirer;
        self
    }

    pub fn with_invoker(mut self, invoker: MockApiInvoker) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn with_deadlines(mut self, deadlines: StageDeadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn build(self) -> MockTester {
        EndpointTester::new(self.acquirer, self.invoker)
            .with_deadlines(self.deadlines)
            .with_verbose(self.verbose)
    }
}

/// Reporter that records every hook call in order
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn run_started(&self, endpoint_count: usize) {
        self.record(format!("run_started:{endpoint_count}"));
    }

    fn endpoint_started(&self, position: usize, total: usize, endpoint: &Endpoint) {
        self.record(format!("endpoint_started:{position}/{total}:{}", endpoint.name));
    }

    fn stage_progress(&self, message: &str) {
        self.record(format!("progress:{message}"));
    }

    fn response_body(&self, body: &str) {
        self.record(format!("body:{body}"));
    }

    fn endpoint_finished(&self, outcome: &TestOutcome) {
        self.record(format!("endpoint_finished:{}", outcome.endpoint_name));
    }

    fn run_finished(&self, outcomes: &[TestOutcome], summary: &RunSummary) {
        self.record(format!("run_finished:{}:{}", outcomes.len(), summary.passed));
    }
}

/// Token acquirer that only answers after `delay`
pub struct SlowTokenAcquirer {
    pub delay: Duration,
}

#[async_trait]
impl TokenAcquirer for SlowTokenAcquirer {
    async fn acquire_token(&self, _credentials: &Credentials, _deadline: Duration) -> Result<String, AuthError> {
        tokio::time::sleep(self.delay).await;
        Ok("slow-token".to_string())
    }
}

/// API invoker that only answers after `delay`, ignoring its deadline
pub struct SlowApiInvoker {
    pub delay: Duration,
}

#[async_trait]
impl ApiInvoker for SlowApiInvoker {
    async fn invoke(&self, _request: &ApiRequest, _deadline: Duration) -> Result<ApiResponse, InvokeError> {
        tokio::time::sleep(self.delay).await;
        Ok(ApiResponse {
            status: 200,
            ..Default::default()
        })
    }
}

/// Test helper functions
pub struct TestHelpers;

impl TestHelpers {
    /// A mock reporter that accepts any number of calls to every hook
    pub fn permissive_reporter() -> MockReporter {
        let mut reporter = MockReporter::new();
        reporter.expect_run_started().returning(|_| ()).times(0..);
        reporter.expect_endpoint_started().returning(|_, _, _| ()).times(0..);
        reporter.expect_stage_progress().returning(|_| ()).times(0..);
        reporter.expect_response_body().returning(|_| ()).times(0..);
        reporter.expect_endpoint_finished().returning(|_| ()).times(0..);
        reporter.expect_run_finished().returning(|_, _| ()).times(0..);
        reporter
    }

    /// Test a single endpoint with a quiet reporter and no cancellation
    pub async fn test_one<T: TokenAcquirer, I: ApiInvoker>(
        tester: &EndpointTester<T, I>,
        endpoint: &Endpoint,
    ) -> TestOutcome {
        tester
            .test_endpoint(endpoint, &Self::permissive_reporter(), &CancelSignal::never())
            .await
            .unwrap()
    }

    /// Run all endpoints to completion with a quiet reporter
    pub async fn run_all(tester: MockTester, endpoints: &[Endpoint]) -> RunReport {
        TestRun::new(tester, Self::permissive_reporter())
            .execute(endpoints, &CancelSignal::never())
            .await
            .unwrap()
    }

    /// Assert the three stage flags and the prefix invariant
    pub fn assert_stages(outcome: &TestOutcome, auth: bool, connect: bool, response: bool) {
        assert_eq!(outcome.auth_succeeded, auth, "auth flag of {outcome:?}");
        assert_eq!(outcome.connect_succeeded, connect, "connect flag of {outcome:?}");
        assert_eq!(outcome.response_succeeded, response, "response flag of {outcome:?}");
        assert_eq!(outcome.overall_succeeded, auth && connect && response);
        assert!(outcome.is_consistent(), "inconsistent outcome {outcome:?}");
    }

    /// Each failed outcome counted in exactly one bucket
    pub fn assert_buckets_exclusive(summary: &RunSummary) {
        assert_eq!(summary.passed + summary.failed, summary.total);
        assert_eq!(
            summary.auth_failures + summary.connect_failures + summary.response_failures,
            summary.failed
        );
    }
}

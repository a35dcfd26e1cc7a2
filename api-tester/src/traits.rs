//! Trait definitions for dependency injection
//!
//! The endpoint tester only talks to its collaborators through these traits,
//! so a real identity provider and HTTP transport can be swapped for test
//! doubles without changing the test procedure.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::{RunSummary, TestOutcome};
use crate::error::{AuthError, InvokeError};
use crate::types::{ApiRequest, ApiResponse, Credentials, Endpoint};

/// Bearer token acquisition
///
/// Implementations must fail rather than return an empty token when any
/// credential is empty or rejected. Any internal token caching is opaque to
/// callers.
#[mockall::automock]
#[async_trait]
pub trait TokenAcquirer: Send + Sync {
    /// Acquire a bearer token, giving up after `deadline`
    async fn acquire_token(&self, credentials: &Credentials, deadline: Duration) -> Result<String, AuthError>;
}

/// HTTP transport for the endpoint call
///
/// Implementations always send `Authorization: Bearer <token>`, add
/// `Content-Type: application/json` only with a body, and fully drain the
/// response body on every path.
#[mockall::automock]
#[async_trait]
pub trait ApiInvoker: Send + Sync {
    /// Send one request, giving up after `deadline`
    async fn invoke(&self, request: &ApiRequest, deadline: Duration) -> Result<ApiResponse, InvokeError>;
}

/// Presentation of run progress and results
#[mockall::automock]
pub trait Reporter: Send + Sync {
    /// Called once before the first endpoint
    fn run_started(&self, endpoint_count: usize);

    /// Called before each endpoint; `position` is 1-based
    fn endpoint_started(&self, position: usize, total: usize, endpoint: &Endpoint);

    /// Stage transitions, only emitted in verbose mode
    fn stage_progress(&self, message: &str);

    /// Response body of an unexpected status, only emitted in verbose mode
    fn response_body(&self, body: &str);

    fn endpoint_finished(&self, outcome: &TestOutcome);

    /// Called once after the last endpoint with the ordered outcomes
    fn run_finished(&self, outcomes: &[TestOutcome], summary: &RunSummary);
}

//! API endpoint tester library
//!
//! Checks that OAuth 2.0 client-credentials protected HTTP endpoints are
//! reachable: for every configured endpoint a bearer token is acquired, the
//! endpoint is called, and the response status is classified. Outcomes are
//! aggregated into a run summary that decides the process exit status.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, EndpointConfig, TesterConfig, DEFAULT_CONFIG_PATH};
pub use core::{cancel_pair, CancelHandle, CancelSignal, EndpointTester, RunReport, RunSummary, Stage, TestOutcome, TestRun};
pub use error::{AuthError, ConfigError, EndpointError, InvokeError, TesterError, TesterResult};
pub use traits::{ApiInvoker, MockApiInvoker, MockReporter, MockTokenAcquirer, Reporter, TokenAcquirer};
pub use types::{ApiRequest, ApiResponse, Credentials, Endpoint, RequestBody, StageDeadlines, DEFAULT_STAGE_DEADLINE};

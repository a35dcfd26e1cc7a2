//! Tester core logic
//!
//! The three-stage endpoint procedure, the sequential run over all endpoints,
//! and the outcome/summary model they produce.

pub mod cancel;
pub mod endpoint_tester;
pub mod outcome;
pub mod summary;
pub mod test_run;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use endpoint_tester::EndpointTester;
pub use outcome::{Stage, TestOutcome};
pub use summary::RunSummary;
pub use test_run::{RunReport, TestRun};

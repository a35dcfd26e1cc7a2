//! Common test utilities and infrastructure
//!
//! Shared fixtures, builders and test doubles used across the api-tester
//! test suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{RecordingReporter, SlowApiInvoker, SlowTokenAcquirer, TestHelpers, TesterBuilder};

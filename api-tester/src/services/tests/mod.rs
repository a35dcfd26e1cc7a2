//! Tests for the real service implementations
//!
//! The identity provider and target APIs are stood in for by wiremock
//! servers.

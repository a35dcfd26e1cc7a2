//! Shared types for the API tester
//!
//! Contains the vocabulary used by every part of the tester (HTTP methods,
//! run identifiers, shared errors) and the logging setup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;

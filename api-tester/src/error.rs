//! Tester error types
//!
//! Stage failures (`AuthError`, `InvokeError`) are recorded in a test outcome
//! and never abort a run. Only `TesterError` escapes a run.

use std::time::Duration;
use thiserror::Error;

use shared::SharedError;

/// Result type for tester operations
pub type TesterResult<T> = Result<T, TesterError>;

/// Errors that end a run (or prevent one from starting)
#[derive(Error, Debug)]
pub enum TesterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Run cancelled before completion")]
    Cancelled,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open config file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode config file {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: no endpoints defined in configuration")]
    NoEndpoints,

    #[error("invalid configuration: endpoint {index} ({name}): {source}")]
    InvalidEndpoint {
        index: usize,
        name: String,
        #[source]
        source: EndpointError,
    },
}

/// A single endpoint definition failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error(transparent)]
    Method(#[from] SharedError),
}

/// Token acquisition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing required parameter: {field}")]
    MissingParameter { field: &'static str },

    #[error("failed to acquire token: identity provider returned {status}: {description}")]
    Rejected { status: u16, description: String },

    #[error("failed to acquire token: {message}")]
    Transport { message: String },

    #[error("failed to acquire token: invalid token response: {message}")]
    InvalidResponse { message: String },

    #[error("received empty token")]
    EmptyToken,

    #[error("deadline exceeded after {0:?} while acquiring token")]
    DeadlineExceeded(Duration),
}

/// API invocation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("failed to create request: invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to marshal request body: {message}")]
    Serialization { message: String },

    #[error("failed to execute request: {message}")]
    Transport { message: String },

    #[error("failed to read response body: {message}")]
    ReadBody { message: String },

    #[error("deadline exceeded after {0:?} waiting for response")]
    DeadlineExceeded(Duration),
}

//! Shared error types for the API tester

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("invalid HTTP method: {method} (must be GET, POST, PUT, PATCH, or DELETE)")]
    InvalidMethod { method: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

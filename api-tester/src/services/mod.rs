//! Service implementations
//!
//! Real implementations of the collaborator traits: the identity provider
//! client, the HTTP transport and the console reporters.

pub mod api_invoker;
pub mod reporter;
pub mod token_acquirer;

#[cfg(test)]
pub mod tests;

pub use api_invoker::RealApiInvoker;
pub use reporter::{ConsoleReporter, JsonReporter};
pub use token_acquirer::{RealTokenAcquirer, DEFAULT_AUTHORITY_HOST};

//! external.rs — outcome taxonomy for optional external collaborators.
//!
//! The job runner and the hosted-sheet push are optional features: missing
//! configuration is fatal to that one feature only, and callers need to
//! branch on what went wrong without digging through error strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExternalError {
    /// Required configuration (env vars, credentials) is missing or empty.
    #[error("missing required configuration: {0}")]
    ConfigurationMissing(String),

    /// The remote side reported a failure state or an unusable response.
    #[error("remote failure: {0}")]
    RemoteFailure(String),

    /// The caller-specified deadline elapsed before the remote completed.
    #[error("timed out waiting for remote completion")]
    Timeout,
}

impl ExternalError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExternalError::ConfigurationMissing(_))
    }
}

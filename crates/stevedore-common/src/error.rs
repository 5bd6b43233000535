//! Unified error types for the Stevedore workspace.
//!
//! Every failure of the client surfaces synchronously to the caller of the
//! failing operation. Nothing in the library retries or suppresses errors.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StevedoreError {
    /// A mapping rule marked as required had no value and no default.
    #[error("{field} must be specified when calling {operation}")]
    MissingRequiredField {
        /// Wire key of the missing field.
        field: &'static str,
        /// Operation whose body was being mapped.
        operation: &'static str,
    },

    /// An option had a shape the client needs to inspect and could not use.
    #[error("invalid option for {operation}: {message}")]
    InvalidOption {
        /// Operation the option was passed to.
        operation: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// The transport failed before a response was received.
    #[error("request {method} {path} failed: {source}")]
    RequestFailed {
        /// HTTP method of the attempted request.
        method: String,
        /// Request path (without query string).
        path: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },

    /// The daemon answered but the body could not be interpreted.
    #[error("unable to parse response of {method} {path}: {reason}")]
    ResponseParseError {
        /// HTTP method of the request.
        method: String,
        /// Request path (without query string).
        path: String,
        /// What went wrong while parsing.
        reason: String,
    },

    /// A response kind the dispatcher cannot honour was requested.
    #[error("unable to parse expected value {kind}")]
    UnsupportedExpectation {
        /// The requested kind, as written by the caller.
        kind: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StevedoreError>;

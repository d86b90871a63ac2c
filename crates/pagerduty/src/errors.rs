//! Error and retry-policy types shared by every PagerDuty binding.
//!
//! [`ApiError`] covers the whole life of a request: the transport failing,
//! the server answering with a non-success status, the body failing to
//! decode, or a decoded body missing the envelope key a binding expects.
//!
//! [`RetryPolicy`] is a cross-cutting concern: the shared client consults it
//! to decide whether a failed request may be re-sent. Bindings never retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable` errors: network failures, timeouts, `429 Too Many Requests`,
///   and `5xx` server errors.
/// - `NonRetryable` errors: every other status, decode and protocol failures,
///   invalid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    ///
    /// `after` optionally specifies the minimum delay before retrying (e.g.
    /// derived from a `Retry-After` response header).
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

/// Errors produced while talking to the PagerDuty REST API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused, DNS
    /// failure, timeout, TLS failure).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
        /// Whether the failure was a timeout.
        timed_out: bool,
    },

    /// The server answered with a non-success HTTP status.
    ///
    /// `404 Not Found` lands here; bindings do not special-case it.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the PagerDuty error envelope, or the raw body.
        message: String,
        /// Delay requested by the server through `Retry-After`.
        retry_after: Option<Duration>,
    },

    /// The response body is not valid JSON or does not match the expected shape.
    #[error("Failed to decode response body: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// The body decoded, but a field required by the response contract is absent.
    #[error("JSON response does not have '{missing_field}' field")]
    Protocol {
        /// Name of the missing field (e.g. `"extension"`).
        missing_field: String,
    },

    /// The request could not be built from the supplied values.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// The client configuration is invalid (missing token, malformed base URL).
    ///
    /// Produced at construction time; a client never starts with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl ApiError {
    /// Builds an [`ApiError::Protocol`] naming the missing field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::Protocol {
            missing_field: field.into(),
        }
    }

    /// Returns the HTTP status code if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Classifies this error for the shared client's retry loop.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::Status {
                status,
                retry_after,
                ..
            } if *status == 429 || (500..600).contains(status) => RetryPolicy::Retryable {
                after: *retry_after,
            },
            _ => RetryPolicy::NonRetryable,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

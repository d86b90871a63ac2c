//! PagerDuty REST transport.
//!
//! Implements the [`pagerduty::ApiClient`] port over HTTPS with `reqwest`.
//! Resource bindings (e.g. `extensions`) are written against the port and
//! receive an [`HttpClient`] at the composition root.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Base URL resolution, authentication headers, status
//! mapping, error-envelope parsing, and retry with exponential back-off all
//! live here. The [`pagerduty`] crate sees only [`pagerduty::ApiClient`].
//!
//! ## Retries
//!
//! A request is re-sent when its error carries
//! [`pagerduty::RetryPolicy::Retryable`], up to [`ClientConfig::max_retries`]
//! extra attempts. `POST` is only re-sent on `429`, since the server did not
//! act on a rate-limited request; other failures of a `POST` may already have
//! created the resource.
//!
//! A `Retry-After` given in seconds replaces the computed back-off; both are
//! capped at 30 seconds. Requests the client cannot build (an invalid extra
//! header, for instance) fail with [`pagerduty::ApiError::InvalidRequest`]
//! and are never re-sent.

pub mod client;
pub mod config;

pub use client::HttpClient;
pub use config::ClientConfig;

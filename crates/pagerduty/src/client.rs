//! The shared-client port.
//!
//! Resource bindings never touch HTTP directly. They talk to an [`ApiClient`],
//! which owns connection handling, authentication headers, base URL
//! resolution, status mapping, and retries. The `http-client` crate supplies
//! the production implementation; tests supply in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ApiError;

// ---------------------------------------------------------------------------
// Request options
// ---------------------------------------------------------------------------

/// Per-request options for write verbs.
///
/// PagerDuty requires a `From` header carrying a user's email address when a
/// write is made with an account-level API token; that is the common reason
/// to set one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Creates options with no extra headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extra header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the `From` header.
    #[must_use]
    pub fn with_from(self, email: impl Into<String>) -> Self {
        self.with_header("From", email)
    }

    /// Returns the extra headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A successful (2xx) HTTP response as seen by a binding.
///
/// Non-success statuses never reach a binding as an `ApiResponse`; the client
/// converts them to [`ApiError::Status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Decode`] if the body is not valid JSON or does not match
    /// the shape of `T`.
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|err| ApiError::Decode {
            message: format!("{err} (status {})", self.status),
        })
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Verb-level access to the PagerDuty REST API.
///
/// `path` is always relative to the API base URL and starts with `/`; it may
/// carry an already-encoded query string.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Issues a `GET`.
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError>;

    /// Issues a `POST`, with a JSON body when `body` is `Some`.
    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError>;

    /// Issues a `PUT` with a JSON body.
    async fn put(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError>;

    /// Issues a `DELETE`.
    async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError>;
}

#[async_trait]
impl<C: ApiClient + ?Sized> ApiClient for Arc<C> {
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        (**self).get(path).await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        (**self).post(path, body, options).await
    }

    async fn put(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        (**self).put(path, body, options).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        (**self).delete(path).await
    }
}

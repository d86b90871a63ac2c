//! reqwest implementation of [`ApiClient`].

use std::time::Duration;

use async_trait::async_trait;
use pagerduty::{ApiClient, ApiError, ApiResponse, RequestOptions, RetryPolicy};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::ClientConfig;

/// Media type selecting version 2 of the REST API.
const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

const USER_AGENT: &str = concat!("pd-extensions/", env!("CARGO_PKG_VERSION"));

/// Upper bound for a single back-off interval.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// PagerDuty error envelope: `{"error": {"message": "...", "errors": [...]}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// HTTPS client for the PagerDuty REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    max_retries: u32,
    initial_backoff: Duration,
}

impl HttpClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Configuration`] if `config` fails validation or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|err| ApiError::Configuration {
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff(),
        })
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }

    /// Delay before retry number `attempt + 1`. A server-requested delay is
    /// honoured but capped like the computed back-off.
    fn retry_delay(&self, after: Option<Duration>, attempt: u32) -> Duration {
        after.map_or_else(|| self.backoff(attempt), |after| after.min(MAX_BACKOFF))
    }

    #[instrument(skip(self, method, body, options), fields(method = %method))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: Option<&RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        let mut attempt = 0;
        loop {
            let err = match self.send_once(method.clone(), path, body, options).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let after = match err.retry_policy() {
                RetryPolicy::Retryable { after } if attempt < self.max_retries => after,
                _ => return Err(err),
            };
            let rate_limited = err.status() == Some(StatusCode::TOO_MANY_REQUESTS.as_u16());
            if method == Method::POST && !rate_limited {
                return Err(err);
            }

            let delay = self.retry_delay(after, attempt);
            attempt += 1;
            warn!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "Retrying PagerDuty request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: Option<&RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .http
            .request(method, &url)
            .header(ACCEPT, ACCEPT_V2)
            .header(AUTHORIZATION, format!("Token token={}", self.token));

        if let Some(options) = options {
            for (name, value) in options.headers() {
                let (name, value) = header_pair(name, value)?;
                request = request.header(name, value);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let bytes = response.bytes().await.map_err(transport_error)?;

        debug!(status = status.as_u16(), bytes = bytes.len(), "PagerDuty response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &bytes),
                retry_after,
            });
        }
        Ok(ApiResponse::new(status.as_u16(), bytes.to_vec()))
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, path, None, None).await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, path, body, Some(options)).await
    }

    async fn put(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, path, Some(body), Some(options)).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, path, None, None).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        return ApiError::InvalidRequest {
            message: err.to_string(),
        };
    }
    ApiError::Transport {
        message: err.to_string(),
        timed_out: err.is_timeout(),
    }
}

/// Validates a caller-supplied header before it reaches the request builder.
fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
        ApiError::InvalidRequest {
            message: format!("invalid header name '{name}'"),
        }
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|_| ApiError::InvalidRequest {
        message: format!("invalid value for header '{name}'"),
    })?;
    Ok((header_name, header_value))
}

/// Reads `Retry-After` given in whole seconds. HTTP-date values are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Extracts a message from a PagerDuty error envelope, falling back to the
/// raw body and then to the status reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let ErrorBody { message, errors } = envelope.error;
        return if errors.is_empty() {
            message
        } else {
            format!("{message}: {}", errors.join("; "))
        };
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        text
    }
}

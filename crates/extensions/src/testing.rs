//! In-memory [`ApiClient`] that records requests and replays canned results.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pagerduty::{ApiClient, ApiError, ApiResponse, RequestOptions};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

#[derive(Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<Recorded>>,
    replies: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
}

impl RecordingClient {
    pub fn replying(replies: impl IntoIterator<Item = Result<ApiResponse, ApiError>>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    pub fn json(body: &str) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse::new(200, body))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        body: Option<&Value>,
        options: Option<&RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            body: body.cloned(),
            headers: options.map(|o| o.headers().to_vec()).unwrap_or_default(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no reply queued for request")
    }
}

#[async_trait]
impl ApiClient for RecordingClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.record("GET", path, None, None)
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.record("POST", path, body, Some(options))
    }

    async fn put(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.record("PUT", path, Some(body), Some(options))
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.record("DELETE", path, None, None)
    }
}

//! HTTP Transport
//!
//! Every call to the Sirona API goes through [`ApiTransport`]. The trait
//! is the seam between request building/response parsing (owned by the
//! domain crates) and the wire (reqwest here, an in-memory fake in tests).
//!
//! The transport never retries and imposes no timeout of its own: callers
//! surface failures to the user, who retries by hand.

use std::future::Future;
use std::sync::Arc;

use http::Method;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;

// ============================================================================
// Request / Response
// ============================================================================

/// A file part of a multipart body
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A single multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, part: FilePart },
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormField::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(name: impl Into<String>, part: FilePart) -> Self {
        FormField::File {
            name: name.into(),
            part,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

/// A request to the API, relative to the configured base URL
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Serialize `body` as the JSON payload
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, serde_json::Error> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// A raw API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body as JSON, or `Null` when the body is empty or not JSON
    pub fn json_or_null(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Error payload shared by the API's non-2xx responses
///
/// The human-readable text may arrive as `error`, `message` or `detail`;
/// lockouts add `account_locked` and `locked_until`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub account_locked: bool,
    #[serde(default)]
    pub locked_until: Option<String>,
}

impl ErrorBody {
    /// Parse the body of `response`, empty when it is not a JSON object
    pub fn from_response(response: &ApiResponse) -> Self {
        response.json().unwrap_or_default()
    }

    /// First non-blank of `error`, `message`, `detail`
    pub fn text(&self) -> Option<&str> {
        [&self.error, &self.message, &self.detail]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.trim().is_empty())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, reset)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A multipart file part had an unusable MIME type
    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),

    /// Connection-level failure without a reqwest error (used by fakes)
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Request(e) if e.is_timeout())
    }

    pub fn is_connect(&self) -> bool {
        match self {
            TransportError::Request(e) => e.is_connect(),
            TransportError::Connection(_) => true,
            TransportError::InvalidMimeType(_) => false,
        }
    }
}

// ============================================================================
// Transport trait
// ============================================================================

/// Sends one request and returns the raw response
///
/// Non-2xx statuses are *responses*, not errors: the caller owns the
/// parsing of error bodies.
#[trait_variant::make(ApiTransport: Send)]
pub trait LocalApiTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<T> ApiTransport for Arc<T>
where
    T: ApiTransport + Send + Sync,
{
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send {
        <T as ApiTransport>::send(self.as_ref(), request)
    }
}

// ============================================================================
// reqwest implementation
// ============================================================================

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl ApiTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(http::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            "API request completed"
        );

        Ok(ApiResponse { status, body })
    }
}

fn build_form(fields: Vec<FormField>) -> Result<reqwest::multipart::Form, TransportError> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name, value),
            FormField::File { name, part } => {
                let file = reqwest::multipart::Part::bytes(part.bytes)
                    .file_name(part.file_name)
                    .mime_str(&part.mime_type)
                    .map_err(|_| TransportError::InvalidMimeType(part.mime_type.clone()))?;
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// ============================================================================
// Test double
// ============================================================================

/// In-memory transport that records requests and replays queued responses
#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{ApiRequest, ApiResponse, ApiTransport, TransportError};

    #[derive(Debug, Default)]
    pub struct RecordingTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a JSON response
        pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
            self.push(Ok(ApiResponse::json_body(status, &body)))
        }

        /// Queue a connection failure
        pub fn fail(&self, reason: &str) -> &Self {
            self.push(Err(TransportError::Connection(reason.to_string())))
        }

        fn push(&self, item: Result<ApiResponse, TransportError>) -> &Self {
            if let Ok(mut responses) = self.responses.lock() {
                responses.push_back(item);
            }
            self
        }

        /// Requests sent so far, oldest first
        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests
                .lock()
                .map(|r| r.clone())
                .unwrap_or_default()
        }

        pub fn last_request(&self) -> Option<ApiRequest> {
            self.requests().pop()
        }
    }

    impl ApiTransport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            self.responses
                .lock()
                .ok()
                .and_then(|mut r| r.pop_front())
                .unwrap_or_else(|| Err(TransportError::Connection("no response queued".into())))
        }
    }
}

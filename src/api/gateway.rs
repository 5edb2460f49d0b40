//! # Authenticated Fetch Gateway
//!
//! The one place that talks HTTP. Every call:
//!
//! 1. Attaches `Authorization: Bearer <token>` if the session has a token.
//! 2. Serializes the body as JSON when one is given.
//! 3. Classifies the response: 2xx → parsed JSON, anything else → `FetchError`.
//!
//! Single attempt per call. Retrying is the caller's business (and nobody does).

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::session::SessionStore;

/// Everything that can go wrong between pressing Enter and seeing data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport failure (DNS, refused connection, reset). No status.
    Network(String),
    /// Backend answered with a non-2xx status.
    Http { status: u16, message: String },
    /// Rejected locally before any request was made (e.g. empty field).
    Validation(String),
    /// 2xx, but the body was not the JSON we expected.
    Parse(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            FetchError::Validation(msg) => write!(f, "{msg}"),
            FetchError::Parse(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

pub struct Gateway {
    base_url: String,
    client: reqwest::Client,
    session: Arc<SessionStore>,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one request and return the parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, FetchError> {
        self.send(method, path, &[], body).await
    }

    /// `GET` with URL-encoded query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        self.send(Method::GET, path, query, None).await
    }

    /// Typed wrapper: serialize `body`, deserialize the answer into `T`.
    pub async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        let value = self.request(method, path, body.as_ref()).await?;
        decode(value)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, FetchError> {
        let url = self.url(path);
        let mut builder = self.client.request(method.clone(), &url);

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        info!("{} {} (authenticated: {})", method, url, self.session.has_token());

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            FetchError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status);

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!("{} {} rejected: {} {}", method, url, status.as_u16(), message);
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // Some endpoints answer a bare `ok`; keep it as a JSON string and let
        // typed decoding decide whether that is acceptable.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

/// Deserialize an already-fetched JSON value.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body. Backends tend to send
/// `{"message": ...}` or `{"error": ...}`; fall back to the raw text, then to
/// the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

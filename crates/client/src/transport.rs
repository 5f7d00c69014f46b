//! Request descriptors and the HTTP transport seam.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

const DEFAULT_FAILURE_MESSAGE: &str = "The request could not be completed";

/// Body keys read for a failure message, in order, unless a request overrides them.
pub const DEFAULT_MESSAGE_KEYS: &[&str] = &["error", "mensaje"];

/// One backend call: method, path, optional JSON body and auth requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub requires_auth: bool,
    /// Shown when a failure body carries no message of its own.
    pub failure_message: String,
    /// Body keys tried for a failure message; the first non-empty string wins.
    pub message_keys: &'static [&'static str],
}

impl ApiRequest {
    /// Bearer-required request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            requires_auth: true,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            message_keys: DEFAULT_MESSAGE_KEYS,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::failure(format!("Failed to encode request: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Mark the request as callable without a token.
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn message_keys(mut self, keys: &'static [&'static str]) -> Self {
        self.message_keys = keys;
        self
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns whatever the server answered.
///
/// Implementations return `ClientError::Network` when no response was
/// received and never interpret the status code.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<RawResponse>;
}

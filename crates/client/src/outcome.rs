//! Classification of backend responses.
//!
//! Every response maps to exactly one [`CallOutcome`]. The backend signals an
//! invalid or expired token either with HTTP 401 or with the exact error
//! text [`INVALID_TOKEN_SENTINEL`], sometimes on a 2xx status.

use log::warn;
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::{ApiRequest, RawResponse};

/// Error text the backend uses for a rejected token.
pub const INVALID_TOKEN_SENTINEL: &str = "Token inválido";

/// Tagged outcome of one remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success(T),
    /// No token cached for a bearer-required call; nothing was sent.
    Unauthenticated,
    /// The backend rejected the token; the cached token has been cleared.
    SessionInvalid,
    /// Non-2xx or unreadable response, with a displayable message.
    Failure(String),
    /// No response received.
    NetworkError(String),
}

impl<T> CallOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    /// The screen should redirect to login.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            CallOutcome::Unauthenticated | CallOutcome::SessionInvalid
        )
    }

    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            CallOutcome::Success(value) => Ok(value),
            CallOutcome::Unauthenticated => Err(ClientError::Unauthenticated),
            CallOutcome::SessionInvalid => Err(ClientError::SessionInvalid),
            CallOutcome::Failure(message) => Err(ClientError::Failure(message)),
            CallOutcome::NetworkError(message) => Err(ClientError::Network(message)),
        }
    }
}

/// First of `keys` holding a non-empty string.
pub fn message_from_body<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|message| !message.is_empty())
}

fn is_invalid_token_body(body: &Value) -> bool {
    body.get("error").and_then(Value::as_str) == Some(INVALID_TOKEN_SENTINEL)
}

/// Classify a completed exchange.
///
/// Session invalidation only applies to bearer-required requests: on the
/// public login and register calls a 401 means wrong credentials and is a
/// plain failure.
pub fn classify(request: &ApiRequest, response: &RawResponse) -> CallOutcome<Value> {
    if request.requires_auth && response.status == 401 {
        return CallOutcome::SessionInvalid;
    }

    let body = if response.body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "[Api] Unreadable body from {} {} ({}): {}",
                    request.method, request.path, response.status, e
                );
                return CallOutcome::Failure(request.failure_message.clone());
            }
        }
    };

    if request.requires_auth && is_invalid_token_body(&body) {
        return CallOutcome::SessionInvalid;
    }

    if !response.is_success() {
        let message = message_from_body(&body, request.message_keys)
            .map(str::to_string)
            .unwrap_or_else(|| request.failure_message.clone());
        return CallOutcome::Failure(message);
    }

    CallOutcome::Success(body)
}

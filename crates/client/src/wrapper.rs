//! Remote call wrapper: one place that attaches the session token, sends,
//! classifies, and purges the token when the backend rejects it.

use std::sync::Arc;

use ivss_core::{SessionField, SessionStore};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::outcome::{classify, CallOutcome};
use crate::transport::{ApiRequest, HttpTransport};

#[derive(Clone)]
pub struct RemoteCaller {
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
}

impl std::fmt::Debug for RemoteCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCaller")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl RemoteCaller {
    pub fn new(transport: Arc<dyn HttpTransport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Execute `request` and classify the response.
    ///
    /// A bearer-required request without a cached token returns
    /// `Unauthenticated` without touching the network. `SessionInvalid`
    /// clears the cached token before returning.
    pub async fn call(&self, request: &ApiRequest) -> CallOutcome<Value> {
        let token = self.session.token();
        if request.requires_auth && token.is_none() {
            debug!(
                "[Api] No token for {} {}, skipping request",
                request.method, request.path
            );
            return CallOutcome::Unauthenticated;
        }

        let response = match self.transport.send(request, token.as_deref()).await {
            Ok(response) => response,
            Err(ClientError::Network(message)) => {
                warn!(
                    "[Api] {} {} failed: {}",
                    request.method, request.path, message
                );
                return CallOutcome::NetworkError(message);
            }
            Err(e) => return CallOutcome::Failure(e.to_string()),
        };

        let outcome = classify(request, &response);
        if matches!(outcome, CallOutcome::SessionInvalid) {
            warn!(
                "[Session] Token rejected by {} {}, clearing it",
                request.method, request.path
            );
            if let Err(e) = self.session.clear(SessionField::Token) {
                warn!("[Session] Failed to clear token: {}", e);
            }
        }
        outcome
    }

    /// `call`, then decode a successful body into `T`. A body of the wrong
    /// shape becomes a `Failure` with the request's fallback message.
    pub async fn call_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> CallOutcome<T> {
        match self.call(request).await {
            CallOutcome::Success(body) => match serde_json::from_value::<T>(body) {
                Ok(value) => CallOutcome::Success(value),
                Err(e) => {
                    error!(
                        "[Api] Failed to decode response from {} {}: {}",
                        request.method, request.path, e
                    );
                    CallOutcome::Failure(request.failure_message.clone())
                }
            },
            CallOutcome::Unauthenticated => CallOutcome::Unauthenticated,
            CallOutcome::SessionInvalid => CallOutcome::SessionInvalid,
            CallOutcome::Failure(message) => CallOutcome::Failure(message),
            CallOutcome::NetworkError(message) => CallOutcome::NetworkError(message),
        }
    }
}

//! ARCO data-rights requests.

use ivss_core::arco::{ArcoRecord, ArcoRequestForm};
use log::info;
use serde_json::Value;

use crate::error::Result;
use crate::services::ServiceContext;
use crate::transport::ApiRequest;
use crate::types::ArcoListResponse;

const LIST_PATH: &str = "/api/arco/listar";
const SUBMIT_PATH: &str = "/api/arco/registrar";

const SUBMITTED_MESSAGE: &str = "Request submitted";

/// The ARCO endpoints put their human-readable text in `mensaje`.
const ARCO_MESSAGE_KEYS: &[&str] = &["mensaje", "error"];

#[derive(Debug, Clone)]
pub struct ArcoService {
    ctx: ServiceContext,
}

impl ArcoService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list_requests(&self) -> Result<Vec<ArcoRecord>> {
        let request = ApiRequest::get(LIST_PATH)
            .failure_message("Could not load requests")
            .message_keys(ARCO_MESSAGE_KEYS);
        let response: ArcoListResponse = self.ctx.caller().call_json(&request).await.into_result()?;
        Ok(response.data)
    }

    /// Submit a new request and return the backend's confirmation text.
    pub async fn submit_request(&self, form: ArcoRequestForm) -> Result<String> {
        let payload = form.into_request()?;
        let request = ApiRequest::post(SUBMIT_PATH)
            .failure_message("Could not submit the request")
            .message_keys(ARCO_MESSAGE_KEYS)
            .json(&payload)?;

        let body = self.ctx.caller().call(&request).await.into_result()?;
        info!("[Arco] Request submitted");

        Ok(body
            .get("mensaje")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(SUBMITTED_MESSAGE)
            .to_string())
    }
}

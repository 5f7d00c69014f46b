//! HTTP client for the IVSS backend.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, HttpTransport, RawResponse};

const MAX_LOG_BODY_CHARS: usize = 512;

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct IvssClient {
    client: reqwest::Client,
    base_url: String,
}

impl IvssClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::failure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn headers(&self, token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::failure("Invalid access token format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    fn log_response(request: &ApiRequest, status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("[Api] {} {} -> {}", request.method, request.path, status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!(
            "[Api] {} {} -> {}: {}",
            request.method, request.path, status, preview
        );
    }
}

#[async_trait]
impl HttpTransport for IvssClient {
    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<RawResponse> {
        let url = self.url(&request.path);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(self.headers(token)?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;
        Self::log_response(request, status, &body);

        Ok(RawResponse::new(status.as_u16(), body))
    }
}

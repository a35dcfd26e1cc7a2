//! HTTP transport for endpoint calls

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::{InvokeError, TesterResult};
use crate::traits::ApiInvoker;
use crate::types::{ApiRequest, ApiResponse};

/// Real API invoker backed by one shared reqwest client
pub struct RealApiInvoker {
    client: reqwest::Client,
}

impl RealApiInvoker {
    pub fn new() -> TesterResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ApiInvoker for RealApiInvoker {
    async fn invoke(&self, request: &ApiRequest, deadline: Duration) -> Result<ApiResponse, InvokeError> {
        // Body first: a bad body is reported ahead of a bad URL
        let payload = request
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| InvokeError::Serialization { message: e.to_string() })?;

        let url = reqwest::Url::parse(&request.url).map_err(|e| InvokeError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .timeout(deadline)
            .header(AUTHORIZATION, format!("Bearer {}", request.bearer_token));

        if let Some(payload) = payload {
            builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
        }

        debug!(method = %request.method, url = %request.url, with_body = request.body.is_some(), "Sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                InvokeError::DeadlineExceeded(deadline)
            } else {
                InvokeError::Transport { message: e.to_string() }
            }
        })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        // Drains the body so the connection is released on every status
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                InvokeError::DeadlineExceeded(deadline)
            } else {
                InvokeError::ReadBody { message: e.to_string() }
            }
        })?;

        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut collected: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected.entry(name.as_str().to_string()).or_default().push(value);
    }
    collected
}

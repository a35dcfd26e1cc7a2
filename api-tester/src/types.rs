//! Tester data types

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::HttpMethod;

/// JSON object sent as a request body
pub type RequestBody = Map<String, Value>;

/// Default per-stage deadline
pub const DEFAULT_STAGE_DEADLINE: Duration = Duration::from_secs(30);

/// Client-credentials set used to acquire a bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    /// Tenant identifier, or a full authority URL
    pub tenant_id: String,
    pub scope: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("scope", &self.scope)
            .finish()
    }
}

/// A validated endpoint definition
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub credentials: Credentials,
    pub request_body: Option<RequestBody>,
}

impl Endpoint {
    /// The body to send, if the method carries one
    ///
    /// A body configured on GET or DELETE is ignored without error.
    pub fn body_for_request(&self) -> Option<&RequestBody> {
        if self.method.allows_body() {
            self.request_body.as_ref()
        } else {
            None
        }
    }
}

/// One outgoing API call
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer_token: String,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    /// Build the call for an endpoint, applying the body rule
    pub fn for_endpoint(endpoint: &Endpoint, bearer_token: String) -> Self {
        Self {
            method: endpoint.method,
            url: endpoint.url.clone(),
            bearer_token,
            body: endpoint.body_for_request().cloned(),
        }
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// A completed HTTP exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Status code in [200, 300)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON; an empty body is an error
    pub fn body_as_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.is_empty() {
            return Err(serde::de::Error::custom("empty response body"));
        }
        serde_json::from_slice(&self.body)
    }
}

/// Independent deadlines for the two blocking stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDeadlines {
    pub auth: Duration,
    pub request: Duration,
}

impl Default for StageDeadlines {
    fn default() -> Self {
        Self {
            auth: DEFAULT_STAGE_DEADLINE,
            request: DEFAULT_STAGE_DEADLINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint(method: HttpMethod, body: Option<Value>) -> Endpoint {
        Endpoint {
            name: "Test".to_string(),
            url: "https://api.example.com".to_string(),
            method,
            credentials: Credentials {
                client_id: "client-id".to_string(),
                client_secret: "super-secret".to_string(),
                tenant_id: "tenant".to_string(),
                scope: "scope".to_string(),
            },
            request_body: body.and_then(|v| v.as_object().cloned()),
        }
    }

    #[test]
    fn test_body_attached_only_for_body_methods() {
        let body = json!({"key1": "value1", "key2": 123});
        for method in HttpMethod::ALL {
            let ep = endpoint(method, Some(body.clone()));
            let request = ApiRequest::for_endpoint(&ep, "token".to_string());
            assert_eq!(request.body.is_some(), method.allows_body(), "{method}");
        }
    }

    #[test]
    fn test_no_body_configured_means_no_body() {
        let ep = endpoint(HttpMethod::Post, None);
        assert!(ApiRequest::for_endpoint(&ep, "token".to_string()).body.is_none());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let ep = endpoint(HttpMethod::Get, None);
        let request = ApiRequest::for_endpoint(&ep, "eyJ-secret-token".to_string());
        let rendered = format!("{ep:?} {request:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("eyJ-secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_status_boundaries() {
        let at = |status| ApiResponse { status, ..Default::default() }.is_success();
        assert!(!at(199));
        assert!(at(200));
        assert!(at(299));
        assert!(!at(300));
    }

    #[test]
    fn test_body_accessors() {
        let response = ApiResponse {
            status: 200,
            headers: HashMap::new(),
            body: br#"{"message":"ok"}"#.to_vec(),
        };
        assert_eq!(response.body_as_string(), r#"{"message":"ok"}"#);
        let value: Value = response.body_as_json().unwrap();
        assert_eq!(value["message"], "ok");

        let empty = ApiResponse::default();
        assert!(empty.body_as_json::<Value>().is_err());
        assert_eq!(empty.body_as_string(), "");
    }
}

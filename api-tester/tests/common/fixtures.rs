//! Test fixtures and sample data

use std::io::Write;

use api_tester::{ApiResponse, Credentials, Endpoint, RequestBody};
use serde_json::{json, Value};
use shared::HttpMethod;
use tempfile::NamedTempFile;

/// Test data fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub fn credentials() -> Credentials {
        Credentials {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            tenant_id: "test-tenant".to_string(),
            scope: "api://test/.default".to_string(),
        }
    }

    pub fn endpoint(name: &str, method: HttpMethod, url: &str) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            url: url.to_string(),
            method,
            credentials: Self::credentials(),
            request_body: None,
        }
    }

    pub fn get_endpoint(name: &str) -> Endpoint {
        Self::endpoint(name, HttpMethod::Get, "https://api.example.com/health")
    }

    pub fn endpoint_with_body(name: &str, method: HttpMethod) -> Endpoint {
        Endpoint {
            request_body: Some(Self::sample_body()),
            ..Self::endpoint(name, method, "https://api.example.com/items")
        }
    }

    /// `{"key1":"value1","key2":123}`
    pub fn sample_body() -> RequestBody {
        match json!({"key1": "value1", "key2": 123}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    pub fn response(status: u16) -> ApiResponse {
        ApiResponse {
            status,
            ..Default::default()
        }
    }

    pub fn response_with_body(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: body.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    /// One endpoint entry as written in a configuration file
    pub fn endpoint_json(name: &str, method: &str, url: &str) -> Value {
        json!({
            "name": name,
            "url": url,
            "method": method,
            "clientId": "test-client",
            "clientSecret": "test-secret",
            "tenantId": "test-tenant",
            "scope": "api://test/.default"
        })
    }

    pub fn config_file(config: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_string().as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

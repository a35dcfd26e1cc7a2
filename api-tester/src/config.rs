//! Endpoint configuration loading and validation
//!
//! The configuration file is JSON:
//!
//! ```json
//! {
//!   "endpoints": [
//!     {
//!       "name": "Orders API",
//!       "url": "https://api.example.com/orders",
//!       "method": "POST",
//!       "clientId": "...",
//!       "clientSecret": "...",
//!       "tenantId": "...",
//!       "scope": "api://orders/.default",
//!       "requestBody": { "key": "value" }
//!     }
//!   ]
//! }
//! ```
//!
//! The whole list is validated before anything is tested. The first invalid
//! endpoint fails the load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::HttpMethod;

use crate::error::{ConfigError, EndpointError};
use crate::types::{Credentials, Endpoint, RequestBody};

/// Conventional configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Raw configuration file contents
///
/// The `endpoints` key matches case-insensitively; `null` reads as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct TesterConfig {
    pub endpoints: Vec<EndpointConfig>,
}

/// One endpoint as written in the configuration file
///
/// Keys match case-insensitively, so `clientId`, `clientID` and `ClientId`
/// all load. A `null` string field reads as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
    pub method: String,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub scope: String,
    pub request_body: Option<RequestBody>,
}

impl TryFrom<Map<String, Value>> for TesterConfig {
    type Error = String;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut config = TesterConfig::default();
        for (key, value) in raw {
            if !key.eq_ignore_ascii_case("endpoints") {
                continue;
            }
            config.endpoints = match value {
                Value::Null => Vec::new(),
                value => serde_json::from_value(value).map_err(|e| format!("{key}: {e}"))?,
            };
        }
        Ok(config)
    }
}

impl TryFrom<Map<String, Value>> for EndpointConfig {
    type Error = String;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut endpoint = EndpointConfig::default();
        for (key, value) in raw {
            let field = match key.to_ascii_lowercase().as_str() {
                "name" => &mut endpoint.name,
                "url" => &mut endpoint.url,
                "method" => &mut endpoint.method,
                "clientid" => &mut endpoint.client_id,
                "clientsecret" => &mut endpoint.client_secret,
                "tenantid" => &mut endpoint.tenant_id,
                "scope" => &mut endpoint.scope,
                "requestbody" => {
                    endpoint.request_body = match value {
                        Value::Null => None,
                        Value::Object(body) => Some(body),
                        other => return Err(format!("{key}: expected a JSON object, found {other}")),
                    };
                    continue;
                }
                // Unknown keys are ignored
                _ => continue,
            };

            *field = match value {
                Value::Null => String::new(),
                Value::String(text) => text,
                other => return Err(format!("{key}: expected a string, found {other}")),
            };
        }
        Ok(endpoint)
    }
}

/// Load, validate and convert the configuration at `path`
pub fn load_config(path: impl AsRef<Path>) -> Result<Vec<Endpoint>, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let config: TesterConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    config.into_endpoints()
}

impl TesterConfig {
    /// Check every endpoint; fails on an empty list or the first invalid entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            endpoint.validate().map_err(|source| ConfigError::InvalidEndpoint {
                index,
                name: endpoint.name.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Validate, then convert into endpoint definitions in declaration order
    pub fn into_endpoints(self) -> Result<Vec<Endpoint>, ConfigError> {
        self.validate()?;

        self.endpoints
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let name = raw.name.clone();
                raw.into_endpoint()
                    .map_err(|source| ConfigError::InvalidEndpoint { index, name, source })
            })
            .collect()
    }
}

impl EndpointConfig {
    /// Check required fields and the HTTP method
    pub fn validate(&self) -> Result<(), EndpointError> {
        require("name", &self.name)?;
        require("url", &self.url)?;
        require("method", &self.method)?;
        self.method.parse::<HttpMethod>()?;
        require("clientId", &self.client_id)?;
        require("clientSecret", &self.client_secret)?;
        require("tenantId", &self.tenant_id)?;
        require("scope", &self.scope)?;
        Ok(())
    }

    pub fn into_endpoint(self) -> Result<Endpoint, EndpointError> {
        self.validate()?;
        let method = self.method.parse::<HttpMethod>()?;

        Ok(Endpoint {
            name: self.name,
            url: self.url,
            method,
            credentials: Credentials {
                client_id: self.client_id,
                client_secret: self.client_secret,
                tenant_id: self.tenant_id,
                scope: self.scope,
            },
            request_body: self.request_body,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), EndpointError> {
    if value.is_empty() {
        Err(EndpointError::MissingField { field })
    } else {
        Ok(())
    }
}

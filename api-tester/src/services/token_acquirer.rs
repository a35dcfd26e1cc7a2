//! OAuth 2.0 client-credentials token acquisition
//!
//! Posts the client-credentials grant to an Entra ID style v2.0 token
//! endpoint:
//!
//! - `<authority_host>/<tenant>/oauth2/v2.0/token` for a bare tenant id
//! - `<authority>/oauth2/v2.0/token` when the tenant is itself an URL
//!
//! No token is cached; every call performs a fresh grant.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AuthError, TesterResult};
use crate::traits::TokenAcquirer;
use crate::types::Credentials;

/// Public Entra ID authority host
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

const TOKEN_PATH: &str = "oauth2/v2.0/token";

/// Successful token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// Error body returned by the identity provider
#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Real token acquirer talking to the identity provider over HTTPS
pub struct RealTokenAcquirer {
    client: reqwest::Client,
    authority_host: String,
}

impl RealTokenAcquirer {
    /// Create an acquirer against the public Entra ID authority
    pub fn new() -> TesterResult<Self> {
        Self::with_authority_host(DEFAULT_AUTHORITY_HOST)
    }

    /// Create an acquirer against another authority host (sovereign clouds, test servers)
    pub fn with_authority_host(authority_host: impl Into<String>) -> TesterResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            authority_host: authority_host.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn authority_host(&self) -> &str {
        &self.authority_host
    }

    /// Token endpoint for a tenant id or authority URL
    pub fn token_url(&self, tenant: &str) -> String {
        if tenant.starts_with("https://") || tenant.starts_with("http://") {
            format!("{}/{TOKEN_PATH}", tenant.trim_end_matches('/'))
        } else {
            format!("{}/{}/{TOKEN_PATH}", self.authority_host, tenant)
        }
    }
}

#[async_trait]
impl TokenAcquirer for RealTokenAcquirer {
    async fn acquire_token(&self, credentials: &Credentials, deadline: Duration) -> Result<String, AuthError> {
        check_present(credentials)?;

        let token_url = self.token_url(&credentials.tenant_id);
        debug!(url = %token_url, client_id = %credentials.client_id, "Requesting client-credentials token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", credentials.scope.as_str()),
        ];

        let response = self
            .client
            .post(&token_url)
            .timeout(deadline)
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(e, deadline))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(e, deadline))?;

        if !status.is_success() {
            let error: TokenErrorResponse = serde_json::from_slice(&body).unwrap_or_default();
            let description = error
                .error_description
                .or(error.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                description,
            });
        }

        let token: TokenResponse = serde_json::from_slice(&body).map_err(|e| AuthError::InvalidResponse {
            message: e.to_string(),
        })?;

        if token.access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(token.access_token)
    }
}

fn check_present(credentials: &Credentials) -> Result<(), AuthError> {
    let fields = [
        ("client_id", &credentials.client_id),
        ("client_secret", &credentials.client_secret),
        ("tenant_id", &credentials.tenant_id),
        ("scope", &credentials.scope),
    ];

    match fields.into_iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(AuthError::MissingParameter { field }),
        None => Ok(()),
    }
}

fn transport_error(error: reqwest::Error, deadline: Duration) -> AuthError {
    if error.is_timeout() {
        AuthError::DeadlineExceeded(deadline)
    } else {
        AuthError::Transport {
            message: error.to_string(),
        }
    }
}

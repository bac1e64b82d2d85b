//! Per-tenant credential resolution and token exchange.
//!
//! Credentials live in environment variables as a `;`-delimited 3-tuple
//! (`directoryId;clientId;secretValue`), one variable per tenant. The token
//! exchange is a single-attempt OAuth2 client-credential POST; a failed
//! exchange skips the tenant for this cycle only.

use serde::Deserialize;

use crate::connectors::errors::ConnectorError;

/// Resolved 3-part API credential tuple for one tenant.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub directory_id: String,
    pub client_id: String,
    pub secret: String,
}

impl ApiCredentials {
    /// Resolve credentials from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, ConnectorError> {
        let raw = std::env::var(var).map_err(|_| ConnectorError::MissingCredentials {
            var: var.to_string(),
        })?;
        Self::parse(var, &raw)
    }

    /// Parse a raw `directoryId;clientId;secretValue` string.
    pub fn parse(var: &str, raw: &str) -> Result<Self, ConnectorError> {
        let parts: Vec<&str> = raw.split(';').collect();
        match parts.as_slice() {
            [directory_id, client_id, secret]
                if !directory_id.is_empty() && !client_id.is_empty() && !secret.is_empty() =>
            {
                Ok(Self {
                    directory_id: directory_id.to_string(),
                    client_id: client_id.to_string(),
                    secret: secret.to_string(),
                })
            }
            parts => Err(ConnectorError::MalformedCredentials {
                var: var.to_string(),
                found: parts.iter().filter(|p| !p.is_empty()).count(),
            }),
        }
    }
}

/// Raw JSON returned by the identity provider's `/token` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Error body the identity provider returns on a rejected exchange.
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

/// Perform the client-credential token exchange and return the bearer token.
///
/// Single attempt, no retry; the shared client's bounded timeout applies.
pub async fn authenticate(
    http: &reqwest::Client,
    auth_endpoint: &str,
    scope: &str,
    credentials: &ApiCredentials,
) -> Result<String, ConnectorError> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        auth_endpoint.trim_end_matches('/'),
        credentials.directory_id
    );

    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.secret.as_str()),
        ("scope", scope),
    ];

    let response = http.post(&url).form(&params).send().await?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<TokenErrorBody>(&body)
            .ok()
            .and_then(|b| b.error_description.or(b.error))
            .unwrap_or(body);
        return Err(ConnectorError::AuthRejected(description));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;

    Ok(token.access_token)
}

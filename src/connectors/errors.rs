/// Errors that can occur while talking to the identity provider or the
/// health endpoint, plus the credential-resolution failures that precede
/// them.
///
/// Credential variants are configuration-scope (the tenant is skipped every
/// cycle until fixed); the rest are transient-remote (the tenant is skipped
/// for the current cycle only). Neither ever aborts sibling tenants.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Credential environment variable is not set.
    #[error("credential variable [{var}] is not set")]
    MissingCredentials { var: String },
    /// Credential value does not split into directory id, client id, secret.
    #[error(
        "credential variable [{var}] is malformed: expected 3 `;`-separated fields, found {found}"
    )]
    MalformedCredentials { var: String, found: usize },
    /// The identity provider rejected the token exchange.
    #[error("authentication failed: {0}")]
    AuthRejected(String),
    /// Service unreachable or timed out.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Other HTTP transport failure.
    #[error("request failed: {0}")]
    Request(String),
    /// The remote answered with a non-success status.
    #[error("unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// Response body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ConnectorError {
    /// True for errors caused by local configuration rather than the remote.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. } | Self::MalformedCredentials { .. }
        )
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ServiceUnavailable(format!("request timeout: {}", err))
        } else if err.is_connect() {
            Self::ServiceUnavailable(format!("connection failed: {}", err))
        } else {
            Self::Request(err.to_string())
        }
    }
}

use thiserror::Error;

/// Errors returned by the HR service RPC client.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status} for action {action}")]
    UnexpectedStatus { status: u16, action: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed but carried values the client cannot use.
    #[error("invalid response for {action}: {reason}")]
    InvalidResponse { action: String, reason: String },

    #[error("invalid server URL \"{url}\": {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

impl RpcError {
    /// `true` when the request never produced a usable HTTP exchange
    /// (connect failure, timeout, reset).
    #[must_use]
    pub fn is_network(&self) -> bool {
        match self {
            RpcError::Http(e) => e.status().is_none(),
            _ => false,
        }
    }
}

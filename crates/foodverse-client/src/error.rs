use thiserror::Error;

/// Errors returned by the FoodVerse API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401: the stored token is missing, expired or revoked.
    #[error("not authenticated: log in again")]
    Unauthorized,

    /// Any other non-2xx response. `message` is the API's `error` field when
    /// it sent one, otherwise the raw body.
    #[error("API error {status} from {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// A request was refused locally before being sent.
    #[error("invalid request: {0}")]
    InvalidInput(String),
}

impl ClientError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

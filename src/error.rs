//! Error types for the Coinbase Exchange client library.

use thiserror::Error;

/// The main error type for all client operations.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// WebSocket communication error (with message)
    #[error("WebSocket error: {0}")]
    WebSocketMsg(String),

    /// The server closed the WebSocket feed
    #[error("WebSocket closed by server ({code}): {reason}")]
    RemoteClose {
        /// Close status code sent by the server
        code: u16,
        /// Close reason sent by the server
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The API secret is not valid base64
    #[error("API secret must be valid base64: {0}")]
    InvalidSecretEncoding(#[from] base64::DecodeError),

    /// The request path could not be extracted from the URL
    #[error("Malformed request URL {url:?}: {reason}")]
    MalformedUrl {
        /// The offending URL
        url: String,
        /// Why no request path could be extracted
        reason: String,
    },

    /// The exchange returned a non-success HTTP status
    #[error("Exchange API error: {0}")]
    Api(ApiError),

    /// A request could not be built from the supplied arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing required credentials
    #[error("Missing credentials: API key, secret and passphrase required for private endpoints")]
    MissingCredentials,

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExchangeError {
    /// Whether this error came from the HTTP transport rather than the exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpMiddleware(_))
    }

    /// Whether this error was raised while signing a request.
    pub fn is_signing(&self) -> bool {
        matches!(self, Self::InvalidSecretEncoding(_) | Self::MalformedUrl { .. })
    }

    pub(crate) fn malformed_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// An error reported by the exchange in a non-2xx response.
///
/// The exchange returns errors as `{"message": "..."}` together with an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response
    pub status: u16,
    /// Message from the response body (or the raw body if it was not JSON)
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl ApiError {
    /// Create a new API error from status and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Parse an API error from a response body.
    ///
    /// Falls back to the raw body when it is not the `{"message": ...}` shape.
    pub fn from_body(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::new(status, parsed.message),
            Err(_) => Self::new(status, body.trim()),
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.status == 429
    }

    /// Check if the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if the exchange rejected the request signature.
    pub fn is_invalid_signature(&self) -> bool {
        self.message.to_ascii_lowercase().contains("invalid signature")
    }

    /// Check if the request timestamp was outside the accepted window.
    pub fn is_expired_timestamp(&self) -> bool {
        self.message.to_ascii_lowercase().contains("request timestamp expired")
    }
}

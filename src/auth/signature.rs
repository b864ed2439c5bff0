//! HMAC-SHA256 signature generation for Coinbase Exchange API authentication.
//!
//! Private endpoints require a signature computed as:
//! ```text
//! base64(HMAC-SHA256(base64_decode(api_secret), timestamp + METHOD + request_path + body))
//! ```
//!
//! `request_path` is the URL path plus query string, and `body` is the exact
//! JSON text sent on the wire (empty for requests without a body). The
//! signature travels in `CB-ACCESS-SIGN` next to the key, timestamp and
//! passphrase headers.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::auth::{Clock, Credentials};
use crate::error::ExchangeError;
use crate::rest::{RequestDescriptor, SignedRequest};
use crate::types::Method;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key.
pub const CB_ACCESS_KEY: &str = "CB-ACCESS-KEY";
/// Header carrying the base64 signature.
pub const CB_ACCESS_SIGN: &str = "CB-ACCESS-SIGN";
/// Header carrying the signing timestamp in seconds.
pub const CB_ACCESS_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
/// Header carrying the API passphrase.
pub const CB_ACCESS_PASSPHRASE: &str = "CB-ACCESS-PASSPHRASE";

/// Build the string that is signed.
///
/// The parts are concatenated with no separators.
pub fn prehash(timestamp: u64, method: Method, request_path: &str, body: &str) -> String {
    format!("{}{}{}{}", timestamp, method.as_str(), request_path, body)
}

/// Extract the signed request path (path plus query) from an absolute URL.
///
/// ```rust
/// use coinbase_exchange_client::auth::request_path;
///
/// let path = request_path("https://api.exchange.coinbase.com/orders?status=open").unwrap();
/// assert_eq!(path, "/orders?status=open");
///
/// // Hosts outside `.com` work too.
/// let path = request_path("https://api-public.sandbox.example.io/accounts").unwrap();
/// assert_eq!(path, "/accounts");
///
/// assert!(request_path("/accounts").is_err());
/// ```
pub fn request_path(url: &str) -> Result<String, ExchangeError> {
    let parsed = Url::parse(url).map_err(|e| ExchangeError::malformed_url(url, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https" | "ws" | "wss") {
        return Err(ExchangeError::malformed_url(
            url,
            format!("unsupported scheme {:?}", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ExchangeError::malformed_url(url, "URL has no host"));
    }

    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }
    Ok(path)
}

/// Compute the base64 `CB-ACCESS-SIGN` value.
///
/// # Example
///
/// ```rust
/// use coinbase_exchange_client::auth::{Credentials, compute_signature};
/// use coinbase_exchange_client::Method;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "YXBpX3NlY3JldA==", "passphrase"); // base64 of "api_secret"
/// let signature = compute_signature(&credentials, 1_700_000_000, Method::Get, "/accounts", "")?;
/// assert_eq!(signature.len(), 44);
/// # Ok(())
/// # }
/// ```
pub fn compute_signature(
    credentials: &Credentials,
    timestamp: u64,
    method: Method,
    request_path: &str,
    body: &str,
) -> Result<String, ExchangeError> {
    let secret_decoded = credentials.decoded_secret()?;

    let mut hmac = HmacSha256::new_from_slice(&secret_decoded)
        .map_err(|e| ExchangeError::InvalidRequest(format!("Invalid HMAC key: {e}")))?;
    hmac.update(prehash(timestamp, method, request_path, body).as_bytes());
    let hmac_result = hmac.finalize().into_bytes();

    Ok(BASE64.encode(hmac_result))
}

/// Sign a request descriptor.
///
/// Reads the clock once, computes the signature over the descriptor's method,
/// request path and body, and returns the descriptor with the four
/// authentication headers attached.
pub fn sign_request(
    request: RequestDescriptor,
    credentials: &Credentials,
    clock: &dyn Clock,
) -> Result<SignedRequest, ExchangeError> {
    let path = request_path(request.url())?;
    let timestamp = clock.unix_seconds();
    let signature = compute_signature(
        credentials,
        timestamp,
        request.method(),
        &path,
        request.body_str(),
    )?;

    tracing::trace!(method = %request.method(), path = %path, timestamp, "signed request");

    let request = request
        .with_header(CB_ACCESS_KEY, credentials.api_key.as_str())
        .with_header(CB_ACCESS_SIGN, signature)
        .with_header(CB_ACCESS_TIMESTAMP, timestamp.to_string())
        .with_header(CB_ACCESS_PASSPHRASE, credentials.expose_passphrase());

    Ok(SignedRequest::new(request, timestamp))
}

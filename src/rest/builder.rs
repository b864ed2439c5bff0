//! Construction of unsigned request descriptors.
//!
//! Endpoint-specific constructors live next to their response types in
//! [`crate::rest::private`] and [`crate::rest::public`]; this module holds the
//! shared URL, identifier and body handling.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::ExchangeError;
use crate::rest::endpoints::PRODUCTION_REST_URL;
use crate::rest::request::QueryParams;

/// Builds unsigned [`RequestDescriptor`](crate::rest::RequestDescriptor)s for every REST endpoint.
///
/// The builder performs no I/O; its output can be signed and sent by
/// [`RestClient`](crate::rest::RestClient) or inspected directly.
///
/// ```rust
/// use coinbase_exchange_client::rest::RequestBuilder;
/// use coinbase_exchange_client::OrderStatus;
///
/// let requests = RequestBuilder::new("https://api.exchange.coinbase.com");
/// let request = requests
///     .get_orders(None, &[OrderStatus::Open, OrderStatus::Pending], &Default::default())
///     .unwrap();
/// assert_eq!(
///     request.url(),
///     "https://api.exchange.coinbase.com/orders?status=open&status=pending"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    base_url: String,
}

impl RequestBuilder {
    /// Create a builder for the given REST base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute endpoint URL.
    ///
    /// `segments` are appended after `path` and percent-escaped individually, so
    /// identifiers cannot introduce extra path components.
    pub(crate) fn url(
        &self,
        path: &str,
        segments: &[&str],
        query: Option<&QueryParams>,
    ) -> Result<String, ExchangeError> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut path_segments = url.path_segments_mut().map_err(|_| {
                ExchangeError::malformed_url(&self.base_url, "base URL cannot carry a path")
            })?;
            path_segments.pop_if_empty();
            path_segments.extend(path.trim_start_matches('/').split('/'));
            path_segments.extend(segments);
        }

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.set_query(Some(&query.encode()?));
        }

        Ok(url.into())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(PRODUCTION_REST_URL)
    }
}

/// Reject empty identifiers before they turn into a different endpoint.
pub(crate) fn require_id<'a>(kind: &str, id: &'a str) -> Result<&'a str, ExchangeError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ExchangeError::InvalidRequest(format!("{kind} id must not be empty")));
    }
    Ok(id)
}

/// Normalize a product or currency identifier (`btc-usd` -> `BTC-USD`).
pub(crate) fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

/// Merge caller options with the fields an operation requires.
///
/// Required fields are inserted last and replace any caller value for the same key.
pub(crate) fn merge_body<T: Serialize + ?Sized>(
    options: &T,
    required: impl IntoIterator<Item = (&'static str, Value)>,
) -> Result<Map<String, Value>, ExchangeError> {
    let mut body = match serde_json::to_value(options)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ExchangeError::InvalidRequest(format!(
                "request options must serialize to a JSON object, got {other}"
            )));
        }
    };

    for (key, value) in required {
        body.insert(key.to_string(), value);
    }

    Ok(body)
}

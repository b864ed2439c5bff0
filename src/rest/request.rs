//! Request descriptors: HTTP requests described before and after signing.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ExchangeError;
use crate::types::Method;

/// An HTTP request prior to signing.
///
/// The body is stored already serialized so the bytes that are signed are
/// exactly the bytes that are transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    body: Option<String>,
    headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Create a descriptor for an absolute URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: BTreeMap::new(),
        }
    }

    /// Create a GET descriptor.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Create a POST descriptor.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Create a DELETE descriptor.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Serialize `body` as JSON and attach it with a JSON content type.
    pub fn with_json_body<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ExchangeError> {
        let body = serde_json::to_string(body)?;
        Ok(self
            .with_raw_body(body)
            .with_header("Content-Type", "application/json"))
    }

    /// Attach an already-serialized body.
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The absolute URL, including any query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The serialized body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// The body as it appears in the signature prehash (empty when absent).
    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Headers set on the descriptor.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// A request carrying the four `CB-ACCESS-*` authentication headers.
///
/// The signature covers the exact (timestamp, method, path, body) tuple of the
/// wrapped descriptor. There are no mutators: a signed request can only be
/// read or sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    request: RequestDescriptor,
    timestamp: u64,
}

impl SignedRequest {
    pub(crate) fn new(request: RequestDescriptor, timestamp: u64) -> Self {
        Self { request, timestamp }
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.request.method
    }

    /// The absolute URL.
    pub fn url(&self) -> &str {
        &self.request.url
    }

    /// The signed body, if any.
    pub fn body(&self) -> Option<&str> {
        self.request.body()
    }

    /// All headers, authentication headers included.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.request.headers
    }

    /// Look up a single header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.headers.get(name).map(String::as_str)
    }

    /// The timestamp the signature was computed with.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Ordered query parameters.
///
/// Keys may repeat; pairs are encoded in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Append a parameter if a value is present.
    pub fn push_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append one `key=value` pair per value, keeping input order.
    pub fn push_each<I, T>(&mut self, key: &'static str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        for value in values {
            self.push(key, value);
        }
        self
    }

    /// Whether no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `key=value` pairs joined by `&`.
    pub fn encode(&self) -> Result<String, ExchangeError> {
        serde_urlencoded::to_string(&self.pairs)
            .map_err(|e| ExchangeError::InvalidRequest(format!("Failed to encode query: {e}")))
    }
}

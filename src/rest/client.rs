//! Coinbase Exchange REST API client implementation.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::auth::{Clock, CredentialsProvider, SystemClock, sign_request};
use crate::error::{ApiError, ExchangeError};
use crate::rest::builder::RequestBuilder;
use crate::rest::endpoints::{PRODUCTION_REST_URL, SANDBOX_REST_URL};
use crate::rest::request::{RequestDescriptor, SignedRequest};
use crate::types::Method;

/// Response header carrying the cursor for newer results.
const CB_BEFORE: &str = "CB-BEFORE";
/// Response header carrying the cursor for older results.
const CB_AFTER: &str = "CB-AFTER";

/// The Coinbase Exchange REST API client.
///
/// Every private endpoint method builds a descriptor with the client's
/// [`RequestBuilder`], signs it with the configured credentials and clock, and
/// dispatches it with [`RestClient::send`].
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_exchange_client::rest::RestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints need no credentials
///     let client = RestClient::new();
///     let products = client.list_products().await?;
///     println!("{} products", products.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RestClient {
    http_client: ClientWithMiddleware,
    requests: RequestBuilder,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    clock: Arc<dyn Clock>,
}

impl RestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints.
    /// Use [`RestClient::builder()`] to configure credentials for private endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    /// The request builder used for every endpoint.
    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Sign a descriptor with the configured credentials and clock.
    pub fn sign(&self, request: RequestDescriptor) -> Result<SignedRequest, ExchangeError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ExchangeError::MissingCredentials)?;
        sign_request(request, credentials.get_credentials(), self.clock.as_ref())
    }

    /// Send a signed request and return the raw response.
    ///
    /// Headers and body are transmitted exactly as signed. Transport failures
    /// are returned unchanged; HTTP error statuses are not inspected here.
    pub async fn send(&self, request: SignedRequest) -> Result<reqwest::Response, ExchangeError> {
        self.dispatch(request.method(), request.url(), request.headers().iter(), request.body())
            .await
    }

    /// Send a descriptor without authentication (public endpoints).
    pub async fn send_unsigned(
        &self,
        request: RequestDescriptor,
    ) -> Result<reqwest::Response, ExchangeError> {
        self.dispatch(request.method(), request.url(), request.headers().iter(), request.body())
            .await
    }

    async fn dispatch<'a>(
        &self,
        method: Method,
        url: &str,
        headers: impl Iterator<Item = (&'a String, &'a String)>,
        body: Option<&str>,
    ) -> Result<reqwest::Response, ExchangeError> {
        tracing::debug!(%method, url, "dispatching request");

        let mut builder = self.http_client.request(method.into(), url);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        Ok(builder.send().await?)
    }

    /// Sign, send and decode a private request.
    pub async fn execute<T>(&self, request: RequestDescriptor) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let signed = self.sign(request)?;
        let response = self.send(signed).await?;
        self.parse_response(response).await
    }

    /// Sign, send and decode a paginated private list request.
    pub async fn execute_paged<T>(
        &self,
        request: RequestDescriptor,
    ) -> Result<Page<T>, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let signed = self.sign(request)?;
        let response = self.send(signed).await?;

        let cursor = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let before = cursor(CB_BEFORE);
        let after = cursor(CB_AFTER);

        let items = self.parse_response(response).await?;
        Ok(Page {
            items,
            before,
            after,
        })
    }

    /// Send and decode a public request.
    pub async fn execute_public<T>(&self, request: RequestDescriptor) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let response = self.send_unsigned(request).await?;
        self.parse_response(response).await
    }

    /// Parse a response from the exchange.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = ApiError::from_body(status.as_u16(), &body);
            tracing::debug!(status = error.status, message = %error.message, "request rejected");
            return Err(ExchangeError::Api(error));
        }

        serde_json::from_str(&body).map_err(|e| {
            ExchangeError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.requests.base_url())
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

/// One page of a list endpoint.
///
/// `before` and `after` are the cursors the exchange returns in the
/// `CB-BEFORE` and `CB-AFTER` headers; pass them back through
/// [`Pagination`](crate::rest::private::Pagination) to fetch adjacent pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Cursor for newer items.
    pub before: Option<String>,
    /// Cursor for older items.
    pub after: Option<String>,
}

/// Builder for [`RestClient`].
pub struct RestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    clock: Option<Arc<dyn Clock>>,
    user_agent: Option<String>,
    max_retries: u32,
}

impl RestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: PRODUCTION_REST_URL.to_string(),
            credentials: None,
            clock: None,
            user_agent: None,
            max_retries: 0,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Target the public sandbox.
    pub fn sandbox(self) -> Self {
        self.base_url(SANDBOX_REST_URL)
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom timestamp source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of transport-level retries for transient failures.
    ///
    /// Defaults to 0. Order placement is not idempotent, so enable retries
    /// only together with `client_oid` on orders.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the client.
    pub fn build(self) -> RestClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("coinbase-exchange-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinbase-exchange-client"));
        headers.insert(USER_AGENT, header_value);

        // Build the HTTP client with middleware.
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut client = ClientBuilder::new(reqwest_client).with(TracingMiddleware::default());
        if self.max_retries > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(self.max_retries);
            client = client.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));

        RestClient {
            http_client: client.build(),
            requests: RequestBuilder::new(self.base_url),
            credentials: self.credentials,
            clock,
        }
    }
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CB_ACCESS_TIMESTAMP, FixedClock, StaticCredentials};

    #[test]
    fn test_sign_requires_credentials() {
        let client = RestClient::new();
        let request = client.requests().list_accounts().unwrap();
        assert!(matches!(
            client.sign(request),
            Err(ExchangeError::MissingCredentials)
        ));
    }

    #[test]
    fn test_sign_uses_configured_clock() {
        let client = RestClient::builder()
            .credentials(Arc::new(StaticCredentials::new("k", "c2VjcmV0", "p")))
            .clock(Arc::new(FixedClock::new(42)))
            .build();
        let request = client.requests().list_accounts().unwrap();
        let signed = client.sign(request).unwrap();
        assert_eq!(signed.header(CB_ACCESS_TIMESTAMP), Some("42"));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = RestClient::builder()
            .sandbox()
            .credentials(Arc::new(StaticCredentials::new("k", "c2VjcmV0", "p")))
            .build();
        let debug = format!("{:?}", client);
        assert!(debug.contains(SANDBOX_REST_URL));
        assert!(debug.contains("has_credentials: true"));
        assert!(!debug.contains("c2VjcmV0"));
    }
}

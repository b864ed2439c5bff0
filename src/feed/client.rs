//! WebSocket feed client.

use std::sync::Arc;

use crate::auth::{Clock, CredentialsProvider, SystemClock};
use crate::error::ExchangeError;
use crate::feed::handler::FeedHandler;
use crate::feed::messages::SubscriptionRequest;
use crate::feed::session::SessionHandle;

/// WebSocket feed endpoint URLs.
pub mod endpoints {
    /// Production feed.
    pub const PRODUCTION_FEED_URL: &str = "wss://ws-feed.exchange.coinbase.com";
    /// Public sandbox feed.
    pub const SANDBOX_FEED_URL: &str = "wss://ws-feed-public.sandbox.exchange.coinbase.com";
}

/// Largest inbound message or frame accepted by default (1 MiB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1 << 20;

/// Configuration for feed connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Feed URL.
    pub url: String,
    /// Largest inbound message or frame, in bytes.
    pub max_message_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: endpoints::PRODUCTION_FEED_URL.to_string(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl FeedConfig {
    /// Create a new configuration builder.
    pub fn builder() -> FeedConfigBuilder {
        FeedConfigBuilder::new()
    }
}

/// Builder for [`FeedConfig`].
#[derive(Debug, Clone, Default)]
pub struct FeedConfigBuilder {
    config: FeedConfig,
}

impl FeedConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: FeedConfig::default(),
        }
    }

    /// Set the feed URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Target the public sandbox.
    pub fn sandbox(self) -> Self {
        self.url(endpoints::SANDBOX_FEED_URL)
    }

    /// Set the largest accepted inbound message.
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.max_message_size = bytes;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FeedConfig {
        self.config
    }
}

/// Coinbase Exchange WebSocket feed client.
///
/// Each [`subscribe`](Self::subscribe) call opens its own connection, managed
/// by a background task and controlled through the returned [`SessionHandle`].
/// With credentials configured, subscriptions are signed so private channels
/// deliver account data.
#[derive(Clone)]
pub struct FeedClient {
    config: FeedConfig,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    clock: Arc<dyn Clock>,
}

impl FeedClient {
    /// Create a client for the production feed.
    pub fn new() -> Self {
        Self::with_config(FeedConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: FeedConfig) -> Self {
        Self {
            config,
            credentials: None,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Create a client for the public sandbox feed.
    pub fn sandbox() -> Self {
        Self::with_config(FeedConfig::builder().sandbox().build())
    }

    /// Sign subscriptions with these credentials.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use a custom timestamp source for signing.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The feed URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Get the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Connect and subscribe to `channels` for `product_ids`.
    ///
    /// Returns as soon as the session task is spawned; connection progress and
    /// failures are reported to `handler`. Must be called within a Tokio
    /// runtime.
    pub fn subscribe<H: FeedHandler>(
        &self,
        product_ids: impl IntoIterator<Item = impl Into<String>>,
        channels: impl IntoIterator<Item = impl Into<String>>,
        handler: H,
    ) -> Result<SessionHandle, ExchangeError> {
        let mut request = SubscriptionRequest::new(product_ids, channels);
        if let Some(credentials) = &self.credentials {
            request = request.authenticate(credentials.get_credentials(), self.clock.as_ref())?;
        }
        self.subscribe_with(request, handler)
    }

    /// Connect and send a prepared subscription request.
    pub fn subscribe_with<H: FeedHandler>(
        &self,
        request: SubscriptionRequest,
        handler: H,
    ) -> Result<SessionHandle, ExchangeError> {
        if request.channels.is_empty() {
            return Err(ExchangeError::InvalidRequest(
                "a subscription needs at least one channel".to_string(),
            ));
        }

        tracing::debug!(?request, url = %self.config.url, "subscribing to feed");
        let subscribe = serde_json::to_string(&request)?;
        SessionHandle::spawn(self.config.clone(), subscribe, handler)
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("config", &self.config)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

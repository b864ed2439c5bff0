//! Client configuration loaded from files or the environment.

use std::env;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::auth::{
    Credentials, ENV_API_KEY, ENV_API_PASSPHRASE, ENV_API_SECRET, StaticCredentials,
};
use crate::error::ExchangeError;
use crate::feed::{FeedClient, FeedConfig, endpoints as feed_endpoints};
use crate::rest::{PRODUCTION_REST_URL, RestClient, SANDBOX_REST_URL};

/// Environment variable overriding the REST base URL.
pub const ENV_REST_URL: &str = "COINBASE_REST_URL";
/// Environment variable overriding the feed URL.
pub const ENV_WEBSOCKET_URL: &str = "COINBASE_WEBSOCKET_URL";

/// Connection settings and optional credentials for both clients.
///
/// Deserializes from kebab-case keys (`api-key`, `api-secret`,
/// `api-passphrase`, `rest-url`, `websocket-url`); the URLs default to
/// production. Serialization and `Debug` never reveal the secret or
/// passphrase.
///
/// ```rust
/// use coinbase_exchange_client::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{"api-key": "key", "api-secret": "c2VjcmV0", "api-passphrase": "pass"}"#,
/// )
/// .unwrap();
/// assert!(config.credentials().is_some());
/// assert_eq!(config.rest_url, "https://api.exchange.coinbase.com");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// API key.
    pub api_key: Option<String>,
    /// Base64 API secret.
    pub api_secret: Option<SecretString>,
    /// API passphrase.
    pub api_passphrase: Option<SecretString>,
    /// REST base URL.
    pub rest_url: String,
    /// WebSocket feed URL.
    pub websocket_url: String,
}

impl ClientConfig {
    /// Public-only configuration for production.
    pub fn production() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            api_passphrase: None,
            rest_url: PRODUCTION_REST_URL.to_string(),
            websocket_url: feed_endpoints::PRODUCTION_FEED_URL.to_string(),
        }
    }

    /// Public-only configuration for the public sandbox.
    pub fn sandbox() -> Self {
        Self {
            rest_url: SANDBOX_REST_URL.to_string(),
            websocket_url: feed_endpoints::SANDBOX_FEED_URL.to_string(),
            ..Self::production()
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `COINBASE_API_KEY`, `COINBASE_API_SECRET` and `COINBASE_API_PASSPHRASE`
    /// must be set together or not at all. `COINBASE_REST_URL` and
    /// `COINBASE_WEBSOCKET_URL` override the production URLs.
    pub fn from_env() -> Result<Self, ExchangeError> {
        let api_key = env::var(ENV_API_KEY).ok();
        let api_secret = env::var(ENV_API_SECRET).ok();
        let api_passphrase = env::var(ENV_API_PASSPHRASE).ok();

        let present = [&api_key, &api_secret, &api_passphrase]
            .iter()
            .filter(|v| v.is_some())
            .count();
        if present != 0 && present != 3 {
            return Err(ExchangeError::Config(format!(
                "{ENV_API_KEY}, {ENV_API_SECRET} and {ENV_API_PASSPHRASE} must be set together"
            )));
        }

        let defaults = Self::production();
        Ok(Self {
            api_key,
            api_secret: api_secret.map(SecretString::from),
            api_passphrase: api_passphrase.map(SecretString::from),
            rest_url: env::var(ENV_REST_URL).unwrap_or(defaults.rest_url),
            websocket_url: env::var(ENV_WEBSOCKET_URL).unwrap_or(defaults.websocket_url),
        })
    }

    /// Set the credentials.
    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(SecretString::from(api_secret.into()));
        self.api_passphrase = Some(SecretString::from(api_passphrase.into()));
        self
    }

    /// The configured credentials, if all three parts are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.api_secret, &self.api_passphrase) {
            (Some(key), Some(secret), Some(passphrase)) => Some(Credentials::new(
                key.clone(),
                secret.expose_secret(),
                passphrase.expose_secret(),
            )),
            _ => None,
        }
    }

    /// Build a REST client for this configuration.
    pub fn rest_client(&self) -> RestClient {
        let builder = RestClient::builder().base_url(self.rest_url.clone());
        match self.credentials() {
            Some(credentials) => builder
                .credentials(Arc::new(StaticCredentials::from(credentials)))
                .build(),
            None => builder.build(),
        }
    }

    /// Build a feed client for this configuration.
    pub fn feed_client(&self) -> FeedClient {
        let client = FeedClient::with_config(
            FeedConfig::builder().url(self.websocket_url.clone()).build(),
        );
        match self.credentials() {
            Some(credentials) => {
                client.with_credentials(Arc::new(StaticCredentials::from(credentials)))
            }
            None => client,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field(
                "api_passphrase",
                &self.api_passphrase.as_ref().map(|_| "[REDACTED]"),
            )
            .field("rest_url", &self.rest_url)
            .field("websocket_url", &self.websocket_url)
            .finish()
    }
}

impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let redacted = |secret: &Option<SecretString>| secret.as_ref().map(|_| "[REDACTED]");

        let mut state = serializer.serialize_struct("ClientConfig", 5)?;
        state.serialize_field("api-key", &self.api_key)?;
        state.serialize_field("api-secret", &redacted(&self.api_secret))?;
        state.serialize_field("api-passphrase", &redacted(&self.api_passphrase))?;
        state.serialize_field("rest-url", &self.rest_url)?;
        state.serialize_field("websocket-url", &self.websocket_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "kebab-case", deny_unknown_fields)]
        struct ClientConfigHelper {
            api_key: Option<String>,
            api_secret: Option<String>,
            api_passphrase: Option<String>,
            rest_url: Option<String>,
            websocket_url: Option<String>,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        let defaults = Self::production();
        Ok(Self {
            api_key: helper.api_key,
            api_secret: helper.api_secret.map(SecretString::from),
            api_passphrase: helper.api_passphrase.map(SecretString::from),
            rest_url: helper.rest_url.unwrap_or(defaults.rest_url),
            websocket_url: helper.websocket_url.unwrap_or(defaults.websocket_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_urls() {
        let config = ClientConfig::sandbox();
        assert_eq!(config.rest_url, SANDBOX_REST_URL);
        assert_eq!(config.websocket_url, feed_endpoints::SANDBOX_FEED_URL);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_deserialize_kebab_case() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "api-key": "key",
                "api-secret": "c2VjcmV0",
                "api-passphrase": "pass",
                "websocket-url": "ws://127.0.0.1:9000"
            }"#,
        )
        .unwrap();
        assert_eq!(config.websocket_url, "ws://127.0.0.1:9000");
        assert_eq!(config.rest_url, PRODUCTION_REST_URL);

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.api_key, "key");
        assert_eq!(credentials.expose_passphrase(), "pass");
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let result: Result<ClientConfig, _> = serde_json::from_str(r#"{"api_key": "key"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_secrets_never_exposed() {
        let config = ClientConfig::sandbox().with_credentials("key", "c2VjcmV0", "hunter2");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("c2VjcmV0"));
        assert!(!debug.contains("hunter2"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("c2VjcmV0"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"api-key\":\"key\""));
    }

    #[test]
    fn test_clients_follow_config() {
        let config = ClientConfig::sandbox().with_credentials("key", "c2VjcmV0", "pass");
        let rest = config.rest_client();
        assert_eq!(rest.requests().base_url(), SANDBOX_REST_URL);
        assert!(format!("{:?}", rest).contains("has_credentials: true"));

        let feed = config.feed_client();
        assert_eq!(feed.url(), feed_endpoints::SANDBOX_FEED_URL);
    }
}

//! Credential management for Coinbase Exchange API authentication.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::ExchangeError;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "COINBASE_API_KEY";
/// Environment variable holding the base64 API secret.
pub const ENV_API_SECRET: &str = "COINBASE_API_SECRET";
/// Environment variable holding the API passphrase.
pub const ENV_API_PASSPHRASE: &str = "COINBASE_API_PASSPHRASE";

/// API credentials containing the key, secret and passphrase.
#[derive(Clone)]
pub struct Credentials {
    /// The API key (public identifier)
    pub api_key: String,
    /// The base64-encoded API secret (private, used for signing)
    api_secret: SecretString,
    /// The passphrase chosen when the key was created
    api_passphrase: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key, base64 secret and passphrase.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
            api_passphrase: SecretString::from(api_passphrase.into()),
        }
    }

    /// Get the base64 API secret.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Get the passphrase for the `CB-ACCESS-PASSPHRASE` header.
    pub fn expose_passphrase(&self) -> &str {
        self.api_passphrase.expose_secret()
    }

    /// Decode the API secret into the raw HMAC key bytes.
    pub fn decoded_secret(&self) -> Result<Vec<u8>, ExchangeError> {
        Ok(BASE64.decode(self.expose_secret().trim())?)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("api_passphrase", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager or environment variables.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

impl CredentialsProvider for Credentials {
    fn get_credentials(&self) -> &Credentials {
        self
    }
}

/// Static credentials provider that holds credentials directly.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials::new(api_key, api_secret, api_passphrase),
        }
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl CredentialsProvider for Arc<StaticCredentials> {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads from environment variables.
///
/// By default, reads `COINBASE_API_KEY`, `COINBASE_API_SECRET` and
/// `COINBASE_API_PASSPHRASE`.
#[derive(Debug)]
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Create credentials from the default environment variables.
    pub fn from_env() -> Result<Self, ExchangeError> {
        Self::from_env_vars(ENV_API_KEY, ENV_API_SECRET, ENV_API_PASSPHRASE)
    }

    /// Create credentials from custom environment variable names.
    pub fn from_env_vars(
        key_var: &str,
        secret_var: &str,
        passphrase_var: &str,
    ) -> Result<Self, ExchangeError> {
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|_| ExchangeError::Config(format!("environment variable {name} not set")))
        };

        Ok(Self {
            credentials: Credentials::new(read(key_var)?, read(secret_var)?, read(passphrase_var)?),
        })
    }

    /// Try to create credentials from the default environment variables.
    ///
    /// Returns `None` if any of the variables is not set.
    pub fn try_from_env() -> Option<Self> {
        Self::from_env().ok()
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("my_key", "c3VwZXJfc2VjcmV0", "hunter2");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_key"));
        assert!(!debug_str.contains("c3VwZXJfc2VjcmV0"));
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_credentials() {
        let provider = StaticCredentials::new("key", "secret", "phrase");
        let creds = provider.get_credentials();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.expose_secret(), "secret");
        assert_eq!(creds.expose_passphrase(), "phrase");
    }

    #[test]
    fn test_secret_base64_round_trip() {
        let raw = b"\x00\x01binary secret bytes\xff".to_vec();
        let creds = Credentials::new("key", BASE64.encode(&raw), "phrase");
        assert_eq!(creds.decoded_secret().unwrap(), raw);
    }

    #[test]
    fn test_invalid_secret_encoding() {
        let creds = Credentials::new("key", "not base64!!", "phrase");
        assert!(matches!(
            creds.decoded_secret(),
            Err(ExchangeError::InvalidSecretEncoding(_))
        ));
    }

    #[test]
    fn test_env_credentials_missing_var() {
        let result = EnvCredentials::from_env_vars(
            "CBX_TEST_UNSET_KEY",
            "CBX_TEST_UNSET_SECRET",
            "CBX_TEST_UNSET_PASSPHRASE",
        );
        assert!(matches!(result, Err(ExchangeError::Config(_))));
    }
}

//! Coinbase Exchange REST API client.
//!
//! A REST call goes through three stages:
//!
//! 1. [`RequestBuilder`] produces an unsigned [`RequestDescriptor`] for an endpoint.
//! 2. [`crate::auth::sign_request`] attaches the `CB-ACCESS-*` headers, giving a [`SignedRequest`].
//! 3. [`RestClient::send`] hands the signed request to the HTTP transport.
//!
//! [`RestClient`] wires the three together for every endpoint:
//!
//! ```rust,no_run
//! use coinbase_exchange_client::auth::StaticCredentials;
//! use coinbase_exchange_client::rest::RestClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Arc::new(StaticCredentials::new("key", "c2VjcmV0", "passphrase"));
//!     let client = RestClient::builder().credentials(credentials).build();
//!
//!     for account in client.list_accounts().await? {
//!         println!("{}: {}", account.currency, account.balance);
//!     }
//!     Ok(())
//! }
//! ```

pub(crate) mod builder;
mod client;
pub(crate) mod endpoints;
pub mod private;
pub mod public;
mod request;

pub use builder::RequestBuilder;
pub use client::{Page, RestClient, RestClientBuilder};
pub use endpoints::*;
pub use request::{QueryParams, RequestDescriptor, SignedRequest};

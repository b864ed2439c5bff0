//! # Coinbase Exchange Client
//!
//! An async Rust client library for the Coinbase Exchange REST and WebSocket feed APIs.
//!
//! ## Features
//!
//! - Signed REST requests (`CB-ACCESS-*` HMAC-SHA256 authentication)
//! - Accounts, orders, fills, funding, reports and trailing volume endpoints
//! - WebSocket feed subscriptions with a pluggable event handler
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinbase_exchange_client::rest::RestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RestClient::new();
//!     let time = client.get_server_time().await?;
//!     println!("Server time: {:?}", time);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use config::ClientConfig;
pub use error::ExchangeError;
pub use types::common::{Method, OrderStatus, OrderType, Side};

/// Result type alias using ExchangeError
pub type Result<T> = std::result::Result<T, ExchangeError>;

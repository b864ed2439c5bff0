//! Coinbase Exchange WebSocket feed client.
//!
//! A subscription runs on its own Tokio task. Events are pushed to a
//! [`FeedHandler`] and the session is controlled through a [`SessionHandle`].
//!
//! # Example
//!
//! ```rust,no_run
//! use coinbase_exchange_client::feed::{FeedClient, LoggingHandler, channels};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::new();
//!     let mut session = client.subscribe(
//!         ["BTC-USD", "ETH-USD"],
//!         [channels::TICKER, channels::HEARTBEAT],
//!         LoggingHandler,
//!     )?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod handler;
pub mod messages;
mod session;

pub use client::{DEFAULT_MAX_MESSAGE_SIZE, FeedClient, FeedConfig, FeedConfigBuilder, endpoints};
pub use handler::{FeedHandler, LoggingHandler};
pub use messages::{FeedEvent, SubscriptionRequest, channels};
pub use session::{SessionHandle, SessionState};

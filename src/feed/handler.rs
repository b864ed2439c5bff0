//! Callbacks invoked by a feed session.

use std::ops::ControlFlow;

use crate::error::ExchangeError;
use crate::feed::messages::FeedEvent;

/// Receives the events of one feed session.
///
/// All callbacks run on the session's task, one at a time and in arrival
/// order. Returning [`ControlFlow::Break`] from `on_connect`, `on_message` or
/// `on_error` closes the session as if [`SessionHandle::close`] had been
/// called. Every method has a default that logs through `tracing`, so an
/// implementation only overrides what it needs.
///
/// Closures taking a [`FeedEvent`] implement the trait directly:
///
/// ```rust,no_run
/// use coinbase_exchange_client::feed::{FeedClient, FeedEvent, channels};
/// use std::ops::ControlFlow;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut session = FeedClient::new().subscribe(
///         ["BTC-USD"],
///         [channels::TICKER],
///         |event: FeedEvent| {
///             if let FeedEvent::Ticker(ticker) = event {
///                 println!("{} {}", ticker.product_id, ticker.price);
///             }
///             ControlFlow::Continue(())
///         },
///     )?;
///     session.closed().await?;
///     Ok(())
/// }
/// ```
///
/// [`SessionHandle::close`]: crate::feed::SessionHandle::close
pub trait FeedHandler: Send + 'static {
    /// The handshake completed; the subscription is sent right after.
    fn on_connect(&mut self) -> ControlFlow<()> {
        tracing::info!("feed connected");
        ControlFlow::Continue(())
    }

    /// A message was decoded.
    fn on_message(&mut self, event: FeedEvent) -> ControlFlow<()> {
        tracing::info!(?event, "feed message");
        ControlFlow::Continue(())
    }

    /// A frame could not be decoded, or the transport failed.
    ///
    /// Decode failures leave the session open; transport failures end it
    /// regardless of the returned value.
    fn on_error(&mut self, error: &ExchangeError) -> ControlFlow<()> {
        tracing::warn!(%error, "feed error");
        ControlFlow::Continue(())
    }

    /// The session closed with the given WebSocket close code.
    fn on_close(&mut self, code: u16, reason: &str) {
        tracing::info!(code, reason, "feed closed");
    }
}

/// A handler that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl FeedHandler for LoggingHandler {}

impl<F> FeedHandler for F
where
    F: FnMut(FeedEvent) -> ControlFlow<()> + Send + 'static,
{
    fn on_message(&mut self, event: FeedEvent) -> ControlFlow<()> {
        self(event)
    }
}

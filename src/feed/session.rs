//! Feed session lifecycle.

use std::ops::ControlFlow;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::{CloseFrame, WebSocketConfig};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async_with_config};

use crate::error::ExchangeError;
use crate::feed::client::FeedConfig;
use crate::feed::handler::FeedHandler;
use crate::feed::messages::FeedEvent;

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Close code reported when the server ends the stream without a close frame.
const NO_STATUS_RECEIVED: u16 = 1005;

/// Observable state of a feed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Opening the WebSocket connection.
    Connecting,
    /// Handshake done, subscription being sent.
    Connected,
    /// Subscription sent, messages are being delivered.
    Receiving,
    /// The session ended. Terminal.
    Closed,
}

/// Handle to a running feed session.
///
/// The socket is owned by a background task; the handle only signals it.
/// Dropping the handle closes the session without waiting for it.
#[must_use = "dropping the handle closes the feed session"]
#[derive(Debug)]
pub struct SessionHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ExchangeError>>>,
    outcome: Option<Outcome>,
    state: watch::Receiver<SessionState>,
}

/// How a finished session ended, kept so [`SessionHandle::closed`] can report
/// it more than once.
#[derive(Debug, Clone)]
enum Outcome {
    Closed,
    RemoteClose { code: u16, reason: String },
    Failed(String),
}

impl Outcome {
    fn record(result: &Result<(), ExchangeError>) -> Self {
        match result {
            Ok(()) => Self::Closed,
            Err(ExchangeError::RemoteClose { code, reason }) => Self::RemoteClose {
                code: *code,
                reason: reason.clone(),
            },
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    fn replay(&self) -> Result<(), ExchangeError> {
        match self {
            Self::Closed => Ok(()),
            Self::RemoteClose { code, reason } => Err(ExchangeError::RemoteClose {
                code: *code,
                reason: reason.clone(),
            }),
            Self::Failed(message) => Err(ExchangeError::WebSocketMsg(message.clone())),
        }
    }
}

impl SessionHandle {
    /// Spawn the session task on the current Tokio runtime.
    pub(crate) fn spawn<H: FeedHandler>(
        config: FeedConfig,
        subscribe: String,
        handler: H,
    ) -> Result<Self, ExchangeError> {
        let runtime = Handle::try_current().map_err(|e| {
            ExchangeError::WebSocketMsg(format!("feed sessions require a Tokio runtime: {e}"))
        })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Connecting);
        let session = Session {
            config,
            subscribe,
            handler,
            state: state_tx,
        };
        let task = runtime.spawn(session.run(shutdown_rx));

        Ok(Self {
            shutdown: Some(shutdown_tx),
            task: Some(task),
            outcome: None,
            state: state_rx,
        })
    }

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Close the session and wait for the task to finish.
    ///
    /// Sends a normal close frame, then `on_close(1000, ..)` runs. No callback
    /// fires after this returns. If the session already ended on its own and
    /// nothing has waited on it yet, the first call reports how it ended, as
    /// [`closed`](Self::closed) would. Every later call returns `Ok(())`.
    pub async fn close(&mut self) -> Result<(), ExchangeError> {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already be gone.
            let _ = shutdown.send(());
        }
        if self.task.is_none() {
            return Ok(());
        }
        self.join().await
    }

    /// Wait until the session ends on its own.
    ///
    /// Returns `Ok(())` after a client-side close,
    /// [`ExchangeError::RemoteClose`] when the server closed the connection and
    /// [`ExchangeError::WebSocket`] on a transport failure. Once the session
    /// has ended every call reports the same outcome; a transport failure is
    /// repeated as [`ExchangeError::WebSocketMsg`] carrying its message.
    pub async fn closed(&mut self) -> Result<(), ExchangeError> {
        self.join().await
    }

    async fn join(&mut self) -> Result<(), ExchangeError> {
        let Some(task) = self.task.as_mut() else {
            return self.outcome.as_ref().map_or(Ok(()), Outcome::replay);
        };
        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(ExchangeError::WebSocketMsg(format!("feed task failed: {e}"))),
        };
        self.task = None;
        self.outcome = Some(Outcome::record(&result));
        result
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

struct Session<H> {
    config: FeedConfig,
    subscribe: String,
    handler: H,
    state: watch::Sender<SessionState>,
}

impl<H: FeedHandler> Session<H> {
    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> Result<(), ExchangeError> {
        let result = self.drive(&mut shutdown).await;
        self.state.send_replace(SessionState::Closed);
        result
    }

    async fn drive(&mut self, shutdown: &mut oneshot::Receiver<()>) -> Result<(), ExchangeError> {
        tracing::debug!(url = %self.config.url, "connecting to feed");

        let ws_config = WebSocketConfig::default()
            .max_message_size(Some(self.config.max_message_size))
            .max_frame_size(Some(self.config.max_message_size));

        let connected = tokio::select! {
            biased;
            _ = &mut *shutdown => {
                self.handler.on_close(u16::from(CloseCode::Normal), "closed before connecting");
                return Ok(());
            }
            result = connect_async_with_config(self.config.url.as_str(), Some(ws_config), false) => result,
        };
        let mut stream = match connected {
            Ok((stream, _response)) => stream,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.state.send_replace(SessionState::Connected);
        tracing::info!(url = %self.config.url, "feed connected");
        if self.handler.on_connect().is_break() {
            return self.shutdown(&mut stream, "closed by handler").await;
        }

        if let Err(e) = stream.send(Message::Text(self.subscribe.clone().into())).await {
            return Err(self.fail(e.into()));
        }
        self.state.send_replace(SessionState::Receiving);

        loop {
            let frame = tokio::select! {
                biased;
                _ = &mut *shutdown => {
                    return self.shutdown(&mut stream, "closed by client").await;
                }
                frame = stream.next() => frame,
            };

            let flow = match frame {
                Some(Ok(Message::Text(text))) => self.deliver(text.as_str()),
                Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => self.deliver(text),
                    Err(e) => self.decode_error(ExchangeError::InvalidResponse(format!(
                        "binary feed frame is not UTF-8: {e}"
                    ))),
                },
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.to_string()))
                        .unwrap_or((NO_STATUS_RECEIVED, String::new()));
                    // Flush the close reply queued by the protocol layer.
                    let _ = stream.close(None).await;
                    return Err(self.remote_close(code, reason));
                }
                // Pings are answered by the protocol layer.
                Some(Ok(_)) => ControlFlow::Continue(()),
                Some(Err(e)) => return Err(self.fail(e.into())),
                None => return Err(self.remote_close(NO_STATUS_RECEIVED, String::new())),
            };

            if flow.is_break() {
                return self.shutdown(&mut stream, "closed by handler").await;
            }
        }
    }

    fn deliver(&mut self, payload: &str) -> ControlFlow<()> {
        match FeedEvent::parse(payload) {
            Ok(event) => self.handler.on_message(event),
            Err(error) => self.decode_error(error),
        }
    }

    fn decode_error(&mut self, error: ExchangeError) -> ControlFlow<()> {
        tracing::warn!(%error, "undecodable feed message");
        self.handler.on_error(&error)
    }

    fn fail(&mut self, error: ExchangeError) -> ExchangeError {
        tracing::warn!(%error, url = %self.config.url, "feed transport error");
        let _ = self.handler.on_error(&error);
        error
    }

    fn remote_close(&mut self, code: u16, reason: String) -> ExchangeError {
        tracing::info!(code, %reason, "feed closed by server");
        self.handler.on_close(code, &reason);
        ExchangeError::RemoteClose { code, reason }
    }

    async fn shutdown(
        &mut self,
        stream: &mut FeedStream,
        reason: &'static str,
    ) -> Result<(), ExchangeError> {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: reason.into(),
        };
        if let Err(error) = stream.close(Some(frame)).await {
            tracing::debug!(%error, "close handshake failed");
        }
        tracing::info!(reason, "feed closed");
        self.handler.on_close(u16::from(CloseCode::Normal), reason);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_replays_remote_close() {
        let outcome = Outcome::record(&Err(ExchangeError::RemoteClose {
            code: 1001,
            reason: "going away".to_string(),
        }));
        for _ in 0..2 {
            match outcome.replay() {
                Err(ExchangeError::RemoteClose { code, reason }) => {
                    assert_eq!(code, 1001);
                    assert_eq!(reason, "going away");
                }
                other => panic!("expected remote close, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_outcome_replays_failure_message() {
        let outcome = Outcome::record(&Err(ExchangeError::WebSocketMsg("boom".to_string())));
        assert!(matches!(
            outcome.replay(),
            Err(ExchangeError::WebSocketMsg(message)) if message.contains("boom")
        ));
        assert!(Outcome::record(&Ok(())).replay().is_ok());
    }
}

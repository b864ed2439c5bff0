use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{WebSocketStream, accept_async};

use coinbase_exchange_client::ExchangeError;
use coinbase_exchange_client::feed::{
    DEFAULT_MAX_MESSAGE_SIZE, FeedClient, FeedConfig, FeedEvent, FeedHandler, SessionState,
    channels,
};

#[derive(Debug)]
enum Seen {
    Connect,
    Message(FeedEvent),
    Error(String),
    Close(u16, String),
}

struct Recorder {
    events: mpsc::UnboundedSender<Seen>,
    stop_after: Option<usize>,
    delivered: usize,
}

impl Recorder {
    fn new() -> (Self, mpsc::UnboundedReceiver<Seen>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                events,
                stop_after: None,
                delivered: 0,
            },
            rx,
        )
    }

    fn stop_after(mut self, messages: usize) -> Self {
        self.stop_after = Some(messages);
        self
    }
}

impl FeedHandler for Recorder {
    fn on_connect(&mut self) -> ControlFlow<()> {
        let _ = self.events.send(Seen::Connect);
        ControlFlow::Continue(())
    }

    fn on_message(&mut self, event: FeedEvent) -> ControlFlow<()> {
        let _ = self.events.send(Seen::Message(event));
        self.delivered += 1;
        match self.stop_after {
            Some(limit) if self.delivered >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }

    fn on_error(&mut self, error: &ExchangeError) -> ControlFlow<()> {
        let _ = self.events.send(Seen::Error(error.to_string()));
        ControlFlow::Continue(())
    }

    fn on_close(&mut self, code: u16, reason: &str) {
        let _ = self.events.send(Seen::Close(code, reason.to_string()));
    }
}

/// Accept one WebSocket connection and hand it to `script`.
async fn start_server<F, Fut>(script: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let ws = accept_async(tcp).await.unwrap();
        script(ws).await;
    });
    format!("ws://{addr}")
}

fn client_for(url: &str) -> FeedClient {
    FeedClient::with_config(FeedConfig::builder().url(url).build())
}

fn heartbeat(sequence: u64) -> Message {
    let payload = serde_json::json!({
        "type": "heartbeat",
        "sequence": sequence,
        "last_trade_id": 20,
        "product_id": "BTC-USD",
        "time": "2024-01-01T00:00:00.000000Z"
    });
    Message::Text(payload.to_string().into())
}

async fn next_seen(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a callback")
        .expect("handler dropped")
}

#[tokio::test]
async fn test_subscribe_is_first_message_and_server_close_is_reported() {
    let (sub_tx, mut sub_rx) = mpsc::unbounded_channel();
    let url = start_server(move |mut ws| async move {
        if let Some(Ok(Message::Text(text))) = ws.next().await {
            let _ = sub_tx.send(text.to_string());
        }
        ws.send(heartbeat(1)).await.unwrap();
        ws.send(Message::Text("not json".into())).await.unwrap();
        ws.send(heartbeat(2)).await.unwrap();
        ws.close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "maintenance".into(),
        }))
        .await
        .unwrap();
        while ws.next().await.is_some() {}
    })
    .await;

    let (recorder, mut rx) = Recorder::new();
    let mut session = client_for(&url)
        .subscribe(["btc-usd"], [channels::HEARTBEAT], recorder)
        .unwrap();

    assert!(matches!(next_seen(&mut rx).await, Seen::Connect));

    let subscribe: serde_json::Value =
        serde_json::from_str(&sub_rx.recv().await.unwrap()).unwrap();
    assert_eq!(
        subscribe,
        serde_json::json!({
            "type": "subscribe",
            "product_ids": ["BTC-USD"],
            "channels": ["heartbeat"]
        })
    );

    assert!(matches!(
        next_seen(&mut rx).await,
        Seen::Message(FeedEvent::Heartbeat(h)) if h.sequence == 1
    ));
    // Undecodable frames are reported but do not end the session.
    assert!(matches!(next_seen(&mut rx).await, Seen::Error(_)));
    assert!(matches!(
        next_seen(&mut rx).await,
        Seen::Message(FeedEvent::Heartbeat(h)) if h.sequence == 2
    ));
    match next_seen(&mut rx).await {
        Seen::Close(code, reason) => {
            assert_eq!(code, 1001);
            assert_eq!(reason, "maintenance");
        }
        other => panic!("expected close, got {:?}", other),
    }

    match session.closed().await {
        Err(ExchangeError::RemoteClose { code, reason }) => {
            assert_eq!(code, 1001);
            assert_eq!(reason, "maintenance");
        }
        other => panic!("expected remote close, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::Closed);

    // The outcome is kept for later callers.
    assert!(matches!(
        session.closed().await,
        Err(ExchangeError::RemoteClose { code: 1001, .. })
    ));
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_no_callbacks_after_close_returns() {
    let url = start_server(|mut ws| async move {
        let _ = ws.next().await;
        let mut sequence = 0;
        loop {
            sequence += 1;
            if ws.send(heartbeat(sequence)).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await;

    let (recorder, mut rx) = Recorder::new();
    let mut session = client_for(&url)
        .subscribe(["BTC-USD"], [channels::HEARTBEAT], recorder)
        .unwrap();

    assert!(matches!(next_seen(&mut rx).await, Seen::Connect));
    assert!(matches!(next_seen(&mut rx).await, Seen::Message(_)));
    assert_eq!(session.state(), SessionState::Receiving);

    session.close().await.unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    let mut remaining = Vec::new();
    while let Ok(seen) = rx.try_recv() {
        remaining.push(seen);
    }
    assert!(matches!(remaining.last(), Some(Seen::Close(1000, _))));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    // Closing again is a no-op.
    session.close().await.unwrap();
}

#[tokio::test]
async fn test_handler_break_closes_session() {
    let url = start_server(|mut ws| async move {
        let _ = ws.next().await;
        for sequence in 1..=5 {
            if ws.send(heartbeat(sequence)).await.is_err() {
                break;
            }
        }
        while ws.next().await.is_some() {}
    })
    .await;

    let (recorder, mut rx) = Recorder::new();
    let mut session = client_for(&url)
        .subscribe(["BTC-USD"], [channels::HEARTBEAT], recorder.stop_after(2))
        .unwrap();

    session.closed().await.unwrap();

    let mut messages = 0;
    let mut last = None;
    while let Ok(seen) = rx.try_recv() {
        if matches!(seen, Seen::Message(_)) {
            messages += 1;
        }
        last = Some(seen);
    }
    assert_eq!(messages, 2);
    assert!(matches!(last, Some(Seen::Close(1000, _))));
}

#[tokio::test]
async fn test_connect_failure_reports_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (recorder, mut rx) = Recorder::new();
    let mut session = client_for(&format!("ws://{addr}"))
        .subscribe(["BTC-USD"], [channels::TICKER], recorder)
        .unwrap();

    assert!(matches!(next_seen(&mut rx).await, Seen::Error(_)));
    assert!(matches!(
        session.closed().await,
        Err(ExchangeError::WebSocket(_))
    ));
    assert_eq!(session.state(), SessionState::Closed);
}

#[tokio::test]
async fn test_close_before_connecting() {
    // Bound but never accepting, so the handshake cannot complete.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (recorder, mut rx) = Recorder::new();
    let mut session = client_for(&format!("ws://{addr}"))
        .subscribe(["BTC-USD"], [channels::HEARTBEAT], recorder)
        .unwrap();
    session.close().await.unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    match rx.try_recv() {
        Ok(Seen::Close(code, reason)) => {
            assert_eq!(code, 1000);
            assert_eq!(reason, "closed before connecting");
        }
        other => panic!("expected close, got {:?}", other),
    }
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    session.close().await.unwrap();
    session.closed().await.unwrap();
    drop(listener);
}

#[tokio::test]
async fn test_oversized_message_fails_session() {
    let url = start_server(|mut ws| async move {
        let _ = ws.next().await;
        let oversized = "x".repeat(DEFAULT_MAX_MESSAGE_SIZE + 1);
        let _ = ws.send(Message::Text(oversized.into())).await;
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;

    let (recorder, mut rx) = Recorder::new();
    let mut session = client_for(&url)
        .subscribe(["BTC-USD"], [channels::HEARTBEAT], recorder)
        .unwrap();

    assert!(matches!(next_seen(&mut rx).await, Seen::Connect));
    match next_seen(&mut rx).await {
        Seen::Error(message) => assert!(message.contains("too long"), "{message}"),
        other => panic!("expected error, got {:?}", other),
    }
    assert!(matches!(
        session.closed().await,
        Err(ExchangeError::WebSocket(_))
    ));
    assert_eq!(session.state(), SessionState::Closed);
    assert!(rx.try_recv().is_err());

    // Transport failures are repeated by message.
    assert!(matches!(
        session.closed().await,
        Err(ExchangeError::WebSocketMsg(message)) if message.contains("too long")
    ));
}

//! WebSocket feed message types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

use crate::auth::{Clock, Credentials, compute_signature};
use crate::error::ExchangeError;
use crate::rest::builder::normalize_symbol;
use crate::rest::endpoints::private;
use crate::types::serde_helpers::optional_decimal;
use crate::types::{Method, Side};

/// Channel names.
pub mod channels {
    /// Per-product heartbeat with the last trade id.
    pub const HEARTBEAT: &str = "heartbeat";
    /// Product and currency status updates.
    pub const STATUS: &str = "status";
    /// Real-time price updates on every match.
    pub const TICKER: &str = "ticker";
    /// Ticker updates batched every 5 seconds.
    pub const TICKER_BATCH: &str = "ticker_batch";
    /// Trade matches.
    pub const MATCHES: &str = "matches";
    /// Order book snapshot followed by level 2 updates.
    pub const LEVEL2: &str = "level2";
    /// Level 2 updates batched every 50 milliseconds.
    pub const LEVEL2_BATCH: &str = "level2_batch";
    /// Every order lifecycle event on the book.
    pub const FULL: &str = "full";
    /// Messages for the authenticated user's own orders.
    ///
    /// Requires an authenticated subscription.
    pub const USER: &str = "user";
}

/// The first message sent on a feed connection.
///
/// Serializes as `{"type":"subscribe","product_ids":[...],"channels":[...]}`,
/// plus the four authentication fields once [`authenticate`](Self::authenticate)
/// has been called.
#[skip_serializing_none]
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct SubscriptionRequest {
    #[serde(rename = "type")]
    request_type: &'static str,
    /// Products to subscribe to.
    pub product_ids: Vec<String>,
    /// Channels to subscribe to.
    pub channels: Vec<String>,
    signature: Option<String>,
    key: Option<String>,
    passphrase: Option<String>,
    timestamp: Option<String>,
}

impl SubscriptionRequest {
    /// Subscribe to `channels` for `product_ids`. Product IDs are uppercased.
    pub fn new(
        product_ids: impl IntoIterator<Item = impl Into<String>>,
        channels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            request_type: "subscribe",
            product_ids: product_ids
                .into_iter()
                .map(|id| normalize_symbol(&id.into()))
                .collect(),
            channels: channels.into_iter().map(Into::into).collect(),
            signature: None,
            key: None,
            passphrase: None,
            timestamp: None,
        }
    }

    /// Sign the subscription so private channels (`user`, authenticated `full`)
    /// carry account-specific data.
    ///
    /// The signature covers `GET /users/self/verify` with an empty body, the
    /// same scheme used for REST requests.
    pub fn authenticate(
        mut self,
        credentials: &Credentials,
        clock: &dyn Clock,
    ) -> Result<Self, ExchangeError> {
        let timestamp = clock.unix_seconds();
        let signature =
            compute_signature(credentials, timestamp, Method::Get, private::VERIFY, "")?;

        self.signature = Some(signature);
        self.key = Some(credentials.api_key.clone());
        self.passphrase = Some(credentials.expose_passphrase().to_string());
        self.timestamp = Some(timestamp.to_string());
        Ok(self)
    }

    /// Whether the request carries authentication fields.
    pub fn is_authenticated(&self) -> bool {
        self.signature.is_some()
    }
}

impl std::fmt::Debug for SubscriptionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRequest")
            .field("product_ids", &self.product_ids)
            .field("channels", &self.channels)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// A decoded feed message.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Confirmation of the active subscriptions.
    Subscriptions(Subscriptions),
    /// Ticker update.
    Ticker(Box<Ticker>),
    /// A trade.
    Match(TradeMatch),
    /// The most recent trade, sent once after subscribing to `matches`.
    LastMatch(TradeMatch),
    /// Heartbeat.
    Heartbeat(Heartbeat),
    /// Error reported by the feed.
    Error(FeedError),
    /// Any other message, kept as raw JSON.
    Other(Value),
}

impl FeedEvent {
    /// Decode a text frame.
    ///
    /// Messages of unknown `type` become [`FeedEvent::Other`]; known types
    /// that fail to decode are an error.
    pub fn parse(payload: &str) -> Result<Self, ExchangeError> {
        let value: Value = serde_json::from_str(payload)?;
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Err(ExchangeError::InvalidResponse(format!(
                "feed message without a type: {payload}"
            )));
        };

        let event = match kind {
            "subscriptions" => Self::Subscriptions(serde_json::from_value(value)?),
            "ticker" => Self::Ticker(Box::new(serde_json::from_value(value)?)),
            "match" => Self::Match(serde_json::from_value(value)?),
            "last_match" => Self::LastMatch(serde_json::from_value(value)?),
            "heartbeat" => Self::Heartbeat(serde_json::from_value(value)?),
            "error" => Self::Error(serde_json::from_value(value)?),
            _ => Self::Other(value),
        };
        Ok(event)
    }

    /// Product the event refers to, when it has one.
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Self::Ticker(ticker) => Some(&ticker.product_id),
            Self::Match(trade) | Self::LastMatch(trade) => Some(&trade.product_id),
            Self::Heartbeat(heartbeat) => Some(&heartbeat.product_id),
            Self::Other(value) => value.get("product_id").and_then(Value::as_str),
            Self::Subscriptions(_) | Self::Error(_) => None,
        }
    }
}

/// Active subscriptions after a subscribe request.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriptions {
    /// Subscribed channels.
    pub channels: Vec<ChannelSubscription>,
}

/// One subscribed channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSubscription {
    /// Channel name.
    pub name: String,
    /// Products subscribed on the channel.
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// Ticker update, sent on every trade.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    /// Feed sequence number.
    pub sequence: u64,
    /// Product ID.
    pub product_id: String,
    /// Last trade price.
    pub price: Decimal,
    /// 24h open.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub open_24h: Option<Decimal>,
    /// 24h volume.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub volume_24h: Option<Decimal>,
    /// 24h low.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub low_24h: Option<Decimal>,
    /// 24h high.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub high_24h: Option<Decimal>,
    /// Best bid.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub best_bid: Option<Decimal>,
    /// Best ask.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub best_ask: Option<Decimal>,
    /// Taker side of the last trade.
    #[serde(default)]
    pub side: Option<Side>,
    /// Time of the last trade.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub time: Option<OffsetDateTime>,
    /// ID of the last trade.
    #[serde(default)]
    pub trade_id: Option<u64>,
    /// Size of the last trade.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub last_size: Option<Decimal>,
}

/// A trade between a maker and a taker order.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeMatch {
    /// Trade ID.
    pub trade_id: u64,
    /// Feed sequence number.
    pub sequence: u64,
    /// Resting order.
    pub maker_order_id: String,
    /// Incoming order.
    pub taker_order_id: String,
    /// Product ID.
    pub product_id: String,
    /// Maker side.
    pub side: Side,
    /// Trade size.
    pub size: Decimal,
    /// Trade price.
    pub price: Decimal,
    /// Trade time.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

/// Heartbeat for one product.
#[derive(Debug, Clone, Deserialize)]
pub struct Heartbeat {
    /// Feed sequence number.
    pub sequence: u64,
    /// Last trade ID of the product.
    pub last_trade_id: u64,
    /// Product ID.
    pub product_id: String,
    /// Server time.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

/// Error message sent by the feed, usually for a rejected subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedError {
    /// Error message.
    pub message: String,
    /// Longer explanation.
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FixedClock;

    #[test]
    fn test_subscription_request_serialize() {
        let request = SubscriptionRequest::new(["btc-usd", "ETH-USD"], [channels::TICKER]);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"type":"subscribe","product_ids":["BTC-USD","ETH-USD"],"channels":["ticker"]}"#
        );
    }

    #[test]
    fn test_authenticated_subscription() {
        let credentials = Credentials::new("key", "c2VjcmV0", "pass");
        let clock = FixedClock::new(1_700_000_000);
        let request = SubscriptionRequest::new(["BTC-USD"], [channels::USER])
            .authenticate(&credentials, &clock)
            .unwrap();

        let expected = compute_signature(
            &credentials,
            1_700_000_000,
            Method::Get,
            "/users/self/verify",
            "",
        )
        .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["signature"], expected.as_str());
        assert_eq!(json["key"], "key");
        assert_eq!(json["passphrase"], "pass");
        assert_eq!(json["timestamp"], "1700000000");
        assert!(!format!("{:?}", request).contains(&expected));
    }

    #[test]
    fn test_parse_ticker() {
        let payload = r#"{
            "type": "ticker",
            "sequence": 37475248783,
            "product_id": "ETH-USD",
            "price": "1285.22",
            "open_24h": "1310.79",
            "volume_24h": "245532.79269678",
            "low_24h": "1280.52",
            "high_24h": "1313.8",
            "best_bid": "1285.04",
            "best_ask": "1285.27",
            "side": "buy",
            "time": "2022-10-19T23:28:22.061769Z",
            "trade_id": 370843401,
            "last_size": "0.00000001"
        }"#;
        let FeedEvent::Ticker(ticker) = FeedEvent::parse(payload).unwrap() else {
            panic!("expected ticker");
        };
        assert_eq!(ticker.product_id, "ETH-USD");
        assert_eq!(ticker.price, "1285.22".parse().unwrap());
        assert_eq!(ticker.side, Some(Side::Buy));
        assert_eq!(ticker.trade_id, Some(370843401));
    }

    #[test]
    fn test_parse_subscriptions_and_unknown() {
        let payload = r#"{"type":"subscriptions","channels":[{"name":"ticker","product_ids":["BTC-USD"]}]}"#;
        let FeedEvent::Subscriptions(subscriptions) = FeedEvent::parse(payload).unwrap() else {
            panic!("expected subscriptions");
        };
        assert_eq!(subscriptions.channels[0].name, "ticker");

        let event = FeedEvent::parse(r#"{"type":"l2update","product_id":"BTC-USD"}"#).unwrap();
        assert!(matches!(event, FeedEvent::Other(_)));
        assert_eq!(event.product_id(), Some("BTC-USD"));
    }

    #[test]
    fn test_parse_match_and_error() {
        let payload = r#"{
            "type": "last_match",
            "trade_id": 10,
            "sequence": 50,
            "maker_order_id": "ac928c66-ca53-498f-9c13-a110027a60e8",
            "taker_order_id": "132fb6ae-456b-4654-b4e0-d681ac05cea1",
            "time": "2014-11-07T08:19:27.028459Z",
            "product_id": "BTC-USD",
            "size": "5.23512",
            "price": "400.23",
            "side": "sell"
        }"#;
        assert!(matches!(
            FeedEvent::parse(payload).unwrap(),
            FeedEvent::LastMatch(TradeMatch { trade_id: 10, .. })
        ));

        let payload = r#"{"type":"error","message":"Failed to subscribe","reason":"BTC-XYZ is not a valid product"}"#;
        let FeedEvent::Error(error) = FeedEvent::parse(payload).unwrap() else {
            panic!("expected error");
        };
        assert_eq!(error.message, "Failed to subscribe");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(FeedEvent::parse("not json").is_err());
        assert!(FeedEvent::parse(r#"{"no_type":true}"#).is_err());
        assert!(FeedEvent::parse(r#"{"type":"heartbeat","sequence":"x"}"#).is_err());
    }
}

//! Common domain types for the Coinbase Exchange API.

use serde::{Deserialize, Serialize};

/// HTTP method of a REST request.
///
/// Rendered uppercase in the signature prehash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
    /// DELETE request
    Delete,
}

impl Method {
    /// The uppercase method name used on the wire and in the prehash.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Order type for trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order - execute at specified price or better
    Limit,
    /// Market order - execute immediately at best available price
    Market,
    /// Stop order - rests until the stop price is reached
    Stop,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
            OrderType::Stop => "stop",
        };
        write!(f, "{}", s)
    }
}

/// Status of an order, also used as a list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is resting on the book
    Open,
    /// Order has been received but not yet processed
    Pending,
    /// Stop order that has been triggered
    Active,
    /// Order is no longer on the book (filled or canceled)
    Done,
    /// Order was received by the matching engine
    Received,
    /// Order was rejected
    Rejected,
    /// Filter value matching every status
    All,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Open => "open",
            OrderStatus::Pending => "pending",
            OrderStatus::Active => "active",
            OrderStatus::Done => "done",
            OrderStatus::Received => "received",
            OrderStatus::Rejected => "rejected",
            OrderStatus::All => "all",
        };
        f.write_str(s)
    }
}

/// Time in force for limit orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till canceled (default)
    #[default]
    GTC,
    /// Good till time, see `cancel_after`
    GTT,
    /// Immediate or cancel
    IOC,
    /// Fill or kill
    FOK,
}

/// Expiry window for good-till-time orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelAfter {
    /// One minute
    Min,
    /// One hour
    Hour,
    /// One day
    Day,
}

/// Self-trade prevention mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelfTradePrevention {
    /// Decrease and cancel (default on the exchange)
    #[serde(rename = "dc")]
    DecreaseAndCancel,
    /// Cancel oldest order
    #[serde(rename = "co")]
    CancelOldest,
    /// Cancel newest order
    #[serde(rename = "cn")]
    CancelNewest,
    /// Cancel both orders
    #[serde(rename = "cb")]
    CancelBoth,
}

/// Direction of a stop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopDirection {
    /// Triggers when the last trade price falls to the stop price
    Loss,
    /// Triggers when the last trade price rises to the stop price
    Entry,
}

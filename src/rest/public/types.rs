//! Types for public REST API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::types::serde_helpers::optional_decimal;

/// Server time response.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    /// ISO 8601 time string.
    pub iso: String,
    /// Unix time in seconds, with fractional part.
    pub epoch: f64,
}

/// A tradable product (currency pair).
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Product ID, e.g. `BTC-USD`.
    pub id: String,
    /// Base currency.
    pub base_currency: String,
    /// Quote currency.
    pub quote_currency: String,
    /// Minimum price increment.
    pub quote_increment: Decimal,
    /// Minimum size increment.
    pub base_increment: Decimal,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Minimum funds for market orders.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub min_market_funds: Option<Decimal>,
    /// Trading status (`online`, `offline`, `delisted`...).
    pub status: String,
    /// Only post-only orders are accepted.
    #[serde(default)]
    pub post_only: bool,
    /// Only limit orders are accepted.
    #[serde(default)]
    pub limit_only: bool,
    /// Only cancellations are accepted.
    #[serde(default)]
    pub cancel_only: bool,
    /// Trading is disabled.
    #[serde(default)]
    pub trading_disabled: bool,
}

/// Snapshot of the latest trade and the best bid and ask.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductTicker {
    /// ID of the last trade.
    pub trade_id: u64,
    /// Price of the last trade.
    pub price: Decimal,
    /// Size of the last trade.
    pub size: Decimal,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// 24h volume.
    pub volume: Decimal,
    /// Time of the last trade.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_time_deserialize() {
        let time: ServerTime =
            serde_json::from_str(r#"{"iso":"2015-01-07T23:47:25.201Z","epoch":1420674445.201}"#)
                .unwrap();
        assert_eq!(time.iso, "2015-01-07T23:47:25.201Z");
        assert!((time.epoch - 1_420_674_445.201).abs() < 1e-6);
    }

    #[test]
    fn test_product_deserialize() {
        let json = r#"{
            "id": "BTC-USD",
            "base_currency": "BTC",
            "quote_currency": "USD",
            "quote_increment": "0.01000000",
            "base_increment": "0.00000001",
            "display_name": "BTC/USD",
            "min_market_funds": "",
            "margin_enabled": false,
            "post_only": false,
            "limit_only": false,
            "cancel_only": false,
            "status": "online",
            "status_message": "",
            "trading_disabled": false
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "BTC-USD");
        assert_eq!(product.quote_increment, "0.01".parse().unwrap());
        assert!(product.min_market_funds.is_none());
    }

    #[test]
    fn test_ticker_deserialize() {
        let json = r#"{
            "trade_id": 4729088,
            "price": "333.99",
            "size": "0.193",
            "bid": "333.98",
            "ask": "333.99",
            "volume": "5957.11914015",
            "time": "2015-11-14T20:46:03.511254Z"
        }"#;
        let ticker: ProductTicker = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.trade_id, 4729088);
        assert_eq!(ticker.ask, "333.99".parse().unwrap());
    }
}

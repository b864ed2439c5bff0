//! Order endpoints: placement, cancellation, listing and fills.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ExchangeError;
use crate::rest::builder::{RequestBuilder, merge_body, normalize_symbol, require_id};
use crate::rest::endpoints::private;
use crate::rest::private::{Fill, FillsFilter, MarketAmount, Order, OrderOptions, Pagination};
use crate::rest::{Page, QueryParams, RequestDescriptor, RestClient};
use crate::types::{OrderStatus, OrderType, Side};

fn text(value: impl ToString) -> Value {
    Value::String(value.to_string())
}

impl RequestBuilder {
    /// `POST /orders` with caller-chosen options.
    ///
    /// `side` and `product_id` are always taken from the arguments.
    pub fn place_order(
        &self,
        side: Side,
        product_id: &str,
        options: &OrderOptions,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.order_request(side, product_id, options, [])
    }

    /// `POST /orders` with `type=limit`.
    pub fn place_limit_order(
        &self,
        side: Side,
        product_id: &str,
        price: Decimal,
        size: Decimal,
        options: &OrderOptions,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.order_request(
            side,
            product_id,
            options,
            [
                ("type", text(OrderType::Limit)),
                ("price", text(price)),
                ("size", text(size)),
            ],
        )
    }

    /// `POST /orders` with `type=market` and either `size` or `funds`.
    pub fn place_market_order(
        &self,
        side: Side,
        product_id: &str,
        amount: MarketAmount,
        options: &OrderOptions,
    ) -> Result<RequestDescriptor, ExchangeError> {
        let amount = match amount {
            MarketAmount::Size(size) => ("size", text(size)),
            MarketAmount::Funds(funds) => ("funds", text(funds)),
        };
        self.order_request(
            side,
            product_id,
            options,
            [("type", text(OrderType::Market)), amount],
        )
    }

    /// `POST /orders` with `type=stop`.
    pub fn place_stop_order(
        &self,
        side: Side,
        product_id: &str,
        price: Decimal,
        size: Decimal,
        options: &OrderOptions,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.order_request(
            side,
            product_id,
            options,
            [
                ("type", text(OrderType::Stop)),
                ("price", text(price)),
                ("size", text(size)),
            ],
        )
    }

    fn order_request<const N: usize>(
        &self,
        side: Side,
        product_id: &str,
        options: &OrderOptions,
        required: [(&'static str, Value); N],
    ) -> Result<RequestDescriptor, ExchangeError> {
        let product_id = normalize_symbol(require_id("product", product_id)?);
        let body = merge_body(
            options,
            [("side", text(side)), ("product_id", Value::String(product_id))]
                .into_iter()
                .chain(required),
        )?;
        RequestDescriptor::post(self.url(private::ORDERS, &[], None)?).with_json_body(&body)
    }

    /// `DELETE /orders/{id}`
    pub fn cancel_order(&self, order_id: &str) -> Result<RequestDescriptor, ExchangeError> {
        let id = require_id("order", order_id)?;
        Ok(RequestDescriptor::delete(self.url(private::ORDERS, &[id], None)?))
    }

    /// `DELETE /orders`, optionally restricted to one product.
    pub fn cancel_all(&self, product_id: Option<&str>) -> Result<RequestDescriptor, ExchangeError> {
        let mut query = QueryParams::new();
        query.push_opt("product_id", product_id.map(normalize_symbol));
        Ok(RequestDescriptor::delete(self.url(private::ORDERS, &[], Some(&query))?))
    }

    /// `GET /orders`
    ///
    /// Each status becomes its own `status=` pair, in the order given.
    pub fn get_orders(
        &self,
        product_id: Option<&str>,
        statuses: &[OrderStatus],
        pagination: &Pagination,
    ) -> Result<RequestDescriptor, ExchangeError> {
        let mut query = QueryParams::new();
        query
            .push_opt("product_id", product_id.map(normalize_symbol))
            .push_each("status", statuses);
        pagination.append_to(&mut query);
        Ok(RequestDescriptor::get(self.url(private::ORDERS, &[], Some(&query))?))
    }

    /// `GET /orders/{id}`
    pub fn get_order(&self, order_id: &str) -> Result<RequestDescriptor, ExchangeError> {
        let id = require_id("order", order_id)?;
        Ok(RequestDescriptor::get(self.url(private::ORDERS, &[id], None)?))
    }

    /// `GET /fills`
    pub fn get_fills(
        &self,
        filter: &FillsFilter,
        pagination: &Pagination,
    ) -> Result<RequestDescriptor, ExchangeError> {
        if filter.order_id.is_none() && filter.product_id.is_none() {
            return Err(ExchangeError::InvalidRequest(
                "fills require an order_id or a product_id".to_string(),
            ));
        }

        let mut query = QueryParams::new();
        query
            .push_opt("order_id", filter.order_id.as_deref())
            .push_opt("product_id", filter.product_id.as_deref().map(normalize_symbol));
        pagination.append_to(&mut query);
        Ok(RequestDescriptor::get(self.url(private::FILLS, &[], Some(&query))?))
    }
}

impl RestClient {
    /// Place an order with caller-chosen options.
    pub async fn place_order(
        &self,
        side: Side,
        product_id: &str,
        options: &OrderOptions,
    ) -> Result<Order, ExchangeError> {
        self.execute(self.requests().place_order(side, product_id, options)?)
            .await
    }

    /// Place a limit order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_exchange_client::auth::StaticCredentials;
    /// use coinbase_exchange_client::rest::RestClient;
    /// use coinbase_exchange_client::rest::private::OrderOptions;
    /// use coinbase_exchange_client::Side;
    /// use rust_decimal::Decimal;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = Arc::new(StaticCredentials::new("key", "c2VjcmV0", "passphrase"));
    ///     let client = RestClient::builder().sandbox().credentials(credentials).build();
    ///
    ///     let order = client
    ///         .place_limit_order(
    ///             Side::Buy,
    ///             "btc-usd",
    ///             Decimal::new(100, 0),
    ///             Decimal::new(1, 2),
    ///             &OrderOptions::new().post_only(true),
    ///         )
    ///         .await?;
    ///     println!("placed {}", order.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn place_limit_order(
        &self,
        side: Side,
        product_id: &str,
        price: Decimal,
        size: Decimal,
        options: &OrderOptions,
    ) -> Result<Order, ExchangeError> {
        self.execute(
            self.requests()
                .place_limit_order(side, product_id, price, size, options)?,
        )
        .await
    }

    /// Place a market order.
    pub async fn place_market_order(
        &self,
        side: Side,
        product_id: &str,
        amount: MarketAmount,
        options: &OrderOptions,
    ) -> Result<Order, ExchangeError> {
        self.execute(
            self.requests()
                .place_market_order(side, product_id, amount, options)?,
        )
        .await
    }

    /// Place a stop order.
    pub async fn place_stop_order(
        &self,
        side: Side,
        product_id: &str,
        price: Decimal,
        size: Decimal,
        options: &OrderOptions,
    ) -> Result<Order, ExchangeError> {
        self.execute(
            self.requests()
                .place_stop_order(side, product_id, price, size, options)?,
        )
        .await
    }

    /// Cancel one order. Returns the canceled order ID.
    pub async fn cancel_order(&self, order_id: &str) -> Result<String, ExchangeError> {
        self.execute(self.requests().cancel_order(order_id)?).await
    }

    /// Cancel all open orders. Returns the canceled order IDs.
    pub async fn cancel_all(&self, product_id: Option<&str>) -> Result<Vec<String>, ExchangeError> {
        self.execute(self.requests().cancel_all(product_id)?).await
    }

    /// List orders filtered by status.
    pub async fn get_orders(
        &self,
        product_id: Option<&str>,
        statuses: &[OrderStatus],
        pagination: &Pagination,
    ) -> Result<Page<Order>, ExchangeError> {
        self.execute_paged(self.requests().get_orders(product_id, statuses, pagination)?)
            .await
    }

    /// Get a single order.
    pub async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.execute(self.requests().get_order(order_id)?).await
    }

    /// List fills of an order or product.
    pub async fn get_fills(
        &self,
        filter: &FillsFilter,
        pagination: &Pagination,
    ) -> Result<Page<Fill>, ExchangeError> {
        self.execute_paged(self.requests().get_fills(filter, pagination)?)
            .await
    }
}

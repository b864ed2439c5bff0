//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::ExchangeError;
use crate::rest::builder::{RequestBuilder, normalize_symbol, require_id};
use crate::rest::endpoints::public;
use crate::rest::{RequestDescriptor, RestClient};

impl RequestBuilder {
    /// `GET /time`
    pub fn get_server_time(&self) -> Result<RequestDescriptor, ExchangeError> {
        Ok(RequestDescriptor::get(self.url(public::TIME, &[], None)?))
    }

    /// `GET /products`
    pub fn list_products(&self) -> Result<RequestDescriptor, ExchangeError> {
        Ok(RequestDescriptor::get(self.url(public::PRODUCTS, &[], None)?))
    }

    /// `GET /products/{id}/ticker`
    pub fn get_product_ticker(&self, product_id: &str) -> Result<RequestDescriptor, ExchangeError> {
        let product_id = normalize_symbol(require_id("product", product_id)?);
        Ok(RequestDescriptor::get(self.url(
            public::PRODUCTS,
            &[product_id.as_str(), public::TICKER],
            None,
        )?))
    }
}

impl RestClient {
    /// Get the server time.
    ///
    /// This is useful for checking clock skew before signing requests.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_exchange_client::rest::RestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = RestClient::new();
    ///     let time = client.get_server_time().await?;
    ///     println!("Server time: {} ({})", time.epoch, time.iso);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.execute_public(self.requests().get_server_time()?).await
    }

    /// List the products available for trading.
    pub async fn list_products(&self) -> Result<Vec<Product>, ExchangeError> {
        self.execute_public(self.requests().list_products()?).await
    }

    /// Get the latest trade, best bid and best ask of a product.
    pub async fn get_product_ticker(&self, product_id: &str) -> Result<ProductTicker, ExchangeError> {
        self.execute_public(self.requests().get_product_ticker(product_id)?)
            .await
    }
}

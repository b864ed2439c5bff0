//! Example: Placing, listing and cancelling orders on the sandbox.
//!
//! Always targets the public sandbox. Credentials come from the same
//! environment variables as the `accounts` example, and must be sandbox keys.
//!
//! Run with: cargo run --example place_orders

use std::sync::Arc;

use coinbase_exchange_client::auth::EnvCredentials;
use coinbase_exchange_client::rest::RestClient;
use coinbase_exchange_client::rest::private::{FillsFilter, OrderOptions, Pagination};
use coinbase_exchange_client::types::{SelfTradePrevention, TimeInForce};
use coinbase_exchange_client::{ExchangeError, OrderStatus, Side};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt::init();

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => Arc::new(creds),
        None => {
            println!("Set COINBASE_API_KEY, COINBASE_API_SECRET and COINBASE_API_PASSPHRASE to run this example.");
            return Ok(());
        }
    };
    let client = RestClient::builder()
        .sandbox()
        .credentials(credentials)
        .build();

    // A far-from-market post-only bid that rests on the book.
    let options = OrderOptions::new()
        .post_only(true)
        .time_in_force(TimeInForce::GTC)
        .stp(SelfTradePrevention::CancelOldest);
    let order = client
        .place_limit_order(
            Side::Buy,
            "BTC-USD",
            Decimal::new(100, 0),
            Decimal::new(1, 3),
            &options,
        )
        .await?;
    println!("Placed {} ({:?})", order.id, order.status);

    let open = client
        .get_orders(
            Some("BTC-USD"),
            &[OrderStatus::Open, OrderStatus::Pending],
            &Pagination::limit(20),
        )
        .await?;
    println!("{} open BTC-USD orders", open.items.len());

    let canceled = client.cancel_order(&order.id).await?;
    println!("Canceled {}", canceled);

    match client.get_order(&order.id).await {
        Ok(order) => println!("Order is now {:?}", order.status),
        // Canceled orders without fills are purged.
        Err(ExchangeError::Api(error)) if error.is_not_found() => println!("Order purged"),
        Err(error) => return Err(error.into()),
    }

    let fills = client
        .get_fills(&FillsFilter::product("BTC-USD"), &Pagination::limit(5))
        .await?;
    for fill in &fills.items {
        println!("Fill {}: {} @ {}", fill.trade_id, fill.size, fill.price);
    }

    Ok(())
}

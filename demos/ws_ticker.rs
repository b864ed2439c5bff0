//! Example: Streaming ticker data from the WebSocket feed.
//!
//! Prints 50 ticker updates for BTC-USD and ETH-USD, then closes.
//!
//! Run with: cargo run --example ws_ticker

use std::ops::ControlFlow;

use coinbase_exchange_client::ExchangeError;
use coinbase_exchange_client::feed::{FeedClient, FeedEvent, FeedHandler, channels};

struct TickerPrinter {
    remaining: usize,
}

impl FeedHandler for TickerPrinter {
    fn on_connect(&mut self) -> ControlFlow<()> {
        println!("Connected! Waiting for ticker updates...\n");
        ControlFlow::Continue(())
    }

    fn on_message(&mut self, event: FeedEvent) -> ControlFlow<()> {
        match event {
            FeedEvent::Subscriptions(subscriptions) => {
                for channel in subscriptions.channels {
                    println!("[Subscribed] {} {:?}", channel.name, channel.product_ids);
                }
            }
            FeedEvent::Ticker(ticker) => {
                println!(
                    "[Ticker] {} | Last: {} | Bid: {:?} | Ask: {:?} | Vol 24h: {:?}",
                    ticker.product_id,
                    ticker.price,
                    ticker.best_bid,
                    ticker.best_ask,
                    ticker.volume_24h
                );
                self.remaining -= 1;
                if self.remaining == 0 {
                    println!("\nReceived 50 tickers, closing...");
                    return ControlFlow::Break(());
                }
            }
            FeedEvent::Error(error) => {
                println!("[Error] {} {:?}", error.message, error.reason);
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn on_error(&mut self, error: &ExchangeError) -> ControlFlow<()> {
        println!("[Error] {}", error);
        ControlFlow::Continue(())
    }

    fn on_close(&mut self, code: u16, reason: &str) {
        println!("[Closed] {} {}", code, reason);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Connecting to the Coinbase Exchange feed...");

    let client = FeedClient::new();
    let mut session = client.subscribe(
        ["BTC-USD", "ETH-USD"],
        [channels::TICKER],
        TickerPrinter { remaining: 50 },
    )?;

    tokio::select! {
        result = session.closed() => result?,
        _ = tokio::signal::ctrl_c() => session.close().await?,
    }

    println!("Session {:?}", session.state());
    Ok(())
}

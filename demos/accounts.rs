//! Example: Account balances, ledger history and holds.
//!
//! Reads credentials from `COINBASE_API_KEY`, `COINBASE_API_SECRET` and
//! `COINBASE_API_PASSPHRASE` (a `.env` file works too). Set
//! `COINBASE_REST_URL` to target the sandbox.
//!
//! Run with: cargo run --example accounts

use coinbase_exchange_client::ClientConfig;
use coinbase_exchange_client::rest::private::Pagination;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    if config.credentials().is_none() {
        println!("Set COINBASE_API_KEY, COINBASE_API_SECRET and COINBASE_API_PASSPHRASE to run this example.");
        return Ok(());
    }
    let client = config.rest_client();

    let accounts = client.list_accounts().await?;
    for account in &accounts {
        println!(
            "{:>6}: balance {} (available {}, hold {})",
            account.currency, account.balance, account.available, account.hold
        );
    }

    let Some(account) = accounts.iter().find(|a| !a.balance.is_zero()) else {
        println!("No funded accounts.");
        return Ok(());
    };

    let history = client
        .get_account_history(&account.id, &Pagination::limit(10))
        .await?;
    println!("\nLast {} ledger entries for {}:", history.items.len(), account.currency);
    for entry in &history.items {
        println!("  {} {:>10} {}", entry.created_at, entry.entry_type, entry.amount);
    }
    if let Some(cursor) = history.after {
        println!("  (older entries: Pagination::after({cursor:?}))");
    }

    let holds = client
        .get_account_holds(&account.id, &Pagination::default())
        .await?;
    println!("\n{} holds on {}", holds.items.len(), account.currency);

    Ok(())
}

//! Account endpoints: balances, ledger history and holds.

use crate::error::ExchangeError;
use crate::rest::builder::{RequestBuilder, require_id};
use crate::rest::endpoints::private;
use crate::rest::private::{Account, Hold, LedgerEntry, Pagination};
use crate::rest::{Page, QueryParams, RequestDescriptor, RestClient};

impl RequestBuilder {
    /// `GET /accounts`
    pub fn list_accounts(&self) -> Result<RequestDescriptor, ExchangeError> {
        Ok(RequestDescriptor::get(self.url(private::ACCOUNTS, &[], None)?))
    }

    /// `GET /accounts/{id}`
    pub fn get_account(&self, account_id: &str) -> Result<RequestDescriptor, ExchangeError> {
        let id = require_id("account", account_id)?;
        Ok(RequestDescriptor::get(self.url(private::ACCOUNTS, &[id], None)?))
    }

    /// `GET /accounts/{id}/ledger`
    pub fn get_account_history(
        &self,
        account_id: &str,
        pagination: &Pagination,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.account_listing(account_id, private::LEDGER, pagination)
    }

    /// `GET /accounts/{id}/holds`
    pub fn get_account_holds(
        &self,
        account_id: &str,
        pagination: &Pagination,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.account_listing(account_id, private::HOLDS, pagination)
    }

    fn account_listing(
        &self,
        account_id: &str,
        listing: &str,
        pagination: &Pagination,
    ) -> Result<RequestDescriptor, ExchangeError> {
        let id = require_id("account", account_id)?;
        let mut query = QueryParams::new();
        pagination.append_to(&mut query);
        Ok(RequestDescriptor::get(self.url(
            private::ACCOUNTS,
            &[id, listing],
            Some(&query),
        )?))
    }
}

impl RestClient {
    /// List all trading accounts of the profile.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_exchange_client::auth::StaticCredentials;
    /// use coinbase_exchange_client::rest::RestClient;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = Arc::new(StaticCredentials::new("key", "c2VjcmV0", "passphrase"));
    ///     let client = RestClient::builder().credentials(credentials).build();
    ///
    ///     for account in client.list_accounts().await? {
    ///         println!("{}: {} available", account.currency, account.available);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ExchangeError> {
        self.execute(self.requests().list_accounts()?).await
    }

    /// Get a single account.
    pub async fn get_account(&self, account_id: &str) -> Result<Account, ExchangeError> {
        self.execute(self.requests().get_account(account_id)?).await
    }

    /// Get one page of an account's ledger.
    pub async fn get_account_history(
        &self,
        account_id: &str,
        pagination: &Pagination,
    ) -> Result<Page<LedgerEntry>, ExchangeError> {
        self.execute_paged(self.requests().get_account_history(account_id, pagination)?)
            .await
    }

    /// Get one page of an account's holds.
    pub async fn get_account_holds(
        &self,
        account_id: &str,
        pagination: &Pagination,
    ) -> Result<Page<Hold>, ExchangeError> {
        self.execute_paged(self.requests().get_account_holds(account_id, pagination)?)
            .await
    }
}

//! Funding endpoints: linked payment methods, Coinbase wallets, deposits and withdrawals.

use rust_decimal::Decimal;

use crate::error::ExchangeError;
use crate::rest::builder::{RequestBuilder, normalize_symbol, require_id};
use crate::rest::endpoints::private;
use crate::rest::private::{CoinbaseAccount, PaymentMethod, TransferBody, TransferReceipt};
use crate::rest::{RequestDescriptor, RestClient};

/// Where the funds of a transfer come from or go to.
enum Counterparty<'a> {
    CoinbaseAccount(&'a str),
    PaymentMethod(&'a str),
    CryptoAddress(&'a str),
}

impl RequestBuilder {
    /// `GET /payment-methods`
    pub fn list_payment_methods(&self) -> Result<RequestDescriptor, ExchangeError> {
        Ok(RequestDescriptor::get(self.url(private::PAYMENT_METHODS, &[], None)?))
    }

    /// `GET /coinbase-accounts`
    pub fn list_coinbase_accounts(&self) -> Result<RequestDescriptor, ExchangeError> {
        Ok(RequestDescriptor::get(self.url(private::COINBASE_ACCOUNTS, &[], None)?))
    }

    /// `POST /deposits/coinbase-account`
    pub fn deposit_from_coinbase(
        &self,
        amount: Decimal,
        currency: &str,
        coinbase_account_id: &str,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.transfer(
            private::DEPOSIT_COINBASE_ACCOUNT,
            amount,
            currency,
            Counterparty::CoinbaseAccount(coinbase_account_id),
        )
    }

    /// `POST /deposits/payment-method`
    pub fn deposit_from_payment_method(
        &self,
        amount: Decimal,
        currency: &str,
        payment_method_id: &str,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.transfer(
            private::DEPOSIT_PAYMENT_METHOD,
            amount,
            currency,
            Counterparty::PaymentMethod(payment_method_id),
        )
    }

    /// `POST /withdrawals/coinbase-account`
    pub fn withdraw_to_coinbase(
        &self,
        amount: Decimal,
        currency: &str,
        coinbase_account_id: &str,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.transfer(
            private::WITHDRAW_COINBASE_ACCOUNT,
            amount,
            currency,
            Counterparty::CoinbaseAccount(coinbase_account_id),
        )
    }

    /// `POST /withdrawals/payment-method`
    pub fn withdraw_to_payment_method(
        &self,
        amount: Decimal,
        currency: &str,
        payment_method_id: &str,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.transfer(
            private::WITHDRAW_PAYMENT_METHOD,
            amount,
            currency,
            Counterparty::PaymentMethod(payment_method_id),
        )
    }

    /// `POST /withdrawals/crypto`
    pub fn withdraw_to_crypto(
        &self,
        amount: Decimal,
        currency: &str,
        crypto_address: &str,
    ) -> Result<RequestDescriptor, ExchangeError> {
        self.transfer(
            private::WITHDRAW_CRYPTO,
            amount,
            currency,
            Counterparty::CryptoAddress(crypto_address),
        )
    }

    fn transfer(
        &self,
        path: &str,
        amount: Decimal,
        currency: &str,
        counterparty: Counterparty<'_>,
    ) -> Result<RequestDescriptor, ExchangeError> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidRequest(format!(
                "transfer amount must be positive, got {amount}"
            )));
        }

        let mut body = TransferBody {
            amount,
            currency: normalize_symbol(require_id("currency", currency)?),
            coinbase_account_id: None,
            payment_method_id: None,
            crypto_address: None,
        };
        match counterparty {
            Counterparty::CoinbaseAccount(id) => {
                body.coinbase_account_id = Some(require_id("coinbase account", id)?);
            }
            Counterparty::PaymentMethod(id) => {
                body.payment_method_id = Some(require_id("payment method", id)?);
            }
            Counterparty::CryptoAddress(address) => {
                body.crypto_address = Some(require_id("crypto address", address)?);
            }
        }

        RequestDescriptor::post(self.url(path, &[], None)?).with_json_body(&body)
    }
}

impl RestClient {
    /// List linked payment methods.
    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, ExchangeError> {
        self.execute(self.requests().list_payment_methods()?).await
    }

    /// List linked Coinbase wallets.
    pub async fn list_coinbase_accounts(&self) -> Result<Vec<CoinbaseAccount>, ExchangeError> {
        self.execute(self.requests().list_coinbase_accounts()?).await
    }

    /// Move funds from a Coinbase wallet into the exchange.
    pub async fn deposit_from_coinbase(
        &self,
        amount: Decimal,
        currency: &str,
        coinbase_account_id: &str,
    ) -> Result<TransferReceipt, ExchangeError> {
        self.execute(
            self.requests()
                .deposit_from_coinbase(amount, currency, coinbase_account_id)?,
        )
        .await
    }

    /// Deposit funds from a linked payment method.
    pub async fn deposit_from_payment_method(
        &self,
        amount: Decimal,
        currency: &str,
        payment_method_id: &str,
    ) -> Result<TransferReceipt, ExchangeError> {
        self.execute(
            self.requests()
                .deposit_from_payment_method(amount, currency, payment_method_id)?,
        )
        .await
    }

    /// Move funds from the exchange to a Coinbase wallet.
    pub async fn withdraw_to_coinbase(
        &self,
        amount: Decimal,
        currency: &str,
        coinbase_account_id: &str,
    ) -> Result<TransferReceipt, ExchangeError> {
        self.execute(
            self.requests()
                .withdraw_to_coinbase(amount, currency, coinbase_account_id)?,
        )
        .await
    }

    /// Withdraw funds to a linked payment method.
    pub async fn withdraw_to_payment_method(
        &self,
        amount: Decimal,
        currency: &str,
        payment_method_id: &str,
    ) -> Result<TransferReceipt, ExchangeError> {
        self.execute(
            self.requests()
                .withdraw_to_payment_method(amount, currency, payment_method_id)?,
        )
        .await
    }

    /// Withdraw funds to an external crypto address.
    pub async fn withdraw_to_crypto(
        &self,
        amount: Decimal,
        currency: &str,
        crypto_address: &str,
    ) -> Result<TransferReceipt, ExchangeError> {
        self.execute(
            self.requests()
                .withdraw_to_crypto(amount, currency, crypto_address)?,
        )
        .await
    }
}

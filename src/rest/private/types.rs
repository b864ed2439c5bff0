//! Types for private REST API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

use crate::rest::request::QueryParams;
use crate::types::serde_helpers::{empty_string_as_none, optional_decimal};
use crate::types::{
    CancelAfter, OrderStatus, OrderType, SelfTradePrevention, Side, StopDirection, TimeInForce,
};

// ========== Pagination ==========

/// Cursor pagination for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Return items newer than this cursor.
    pub before: Option<String>,
    /// Return items older than this cursor.
    pub after: Option<String>,
    /// Maximum number of items (exchange default 100).
    pub limit: Option<u32>,
}

impl Pagination {
    /// Limit the page size.
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Continue after the given cursor (older items).
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..Self::default()
        }
    }

    /// Continue before the given cursor (newer items).
    pub fn before(cursor: impl Into<String>) -> Self {
        Self {
            before: Some(cursor.into()),
            ..Self::default()
        }
    }

    pub(crate) fn append_to(&self, query: &mut QueryParams) {
        query
            .push_opt("before", self.before.as_deref())
            .push_opt("after", self.after.as_deref())
            .push_opt("limit", self.limit);
    }
}

// ========== Accounts ==========

/// A trading account for one currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: String,
    /// Currency of the account.
    pub currency: String,
    /// Total funds in the account.
    pub balance: Decimal,
    /// Funds available for trading or withdrawal.
    pub available: Decimal,
    /// Funds on hold.
    pub hold: Decimal,
    /// Profile the account belongs to.
    #[serde(default)]
    pub profile_id: Option<String>,
    /// Whether the account can trade.
    #[serde(default)]
    pub trading_enabled: Option<bool>,
}

/// An entry in an account's ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerEntry {
    /// Entry ID.
    pub id: String,
    /// When the entry was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Amount of the entry.
    pub amount: Decimal,
    /// Balance after the entry.
    pub balance: Decimal,
    /// Entry type (`transfer`, `match`, `fee`, `rebate`, `conversion`).
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Type-specific details (order id, trade id, product id...).
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// A hold placed on account funds.
#[derive(Debug, Clone, Deserialize)]
pub struct Hold {
    /// Hold ID.
    pub id: String,
    /// When the hold was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Held amount.
    pub amount: Decimal,
    /// Why the funds are held (`order` or `transfer`).
    #[serde(rename = "type")]
    pub hold_type: String,
    /// ID of the order or transfer holding the funds.
    #[serde(rename = "ref")]
    pub reference: String,
}

// ========== Orders ==========

/// Optional order fields supplied by the caller.
///
/// Fields an operation requires (`side`, `product_id`, `type`, and `price`/`size`
/// for limit and stop orders) are injected by the operation and always replace
/// any value given here or in `extra`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderOptions {
    /// Client-generated UUID echoed in feed messages.
    pub client_oid: Option<String>,
    /// Order type for the generic `place_order` operation.
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    /// Price per unit.
    pub price: Option<Decimal>,
    /// Amount of base currency.
    pub size: Option<Decimal>,
    /// Amount of quote currency to spend (market orders).
    pub funds: Option<Decimal>,
    /// Self-trade prevention flag.
    pub stp: Option<SelfTradePrevention>,
    /// Time in force.
    pub time_in_force: Option<TimeInForce>,
    /// Expiry window for `GTT` orders.
    pub cancel_after: Option<CancelAfter>,
    /// Only add liquidity.
    pub post_only: Option<bool>,
    /// Stop direction.
    pub stop: Option<StopDirection>,
    /// Trigger price for stop orders.
    pub stop_price: Option<Decimal>,
    /// Additional raw fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client order ID.
    pub fn client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }

    /// Set the time in force.
    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    /// Set post-only.
    pub fn post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    /// Set self-trade prevention.
    pub fn stp(mut self, stp: SelfTradePrevention) -> Self {
        self.stp = Some(stp);
        self
    }

    /// Add a raw field.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// How much a market order buys or sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketAmount {
    /// Amount of base currency.
    Size(Decimal),
    /// Amount of quote currency.
    Funds(Decimal),
}

/// An order as reported by the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: String,
    /// Product the order trades.
    pub product_id: String,
    /// Order side.
    pub side: Side,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Order status.
    pub status: OrderStatus,
    /// Limit price.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub price: Option<Decimal>,
    /// Order size.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub size: Option<Decimal>,
    /// Quote funds for market orders.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub funds: Option<Decimal>,
    /// Time in force.
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    /// Whether the order is post-only.
    #[serde(default)]
    pub post_only: bool,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Completion time.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub done_at: Option<OffsetDateTime>,
    /// Why the order is done (`filled`, `canceled`).
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Fees paid so far.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub fill_fees: Option<Decimal>,
    /// Filled base amount.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub filled_size: Option<Decimal>,
    /// Executed quote value.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub executed_value: Option<Decimal>,
    /// Whether the order has settled.
    #[serde(default)]
    pub settled: bool,
    /// Stop direction.
    #[serde(default)]
    pub stop: Option<StopDirection>,
    /// Stop trigger price.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub stop_price: Option<Decimal>,
}

/// A fill (partial or full execution of an order).
#[derive(Debug, Clone, Deserialize)]
pub struct Fill {
    /// Trade ID.
    pub trade_id: u64,
    /// Product traded.
    pub product_id: String,
    /// Order that was filled.
    pub order_id: String,
    /// Fill price.
    pub price: Decimal,
    /// Fill size.
    pub size: Decimal,
    /// Fee charged.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub fee: Option<Decimal>,
    /// `M` for maker, `T` for taker.
    pub liquidity: String,
    /// Order side.
    pub side: Side,
    /// Whether the fill has settled.
    #[serde(default)]
    pub settled: bool,
    /// Fill time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Filters for the fills endpoint.
///
/// The exchange requires at least one of `order_id` or `product_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillsFilter {
    /// Only fills of this order.
    pub order_id: Option<String>,
    /// Only fills of this product.
    pub product_id: Option<String>,
}

impl FillsFilter {
    /// Fills of one order.
    pub fn order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            product_id: None,
        }
    }

    /// Fills of one product.
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            order_id: None,
            product_id: Some(product_id.into()),
        }
    }
}

// ========== Funding ==========

/// A linked payment method.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    /// Payment method ID.
    pub id: String,
    /// Method type (`ach_bank_account`, `fiat_account`...).
    #[serde(rename = "type")]
    pub method_type: String,
    /// Display name.
    pub name: String,
    /// Currency of the method.
    pub currency: String,
    /// Whether buying with the method is allowed.
    #[serde(default)]
    pub allow_buy: bool,
    /// Whether selling to the method is allowed.
    #[serde(default)]
    pub allow_sell: bool,
    /// Whether deposits are allowed.
    #[serde(default)]
    pub allow_deposit: bool,
    /// Whether withdrawals are allowed.
    #[serde(default)]
    pub allow_withdraw: bool,
}

/// A linked Coinbase wallet.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinbaseAccount {
    /// Wallet ID.
    pub id: String,
    /// Wallet name.
    pub name: String,
    /// Wallet balance.
    pub balance: Decimal,
    /// Wallet currency.
    pub currency: String,
    /// Wallet type (`wallet`, `fiat`, `vault`).
    #[serde(rename = "type")]
    pub account_type: String,
    /// Whether this is the primary wallet.
    #[serde(default)]
    pub primary: bool,
    /// Whether the wallet is active.
    #[serde(default)]
    pub active: bool,
}

/// Receipt returned for deposits and withdrawals.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferReceipt {
    /// Transfer ID.
    pub id: String,
    /// Transferred amount.
    pub amount: Decimal,
    /// Transferred currency.
    pub currency: String,
    /// Scheduled payout time.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub payout_at: Option<OffsetDateTime>,
    /// Fee charged.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub fee: Option<Decimal>,
    /// Amount after fees.
    #[serde(deserialize_with = "optional_decimal::deserialize", default)]
    pub subtotal: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransferBody<'a> {
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase_account_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_address: Option<&'a str>,
}

// ========== Reports ==========

/// Kind of report to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Fills of one product.
    Fills,
    /// Ledger of one account.
    Account,
}

/// Report file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// PDF (exchange default).
    #[default]
    Pdf,
    /// CSV.
    Csv,
}

/// Request to generate a report.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    /// Report kind.
    #[serde(rename = "type")]
    pub report_type: ReportType,
    /// Start of the reporting window.
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    /// End of the reporting window.
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    /// Product, required for fills reports.
    pub product_id: Option<String>,
    /// Account, required for account reports.
    pub account_id: Option<String>,
    /// Output format.
    pub format: Option<ReportFormat>,
    /// Address to email the report to.
    pub email: Option<String>,
}

impl ReportRequest {
    /// A fills report for one product.
    pub fn fills(
        product_id: impl Into<String>,
        start_date: OffsetDateTime,
        end_date: OffsetDateTime,
    ) -> Self {
        Self {
            report_type: ReportType::Fills,
            start_date,
            end_date,
            product_id: Some(product_id.into()),
            account_id: None,
            format: None,
            email: None,
        }
    }

    /// An account ledger report.
    pub fn account(
        account_id: impl Into<String>,
        start_date: OffsetDateTime,
        end_date: OffsetDateTime,
    ) -> Self {
        Self {
            report_type: ReportType::Account,
            start_date,
            end_date,
            product_id: None,
            account_id: Some(account_id.into()),
            format: None,
            email: None,
        }
    }

    /// Set the output format.
    pub fn format(mut self, format: ReportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Email the finished report.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Status of a generated report.
#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    /// Report ID.
    pub id: String,
    /// Report kind.
    #[serde(rename = "type")]
    pub report_type: ReportType,
    /// `pending`, `creating` or `ready`.
    pub status: String,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub created_at: Option<OffsetDateTime>,
    /// Completion time.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub completed_at: Option<OffsetDateTime>,
    /// Expiry of the download link.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub expires_at: Option<OffsetDateTime>,
    /// Download link once ready.
    #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
    pub file_url: Option<String>,
}

impl Report {
    /// Whether the report file can be downloaded.
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

// ========== Users ==========

/// 30-day trailing volume for one product.
#[derive(Debug, Clone, Deserialize)]
pub struct TrailingVolume {
    /// Product ID.
    pub product_id: String,
    /// Total exchange volume.
    pub exchange_volume: Decimal,
    /// Your volume.
    pub volume: Decimal,
    /// When the figures were recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

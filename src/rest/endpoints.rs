//! Coinbase Exchange REST API endpoint constants.

/// Base URL for the production REST API.
pub const PRODUCTION_REST_URL: &str = "https://api.exchange.coinbase.com";

/// Base URL for the public sandbox REST API.
pub const SANDBOX_REST_URL: &str = "https://api-public.sandbox.exchange.coinbase.com";

/// Public endpoints (no authentication required).
pub mod public {
    /// Get server time.
    pub const TIME: &str = "/time";
    /// List tradable products.
    pub const PRODUCTS: &str = "/products";
    /// Suffix of the per-product ticker endpoint (`/products/{id}/ticker`).
    pub const TICKER: &str = "ticker";
}

/// Private endpoints (authentication required).
pub mod private {
    // Account endpoints
    /// List accounts; `/accounts/{id}` for a single account.
    pub const ACCOUNTS: &str = "/accounts";
    /// Suffix of the account ledger endpoint (`/accounts/{id}/ledger`).
    pub const LEDGER: &str = "ledger";
    /// Suffix of the account holds endpoint (`/accounts/{id}/holds`).
    pub const HOLDS: &str = "holds";

    // Trading endpoints
    /// Place, list and cancel orders; `/orders/{id}` for a single order.
    pub const ORDERS: &str = "/orders";
    /// List fills.
    pub const FILLS: &str = "/fills";

    // Funding endpoints
    /// List linked payment methods.
    pub const PAYMENT_METHODS: &str = "/payment-methods";
    /// List linked Coinbase wallets.
    pub const COINBASE_ACCOUNTS: &str = "/coinbase-accounts";
    /// Deposit from a Coinbase wallet.
    pub const DEPOSIT_COINBASE_ACCOUNT: &str = "/deposits/coinbase-account";
    /// Deposit from a payment method.
    pub const DEPOSIT_PAYMENT_METHOD: &str = "/deposits/payment-method";
    /// Withdraw to a Coinbase wallet.
    pub const WITHDRAW_COINBASE_ACCOUNT: &str = "/withdrawals/coinbase-account";
    /// Withdraw to a payment method.
    pub const WITHDRAW_PAYMENT_METHOD: &str = "/withdrawals/payment-method";
    /// Withdraw to a crypto address.
    pub const WITHDRAW_CRYPTO: &str = "/withdrawals/crypto";

    // Report endpoints
    /// Create reports; `/reports/{id}` for report status.
    pub const REPORTS: &str = "/reports";

    // User endpoints
    /// 30-day trailing volume per product.
    pub const TRAILING_VOLUME: &str = "/users/self/trailing-volume";
    /// Path signed when authenticating a WebSocket feed subscription.
    pub const VERIFY: &str = "/users/self/verify";
}

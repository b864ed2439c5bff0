//! Authentication module for the Coinbase Exchange API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Clock abstraction for request timestamps
//! - HMAC-SHA256 request signing producing the `CB-ACCESS-*` headers

mod clock;
mod credentials;
mod signature;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::{
    Credentials, CredentialsProvider, ENV_API_KEY, ENV_API_PASSPHRASE, ENV_API_SECRET,
    EnvCredentials, StaticCredentials,
};
pub use signature::{
    CB_ACCESS_KEY, CB_ACCESS_PASSPHRASE, CB_ACCESS_SIGN, CB_ACCESS_TIMESTAMP, compute_signature,
    prehash, request_path, sign_request,
};

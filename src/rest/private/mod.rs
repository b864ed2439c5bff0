//! Private REST API endpoints (authentication required).
//!
//! Each endpoint has two entry points:
//! - a [`RequestBuilder`](crate::rest::RequestBuilder) method returning the
//!   unsigned descriptor, and
//! - a [`RestClient`](crate::rest::RestClient) method that signs, sends and
//!   decodes it.

mod accounts;
mod funding;
mod orders;
mod reports;
mod types;

pub use types::*;

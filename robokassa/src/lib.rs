//! Robokassa: signed payment gateway client
//!
//! A Rust client for the Robokassa payment gateway. It builds signed payment
//! creation requests, queries payment status, initiates recurring charges, and
//! verifies the signatures of inbound Result URL callbacks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Caller      │  shop backend, CLI
//! └────────┬────────┘
//!          │ PaymentRequest / invoice id / callback
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │           GatewayClient (this crate)            │
//! │  ┌────────────┐  ┌──────────┐  ┌────────────┐  │
//! │  │ signature  │  │  codec   │  │ transport  │  │
//! │  │ (SHA-512)  │  │ (form,   │  │ (reqwest,  │  │
//! │  │            │  │  JSON,   │  │  timeouts) │  │
//! │  │            │  │  XML)    │  │            │  │
//! │  └────────────┘  └──────────┘  └────────────┘  │
//! └────────┬───────────────────────────────────────┘
//!          │ application/x-www-form-urlencoded
//!          │
//! ┌────────▼────────┐
//! │    Robokassa    │
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Create a Payment
//!
//! ```rust,no_run
//! use robokassa::gateway::{GatewayClient, GatewayConfig, PaymentRequest};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> robokassa::error::Result<()> {
//! let config = GatewayConfig::from_file("robokassa.toml")?;
//! let client = GatewayClient::new(config)?;
//!
//! let request = PaymentRequest::new(123, Decimal::new(49_900, 2), "Order #123");
//! let result = client.create_payment(&request).await?;
//!
//! if result.is_success() {
//!     println!("Pay at {}", result.link.unwrap_or_default());
//! } else {
//!     println!("Rejected: {}", result.error);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Verify a Result URL Callback
//!
//! ```
//! use robokassa::{
//!     gateway::{CallbackParams, Credentials, GatewayClient, GatewayConfig},
//!     signature::digest,
//! };
//!
//! # fn example() -> robokassa::error::Result<()> {
//! let config = GatewayConfig::new("https://auth.robokassa.ru")
//!     .with_account("main", Credentials::new("shop", "password1", "password2"));
//! let client = GatewayClient::new(config)?;
//!
//! let signature = digest(["100.000000", "123", "password2"]).to_uppercase();
//! let body = format!("OutSum=100.000000&InvId=123&SignatureValue={signature}");
//!
//! let params = CallbackParams::from_form(&body)?;
//! assert!(client.default_account()?.verify_callback(&params));
//! assert_eq!(params.ack(), "OK123");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`signature`]: signature digests and callback verification
//! - [`codec`]: form encoding, receipts, JSON/XML response decoding
//! - [`transport`]: HTTP dispatch with timeouts and status handling
//! - [`gateway`]: configuration, client, operations, error code taxonomy
//! - [`error`]: error types
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result<T, GatewayError>`](error::Result).
//! Operation failures are wrapped in [`GatewayError::Operation`] naming the
//! operation; business rejections (non-zero gateway codes) are returned in
//! [`PaymentResult`](gateway::PaymentResult) instead.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and quick-xml"
)]

pub mod codec;
pub mod error;
pub mod gateway;
pub mod signature;
pub mod transport;

pub use error::{GatewayError, Result};
pub use gateway::{Account, Credentials, GatewayClient, GatewayConfig};

//! Error types for the Robokassa gateway client.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Configuration Errors** ([`GatewayError::Config`], [`GatewayError::UnknownAccount`]):
//!   malformed base URI or credentials, raised before any request is sent
//! - **Validation Errors** ([`GatewayError::InvalidInput`], [`GatewayError::Encode`]):
//!   request data the gateway would reject
//! - **Transport Errors** ([`GatewayError::Http`], [`GatewayError::Server`],
//!   [`GatewayError::UnexpectedStatus`]): connect failures, timeouts, error statuses
//! - **Decode Errors** ([`GatewayError::Decode`]): a response body that does not match
//!   the format the endpoint is known to return
//!
//! A structurally valid response carrying a non-zero gateway error code is **not** an
//! error: it is reported through [`PaymentResult`](crate::gateway::PaymentResult) and the
//! caller inspects the code explicitly.
//!
//! Failures raised while executing a gateway operation are wrapped in
//! [`GatewayError::Operation`], so the message always names the operation that failed.
//!
//! # Examples
//!
//! ```
//! use robokassa::error::{GatewayError, Result};
//!
//! fn validate_login(login: &str) -> Result<&str> {
//!     if login.is_empty() {
//!         return Err(GatewayError::Config("login must not be empty".to_owned()));
//!     }
//!     Ok(login)
//! }
//!
//! assert!(validate_login("").is_err());
//! ```

use std::fmt;

use thiserror::Error;

use crate::transport::ResponseFormat;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Gateway operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Payment creation (`Indexjson.aspx`).
    CreatePayment,
    /// Payment status query (`OpStateExt`).
    PaymentInfo,
    /// Recurring payment initiation.
    RecurringPayment,
}

impl Operation {
    /// Returns the operation name used as error prefix and log field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatePayment => "create payment",
            Self::PaymentInfo => "payment info",
            Self::RecurringPayment => "recurring payment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while talking to the payment gateway.
///
/// # Error Recovery
///
/// - **Configuration errors**: fix the configuration; retrying cannot help
/// - **Transport errors** ([`Http`](Self::Http), [`Server`](Self::Server),
///   [`UnexpectedStatus`](Self::UnexpectedStatus)): the caller owns retry policy
/// - **Decode errors** ([`Decode`](Self::Decode)): inspect the raw body, the gateway
///   probably returned an error page
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid client configuration.
    ///
    /// Raised when the base URI cannot be parsed, credentials are empty, or
    /// timeouts are out of bounds. No request is attempted.
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    /// The requested credential set is not configured.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// Request data rejected before sending.
    ///
    /// # Examples
    ///
    /// ```
    /// use robokassa::error::GatewayError;
    ///
    /// let err = GatewayError::InvalidInput("amount must be positive".to_owned());
    /// assert_eq!(err.to_string(), "invalid input: amount must be positive");
    /// ```
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Receipt serialization failed.
    #[error("cannot encode receipt: {0}")]
    Encode(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: connection refused, DNS failure, TLS errors and
    /// request timeouts all end up here.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with HTTP 500; the body is its error message.
    #[error("gateway server error: {}", String::from_utf8_lossy(.raw))]
    Server {
        /// Raw response body.
        raw: Vec<u8>,
    },

    /// The gateway answered with a status other than 2xx or 500.
    #[error("unexpected HTTP status {status}: {}", String::from_utf8_lossy(.raw))]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        raw: Vec<u8>,
    },

    /// The response body could not be decoded in the expected format.
    #[error("cannot decode {format} response '{}': {reason}", String::from_utf8_lossy(.raw))]
    Decode {
        /// Format the endpoint is expected to return.
        format: ResponseFormat,
        /// Raw response body.
        raw: Vec<u8>,
        /// Parser error description.
        reason: String,
    },

    /// A gateway operation failed.
    #[error("{operation}: {source}")]
    Operation {
        /// Operation that was being executed.
        operation: Operation,
        /// Underlying failure.
        #[source]
        source: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Wraps this error with the name of the operation that produced it.
    pub fn in_operation(self, operation: Operation) -> Self {
        Self::Operation { operation, source: Box::new(self) }
    }

    /// Returns the raw response body attached to this error, if any.
    ///
    /// Looks through [`Operation`](Self::Operation) wrappers.
    #[must_use]
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Self::Server { raw }
            | Self::UnexpectedStatus { raw, .. }
            | Self::Decode { raw, .. } => Some(raw.as_slice()),
            Self::Operation { source, .. } => source.raw_body(),
            _ => None,
        }
    }

    /// Returns the innermost error, skipping operation wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }
}

//! Transport protocol abstraction layer.
//!
//! The transport layer separates protocol mechanics from response handling:
//! - **[`Transport`]**: issues one request and returns the status and full body
//! - **[`send`]**: classifies the status and decodes the body in the requested format
//!
//! # Examples
//!
//! ```rust,no_run
//! use robokassa::{
//!     codec::{FormPayload, ResponseFormat},
//!     transport::{HttpTransport, Method, TransportRequest, send},
//! };
//! use serde::Deserialize;
//! use url::Url;
//!
//! #[derive(Deserialize)]
//! struct Reply {
//!     #[serde(rename = "errorCode")]
//!     error_code: i32,
//! }
//!
//! # async fn example() -> robokassa::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let base_url = Url::parse("https://auth.robokassa.ru").unwrap();
//!
//! let mut form = FormPayload::new();
//! form.insert("MerchantLogin", "shop");
//!
//! let request =
//!     TransportRequest { method: Method::Post, path: "/Merchant/Indexjson.aspx", form: &form };
//! let exchange = send::<_, Reply>(&transport, &base_url, request, ResponseFormat::Json).await?;
//! println!("status {} code {}", exchange.status, exchange.response.error_code);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

pub use crate::codec::ResponseFormat;
use crate::{
    codec::{FormPayload, decode_response},
    error::{GatewayError, Result},
};

pub mod config;
pub mod http;
mod sealed;

pub use config::HttpConfig;
pub use http::HttpTransport;

/// Status the gateway uses for failures whose body is a plain-text message.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// HTTP method of a gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Form payload sent as the query string.
    Get,
    /// Form payload sent as the request body.
    Post,
}

impl Method {
    /// Returns the method token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound request.
#[derive(Debug, Clone, Copy)]
pub struct TransportRequest<'a> {
    /// Request method.
    pub method: Method,
    /// Endpoint path appended to the base URL path.
    pub path: &'a str,
    /// Form fields, sent as query string or body depending on `method`.
    pub form: &'a FormPayload,
}

/// Status and full body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Decoded response together with what came over the wire.
#[derive(Debug, Clone)]
pub struct Exchange<R> {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, kept for audit.
    pub raw: Vec<u8>,
    /// Decoded response.
    pub response: R,
}

/// Transport protocol abstraction.
///
/// This trait is sealed; only implementations within this crate are allowed.
/// Implementations read the whole body before returning and do not interpret the
/// status code.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// Executes one request against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the path is rejected, the connection fails, the request
    /// times out, or the body cannot be read.
    fn execute<'a>(
        &'a self,
        base_url: &'a Url,
        request: TransportRequest<'a>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}

/// Resolves an endpoint path against the base URL.
///
/// The path is appended to the base path, never substituted for it, so a base of
/// `https://host/api/` and a path of `/Merchant/Recurring` yield
/// `https://host/api/Merchant/Recurring`. Query and fragment are cleared.
#[must_use]
pub fn resolve_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let joined = format!("{}{path}", base_url.path().trim_end_matches('/'));
    url.set_path(&joined);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Sends a request and decodes the response.
///
/// Status 500 returns the body as [`GatewayError::Server`] without decoding. Any
/// other status outside 2xx returns [`GatewayError::UnexpectedStatus`]. Success
/// bodies are decoded as `format`.
///
/// # Errors
///
/// Returns the transport error, the status errors above, or
/// [`GatewayError::Decode`].
#[instrument(
    skip(transport, base_url, request),
    fields(protocol = transport.protocol_name(), method = %request.method, path = request.path)
)]
pub async fn send<T, R>(
    transport: &T,
    base_url: &Url,
    request: TransportRequest<'_>,
    format: ResponseFormat,
) -> Result<Exchange<R>>
where
    T: Transport,
    R: DeserializeOwned,
{
    let TransportResponse { status, body } = transport.execute(base_url, request).await?;
    debug!(status, bytes = body.len(), "gateway responded");

    if status == SERVER_ERROR_STATUS {
        return Err(GatewayError::Server { raw: body });
    }
    if !(200..300).contains(&status) {
        return Err(GatewayError::UnexpectedStatus { status, raw: body });
    }

    let response = decode_response(format, &body)?;
    Ok(Exchange { status, raw: body, response })
}

//! Wire encoding for gateway requests and responses.
//!
//! Requests are always `application/x-www-form-urlencoded` ([`FormPayload`]).
//! Responses are JSON or XML depending on the endpoint; the caller picks the
//! format explicitly with [`ResponseFormat`], since the gateway does not declare
//! content types reliably.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::{GatewayError, Result};

pub mod form;
pub mod receipt;

pub use form::{FORM_CONTENT_TYPE, FormPayload};
pub use receipt::{Receipt, ReceiptItem, TaxRate, TaxSystem};

/// Encoding of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    /// JSON object.
    Json,
    /// XML document.
    Xml,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
        })
    }
}

/// Decodes a response body in the given format.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] carrying the raw body and the parser message
/// if the body is not a valid `R` in `format`.
///
/// # Examples
///
/// ```
/// use robokassa::codec::{ResponseFormat, decode_response};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Reply {
///     #[serde(rename = "errorCode")]
///     error_code: i32,
/// }
///
/// let reply: Reply = decode_response(ResponseFormat::Json, br#"{"errorCode":0}"#).unwrap();
/// assert_eq!(reply.error_code, 0);
/// ```
pub fn decode_response<R: DeserializeOwned>(format: ResponseFormat, raw: &[u8]) -> Result<R> {
    let decoded = match format {
        ResponseFormat::Json => serde_json::from_slice(raw).map_err(|e| e.to_string()),
        ResponseFormat::Xml => std::str::from_utf8(raw)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                quick_xml::de::from_str(text.trim_start_matches('\u{feff}'))
                    .map_err(|e| e.to_string())
            }),
    };

    decoded.map_err(|reason| GatewayError::Decode { format, raw: raw.to_vec(), reason })
}

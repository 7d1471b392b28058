//! Result URL callback parsing and acknowledgement.
//!
//! The gateway notifies the merchant of a completed payment with a form-encoded
//! request to the Result URL. The HTTP server receiving it lives outside this
//! crate; it hands the body to [`CallbackParams::from_form`], verifies the
//! signature with [`Account::verify_callback`](super::Account::verify_callback),
//! and answers with [`CallbackParams::ack`].

use url::form_urlencoded;

use crate::{
    error::{GatewayError, Result},
    signature::SignatureContext,
};

/// Fields of a Result URL callback covered by its signature.
///
/// # Examples
///
/// ```
/// use robokassa::gateway::CallbackParams;
///
/// let params =
///     CallbackParams::from_form("OutSum=100.000000&InvId=123&SignatureValue=AB12").unwrap();
///
/// assert_eq!(params.out_sum, "100.000000");
/// assert_eq!(params.invoice_id, 123);
/// assert_eq!(params.ack(), "OK123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// Amount exactly as sent by the gateway; signed verbatim.
    pub out_sum: String,
    /// Merchant invoice id.
    pub invoice_id: i64,
    /// `InvId` exactly as sent by the gateway; signed verbatim.
    pub invoice_id_text: String,
    /// Received signature, any hex case.
    pub signature: String,
}

impl CallbackParams {
    /// Creates callback parameters from already extracted values.
    ///
    /// The signed invoice text is the canonical decimal form of `invoice_id`.
    #[must_use]
    pub fn new(out_sum: impl Into<String>, invoice_id: i64, signature: impl Into<String>) -> Self {
        Self {
            out_sum: out_sum.into(),
            invoice_id,
            invoice_id_text: invoice_id.to_string(),
            signature: signature.into(),
        }
    }

    /// Extracts `OutSum`, `InvId` and `SignatureValue` from a form-encoded body or
    /// query string. Names are matched case-insensitively; other fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if a field is missing or `InvId` is
    /// not an integer.
    pub fn from_form(body: &str) -> Result<Self> {
        let mut out_sum = None;
        let mut invoice_id = None;
        let mut signature = None;

        for (key, value) in form_urlencoded::parse(body.as_bytes()) {
            if key.eq_ignore_ascii_case("OutSum") {
                out_sum = Some(value.into_owned());
            } else if key.eq_ignore_ascii_case("InvId") {
                invoice_id = Some(value.into_owned());
            } else if key.eq_ignore_ascii_case("SignatureValue") {
                signature = Some(value.into_owned());
            }
        }

        let out_sum = out_sum.ok_or_else(|| missing("OutSum"))?;
        let signature = signature.ok_or_else(|| missing("SignatureValue"))?;
        let invoice_id_text = invoice_id.ok_or_else(|| missing("InvId"))?;
        let invoice_id = invoice_id_text.trim().parse::<i64>().map_err(|e| {
            GatewayError::InvalidInput(format!(
                "callback InvId '{invoice_id_text}' is not an integer: {e}"
            ))
        })?;

        Ok(Self { out_sum, invoice_id, invoice_id_text, signature })
    }

    /// Returns the signature context to verify against.
    #[must_use]
    pub fn context(&self) -> SignatureContext<'_> {
        SignatureContext::Callback { out_sum: &self.out_sum, invoice_id: &self.invoice_id_text }
    }

    /// Response body confirming receipt (`OK{InvId}`).
    #[must_use]
    pub fn ack(&self) -> String {
        format!("OK{}", self.invoice_id)
    }
}

fn missing(field: &str) -> GatewayError {
    GatewayError::InvalidInput(format!("callback is missing {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gateway::Credentials, signature::verify_signature};

    #[test]
    fn test_from_form_full_callback() {
        let body = "out_summ=100&OutSum=100.000000&inv_id=5&InvId=5\
                    &crc=x&SignatureValue=ABCDEF&PaymentMethod=BankCard&IncSum=100.000000";
        let params = CallbackParams::from_form(body).unwrap();

        assert_eq!(params, CallbackParams::new("100.000000", 5, "ABCDEF"));
    }

    #[test]
    fn test_from_form_case_insensitive_names() {
        let params = CallbackParams::from_form("outsum=1&INVID=2&signaturevalue=3").unwrap();
        assert_eq!(params.invoice_id, 2);
    }

    #[test]
    fn test_from_form_missing_field() {
        let err = CallbackParams::from_form("OutSum=1&InvId=2").unwrap_err();
        assert!(err.to_string().contains("SignatureValue"));
    }

    #[test]
    fn test_from_form_bad_invoice() {
        let err = CallbackParams::from_form("OutSum=1&InvId=abc&SignatureValue=x").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }

    #[test]
    fn test_out_sum_kept_verbatim() {
        let credentials = Credentials::new("shop", "p1", "p2");
        let signed = SignatureContext::Callback { out_sum: "100.000000", invoice_id: "7" };
        let body =
            format!("OutSum=100.000000&InvId=7&SignatureValue={}", signed.sign(&credentials));

        let params = CallbackParams::from_form(&body).unwrap();
        assert!(verify_signature(&params.signature, &params.context(), &credentials));

        let normalized = CallbackParams::new("100", 7, params.signature.clone());
        assert!(!verify_signature(&normalized.signature, &normalized.context(), &credentials));
    }

    #[test]
    fn test_invoice_id_kept_verbatim() {
        let credentials = Credentials::new("shop", "p1", "p2");
        let signed = SignatureContext::Callback { out_sum: "15.00", invoice_id: "0123" };
        let body = format!("OutSum=15.00&InvId=0123&SignatureValue={}", signed.sign(&credentials));

        let params = CallbackParams::from_form(&body).unwrap();

        assert_eq!(params.invoice_id, 123);
        assert_eq!(params.invoice_id_text, "0123");
        assert_eq!(params.context(), signed);
        assert!(verify_signature(&params.signature, &params.context(), &credentials));

        let canonical = CallbackParams::new("15.00", 123, params.signature.clone());
        assert!(!verify_signature(&canonical.signature, &canonical.context(), &credentials));
    }

    #[test]
    fn test_ack() {
        assert_eq!(CallbackParams::new("1", 98_765, "x").ack(), "OK98765");
    }
}

//! Verification of signatures received from the gateway.

use tracing::{debug, instrument, warn};

use crate::{
    gateway::Credentials,
    signature::signer::{SignatureContext, SignatureKind},
};

/// Verifies a signature received from the gateway.
///
/// Recomputes the digest for `context` and compares it with `received` after
/// lowercasing it (the gateway may send uppercase hex). Only
/// [`SignatureKind::Callback`] contexts can be verified; any other kind returns `false`.
///
/// Never fails: malformed input simply does not verify.
///
/// # Examples
///
/// ```
/// use robokassa::{
///     gateway::Credentials,
///     signature::{SignatureContext, verify_signature},
/// };
///
/// let credentials = Credentials::new("Shop", "pass1", "pass2");
/// let context = SignatureContext::Callback { out_sum: "100.000000", invoice_id: "123" };
/// let signature = context.sign(&credentials).to_uppercase();
///
/// assert!(verify_signature(&signature, &context, &credentials));
/// ```
#[must_use]
#[instrument(skip(received, credentials), fields(kind = context.kind().as_str()))]
pub fn verify_signature(
    received: &str,
    context: &SignatureContext<'_>,
    credentials: &Credentials,
) -> bool {
    match context.kind() {
        SignatureKind::Callback => {}
        SignatureKind::Creation | SignatureKind::StatusQuery | SignatureKind::Recurring => {
            warn!("signature verification requested for a non-callback exchange");
            return false;
        }
    }

    let expected = context.sign(credentials);
    if expected == received.to_lowercase() {
        debug!("callback signature verified");
        true
    } else {
        warn!("callback signature mismatch");
        false
    }
}

//! Signature digest computation.

use std::borrow::Cow;

use sha2::{Digest, Sha512};

use crate::gateway::Credentials;

/// Hash algorithm the gateway endpoint is configured to expect.
///
/// The merchant selects the algorithm once in the gateway's technical settings;
/// it must match this alias.
pub type SignatureHash = Sha512;

/// Separator placed between signed fields.
pub const FIELD_SEPARATOR: char = ':';

/// Computes the signature digest of an ordered field sequence.
///
/// Fields are joined with [`FIELD_SEPARATOR`] (no leading separator), hashed with
/// [`SignatureHash`] and hex-encoded in lowercase. Empty fields contribute an empty
/// segment.
///
/// # Examples
///
/// ```
/// use robokassa::signature::digest;
///
/// assert_eq!(digest(["a", "b"]), digest(["a:b"]));
/// assert_ne!(digest(["a", "b"]), digest(["b", "a"]));
/// ```
#[must_use]
pub fn digest<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = SignatureHash::new();
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            let mut separator = [0u8; 4];
            hasher.update(FIELD_SEPARATOR.encode_utf8(&mut separator).as_bytes());
        }
        hasher.update(field.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Kind of signed exchange, determining field order and secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// Merchant-initiated payment creation.
    Creation,
    /// Gateway-initiated result notification.
    Callback,
    /// Payment status query.
    StatusQuery,
    /// Merchant-initiated recurring charge.
    Recurring,
}

impl SignatureKind {
    /// Returns `true` when this kind is signed with password #1.
    ///
    /// Merchant-initiated requests use password #1; status queries and gateway
    /// callbacks use password #2.
    #[must_use]
    pub const fn uses_first_password(&self) -> bool {
        matches!(self, Self::Creation | Self::Recurring)
    }

    /// Returns the kind name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Callback => "callback",
            Self::StatusQuery => "status_query",
            Self::Recurring => "recurring",
        }
    }
}

/// Values covered by a signature, one variant per [`SignatureKind`].
///
/// Amounts are carried as the exact strings that go over the wire: the gateway hashes
/// the text it sends or receives, so `100` and `100.00` sign differently. Callback
/// values are kept as received for the same reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureContext<'a> {
    /// `login:amount:invoice:receipt:password1`.
    Creation {
        /// Amount as sent in `OutSum`.
        out_sum: &'a str,
        /// Merchant invoice id.
        invoice_id: i64,
        /// URL-encoded receipt, empty when the request carries none.
        receipt: &'a str,
    },
    /// `amount:invoice:password2`.
    Callback {
        /// Amount exactly as received in the callback.
        out_sum: &'a str,
        /// `InvId` exactly as received in the callback.
        invoice_id: &'a str,
    },
    /// `login:invoice:password2`.
    StatusQuery {
        /// Invoice being queried.
        invoice_id: i64,
    },
    /// `login:amount:invoice:password1`.
    Recurring {
        /// Amount as sent in `OutSum`.
        out_sum: &'a str,
        /// New invoice id.
        invoice_id: i64,
    },
}

impl<'a> SignatureContext<'a> {
    /// Returns the kind of this context.
    #[must_use]
    pub const fn kind(&self) -> SignatureKind {
        match self {
            Self::Creation { .. } => SignatureKind::Creation,
            Self::Callback { .. } => SignatureKind::Callback,
            Self::StatusQuery { .. } => SignatureKind::StatusQuery,
            Self::Recurring { .. } => SignatureKind::Recurring,
        }
    }

    /// Returns the ordered fields to hash, secret included.
    #[must_use]
    pub fn fields(&self, credentials: &'a Credentials) -> Vec<Cow<'a, str>> {
        let secret = if self.kind().uses_first_password() {
            credentials.password1()
        } else {
            credentials.password2()
        };
        let login = Cow::Borrowed(credentials.login());

        match *self {
            Self::Creation { out_sum, invoice_id, receipt } => vec![
                login,
                Cow::Borrowed(out_sum),
                Cow::Owned(invoice_id.to_string()),
                Cow::Borrowed(receipt),
                Cow::Borrowed(secret),
            ],
            Self::Callback { out_sum, invoice_id } => {
                vec![Cow::Borrowed(out_sum), Cow::Borrowed(invoice_id), Cow::Borrowed(secret)]
            }
            Self::StatusQuery { invoice_id } => {
                vec![login, Cow::Owned(invoice_id.to_string()), Cow::Borrowed(secret)]
            }
            Self::Recurring { out_sum, invoice_id } => vec![
                login,
                Cow::Borrowed(out_sum),
                Cow::Owned(invoice_id.to_string()),
                Cow::Borrowed(secret),
            ],
        }
    }

    /// Computes the signature of this context with the given credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use robokassa::{
    ///     gateway::Credentials,
    ///     signature::{SignatureContext, digest},
    /// };
    ///
    /// let credentials = Credentials::new("Shop", "secret", "secret2");
    /// let context = SignatureContext::Creation { out_sum: "100", invoice_id: 123, receipt: "" };
    ///
    /// assert_eq!(context.sign(&credentials), digest(["Shop:100:123::secret"]));
    /// ```
    #[must_use]
    pub fn sign(&self, credentials: &'a Credentials) -> String {
        digest(self.fields(credentials))
    }
}

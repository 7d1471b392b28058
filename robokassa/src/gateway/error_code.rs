//! Gateway business error codes.
//!
//! A structurally valid response may still carry a non-zero `errorCode`. Such codes
//! are not transport failures: they are resolved here and reported to the caller
//! in [`PaymentResult`](super::PaymentResult).

use std::fmt;

/// Category of a numeric gateway error code.
///
/// [`GatewayErrorCode::from_code`] is total: every `i32` maps to a variant.
///
/// # Examples
///
/// ```
/// use robokassa::gateway::GatewayErrorCode;
///
/// assert_eq!(GatewayErrorCode::from_code(0), GatewayErrorCode::None);
/// assert_eq!(GatewayErrorCode::from_code(29), GatewayErrorCode::InvalidSignature);
/// assert_eq!(GatewayErrorCode::from_code(500), GatewayErrorCode::Internal(500));
/// assert_eq!(GatewayErrorCode::from_code(-7), GatewayErrorCode::Unknown(-7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayErrorCode {
    /// Code 0, request accepted.
    None,
    /// Code 25.
    MerchantInactive,
    /// Code 26.
    MerchantNotFound,
    /// Code 29.
    InvalidSignature,
    /// Code 30.
    InvalidInvoice,
    /// Code 31.
    InvalidAmount,
    /// Code 33.
    PaymentTimeExpired,
    /// Code 34.
    RecurringNotPermitted,
    /// Code 35.
    InvalidRecurringParameters,
    /// Code 40.
    DuplicateInvoicePayment,
    /// Code 41.
    OperationStartFailed,
    /// Code 51.
    InvoiceExpired,
    /// Code 52.
    InvoiceAlreadyPaid,
    /// Code 53.
    InvoiceNotFound,
    /// Code 64.
    HoldingDisabled,
    /// Code 65.
    InvalidHoldingParameters,
    /// Internal gateway failure (codes 20-24, 27, 28, 32, 36, 37, 43, 500).
    Internal(i32),
    /// Any code not listed above.
    Unknown(i32),
}

impl GatewayErrorCode {
    /// Resolves a numeric code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            25 => Self::MerchantInactive,
            26 => Self::MerchantNotFound,
            29 => Self::InvalidSignature,
            30 => Self::InvalidInvoice,
            31 => Self::InvalidAmount,
            33 => Self::PaymentTimeExpired,
            34 => Self::RecurringNotPermitted,
            35 => Self::InvalidRecurringParameters,
            40 => Self::DuplicateInvoicePayment,
            41 => Self::OperationStartFailed,
            51 => Self::InvoiceExpired,
            52 => Self::InvoiceAlreadyPaid,
            53 => Self::InvoiceNotFound,
            64 => Self::HoldingDisabled,
            65 => Self::InvalidHoldingParameters,
            20..=24 | 27 | 28 | 32 | 36 | 37 | 43 | 500 => Self::Internal(code),
            _ => Self::Unknown(code),
        }
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::MerchantInactive => 25,
            Self::MerchantNotFound => 26,
            Self::InvalidSignature => 29,
            Self::InvalidInvoice => 30,
            Self::InvalidAmount => 31,
            Self::PaymentTimeExpired => 33,
            Self::RecurringNotPermitted => 34,
            Self::InvalidRecurringParameters => 35,
            Self::DuplicateInvoicePayment => 40,
            Self::OperationStartFailed => 41,
            Self::InvoiceExpired => 51,
            Self::InvoiceAlreadyPaid => 52,
            Self::InvoiceNotFound => 53,
            Self::HoldingDisabled => 64,
            Self::InvalidHoldingParameters => 65,
            Self::Internal(code) | Self::Unknown(code) => *code,
        }
    }

    /// Returns `true` for every code except 0.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Human-readable description; empty only for code 0.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::MerchantInactive => "merchant is not activated",
            Self::MerchantNotFound => "merchant not found",
            Self::InvalidSignature => "invalid SignatureValue",
            Self::InvalidInvoice => "invalid invoice parameter",
            Self::InvalidAmount => "invalid payment amount",
            Self::PaymentTimeExpired => "time allotted for invoice payment has expired",
            Self::RecurringNotPermitted => "recurring payments are not enabled for the merchant",
            Self::InvalidRecurringParameters => "invalid parameters for recurring payment",
            Self::DuplicateInvoicePayment => "repeated payment of an invoice with the same number",
            Self::OperationStartFailed => "operation failed to start",
            Self::InvoiceExpired => "invoice payment period has expired",
            Self::InvoiceAlreadyPaid => "attempt to pay an already paid invoice",
            Self::InvoiceNotFound => "invoice not found",
            Self::HoldingDisabled => "fund holding is not enabled for the merchant",
            Self::InvalidHoldingParameters => "invalid fund holding parameters",
            Self::Internal(_) => "internal gateway error",
            Self::Unknown(_) => "unknown code",
        }
    }
}

impl From<i32> for GatewayErrorCode {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            write!(f, "{} ({})", self.description(), self.code())
        } else {
            f.write_str("no error")
        }
    }
}

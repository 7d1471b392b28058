//! Request and response types of gateway operations.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    codec::Receipt,
    error::{GatewayError, Result},
    gateway::GatewayErrorCode,
};

/// Longest description the gateway accepts, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 100;

/// Renders an amount the way it is sent and signed.
///
/// Trailing zeros are dropped so that `100`, `100.0` and `100.00` produce the same
/// string. No grouping or locale separators are used.
///
/// # Examples
///
/// ```
/// use robokassa::gateway::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(10000, 2)), "100");
/// assert_eq!(format_amount(Decimal::new(1050, 1)), "105");
/// assert_eq!(format_amount(Decimal::new(123_450, 3)), "123.45");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

fn validate_invoice_id(name: &str, invoice_id: i64) -> Result<()> {
    if invoice_id < 0 {
        return Err(GatewayError::InvalidInput(format!("{name} must be non-negative")));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(GatewayError::InvalidInput(format!("amount must be positive, got {amount}")));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    let chars = description.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(GatewayError::InvalidInput(format!(
            "description is {chars} characters, at most {MAX_DESCRIPTION_CHARS} allowed"
        )));
    }
    Ok(())
}

/// Payment creation request.
///
/// # Examples
///
/// ```
/// use robokassa::gateway::PaymentRequest;
/// use rust_decimal::Decimal;
///
/// let request = PaymentRequest::new(123, Decimal::new(100, 0), "Order #123")
///     .with_culture("en")
///     .recurring();
///
/// assert!(request.validate().is_ok());
/// assert!(request.recurring);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Merchant invoice id (`InvId`).
    pub invoice_id: i64,
    /// Amount in major currency units (`OutSum`).
    pub amount: Decimal,
    /// Free-text description shown to the payer.
    pub description: String,
    /// Fiscal receipt, signed and sent when present.
    pub receipt: Option<Receipt>,
    /// Requests a parent payment for later recurring charges.
    pub recurring: bool,
    /// Payment page language (`Culture`).
    pub culture: Option<String>,
    /// Preselected payment method (`IncCurrLabel`).
    pub currency_label: Option<String>,
}

impl PaymentRequest {
    /// Creates a request without receipt or hints.
    #[must_use]
    pub fn new(invoice_id: i64, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            invoice_id,
            amount,
            description: description.into(),
            receipt: None,
            recurring: false,
            culture: None,
            currency_label: None,
        }
    }

    /// Attaches a fiscal receipt.
    #[must_use]
    pub fn with_receipt(mut self, receipt: Receipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    /// Marks the payment as a parent for recurring charges.
    #[must_use]
    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    /// Sets the payment page language.
    #[must_use]
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Preselects a payment method.
    #[must_use]
    pub fn with_currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = Some(label.into());
        self
    }

    /// Checks the request before anything is signed or sent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for a negative invoice id, a
    /// non-positive amount, or a description longer than
    /// [`MAX_DESCRIPTION_CHARS`].
    pub fn validate(&self) -> Result<()> {
        validate_invoice_id("invoice_id", self.invoice_id)?;
        validate_amount(self.amount)?;
        validate_description(&self.description)
    }
}

/// Recurring charge against a previously paid invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringPaymentRequest {
    /// New invoice id (`InvoiceID`).
    pub invoice_id: i64,
    /// Parent invoice being charged again (`PreviousInvoiceID`).
    pub previous_invoice_id: i64,
    /// Amount in major currency units.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
}

impl RecurringPaymentRequest {
    /// Creates a recurring charge request.
    #[must_use]
    pub fn new(
        invoice_id: i64,
        previous_invoice_id: i64,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self { invoice_id, previous_invoice_id, amount, description: description.into() }
    }

    /// Checks the request before anything is signed or sent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] on the same rules as
    /// [`PaymentRequest::validate`], applied to both invoice ids.
    pub fn validate(&self) -> Result<()> {
        validate_invoice_id("invoice_id", self.invoice_id)?;
        validate_invoice_id("previous_invoice_id", self.previous_invoice_id)?;
        validate_amount(self.amount)?;
        validate_description(&self.description)
    }
}

/// JSON body returned by creation and recurring endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayResponse {
    /// Gateway-side invoice id used in the payment link.
    #[serde(rename = "invoiceID", default)]
    pub invoice_id: Option<String>,
    /// Numeric business error code, 0 on success.
    #[serde(rename = "errorCode", default)]
    pub error_code: i32,
    /// Gateway's own error text.
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

/// Caller-facing outcome of creation and recurring operations.
///
/// A non-zero [`error_code`](Self::error_code) is a business error, not a
/// transport failure; check [`is_success`](Self::is_success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    /// Gateway-side invoice id.
    pub invoice_id: Option<String>,
    /// Payment page for the payer, present when the gateway returned an invoice id.
    pub link: Option<String>,
    /// Raw response body.
    pub raw: Vec<u8>,
    /// Numeric business error code.
    pub error_code: i32,
    /// Resolved error category.
    pub error: GatewayErrorCode,
    /// Description of [`error`](Self::error), empty on success.
    pub error_message: String,
    /// Error text sent by the gateway, if any.
    pub gateway_message: Option<String>,
}

impl PaymentResult {
    /// Returns `true` if the gateway reported no error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.error.is_error()
    }
}

/// XML body of the status query (`OperationStateResponse`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentStatusInfo {
    /// Outcome of the query itself.
    pub result: OperationResult,
    /// Payment state; absent when the query failed.
    #[serde(default)]
    pub state: Option<OperationState>,
    /// Payment details; absent when the query failed.
    #[serde(default)]
    pub info: Option<OperationInfo>,
    /// Custom `Shp_` parameters sent with the payment.
    #[serde(rename = "UserField", default)]
    pub user_fields: UserFields,
}

impl PaymentStatusInfo {
    /// Returns `true` if the query succeeded (`Result/Code` is 0).
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.result.code == 0
    }

    /// Returns the payment state code, if present.
    #[must_use]
    pub fn state_code(&self) -> Option<i32> {
        self.state.as_ref().map(|state| state.code)
    }

    /// Looks up a user field by name.
    #[must_use]
    pub fn user_field(&self, name: &str) -> Option<&str> {
        self.user_fields
            .fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

/// `Result` element of the status response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationResult {
    /// Query result code, 0 on success.
    pub code: i32,
    /// Text accompanying a non-zero code.
    #[serde(default)]
    pub description: String,
}

/// `State` element of the status response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationState {
    /// State code (5 initiated, 10 cancelled, 50 received, 60 refunded, 80 suspended, 100 paid).
    pub code: i32,
    /// When the status was requested.
    pub request_date: DateTime<FixedOffset>,
    /// When the state last changed.
    pub state_date: DateTime<FixedOffset>,
}

/// `Info` element of the status response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationInfo {
    /// Currency label the payer chose.
    #[serde(default)]
    pub inc_curr_label: String,
    /// Amount paid by the payer.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub inc_sum: Decimal,
    /// Payer account, masked by the gateway.
    #[serde(default)]
    pub inc_account: String,
    /// Payment method used.
    #[serde(default)]
    pub payment_method: Option<PaymentMethodInfo>,
    /// Currency credited to the merchant.
    #[serde(default)]
    pub out_curr_label: String,
    /// Amount credited to the merchant.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub out_sum: Decimal,
    /// Operation key.
    #[serde(default)]
    pub op_key: String,
    /// Card transaction reference.
    #[serde(rename = "BankCardRRN", default)]
    pub bank_card_rrn: String,
}

/// `PaymentMethod` element of the status response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentMethodInfo {
    /// Method code.
    #[serde(default)]
    pub code: String,
    /// Method name.
    #[serde(default)]
    pub description: String,
}

/// `UserField` element of the status response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFields {
    /// Name/value pairs in document order.
    #[serde(rename = "Field", default)]
    pub fields: Vec<UserField>,
}

/// One `Field` of [`UserFields`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserField {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    #[serde(default)]
    pub value: String,
}

/// Status query outcome with the raw XML kept for audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    /// Decoded status.
    pub status: PaymentStatusInfo,
    /// Raw response body.
    pub raw: Vec<u8>,
}

//! Gateway client and per-account operations.

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{
    codec::{FormPayload, Receipt, ResponseFormat},
    error::{GatewayError, Operation, Result},
    gateway::{
        CallbackParams, Credentials, GatewayConfig, GatewayErrorCode, GatewayResponse,
        PaymentInfo, PaymentRequest, PaymentResult, PaymentStatusInfo, RecurringPaymentRequest,
        format_amount,
    },
    signature::{SignatureContext, verify_signature},
    transport::{Exchange, HttpTransport, Method, TransportRequest, resolve_url, send},
};

/// Payment creation endpoint (POST, JSON response).
pub const CREATE_PAYMENT_PATH: &str = "/Merchant/Indexjson.aspx";

/// Payment status endpoint (GET, XML response).
pub const PAYMENT_INFO_PATH: &str = "/Merchant/WebService/Service.asmx/OpStateExt";

/// Recurring charge endpoint (POST, JSON response).
pub const RECURRING_PAYMENT_PATH: &str = "/Merchant/Recurring";

/// Payment page; the gateway invoice id is appended.
pub const PAYMENT_LINK_PATH: &str = "/Merchant/Index/";

/// Client for one gateway deployment.
///
/// Holds the validated configuration and one pooled HTTP client shared by every
/// call. Nothing per-call is stored, so a client can be shared across tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use robokassa::gateway::{Credentials, GatewayClient, GatewayConfig, PaymentRequest};
/// use rust_decimal::Decimal;
///
/// # async fn example() -> robokassa::error::Result<()> {
/// let config = GatewayConfig::new("https://auth.robokassa.ru")
///     .with_account("main", Credentials::new("shop", "password1", "password2"));
/// let client = GatewayClient::new(config)?;
///
/// let result = client
///     .create_payment(&PaymentRequest::new(123, Decimal::new(100, 0), "Order #123"))
///     .await?;
///
/// if let Some(link) = result.link {
///     println!("pay at {link}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatewayClient {
    config: GatewayConfig,
    base_url: Url,
    transport: HttpTransport,
}

impl GatewayClient {
    /// Validates the configuration and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the configuration is invalid, or
    /// [`GatewayError::Http`] if the HTTP client cannot be created.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;
        let transport = HttpTransport::with_config(&config.http)?;

        info!(
            base_url = %base_url,
            accounts = config.accounts.len(),
            default_account = %config.default_account,
            "gateway client ready"
        );

        Ok(Self { config, base_url, transport })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the parsed base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the operations bound to a named credential set.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownAccount`] if no such label is configured.
    pub fn account<'a>(&'a self, label: &'a str) -> Result<Account<'a>> {
        let credentials = self
            .config
            .accounts
            .get(label)
            .ok_or_else(|| GatewayError::UnknownAccount(label.to_owned()))?;
        Ok(Account { client: self, label, credentials })
    }

    /// Returns the operations bound to the default credential set.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownAccount`] if the default label is not
    /// configured, which validation prevents.
    pub fn default_account(&self) -> Result<Account<'_>> {
        self.account(&self.config.default_account)
    }

    /// Builds the payment page URL for a gateway invoice id.
    #[must_use]
    pub fn payment_link(&self, invoice_id: &str) -> String {
        resolve_url(&self.base_url, &format!("{PAYMENT_LINK_PATH}{invoice_id}")).into()
    }

    /// [`Account::create_payment`] on the default account.
    ///
    /// # Errors
    ///
    /// See [`Account::create_payment`].
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResult> {
        self.default_account()?.create_payment(request).await
    }

    /// [`Account::get_payment_info`] on the default account.
    ///
    /// # Errors
    ///
    /// See [`Account::get_payment_info`].
    pub async fn get_payment_info(&self, invoice_id: i64) -> Result<PaymentInfo> {
        self.default_account()?.get_payment_info(invoice_id).await
    }

    /// [`Account::recurrent_payment`] on the default account.
    ///
    /// # Errors
    ///
    /// See [`Account::recurrent_payment`].
    pub async fn recurrent_payment(
        &self,
        request: &RecurringPaymentRequest,
    ) -> Result<PaymentResult> {
        self.default_account()?.recurrent_payment(request).await
    }

    /// [`Account::verify_signature`] on the default account.
    #[must_use]
    pub fn verify_signature(&self, received: &str, context: &SignatureContext<'_>) -> bool {
        self.default_account().is_ok_and(|account| account.verify_signature(received, context))
    }

    fn payment_result(&self, exchange: Exchange<GatewayResponse>) -> PaymentResult {
        let Exchange { raw, response, .. } = exchange;
        let error = GatewayErrorCode::from_code(response.error_code);
        if error.is_error() {
            warn!(
                code = response.error_code,
                reason = error.description(),
                gateway_message = response.error_message.as_deref().unwrap_or_default(),
                "gateway rejected request"
            );
        }

        let link = response
            .invoice_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| self.payment_link(id));

        PaymentResult {
            invoice_id: response.invoice_id,
            link,
            raw,
            error_code: response.error_code,
            error,
            error_message: error.description().to_owned(),
            gateway_message: response.error_message,
        }
    }
}

/// Gateway operations bound to one credential set.
#[derive(Debug, Clone, Copy)]
pub struct Account<'a> {
    client: &'a GatewayClient,
    label: &'a str,
    credentials: &'a Credentials,
}

impl<'a> Account<'a> {
    /// Account label.
    #[must_use]
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Bound credentials.
    #[must_use]
    pub fn credentials(&self) -> &'a Credentials {
        self.credentials
    }

    /// Creates a payment and returns its payment link.
    ///
    /// Signs `login:amount:invoice:receipt:password1` (empty receipt segment when
    /// the request has none) and posts the form to [`CREATE_PAYMENT_PATH`]. A
    /// non-zero gateway code is reported in the result, not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Operation`] wrapping the input, encoding,
    /// transport, status or decode failure.
    #[instrument(
        skip(self, request),
        fields(account = self.label, invoice_id = request.invoice_id)
    )]
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResult> {
        self.try_create_payment(request).await.map_err(|e| e.in_operation(Operation::CreatePayment))
    }

    async fn try_create_payment(&self, request: &PaymentRequest) -> Result<PaymentResult> {
        let form = self.creation_form(request)?;
        let exchange =
            self.send(Method::Post, CREATE_PAYMENT_PATH, &form, ResponseFormat::Json).await?;
        Ok(self.client.payment_result(exchange))
    }

    /// Builds the signed creation form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if the request is invalid or
    /// [`GatewayError::Encode`] if the receipt cannot be serialized.
    pub fn creation_form(&self, request: &PaymentRequest) -> Result<FormPayload> {
        request.validate()?;

        let out_sum = format_amount(request.amount);
        let receipt = request.receipt.as_ref().map(Receipt::encode).transpose()?;
        let signature = SignatureContext::Creation {
            out_sum: &out_sum,
            invoice_id: request.invoice_id,
            receipt: receipt.as_deref().unwrap_or_default(),
        }
        .sign(self.credentials);

        let mut form = FormPayload::new();
        form.insert("MerchantLogin", self.credentials.login())
            .insert("OutSum", out_sum)
            .insert("InvId", request.invoice_id.to_string())
            .insert("Description", request.description.as_str())
            .insert("SignatureValue", signature);

        if let Some(receipt) = receipt {
            form.insert("Receipt", receipt);
        }
        if self.credentials.test_mode() {
            form.insert("IsTest", "1");
        }
        if request.recurring {
            form.insert("Recurring", "true");
        }
        if let Some(culture) = &request.culture {
            form.insert("Culture", culture.as_str());
        }
        if let Some(label) = &request.currency_label {
            form.insert("IncCurrLabel", label.as_str());
        }
        if let Some(callback_url) = &self.client.config.callback_url {
            form.insert("ResultUrl2", callback_url.as_str());
        }

        Ok(form)
    }

    /// Queries the state of a payment.
    ///
    /// Signs `login:invoice:password2` and sends a GET to [`PAYMENT_INFO_PATH`];
    /// the XML response is decoded into [`PaymentStatusInfo`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Operation`] wrapping the input, transport, status
    /// or decode failure. Decode failures keep the raw body.
    #[instrument(skip(self), fields(account = self.label))]
    pub async fn get_payment_info(&self, invoice_id: i64) -> Result<PaymentInfo> {
        self.try_get_payment_info(invoice_id)
            .await
            .map_err(|e| e.in_operation(Operation::PaymentInfo))
    }

    async fn try_get_payment_info(&self, invoice_id: i64) -> Result<PaymentInfo> {
        let form = self.status_query(invoice_id)?;
        let Exchange { raw, response, .. } = self
            .send::<PaymentStatusInfo>(Method::Get, PAYMENT_INFO_PATH, &form, ResponseFormat::Xml)
            .await?;

        if !response.is_found() {
            warn!(
                code = response.result.code,
                description = %response.result.description,
                "status query rejected"
            );
        }

        Ok(PaymentInfo { status: response, raw })
    }

    /// Builds the signed status query.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for a negative invoice id.
    pub fn status_query(&self, invoice_id: i64) -> Result<FormPayload> {
        if invoice_id < 0 {
            return Err(GatewayError::InvalidInput("invoice_id must be non-negative".to_owned()));
        }

        let signature = SignatureContext::StatusQuery { invoice_id }.sign(self.credentials);

        let mut form = FormPayload::new();
        form.insert("MerchantLogin", self.credentials.login())
            .insert("InvoiceID", invoice_id.to_string())
            .insert("Signature", signature);
        Ok(form)
    }

    /// Charges a previously paid invoice again.
    ///
    /// Signs `login:amount:invoice:password1` and posts both the new and the
    /// previous invoice ids to [`RECURRING_PAYMENT_PATH`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Operation`] wrapping the input, transport, status
    /// or decode failure.
    #[instrument(
        skip(self, request),
        fields(
            account = self.label,
            invoice_id = request.invoice_id,
            previous_invoice_id = request.previous_invoice_id
        )
    )]
    pub async fn recurrent_payment(
        &self,
        request: &RecurringPaymentRequest,
    ) -> Result<PaymentResult> {
        self.try_recurrent_payment(request)
            .await
            .map_err(|e| e.in_operation(Operation::RecurringPayment))
    }

    async fn try_recurrent_payment(
        &self,
        request: &RecurringPaymentRequest,
    ) -> Result<PaymentResult> {
        let form = self.recurring_form(request)?;
        let exchange =
            self.send(Method::Post, RECURRING_PAYMENT_PATH, &form, ResponseFormat::Json).await?;
        Ok(self.client.payment_result(exchange))
    }

    /// Builds the signed recurring charge form.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if the request is invalid.
    pub fn recurring_form(&self, request: &RecurringPaymentRequest) -> Result<FormPayload> {
        request.validate()?;

        let out_sum = format_amount(request.amount);
        let signature =
            SignatureContext::Recurring { out_sum: &out_sum, invoice_id: request.invoice_id }
                .sign(self.credentials);

        let mut form = FormPayload::new();
        form.insert("MerchantLogin", self.credentials.login())
            .insert("InvoiceID", request.invoice_id.to_string())
            .insert("PreviousInvoiceID", request.previous_invoice_id.to_string())
            .insert("OutSum", out_sum)
            .insert("Description", request.description.as_str())
            .insert("SignatureValue", signature);
        Ok(form)
    }

    /// Verifies a signature received from the gateway with this account's
    /// password #2. Non-callback contexts always return `false`.
    #[must_use]
    pub fn verify_signature(&self, received: &str, context: &SignatureContext<'_>) -> bool {
        verify_signature(received, context, self.credentials)
    }

    /// Verifies a parsed Result URL callback.
    #[must_use]
    pub fn verify_callback(&self, params: &CallbackParams) -> bool {
        self.verify_signature(&params.signature, &params.context())
    }

    async fn send<R: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: &FormPayload,
        format: ResponseFormat,
    ) -> Result<Exchange<R>> {
        debug!(%method, path, fields = ?form.keys().collect::<Vec<_>>(), "dispatching request");
        let request = TransportRequest { method, path, form };
        send(&self.client.transport, &self.client.base_url, request, format).await
    }
}

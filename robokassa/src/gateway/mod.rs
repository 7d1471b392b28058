//! Gateway client: payment creation, status queries, recurring charges and
//! callback verification.
//!
//! [`GatewayClient`] owns the configuration and HTTP client. Each operation is
//! available on an [`Account`] (one credential set) and, for the default account,
//! directly on the client.

pub mod callback;
pub mod client;
pub mod config;
pub mod error_code;
pub mod models;

pub use callback::CallbackParams;
pub use client::{
    Account, CREATE_PAYMENT_PATH, GatewayClient, PAYMENT_INFO_PATH, PAYMENT_LINK_PATH,
    RECURRING_PAYMENT_PATH,
};
pub use config::{Credentials, DEFAULT_ACCOUNT, GatewayConfig};
pub use error_code::GatewayErrorCode;
pub use models::{
    GatewayResponse, MAX_DESCRIPTION_CHARS, OperationInfo, OperationResult, OperationState,
    PaymentInfo, PaymentMethodInfo, PaymentRequest, PaymentResult, PaymentStatusInfo,
    RecurringPaymentRequest, UserField, UserFields, format_amount,
};

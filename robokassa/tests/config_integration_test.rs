//! Integration tests for configuration loading and account selection.

use robokassa::{
    GatewayClient, GatewayConfig,
    error::GatewayError,
    gateway::{CallbackParams, PaymentRequest},
    signature::digest,
};
use rust_decimal_macros::dec;

const MULTI_ACCOUNT: &str = r#"
    base_url = "https://auth.robokassa.ru"
    callback_url = "https://shop.example.com/payments/result"
    default_account = "card"

    [http]
    idle_timeout_secs = 60
    request_timeout_secs = 21

    [accounts.card]
    login = "shop"
    password1 = "card-one"
    password2 = "card-two"

    [accounts.sbp]
    login = "shop-sbp"
    password1 = "sbp-one"
    password2 = "sbp-two"
    test_mode = true
"#;

#[test]
fn test_full_configuration_flow() {
    let config = GatewayConfig::from_toml(MULTI_ACCOUNT).expect("should parse valid TOML");
    let client = GatewayClient::new(config).expect("valid config");

    assert_eq!(client.base_url().as_str(), "https://auth.robokassa.ru/");
    assert_eq!(client.config().http.request_timeout_secs, 21);
    assert_eq!(client.default_account().unwrap().label(), "card");

    let sbp = client.account("sbp").unwrap();
    assert_eq!(sbp.credentials().login(), "shop-sbp");
    assert!(sbp.credentials().test_mode());
}

#[test]
fn test_accounts_sign_with_their_own_secrets() {
    let client = GatewayClient::new(GatewayConfig::from_toml(MULTI_ACCOUNT).unwrap()).unwrap();
    let request = PaymentRequest::new(10, dec!(25), "Order 10");

    let card = client.account("card").unwrap().creation_form(&request).unwrap();
    let sbp = client.account("sbp").unwrap().creation_form(&request).unwrap();

    assert_eq!(card.get("SignatureValue"), Some(digest(["shop:25:10::card-one"]).as_str()));
    assert_eq!(sbp.get("SignatureValue"), Some(digest(["shop-sbp:25:10::sbp-one"]).as_str()));
    assert_eq!(sbp.get("IsTest"), Some("1"));
    assert!(!card.contains("IsTest"));
    assert_eq!(card.get("ResultUrl2"), Some("https://shop.example.com/payments/result"));
}

#[test]
fn test_callback_verified_per_account() {
    let client = GatewayClient::new(GatewayConfig::from_toml(MULTI_ACCOUNT).unwrap()).unwrap();
    let signature = digest(["25.000000", "10", "sbp-two"]).to_uppercase();
    let params =
        CallbackParams::from_form(&format!("OutSum=25.000000&InvId=10&SignatureValue={signature}"))
            .unwrap();

    assert!(client.account("sbp").unwrap().verify_callback(&params));
    assert!(!client.default_account().unwrap().verify_callback(&params));
}

#[test]
fn test_unknown_account_is_reported() {
    let client = GatewayClient::new(GatewayConfig::from_toml(MULTI_ACCOUNT).unwrap()).unwrap();
    assert!(matches!(client.account("crypto"), Err(GatewayError::UnknownAccount(_))));
}

#[test]
fn test_malformed_base_url_is_fatal() {
    let toml = r#"
        base_url = "auth.robokassa.ru"
        [accounts.main]
        login = "shop"
        password1 = "a"
        password2 = "b"
    "#;
    let err = GatewayConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, GatewayError::Config(_)));
}

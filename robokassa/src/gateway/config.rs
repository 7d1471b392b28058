//! Gateway client configuration.
//!
//! This module defines TOML-deserializable configuration: the gateway base URL,
//! HTTP timeouts, and one or more named merchant credential sets.

use std::{collections::BTreeMap, fmt, path::Path};

use serde::Deserialize;
use url::Url;
use zeroize::Zeroize;

use crate::{
    error::{GatewayError, Result},
    transport::HttpConfig,
};

/// Label used when no `default_account` is configured.
pub const DEFAULT_ACCOUNT: &str = "main";

/// Root gateway configuration.
///
/// # Examples
///
/// ```
/// use robokassa::gateway::GatewayConfig;
///
/// let config = GatewayConfig::from_toml(
///     r#"
///     base_url = "https://auth.robokassa.ru"
///
///     [accounts.main]
///     login = "shop"
///     password1 = "first"
///     password2 = "second"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.default_account, "main");
/// assert_eq!(config.http.request_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL; endpoint paths are appended to its path.
    pub base_url: String,

    /// Result URL sent with payment creation requests (`ResultUrl2`).
    #[serde(default)]
    pub callback_url: Option<String>,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Account used when the caller does not select one.
    #[serde(default = "default_account_label")]
    pub default_account: String,

    /// Credential sets keyed by label.
    #[serde(default)]
    pub accounts: BTreeMap<String, Credentials>,
}

impl GatewayConfig {
    /// Creates a configuration with default HTTP settings and no accounts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            callback_url: None,
            http: HttpConfig::default(),
            default_account: default_account_label(),
            accounts: BTreeMap::new(),
        }
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails or configuration validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| GatewayError::Config(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or [`GatewayConfig::from_toml`] fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GatewayError::Config(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Adds or replaces a credential set.
    #[must_use]
    pub fn with_account(mut self, label: impl Into<String>, credentials: Credentials) -> Self {
        self.accounts.insert(label.into(), credentials);
        self
    }

    /// Selects the default account.
    #[must_use]
    pub fn with_default_account(mut self, label: impl Into<String>) -> Self {
        self.default_account = label.into();
        self
    }

    /// Sets the callback URL.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Sets HTTP settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Validates the configuration.
    ///
    /// This method checks that:
    /// - `base_url` and `callback_url` parse as `http`/`https` URLs with a host
    /// - at least one account is configured and `default_account` names one of them
    /// - every login and password is non-empty
    /// - HTTP timeouts are within bounds
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        parse_gateway_url("base_url", &self.base_url)?;
        if let Some(callback_url) = &self.callback_url {
            parse_gateway_url("callback_url", callback_url)?;
        }

        if self.accounts.is_empty() {
            return Err(GatewayError::Config("at least one account is required".to_owned()));
        }
        if !self.accounts.contains_key(&self.default_account) {
            return Err(GatewayError::Config(format!(
                "default_account '{}' is not configured",
                self.default_account
            )));
        }
        for (label, credentials) in &self.accounts {
            credentials.validate(label)?;
        }

        self.http.validate()
    }

    /// Returns the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if `base_url` is malformed.
    pub fn parsed_base_url(&self) -> Result<Url> {
        parse_gateway_url("base_url", &self.base_url)
    }
}

fn default_account_label() -> String {
    DEFAULT_ACCOUNT.to_owned()
}

/// Parses a URL the client may talk to or hand to the gateway.
fn parse_gateway_url(name: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| GatewayError::Config(format!("invalid {name} '{value}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::Config(format!(
            "{name} must use http or https, got: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(GatewayError::Config(format!("{name} has no host: {value}")));
    }

    Ok(url)
}

/// Merchant credential set.
///
/// Password #1 signs merchant-initiated requests; password #2 signs status
/// queries and authenticates gateway callbacks. Passwords are wiped from memory on
/// drop and never shown by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    login: String,
    password1: String,
    password2: String,
    #[serde(default)]
    test_mode: bool,
}

impl Credentials {
    /// Creates production credentials.
    #[must_use]
    pub fn new(
        login: impl Into<String>,
        password1: impl Into<String>,
        password2: impl Into<String>,
    ) -> Self {
        Self {
            login: login.into(),
            password1: password1.into(),
            password2: password2.into(),
            test_mode: false,
        }
    }

    /// Marks requests from this account as test payments (`IsTest=1`).
    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Merchant login (`MerchantLogin`).
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Password #1.
    #[must_use]
    pub fn password1(&self) -> &str {
        &self.password1
    }

    /// Password #2.
    #[must_use]
    pub fn password2(&self) -> &str {
        &self.password2
    }

    /// Returns `true` if payments are created in test mode.
    #[must_use]
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    fn validate(&self, label: &str) -> Result<()> {
        let fields = [
            ("login", &self.login),
            ("password1", &self.password1),
            ("password2", &self.password2),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(GatewayError::Config(format!("account '{label}': {name} is empty")));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password1", &"<redacted>")
            .field("password2", &"<redacted>")
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.password1.zeroize();
        self.password2.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        base_url = "https://auth.robokassa.ru"
        callback_url = "https://shop.example.com/payments/result"
        default_account = "main"

        [http]
        idle_timeout_secs = 60
        request_timeout_secs = 21

        [accounts.main]
        login = "shop"
        password1 = "first"
        password2 = "second"
        test_mode = true

        [accounts.sbp]
        login = "shop-sbp"
        password1 = "third"
        password2 = "fourth"
    "#;

    #[test]
    fn test_from_toml_complete() {
        let config = GatewayConfig::from_toml(VALID).unwrap();

        assert_eq!(config.base_url, "https://auth.robokassa.ru");
        assert_eq!(
            config.callback_url.as_deref(),
            Some("https://shop.example.com/payments/result")
        );
        assert_eq!(config.http.idle_timeout_secs, 60);
        assert_eq!(config.http.request_timeout_secs, 21);
        assert_eq!(config.accounts.len(), 2);

        let main = &config.accounts["main"];
        assert_eq!(main.login(), "shop");
        assert_eq!(main.password1(), "first");
        assert_eq!(main.password2(), "second");
        assert!(main.test_mode());
        assert!(!config.accounts["sbp"].test_mode());
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = GatewayConfig::from_toml(
            r#"
            base_url = "https://auth.robokassa.ru"
            [accounts.main]
            login = "shop"
            password1 = "a"
            password2 = "b"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_account, DEFAULT_ACCOUNT);
        assert!(config.callback_url.is_none());
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let result = GatewayConfig::from_toml("base_url = ");
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_missing_required_base_url() {
        let result = GatewayConfig::from_toml("[accounts.main]\nlogin = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_malformed_base_url() {
        let config =
            GatewayConfig::new("not a url").with_account("main", Credentials::new("a", "b", "c"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = GatewayConfig::new("ftp://auth.robokassa.ru")
            .with_account("main", Credentials::new("a", "b", "c"));
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_validate_accepts_plain_http() {
        let config = GatewayConfig::new("http://127.0.0.1:8080")
            .with_account("main", Credentials::new("a", "b", "c"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_callback_url() {
        let config = GatewayConfig::new("https://auth.robokassa.ru")
            .with_account("main", Credentials::new("a", "b", "c"))
            .with_callback_url("/relative");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("callback_url"));
    }

    #[test]
    fn test_validate_requires_account() {
        let config = GatewayConfig::new("https://auth.robokassa.ru");
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_default_account() {
        let config = GatewayConfig::new("https://auth.robokassa.ru")
            .with_account("main", Credentials::new("a", "b", "c"))
            .with_default_account("backup");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backup"));
    }

    #[test]
    fn test_validate_empty_password() {
        let config = GatewayConfig::new("https://auth.robokassa.ru")
            .with_account("main", Credentials::new("shop", "first", " "));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("password2"));
    }

    #[test]
    fn test_validate_http_bounds() {
        let config = GatewayConfig::new("https://auth.robokassa.ru")
            .with_account("main", Credentials::new("a", "b", "c"))
            .with_http(HttpConfig { idle_timeout_secs: 0, request_timeout_secs: 30 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_passwords() {
        let credentials = Credentials::new("shop", "super-secret-1", "super-secret-2");
        let debug_str = format!("{credentials:?}");
        assert!(debug_str.contains("shop"));
        assert!(!debug_str.contains("super-secret-1"));
        assert!(!debug_str.contains("super-secret-2"));

        let config =
            GatewayConfig::new("https://auth.robokassa.ru").with_account("main", credentials);
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = GatewayConfig::from_file("/nonexistent/robokassa.toml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }

    #[test]
    fn test_from_file() {
        let path =
            std::env::temp_dir().join(format!("robokassa-config-{}.toml", std::process::id()));
        std::fs::write(&path, VALID).unwrap();

        let config = GatewayConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.accounts["sbp"].login(), "shop-sbp");
    }
}

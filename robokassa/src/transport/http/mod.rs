//! HTTP transport implementation using reqwest.

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use super::config::HttpConfig;
use crate::{
    codec::FORM_CONTENT_TYPE,
    error::{GatewayError, Result},
    transport::{Method, Transport, TransportRequest, TransportResponse, resolve_url, sealed},
};

/// Rejects endpoint paths containing directory traversal sequences.
fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(GatewayError::InvalidInput(
            "invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    if !path.is_empty() && !path.starts_with('/') {
        return Err(GatewayError::InvalidInput("path must start with '/'".to_owned()));
    }
    Ok(path)
}

/// HTTP/1.1 and HTTP/2 transport with connection pooling.
///
/// Every call made through one `HttpTransport` shares its connection pool.
/// Pooled connections are dropped once idle longer than
/// [`HttpConfig::idle_timeout_secs`].
///
/// # Examples
///
/// ```
/// use robokassa::transport::{HttpConfig, HttpTransport, Transport};
///
/// let config = HttpConfig { idle_timeout_secs: 60, request_timeout_secs: 21 };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a transport with [`HttpConfig::default`] settings.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom timeouts.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of bounds or HTTP client
    /// creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .pool_idle_timeout(config.idle_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { client })
    }

    #[instrument(
        skip(self, base_url, request),
        fields(method = %request.method, path = request.path)
    )]
    async fn execute_request(
        &self,
        base_url: &Url,
        request: TransportRequest<'_>,
    ) -> Result<TransportResponse> {
        let path = sanitize_path(request.path)?;
        let mut url = resolve_url(base_url, path);

        let builder = match request.method {
            Method::Get => {
                if !request.form.is_empty() {
                    url.query_pairs_mut().extend_pairs(request.form.iter());
                }
                self.client.get(url)
            }
            Method::Post => self.client.post(url).body(request.form.encode()),
        };

        let response = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).send().await?;
        let status = response.status().as_u16();

        // Read the whole body before any status handling so callers always get it.
        let body = response.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "response body read");

        Ok(TransportResponse { status, body })
    }
}

impl Transport for HttpTransport {
    async fn execute<'a>(
        &'a self,
        base_url: &'a Url,
        request: TransportRequest<'a>,
    ) -> Result<TransportResponse> {
        self.execute_request(base_url, request).await
    }

    fn protocol_name(&self) -> &'static str {
        "http"
    }
}

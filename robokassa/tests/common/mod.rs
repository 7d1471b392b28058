//! In-process stand-in for the gateway.
//!
//! Accepts one HTTP/1.1 connection, records the request, and answers with a
//! canned status and body.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::{collections::BTreeMap, time::Duration};

use robokassa::gateway::{Credentials, GatewayClient, GatewayConfig};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use url::form_urlencoded;

/// Request as received by [`MockGateway`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Returns a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request path without the query string.
    pub fn path(&self) -> &str {
        self.target.split_once('?').map_or(self.target.as_str(), |(path, _)| path)
    }

    /// Raw query string, empty when absent.
    pub fn query(&self) -> &str {
        self.target.split_once('?').map_or("", |(_, query)| query)
    }

    /// Decoded form fields from the body, or from the query string for GET.
    pub fn form(&self) -> BTreeMap<String, String> {
        let encoded = if self.method == "GET" { self.query() } else { self.body.as_str() };
        form_urlencoded::parse(encoded.as_bytes()).into_owned().collect()
    }
}

/// Canned reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with status and body.
    Respond { status: u16, body: Vec<u8> },
    /// Read the request, then stay silent for the given time.
    Stall(Duration),
}

/// One-shot gateway mock bound to a random loopback port.
#[derive(Debug)]
pub struct MockGateway {
    pub base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl MockGateway {
    /// Starts a mock that answers the first request with `status` and `body`.
    pub async fn respond(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::start(Reply::Respond { status, body: body.into() }).await
    }

    /// Starts a mock that never answers in time.
    pub async fn stall(duration: Duration) -> Self {
        Self::start(Reply::Stall(duration)).await
    }

    async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut stream).await;

            match reply {
                Reply::Respond { status, body } => {
                    let head = format!(
                        "HTTP/1.1 {status} Mock\r\nContent-Type: text/plain\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    stream.write_all(head.as_bytes()).await.expect("write head");
                    stream.write_all(&body).await.expect("write body");
                    stream.shutdown().await.ok();
                }
                Reply::Stall(duration) => tokio::time::sleep(duration).await,
            }

            request
        });

        Self { base_url: format!("http://{addr}"), handle }
    }

    /// Waits for the mock to finish and returns the captured request.
    pub async fn request(self) -> CapturedRequest {
        self.handle.await.expect("mock gateway task")
    }
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut chunk).await.expect("read request");
        assert!(read > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8(buffer[..header_end].to_vec()).expect("utf-8 head");
    let mut lines = head.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines.next().expect("request line");
    let mut parts = request_line.split(' ');
    let method = parts.next().expect("method").to_owned();
    let target = parts.next().expect("target").to_owned();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map_or(0, |(_, value)| value.parse::<usize>().expect("content-length"));

    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await.expect("read body");
        assert!(read > 0, "connection closed before body was complete");
        buffer.extend_from_slice(&chunk[..read]);
    }

    let body = String::from_utf8(buffer[header_end..header_end + content_length].to_vec())
        .expect("utf-8 body");

    CapturedRequest { method, target, headers, body }
}

/// Client for `base_url` with a single `main` account (`Shop` / `secret` / `secret2`).
pub fn client(base_url: &str) -> GatewayClient {
    client_with(GatewayConfig::new(base_url))
}

/// Adds the `main` account to `config` and builds a client.
pub fn client_with(config: GatewayConfig) -> GatewayClient {
    let config = config.with_account("main", Credentials::new("Shop", "secret", "secret2"));
    GatewayClient::new(config).expect("valid test config")
}

//! Monoio-native HTTPS transport
//!
//! - Single-threaded async with monoio
//! - Direct TLS integration with rustls and the webpki root store
//! - HTTP/1.1 with `Connection: close`, one connection per request
//! - Chunked response bodies are decoded before they reach the caller

use crate::errors::{ConnectorError, Result};
use crate::traits::HttpTransport;
use crate::types::HttpMethod;
use async_trait::async_trait;
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "sapi-connector/0.1";

/// Outbound HTTP request, fully built and signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Query component of the URL, without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }
}

/// HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Monoio-native HTTPS client
pub struct MonoioHttpsClient {
    tls_config: Arc<ClientConfig>,
    timeout: Option<Duration>,
}

/// TLS stream wrapper for monoio
struct TlsStream {
    stream: TcpStream,
    tls_conn: ClientConnection,
    write_buf: Vec<u8>,
    tls_read_buf: Vec<u8>,
    handshake_complete: bool,
}

impl MonoioHttpsClient {
    /// Create a new HTTPS client with the webpki root store and no timeout
    pub fn new() -> Result<Self> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(
            webpki_roots::TLS_SERVER_ROOTS
                .iter()
                .cloned()
        );

        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Ok(Self {
            tls_config: Arc::new(tls_config),
            timeout: None,
        })
    }

    /// Bound the whole exchange (connect, handshake, write, read)
    ///
    /// Requires a monoio runtime built with the timer enabled.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let parsed_url = url::Url::parse(&request.url)
            .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;

        if parsed_url.scheme() != "https" {
            return Err(ConnectorError::InvalidUrl(format!(
                "Unsupported scheme {}: only https is supported",
                parsed_url.scheme()
            )));
        }

        let host = parsed_url.host_str()
            .ok_or_else(|| ConnectorError::InvalidUrl("No host in URL".to_string()))?;

        let port = parsed_url.port().unwrap_or(443);
        let mut path_and_query = if parsed_url.path().is_empty() {
            "/".to_string()
        } else {
            parsed_url.path().to_string()
        };
        if let Some(query) = parsed_url.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        let tcp_stream = TcpStream::connect(&format!("{host}:{port}"))
            .await
            .map_err(|e| ConnectorError::NetworkError(format!("TCP connect failed: {e}")))?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ConnectorError::NetworkError(format!("Invalid server name: {e:?}")))?;

        let tls_conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| ConnectorError::NetworkError(format!("TLS setup failed: {e}")))?;

        let mut tls_stream = TlsStream::new(tcp_stream, tls_conn);

        let head = build_request_head(request, host, &path_and_query);
        let mut raw = head.into_bytes();
        if let Some(body) = &request.body {
            raw.extend_from_slice(body.as_bytes());
        }

        tls_stream.write_all(&raw).await?;
        let response_data = tls_stream.read_to_end().await?;

        parse_http_response(&response_data)
    }
}

#[async_trait(?Send)]
impl HttpTransport for MonoioHttpsClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!("🌐 {} {}", request.method, request.url.split('?').next().unwrap_or_default());

        match self.timeout {
            Some(limit) => monoio::time::timeout(limit, self.send(&request))
                .await
                .map_err(|_| ConnectorError::Timeout(format!("{} exceeded {}ms", request.method, limit.as_millis())))?,
            None => self.send(&request).await,
        }
    }
}

/// Request line and headers, terminated by the blank line
fn build_request_head(request: &HttpRequest, host: &str, path_and_query: &str) -> String {
    let content_length = request.body.as_ref().map(|b| b.len()).unwrap_or(0);
    let mut head = format!(
        "{} {path_and_query} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Connection: close\r\n\
         Content-Length: {content_length}\r\n",
        request.method
    );

    for (key, value) in &request.headers {
        head.push_str(&format!("{key}: {value}\r\n"));
    }

    head.push_str("\r\n");
    head
}

/// Parse a complete HTTP/1.1 response read until connection close
fn parse_http_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| ConnectorError::NetworkError("Invalid HTTP response: no header terminator".to_string()))?;

    let header_part = String::from_utf8_lossy(&data[..header_end]);
    let body_bytes = &data[header_end + 4..];

    let mut lines = header_part.lines();

    let status_line = lines.next()
        .ok_or_else(|| ConnectorError::NetworkError("Empty response".to_string()))?;

    let status = status_line.split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ConnectorError::NetworkError("Invalid status line".to_string()))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let chunked = find_header(&headers, "Transfer-Encoding")
        .map(|v| v.to_ascii_lowercase().contains("chunked"))
        .unwrap_or(false);

    let body = if chunked {
        decode_chunked(body_bytes)?
    } else if let Some(len) = find_header(&headers, "Content-Length").and_then(|v| v.parse::<usize>().ok()) {
        if body_bytes.len() < len {
            return Err(ConnectorError::NetworkError(format!(
                "Truncated body: expected {len} bytes, got {}",
                body_bytes.len()
            )));
        }
        body_bytes[..len].to_vec()
    } else {
        body_bytes.to_vec()
    };

    let body = String::from_utf8(body)
        .map_err(|e| ConnectorError::NetworkError(format!("Response body is not UTF-8: {e}")))?;

    Ok(HttpResponse { status, headers, body })
}

/// Decode a `Transfer-Encoding: chunked` body
fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(data.len());

    loop {
        let line_end = data
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| ConnectorError::NetworkError("Truncated chunk size line".to_string()))?;

        let size_line = String::from_utf8_lossy(&data[..line_end]);
        // Chunk extensions follow a ';'
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| ConnectorError::NetworkError(format!("Invalid chunk size: {size_hex}")))?;

        data = &data[line_end + 2..];
        if size == 0 {
            break;
        }
        if data.len() < size {
            return Err(ConnectorError::NetworkError("Truncated chunk body".to_string()));
        }

        body.extend_from_slice(&data[..size]);
        data = data[size..]
            .strip_prefix(b"\r\n")
            .ok_or_else(|| ConnectorError::NetworkError("Missing CRLF after chunk".to_string()))?;
    }

    // Optional trailer fields, then the blank line
    if data != b"\r\n" && !data.ends_with(b"\r\n\r\n") {
        return Err(ConnectorError::NetworkError("Truncated chunked body terminator".to_string()));
    }

    Ok(body)
}

impl TlsStream {
    fn new(stream: TcpStream, tls_conn: ClientConnection) -> Self {
        Self {
            stream,
            tls_conn,
            write_buf: Vec::with_capacity(8192),
            tls_read_buf: Vec::with_capacity(8192),
            handshake_complete: false,
        }
    }

    /// Push any pending TLS records to the socket
    async fn flush_tls(&mut self) -> Result<()> {
        while self.tls_conn.wants_write() {
            self.write_buf.clear();

            let tls_bytes = self.tls_conn.write_tls(&mut self.write_buf)
                .map_err(|e| ConnectorError::NetworkError(format!("TLS write failed: {e}")))?;

            if tls_bytes > 0 {
                let (result, _) = self.stream.write_all(self.write_buf.clone()).await;
                result.map_err(|e| ConnectorError::NetworkError(format!("TCP write failed: {e}")))?;
            }
        }
        Ok(())
    }

    /// Read one TCP segment into the TLS state machine, false on EOF
    async fn fill_tls(&mut self) -> Result<bool> {
        let buffer = vec![0u8; 4096];
        let (result, buf) = self.stream.read(buffer).await;
        let bytes_read = result.map_err(|e| ConnectorError::NetworkError(format!("TCP read failed: {e}")))?;

        if bytes_read == 0 {
            return Ok(false);
        }

        self.tls_conn.read_tls(&mut std::io::Cursor::new(&buf[..bytes_read]))
            .map_err(|e| ConnectorError::NetworkError(format!("TLS read failed: {e}")))?;

        self.tls_conn.process_new_packets()
            .map_err(|e| ConnectorError::NetworkError(format!("TLS process failed: {e}")))?;

        Ok(true)
    }

    async fn complete_handshake(&mut self) -> Result<()> {
        if self.handshake_complete {
            return Ok(());
        }

        loop {
            self.flush_tls().await?;

            if !self.tls_conn.is_handshaking() {
                self.handshake_complete = true;
                break;
            }

            if self.tls_conn.wants_read() {
                if !self.fill_tls().await? {
                    return Err(ConnectorError::NetworkError("Connection closed during handshake".to_string()));
                }
            } else if !self.tls_conn.wants_write() {
                return Err(ConnectorError::NetworkError("TLS handshake stalled".to_string()));
            }
        }

        Ok(())
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.complete_handshake().await?;

        self.tls_conn.writer().write_all(data)
            .map_err(|e| ConnectorError::NetworkError(format!("TLS application write failed: {e}")))?;

        self.flush_tls().await
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.complete_handshake().await?;

        let mut response_data = Vec::new();

        loop {
            self.tls_read_buf.clear();
            self.tls_read_buf.resize(4096, 0);

            match self.tls_conn.reader().read(&mut self.tls_read_buf) {
                Ok(0) => {}
                Ok(n) => {
                    response_data.extend_from_slice(&self.tls_read_buf[..n]);
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                // Peer closed without close_notify; keep what arrived
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    return Err(ConnectorError::NetworkError(format!("TLS read failed: {e}")));
                }
            }

            if !self.fill_tls().await? {
                break;
            }
        }

        Ok(response_data)
    }
}

//! Binance REST client using monoio
//!
//! Every authenticated endpoint funnels through [`BinanceRestClient::send_signed_request`]:
//! - Parameters keep caller order; the signature covers the exact encoded string
//! - GET/DELETE send the signed string as the URL query, POST/PUT as a form body
//! - One transport call per invocation, nothing is retried
//! - 2xx bodies are returned unchanged for the mapper to interpret

use crate::binance::auth::{API_KEY_HEADER, BinanceCredentials, BinanceSigner};
use crate::errors::{ConnectorError, Result};
use crate::http::{HttpRequest, MonoioHttpsClient};
use crate::mapper::{FieldSpec, FieldType, parse_json, parse_record};
use crate::traits::HttpTransport;
use crate::types::{HttpMethod, QueryParams};
use sapi_core::{PerfTimer, log_error, log_request, now_ms};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const TESTNET_BASE_URL: &str = "https://testnet.binance.vision";

/// Production hosts probed by endpoint discovery, in preference order
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://api.binance.com",
    "https://api-gcp.binance.com",
    "https://api1.binance.com",
    "https://api2.binance.com",
    "https://api3.binance.com",
    "https://api4.binance.com",
];

const PING_PATH: &str = "/api/v3/ping";
const TIME_PATH: &str = "/api/v3/time";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Transport timeout the blocking client applies when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Binance client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    pub base_url: String,
    pub testnet: bool,
    /// Whole-exchange transport timeout, `Some(0)` disables it
    ///
    /// Needs a monoio runtime with the timer enabled. Unset means no timeout
    /// on the async client and [`DEFAULT_TIMEOUT_MS`] on the blocking one.
    pub timeout_ms: Option<u64>,
    /// Appended to signed calls unless the caller supplies one
    pub recv_window: Option<u64>,
    /// Probe [`DEFAULT_ENDPOINTS`] on connect and keep the first that answers
    pub auto_discover: bool,
    pub enable_timing: bool,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            testnet: false,
            timeout_ms: None,
            recv_window: Some(5000),
            auto_discover: false,
            enable_timing: true,
        }
    }
}

impl BinanceConfig {
    pub fn testnet() -> Self {
        Self {
            base_url: TESTNET_BASE_URL.to_string(),
            testnet: true,
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.api_secret = api_secret.into();
        self
    }

    /// Read `BINANCE_API_KEY` and `BINANCE_SECRET_KEY`
    pub fn with_env_credentials(self) -> Result<Self> {
        let credentials = BinanceCredentials::from_env()?;
        Ok(self.with_credentials(credentials.api_key, credentials.secret_key))
    }

    pub fn with_recv_window(mut self, recv_window: Option<u64>) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_auto_discover(mut self, enable: bool) -> Self {
        self.auto_discover = enable;
        self
    }

    pub fn with_timing(mut self, enable: bool) -> Self {
        self.enable_timing = enable;
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// Hosts tried by discovery: the configured one first, then the defaults
    pub fn discovery_candidates(&self) -> Vec<String> {
        let mut candidates = vec![normalize_base_url(&self.base_url)];
        if !self.testnet {
            for endpoint in DEFAULT_ENDPOINTS {
                if !candidates.iter().any(|c| c == endpoint) {
                    candidates.push(endpoint.to_string());
                }
            }
        }
        candidates
    }
}

/// Binance REST client over a pluggable transport
pub struct BinanceRestClient<T: HttpTransport = MonoioHttpsClient> {
    config: BinanceConfig,
    base_url: String,
    signer: Option<BinanceSigner>,
    transport: T,
}

impl BinanceRestClient<MonoioHttpsClient> {
    /// Create a client on the monoio HTTPS transport
    pub fn new(config: BinanceConfig) -> Result<Self> {
        let transport = build_transport(&config)?;
        Self::with_transport(config, transport)
    }

    /// Create a client, running endpoint discovery first when enabled
    pub async fn connect(config: BinanceConfig) -> Result<Self> {
        let transport = build_transport(&config)?;
        Self::connect_with(config, transport).await
    }
}

impl<T: HttpTransport> BinanceRestClient<T> {
    /// Create a client on any transport
    ///
    /// Empty credentials are accepted; signed calls then fail with
    /// `MissingCredentials` before anything is sent.
    pub fn with_transport(config: BinanceConfig, transport: T) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url);
        url::Url::parse(&base_url)?;

        let signer = if config.has_credentials() {
            Some(BinanceSigner::new(BinanceCredentials::new(
                config.api_key.clone(),
                config.api_secret.clone(),
            ))?)
        } else {
            None
        };

        info!("🔗 Binance REST client created");
        info!("   Base URL: {}", base_url);
        info!("   Testnet: {}", config.testnet);
        info!("   Signed: {}", signer.is_some());

        Ok(Self {
            config,
            base_url,
            signer,
            transport,
        })
    }

    /// Like [`Self::with_transport`], probing hosts first when `auto_discover` is set
    pub async fn connect_with(mut config: BinanceConfig, transport: T) -> Result<Self> {
        if config.auto_discover {
            let candidates = config.discovery_candidates();
            let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
            config.base_url = discover_base_url(&transport, &refs).await?;
        }

        Self::with_transport(config, transport)
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign `params` as given and issue one request
    ///
    /// `params` must already contain `timestamp`. Returns the body of a 2xx
    /// response unchanged.
    pub async fn send_signed_request(&self, method: HttpMethod, path: &str, params: &QueryParams) -> Result<String> {
        let signer = self.signer()?;
        let signed = signer.sign_params(params)?;

        log_request!(method, path, "signed");

        let request = self
            .build_request(method, path, signed.as_query())
            .with_header(API_KEY_HEADER, signer.api_key());

        self.dispatch(request, path).await
    }

    /// Add `timestamp` and the configured `recvWindow`, then sign and send
    ///
    /// Caller-supplied `timestamp` or `recvWindow` entries are kept as-is.
    pub async fn call_signed(&self, method: HttpMethod, path: &str, mut params: QueryParams) -> Result<String> {
        if !params.contains("timestamp") {
            params.push("timestamp", now_ms());
        }
        if let Some(recv_window) = self.config.recv_window {
            if !params.contains("recvWindow") {
                params.push("recvWindow", recv_window);
            }
        }

        self.send_signed_request(method, path, &params).await
    }

    /// Unsigned request for market and system endpoints
    pub async fn send_public_request(&self, method: HttpMethod, path: &str, params: &QueryParams) -> Result<String> {
        log_request!(method, path, "public");

        let request = self.build_request(method, path, params.to_query_string());
        self.dispatch(request, path).await
    }

    /// Request carrying the API key header but no signature
    pub async fn send_api_key_request(&self, method: HttpMethod, path: &str, params: &QueryParams) -> Result<String> {
        let signer = self.signer()?;

        log_request!(method, path, "api-key");

        let request = self
            .build_request(method, path, params.to_query_string())
            .with_header(API_KEY_HEADER, signer.api_key());

        self.dispatch(request, path).await
    }

    /// Test connectivity
    pub async fn ping(&self) -> Result<()> {
        self.send_public_request(HttpMethod::Get, PING_PATH, &QueryParams::new())
            .await
            .map(|_| ())
    }

    /// Server clock in milliseconds
    pub async fn server_time(&self) -> Result<u64> {
        const SERVER_TIME: &[FieldSpec] = &[FieldSpec::required("serverTime", FieldType::Int)];

        let body = self
            .send_public_request(HttpMethod::Get, TIME_PATH, &QueryParams::new())
            .await?;
        let record = parse_record(&parse_json(&body)?, SERVER_TIME)?;
        let server_time = record.get_i64("serverTime")?;

        u64::try_from(server_time).map_err(|_| ConnectorError::ValidationError {
            field: "serverTime".to_string(),
            value: server_time.to_string(),
            constraint: "non-negative".to_string(),
        })
    }

    fn signer(&self) -> Result<&BinanceSigner> {
        self.signer
            .as_ref()
            .ok_or_else(|| ConnectorError::MissingCredentials("BINANCE_API_KEY/BINANCE_SECRET_KEY".to_string()))
    }

    /// Place the encoded parameters in the URL or the body by verb
    fn build_request(&self, method: HttpMethod, path: &str, query: String) -> HttpRequest {
        let url = format!("{}{}", self.base_url, path);

        if query.is_empty() {
            HttpRequest::new(method, url)
        } else if method.carries_body() {
            HttpRequest::new(method, url)
                .with_header("Content-Type", FORM_CONTENT_TYPE)
                .with_body(query)
        } else {
            HttpRequest::new(method, format!("{url}?{query}"))
        }
    }

    async fn dispatch(&self, request: HttpRequest, path: &str) -> Result<String> {
        let _timer = self
            .config
            .enable_timing
            .then(|| PerfTimer::start(format!("binance_{}_{path}", request.method)));

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                log_error!(path, err);
                return Err(err);
            }
        };

        if response.is_success() {
            debug!("✅ {} -> {} ({} bytes)", path, response.status, response.body.len());
            return Ok(response.body);
        }

        let err = ConnectorError::from_error_body(response.status, &response.body);
        log_error!(path, err);
        Err(err)
    }
}

/// Probe `candidates` with `/api/v3/ping` in order
///
/// Returns the first host answering 2xx. Fails with `NetworkError` when
/// none does.
pub async fn discover_base_url<T: HttpTransport + ?Sized>(transport: &T, candidates: &[&str]) -> Result<String> {
    for candidate in candidates {
        let base_url = normalize_base_url(candidate);
        let request = HttpRequest::new(HttpMethod::Get, format!("{base_url}{PING_PATH}"));

        match transport.execute(request).await {
            Ok(response) if response.is_success() => {
                info!("🌐 Selected Binance endpoint {}", base_url);
                return Ok(base_url);
            }
            Ok(response) => debug!("Endpoint {} answered {}", base_url, response.status),
            Err(err) => debug!("Endpoint {} unreachable: {}", base_url, err),
        }
    }

    Err(ConnectorError::NetworkError(format!(
        "No reachable endpoint among {} candidates",
        candidates.len()
    )))
}

fn build_transport(config: &BinanceConfig) -> Result<MonoioHttpsClient> {
    let client = MonoioHttpsClient::new()?;
    Ok(match config.timeout_ms {
        Some(ms) if ms > 0 => client.with_timeout(Duration::from_millis(ms)),
        _ => client,
    })
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

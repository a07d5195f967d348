//! Shared fixtures for the SAPI integration tests
//!
//! [`RecordingTransport`] stands in for the network: it keeps every request
//! it is handed and answers from a queue of canned responses.

use async_trait::async_trait;
use sapi_connector::prelude::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TEST_LOGGING: Once = Once::new();

pub const TEST_API_KEY: &str = "test_api_key";
pub const TEST_SECRET: &str = "test_secret";

/// In-memory transport that records requests
#[derive(Default)]
pub struct RecordingTransport {
    requests: RefCell<Vec<HttpRequest>>,
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, err: ConnectorError) -> Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!("recorded {} {}", request.method, request.url);
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ConnectorError::NetworkError("no response queued".to_string())))
    }
}

/// Route client logs through the test harness capture, `RUST_LOG` filtered
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_test_writer()
            .try_init();
    });
}

/// Test configuration with fixed credentials and timing logs off
pub fn test_config() -> BinanceConfig {
    BinanceConfig::default()
        .with_credentials(TEST_API_KEY, TEST_SECRET)
        .with_timing(false)
}

/// Signed client over a recording transport
pub fn signed_client(transport: RecordingTransport) -> BinanceRestClient<RecordingTransport> {
    init_test_logging();
    match BinanceRestClient::with_transport(test_config(), transport) {
        Ok(client) => client,
        Err(err) => panic!("test client construction failed: {err}"),
    }
}

/// Split a signed query into its unsigned part and signature
pub fn split_signature(query: &str) -> Option<(&str, &str)> {
    query.rsplit_once("&signature=")
}

pub fn is_lower_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

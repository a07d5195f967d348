//! # SAPI Connector
//!
//! Authenticated client core for the Binance REST API.
//!
//! ## Architecture
//!
//! - **Signed request client** - ordered parameters, HMAC-SHA256 over the exact wire bytes
//! - **Pluggable transport** - monoio-native HTTPS in production, mocks in tests
//! - **Response mapper** - declarative field tables with defaults and invariants
//! - **Blocking facade** - synchronous calls on a single-threaded runtime
//! - **SAPI wrappers** - margin, simple earn, asset and capital endpoints (`sapi` feature)

pub mod binance;
pub mod errors;
pub mod http;
pub mod mapper;
pub mod traits;
pub mod types;

// Re-export main types
pub use binance::{BinanceConfig, BinanceCredentials, BinanceRestClient, BinanceSigner, BlockingRestClient};
pub use errors::{ConnectorError, ErrorKind, Result};
pub use http::{HttpRequest, HttpResponse, MonoioHttpsClient};
pub use mapper::{FromRecord, Record, RowsList};
pub use traits::HttpTransport;
pub use types::{HttpMethod, QueryParams};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::binance::*;
    pub use crate::errors::{ConnectorError, ErrorKind, Result};
    pub use crate::http::{HttpRequest, HttpResponse, MonoioHttpsClient};
    pub use crate::mapper::*;
    pub use crate::traits::HttpTransport;
    pub use crate::types::{HttpMethod, QueryParams};
    pub use sapi_core::prelude::*;
}

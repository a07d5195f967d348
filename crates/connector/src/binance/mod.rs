//! Binance REST integration
//!
//! Signing, the signed-request client, typed SAPI records and the
//! endpoint wrappers built on top of them.

pub mod auth;
pub mod blocking;
pub mod rest;
pub mod types;

#[cfg(feature = "sapi")]
pub mod sapi;

pub use auth::{API_KEY_HEADER, BinanceCredentials, BinanceSigner, SignedQuery, hmac_sha256_hex};
pub use blocking::BlockingRestClient;
pub use rest::{
    BinanceConfig, BinanceRestClient, DEFAULT_BASE_URL, DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT_MS, TESTNET_BASE_URL,
    discover_base_url,
};
pub use types::*;

#[cfg(feature = "sapi")]
pub use sapi::{FlexibleListQuery, InterestHistoryQuery};

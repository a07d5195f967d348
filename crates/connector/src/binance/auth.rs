//! Binance authentication and request signing
//!
//! - HMAC-SHA256 over the exact query bytes that go on the wire
//! - Parameter order is preserved, never sorted
//! - Secret key stays in process memory and out of logs

use crate::errors::{ConnectorError, Result};
use crate::types::QueryParams;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key on authenticated requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance API credentials
#[derive(Clone)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub secret_key: String,
}

impl BinanceCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BINANCE_API_KEY")
            .map_err(|_| ConnectorError::MissingCredentials("BINANCE_API_KEY".to_string()))?;
        let secret_key = std::env::var("BINANCE_SECRET_KEY")
            .map_err(|_| ConnectorError::MissingCredentials("BINANCE_SECRET_KEY".to_string()))?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Check if credentials are usable (non-empty)
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

impl fmt::Debug for BinanceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Query string with its signature appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    unsigned: String,
    signature: String,
}

impl SignedQuery {
    /// The bytes the signature was computed over
    pub fn unsigned(&self) -> &str {
        &self.unsigned
    }

    /// Lowercase hex HMAC-SHA256 digest
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// `unsigned&signature=<hex>`, the string that goes on the wire
    pub fn as_query(&self) -> String {
        if self.unsigned.is_empty() {
            format!("signature={}", self.signature)
        } else {
            format!("{}&signature={}", self.unsigned, self.signature)
        }
    }
}

impl fmt::Display for SignedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query())
    }
}

/// Binance request signer
#[derive(Debug, Clone)]
pub struct BinanceSigner {
    credentials: BinanceCredentials,
}

impl BinanceSigner {
    /// Create new signer, rejecting empty credentials
    pub fn new(credentials: BinanceCredentials) -> Result<Self> {
        if !credentials.is_valid() {
            return Err(ConnectorError::InvalidCredentials);
        }

        Ok(Self { credentials })
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    /// Encode params in order and sign the result
    ///
    /// `timestamp` must already be present; the signer never adds or
    /// reorders parameters.
    pub fn sign_params(&self, params: &QueryParams) -> Result<SignedQuery> {
        if !params.contains("timestamp") {
            return Err(ConnectorError::MissingParameter("timestamp".to_string()));
        }

        self.sign_query(params.to_query_string())
    }

    /// Sign an already-encoded query string as-is
    pub fn sign_query(&self, unsigned: String) -> Result<SignedQuery> {
        let signature = self.create_signature(&unsigned)?;
        Ok(SignedQuery { unsigned, signature })
    }

    /// Create HMAC-SHA256 signature, lowercase hex
    pub fn create_signature(&self, payload: &str) -> Result<String> {
        hmac_sha256_hex(&self.credentials.secret_key, payload)
    }

    /// Constant-time check of a signature against a payload
    pub fn validate_signature(&self, payload: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };

        match HmacSha256::new_from_slice(self.credentials.secret_key.as_bytes()) {
            Ok(mut mac) => {
                mac.update(payload.as_bytes());
                mac.verify_slice(&expected).is_ok()
            }
            Err(_) => false,
        }
    }
}

/// Lowercase hex HMAC-SHA256 of `payload` under `secret`
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ConnectorError::SigningError(format!("HMAC setup failed: {e}")))?;

    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

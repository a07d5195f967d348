//! # SAPI Core
//!
//! Shared plumbing for the Binance SAPI connector.
//!
//! - **Client clock** - millisecond `timestamp` values for signed requests
//! - **Latency timers** - per-request timing logged through `tracing`
//! - **Unified logging** - one subscriber bootstrap for binaries and tests
//! - **Blocking runtime** - single-threaded monoio runtime for synchronous callers

pub mod runtime;
pub mod timing;
pub mod logging;

pub use runtime::{ClientRuntime, RuntimeConfig};
pub use timing::{nanos, now_ms, PerfTimer, Timestamp};
pub use logging::init_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::runtime::{ClientRuntime, RuntimeConfig};
    pub use crate::timing::{nanos, now_ms, PerfTimer, Timestamp};
    pub use crate::logging::init_logging;

    pub use monoio;
    pub use chrono::{DateTime, Utc};
}

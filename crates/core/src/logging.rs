//! Unified logging integration
//!
//! Installs a `tracing` subscriber once per process. The `ftlog` feature
//! switches to the ftlog backend.

#[cfg(not(feature = "ftlog"))]
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(feature = "ftlog")]
        {
            init_ftlog();
        }

        #[cfg(not(feature = "ftlog"))]
        {
            init_tracing();
        }
    });
}

#[cfg(feature = "ftlog")]
fn init_ftlog() {
    if let Err(e) = ftlog::builder()
        .max_log_level(ftlog::LevelFilter::Debug)
        .bounded(100000, false)
        .utc()
        .build()
    {
        eprintln!("ftlog initialization failed: {e}");
        return;
    }

    tracing::info!("📝 Initialized ftlog unified logging");
}

/// `RUST_LOG` selects the filter, `info` when unset
#[cfg(not(feature = "ftlog"))]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    // A host application may already own the global subscriber
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return;
    }

    tracing::info!("📝 Initialized tracing logging");
}

/// Log an outbound request without its query string
#[macro_export]
macro_rules! log_request {
    ($method:expr, $path:expr, $kind:expr) => {
        tracing::debug!("📡 {} {} ({})", $method, $path, $kind);
    };
}

#[macro_export]
macro_rules! log_error {
    ($operation:expr, $error:expr) => {
        tracing::warn!("❌ {} failed: {}", $operation, $error);
    };
}

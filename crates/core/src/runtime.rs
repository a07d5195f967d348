//! Single-threaded monoio runtime for blocking callers
//!
//! Each `block_on` builds a fresh runtime with the timer enabled, drives
//! the future to completion on the calling thread and tears it down.

use monoio::{FusionDriver, RuntimeBuilder};
use tracing::debug;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Enable the monoio timer (required for transport timeouts)
    pub enable_timer: bool,
    /// io_uring submission queue entries
    pub entries: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enable_timer: true,
            entries: None,
        }
    }
}

/// Blocking entry point into the async client
#[derive(Debug, Clone, Default)]
pub struct ClientRuntime {
    config: RuntimeConfig,
}

impl ClientRuntime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Run a future to completion on the current thread
    pub fn block_on<F>(&self, future: F) -> std::io::Result<F::Output>
    where
        F: std::future::Future,
    {
        let mut builder = RuntimeBuilder::<FusionDriver>::new();
        if let Some(entries) = self.config.entries {
            builder = builder.with_entries(entries);
        }

        debug!("▶️  Runtime started (timer: {})", self.config.enable_timer);
        if self.config.enable_timer {
            let mut runtime = builder.enable_timer().build()?;
            Ok(runtime.block_on(future))
        } else {
            let mut runtime = builder.build()?;
            Ok(runtime.block_on(future))
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

//! Structured logging infrastructure for zkCert hosts.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! host's decision. Key material, signatures and shares are never logged,
//! only indices, counts and public values such as roots.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// Initialize human-readable logging at `info` unless `RUST_LOG` says otherwise.
///
/// Repeated initialisation is a no-op.
///
/// # Example
/// ```no_run
/// use zkcert_core::logging;
///
/// logging::init();
/// tracing::info!("Wallet session started");
/// ```
pub fn init() {
    let _ = init_with(&LoggingConfig::default());
}

/// Initialize JSON logging for log aggregation.
///
/// # Example
/// ```no_run
/// use zkcert_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "issuer", "Service started");
/// ```
pub fn init_json() {
    let _ = init_with(&LoggingConfig {
        json: true,
        ..LoggingConfig::default()
    });
}

/// Install a global subscriber from a [`LoggingConfig`].
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber is already installed.
pub fn init_with(config: &LoggingConfig) -> CoreResult<()> {
    let filter = build_filter(&config.level);
    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };
    result.map_err(|e| CoreError::Logging(e.to_string()))
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(default_level))
}

/// The configured directive, or `info` if it does not parse.
fn configured_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

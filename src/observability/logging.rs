//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured filter
//! - Initialisation is idempotent so tests and binaries can both call it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config provide one.
pub const DEFAULT_FILTER: &str = "reactive_cell=info";

/// Build the filter: `RUST_LOG` first, then `configured`, then the default.
pub fn build_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init(configured: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(configured))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! cells, services, docs tooling produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → stdout (fmt layer, filter from RUST_LOG or config)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Library code only emits; binaries initialise the subscriber
//! - Metrics are cheap: without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;

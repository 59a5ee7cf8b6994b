//! Lifecycle management for long-running tools.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT / Ctrl-C → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscribed task leaves its loop → process exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;

//! Service demo (v1)
//!
//! Runs the reactive service scenario on a single-threaded runtime.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌───────────────┐   set_after    ┌──────────────┐   owns   ┌───────────┐
//!   │   scheduler   │──────────────▶│ StateService │────────▶│ ValueCell │
//!   │ (tokio timer) │               └──────────────┘          └─────┬─────┘
//!   └───────────────┘                                               │ notify
//!                                                                   ▼
//!                                            ┌────────────────────────────┐
//!                                            │ component::ViewBinding ×2  │
//!                                            │  early view / late view    │
//!                                            └────────────────────────────┘
//! ```
//!
//! Usage: `reactive-cell [config.toml]`

use std::path::PathBuf;

use reactive_cell::config::load_or_default;
use reactive_cell::lifecycle::{signals, Shutdown};
use reactive_cell::observability::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_or_default(config_path.as_deref())?;

    logging::init(config.observability.log_filter.as_deref());
    tracing::info!("reactive-cell v0.1.0 starting");
    tracing::info!(
        initial = %config.demo.initial,
        updates = config.demo.updates.len(),
        delay_ms = config.demo.delay_ms,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let demo_shutdown = shutdown.subscribe();
    let _signal_task = signals::spawn_ctrl_c_handler(shutdown.clone());

    let local = tokio::task::LocalSet::new();
    let outcome = local
        .run_until(reactive_cell::demo::run(&config.demo, demo_shutdown))
        .await;

    if !outcome.completed {
        tracing::warn!("Demo did not run to completion");
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

//! Metrics collection.
//!
//! # Metrics
//! - `cell_writes_total` (counter): committed `set` calls
//! - `cell_notifications_total` (counter): subscriber callback invocations
//! - `cell_subscriber_failures_total` (counter): failed callback invocations
//! - `docs_readmes_combined_total` (counter): README files written into a
//!   combined document
//! - `docs_combine_runs_total` (counter): combine runs by outcome

pub fn record_cell_write() {
    metrics::counter!("cell_writes_total").increment(1);
}

pub fn record_notifications(count: usize) {
    if count > 0 {
        metrics::counter!("cell_notifications_total").increment(count as u64);
    }
}

pub fn record_subscriber_failure() {
    metrics::counter!("cell_subscriber_failures_total").increment(1);
}

pub fn record_readmes_combined(count: usize) {
    metrics::counter!("docs_readmes_combined_total").increment(count as u64);
}

pub fn record_combine_run(outcome: &'static str) {
    metrics::counter!("docs_combine_runs_total", "outcome" => outcome).increment(1);
}

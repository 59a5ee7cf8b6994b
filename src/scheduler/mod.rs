//! Timer source for delayed writes.
//!
//! Cells have no timer logic; a timer task holds the writer and calls
//! `write` once the delay has elapsed. Cells are `!Send`, so tasks run on a
//! tokio [`LocalSet`](tokio::task::LocalSet).

use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cell::{NotifyError, ValueCell};

/// Anything that accepts writes on behalf of a single producer.
pub trait Writable<T> {
    fn write(&self, value: T) -> Result<(), NotifyError>;
}

impl<T: Clone + 'static> Writable<T> for ValueCell<T> {
    fn write(&self, value: T) -> Result<(), NotifyError> {
        self.set(value)
    }
}

/// Write `value` into `target` after `delay`.
///
/// Must be called from within a `LocalSet`.
pub fn set_after<T, W>(target: Rc<W>, value: T, delay: Duration) -> JoinHandle<Result<(), NotifyError>>
where
    T: 'static,
    W: Writable<T> + ?Sized + 'static,
{
    tokio::task::spawn_local(async move {
        tokio::time::sleep(delay).await;
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Timer fired");
        target.write(value)
    })
}

/// Write each value in turn, `interval` apart, starting one interval from
/// now. Stops at the first write whose delivery fails.
pub fn set_sequence<T, W>(target: Rc<W>, values: Vec<T>, interval: Duration) -> JoinHandle<Result<(), NotifyError>>
where
    T: 'static,
    W: Writable<T> + ?Sized + 'static,
{
    tokio::task::spawn_local(async move {
        for value in values {
            tokio::time::sleep(interval).await;
            target.write(value)?;
        }
        Ok(())
    })
}

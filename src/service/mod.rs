//! Injectable state services.
//!
//! A service owns one [`ValueCell`] and is the only writer to it. Views and
//! other consumers get a [`CellReader`] from [`StateService::value`].
//!
//! ```text
//! timer / user event ──set_value──▶ StateService ──owns──▶ ValueCell
//!                                                            │
//!                         views ◀──reader().subscribe────────┘
//! ```

use std::fmt;

use crate::cell::{CellReader, NotifyError, ValueCell};
use crate::scheduler::Writable;

/// A named service exposing a single piece of reactive state.
pub struct StateService<T> {
    name: String,
    cell: ValueCell<T>,
}

impl<T: Clone + fmt::Debug + 'static> StateService<T> {
    pub fn new(name: impl Into<String>, initial: T) -> Self {
        let name = name.into();
        tracing::debug!(service = %name, ?initial, "Service created");
        Self {
            name,
            cell: ValueCell::new(initial),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the value and notify every consumer.
    pub fn set_value(&self, value: T) -> Result<(), NotifyError> {
        tracing::debug!(service = %self.name, ?value, "Setting value");
        self.cell.set(value).inspect_err(|err| {
            tracing::warn!(service = %self.name, error = %err, "Consumers failed to take new value");
        })
    }

    /// Read-only view of the state.
    pub fn value(&self) -> CellReader<T> {
        self.cell.reader()
    }

    /// Snapshot of the current value.
    pub fn current(&self) -> T {
        self.cell.get()
    }
}

impl<T: Clone + fmt::Debug + 'static> Writable<T> for StateService<T> {
    fn write(&self, value: T) -> Result<(), NotifyError> {
        self.set_value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for StateService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateService")
            .field("name", &self.name)
            .field("cell", &self.cell)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_service_scenario() {
        let service = StateService::new("greeting", "initial".to_string());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let _sub = service
            .value()
            .subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

        service.set_value("new value".to_string()).unwrap();
        assert_eq!(service.current(), "new value");
        assert_eq!(*seen.borrow(), vec!["initial", "new value"]);
    }

    #[test]
    fn test_reader_outlives_nothing_but_sees_updates() {
        let service = StateService::new("counter", 0u32);
        let reader = service.value();
        service.set_value(3).unwrap();
        assert_eq!(reader.get(), 3);
        assert_eq!(service.name(), "counter");
    }
}

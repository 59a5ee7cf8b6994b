//! Shared utilities for integration tests.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Ordered log of `(observer, value)` deliveries shared by many callbacks.
#[derive(Clone)]
pub struct DeliveryLog<T> {
    entries: Rc<RefCell<Vec<(&'static str, T)>>>,
}

#[allow(dead_code)]
impl<T: Clone + 'static> DeliveryLog<T> {
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Callback that appends every value under `observer`.
    pub fn observer(&self, observer: &'static str) -> impl FnMut(&T) + 'static {
        let entries = self.entries.clone();
        move |value: &T| entries.borrow_mut().push((observer, value.clone()))
    }

    pub fn entries(&self) -> Vec<(&'static str, T)> {
        self.entries.borrow().clone()
    }

    /// Values delivered to `observer`, in order.
    pub fn values_for(&self, observer: &str) -> Vec<T> {
        self.entries
            .borrow()
            .iter()
            .filter(|(name, _)| *name == observer)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// Fresh empty directory, removed when the returned handle drops.
#[allow(dead_code)]
pub fn scratch_dir(tag: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(&format!("reactive-cell-{}-", tag))
        .tempdir()
        .unwrap()
}

/// Write `content` to `path`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

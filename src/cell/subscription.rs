//! Subscription handles.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier of a registered subscriber, unique per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something subscribers can be removed from.
pub(crate) trait Registry {
    fn remove(&self, id: SubscriptionId);
}

/// Handle returned by `subscribe`.
///
/// Holds a weak reference to the cell: it never keeps the cell alive, and
/// unsubscribing after the cell is gone does nothing. Dropping the handle does
/// NOT unsubscribe; use [`Subscription::into_guard`] for that.
#[must_use = "dropping a Subscription leaves the callback registered"]
pub struct Subscription {
    id: SubscriptionId,
    active: Rc<Cell<bool>>,
    registry: Weak<dyn Registry>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, active: Rc<Cell<bool>>, registry: Weak<dyn Registry>) -> Self {
        Self { id, active, registry }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// True while the callback is still registered on a live cell.
    pub fn is_active(&self) -> bool {
        self.active.get() && self.registry.strong_count() > 0
    }

    /// Remove the callback. Safe to call any number of times.
    ///
    /// Takes effect immediately, also when called from inside a notification:
    /// the callback will not be invoked again.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
        tracing::trace!(id = %self.id, "Unsubscribed");
    }

    /// Convert into a guard that unsubscribes when dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { inner: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Scoped subscription: unsubscribes on drop, including during unwinding.
#[derive(Debug)]
#[must_use = "dropping a SubscriptionGuard unsubscribes immediately"]
pub struct SubscriptionGuard {
    inner: Subscription,
}

impl SubscriptionGuard {
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Unsubscribe now instead of at drop.
    pub fn unsubscribe(&self) {
        self.inner.unsubscribe();
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.inner.unsubscribe();
    }
}

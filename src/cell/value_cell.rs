//! Single-writer observable value cell.
//!
//! # Delivery rules
//! - `subscribe` replays the current value once, synchronously.
//! - `set` commits first, then notifies every registered subscriber in
//!   subscription order. No equality check is made.
//! - A failing subscriber does not stop delivery to the ones after it; the
//!   failures are returned from `set` once everyone has been attempted.
//! - Writes made from inside a callback are committed immediately and
//!   delivered after the in-flight value has reached every subscriber, so
//!   all subscribers observe writes in commit order.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::cell::error::{BoxError, NotifyError, SubscriberFailure};
use crate::cell::subscription::{Registry, Subscription, SubscriptionId};
use crate::observability::metrics;

type Callback<T> = Box<dyn FnMut(&T) -> Result<(), BoxError>>;

struct Entry<T> {
    id: SubscriptionId,
    /// Write sequence number current when the entry subscribed. Only writes
    /// with a higher sequence number are delivered to it.
    since: u64,
    active: Rc<Cell<bool>>,
    callback: Rc<RefCell<Callback<T>>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            since: self.since,
            active: self.active.clone(),
            callback: self.callback.clone(),
        }
    }
}

struct Shared<T> {
    current: RefCell<T>,
    subscribers: RefCell<Vec<Entry<T>>>,
    next_id: Cell<u64>,
    seq: Cell<u64>,
    pending: RefCell<VecDeque<(u64, T)>>,
    dispatching: Cell<bool>,
}

/// Clears the dispatch flag on every exit path.
struct DispatchHold<'a, T> {
    shared: &'a Shared<T>,
}

impl<T> Drop for DispatchHold<'_, T> {
    fn drop(&mut self) {
        self.shared.dispatching.set(false);
        if std::thread::panicking() {
            self.shared.pending.borrow_mut().clear();
        }
    }
}

#[derive(Default)]
struct Delivery {
    attempted: usize,
    failures: Vec<SubscriberFailure>,
}

impl Delivery {
    fn into_result(self) -> Result<(), NotifyError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError {
                attempted: self.attempted,
                failures: self.failures,
            })
        }
    }
}

impl<T: Clone + 'static> Shared<T> {
    fn new(initial: T) -> Self {
        Self {
            current: RefCell::new(initial),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            seq: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    fn get(&self) -> T {
        self.current.borrow().clone()
    }

    /// Take the dispatch role if nobody holds it yet.
    fn hold(&self) -> Option<DispatchHold<'_, T>> {
        if self.dispatching.replace(true) {
            None
        } else {
            Some(DispatchHold { shared: self })
        }
    }

    fn set(&self, value: T) -> Result<(), NotifyError> {
        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        *self.current.borrow_mut() = value.clone();
        self.pending.borrow_mut().push_back((seq, value));
        metrics::record_cell_write();

        let Some(hold) = self.hold() else {
            // Re-entrant write: the outer dispatch delivers it.
            tracing::trace!(seq, "Write queued behind in-flight notification");
            return Ok(());
        };

        let mut delivery = Delivery::default();
        self.drain(&mut delivery);
        drop(hold);
        delivery.into_result()
    }

    fn drain(&self, delivery: &mut Delivery) {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some((seq, value)) = next else {
                break;
            };

            let targets: Vec<Entry<T>> = self
                .subscribers
                .borrow()
                .iter()
                .filter(|entry| entry.since < seq)
                .cloned()
                .collect();

            tracing::debug!(seq, subscribers = targets.len(), "Notifying subscribers");

            for entry in targets {
                // Unsubscribed earlier in this pass.
                if !entry.active.get() {
                    continue;
                }
                delivery.attempted += 1;
                if let Err(source) = invoke(&entry, &value) {
                    tracing::warn!(id = %entry.id, seq, error = %source, "Subscriber failed");
                    metrics::record_subscriber_failure();
                    delivery.failures.push(SubscriberFailure { id: entry.id, source });
                }
            }
        }
        metrics::record_notifications(delivery.attempted);
    }

    /// Replay `current` into `callback`, then register it.
    ///
    /// Nothing is registered until the replay has returned `Ok`, so a replay
    /// that fails or unwinds leaves no entry behind.
    fn subscribe<F, E>(this: &Rc<Self>, mut callback: F) -> Result<Subscription, (SubscriptionId, E)>
    where
        F: FnMut(&T) -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        let id = SubscriptionId(this.next_id.get());
        this.next_id.set(id.0 + 1);
        let since = this.seq.get();

        // Writes issued by the replayed callback are queued and delivered
        // once it is registered.
        let hold = this.hold();
        let current = this.get();
        if let Err(err) = callback(&current) {
            if let Some(hold) = hold {
                this.drain_detached(hold);
            }
            return Err((id, err));
        }

        let callback: Callback<T> = Box::new(move |value: &T| callback(value).map_err(Into::into));
        let entry = Entry {
            id,
            since,
            active: Rc::new(Cell::new(true)),
            callback: Rc::new(RefCell::new(callback)),
        };
        let active = entry.active.clone();
        this.subscribers.borrow_mut().push(entry);

        tracing::debug!(%id, subscribers = this.subscribers.borrow().len(), "Subscribed");
        if let Some(hold) = hold {
            this.drain_detached(hold);
        }

        let registry: Weak<dyn Registry> = Rc::downgrade(this) as Weak<dyn Registry>;
        Ok(Subscription::new(id, active, registry))
    }

    fn subscribe_infallible<F>(this: &Rc<Self>, mut callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let infallible = move |value: &T| -> Result<(), Infallible> {
            callback(value);
            Ok(())
        };
        match Self::subscribe(this, infallible) {
            Ok(subscription) => subscription,
            Err((_, never)) => match never {},
        }
    }

    fn try_subscribe<F, E>(this: &Rc<Self>, callback: F) -> Result<Subscription, SubscriberFailure>
    where
        F: FnMut(&T) -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        Self::subscribe(this, callback).map_err(|(id, err)| {
            let source: BoxError = err.into();
            tracing::debug!(%id, error = %source, "Replay failed, subscription rejected");
            metrics::record_subscriber_failure();
            SubscriberFailure { id, source }
        })
    }

    /// Deliver writes queued during a replay. There is no `set` caller to
    /// report to, so failures are logged and counted only.
    fn drain_detached(&self, hold: DispatchHold<'_, T>) {
        let mut delivery = Delivery::default();
        self.drain(&mut delivery);
        drop(hold);
        if let Err(err) = delivery.into_result() {
            tracing::error!(error = %err, "Writes issued during replay had failing subscribers");
        }
    }
}

impl<T> Registry for Shared<T> {
    fn remove(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|entry| entry.id != id);
    }
}

fn invoke<T>(entry: &Entry<T>, value: &T) -> Result<(), BoxError> {
    match entry.callback.try_borrow_mut() {
        Ok(mut callback) => (*callback)(value),
        Err(_) => {
            // Only reachable if a callback is re-entered, which dispatch
            // ordering rules out.
            tracing::error!(id = %entry.id, "Subscriber re-entered, delivery skipped");
            Ok(())
        }
    }
}

/// A reactive cell with exactly one writer and any number of readers.
///
/// The cell is single-threaded (`!Send`). Readers obtain a [`CellReader`]
/// through [`ValueCell::reader`]; only the owner of the `ValueCell` can write.
pub struct ValueCell<T> {
    shared: Rc<Shared<T>>,
}

impl<T: Clone + 'static> ValueCell<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Rc::new(Shared::new(initial)),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.shared.get()
    }

    /// Borrow the current value without cloning it.
    ///
    /// `f` must not write to this cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.shared.current.borrow())
    }

    /// Commit `value` and notify every subscriber in subscription order.
    ///
    /// The value is committed even when subscribers fail; the returned error
    /// lists every failure after all subscribers have been attempted.
    pub fn set(&self, value: T) -> Result<(), NotifyError> {
        self.shared.set(value)
    }

    /// `set(f(&current))`.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<(), NotifyError> {
        let next = self.with(f);
        self.set(next)
    }

    /// Register `callback`; it is called immediately with the current value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        Shared::subscribe_infallible(&self.shared, callback)
    }

    /// Register a fallible callback. If the replay fails the callback is not
    /// registered and the failure is returned.
    pub fn try_subscribe<F, E>(&self, callback: F) -> Result<Subscription, SubscriberFailure>
    where
        F: FnMut(&T) -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        Shared::try_subscribe(&self.shared, callback)
    }

    /// Read-only handle for consumers.
    pub fn reader(&self) -> CellReader<T> {
        CellReader {
            shared: self.shared.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("current", &self.shared.current)
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish()
    }
}

/// Read side of a [`ValueCell`]: can observe, cannot write.
pub struct CellReader<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for CellReader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + 'static> CellReader<T> {
    pub fn get(&self) -> T {
        self.shared.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.shared.current.borrow())
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        Shared::subscribe_infallible(&self.shared, callback)
    }

    pub fn try_subscribe<F, E>(&self, callback: F) -> Result<Subscription, SubscriberFailure>
    where
        F: FnMut(&T) -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        Shared::try_subscribe(&self.shared, callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }
}

impl<T: fmt::Debug> fmt::Debug for CellReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellReader")
            .field("current", &self.shared.current)
            .finish()
    }
}

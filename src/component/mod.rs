//! Presentation-side consumers.
//!
//! A [`ViewBinding`] is what a view component holds between its init and
//! destroy hooks: it subscribes on [`ViewBinding::attach`] and is guaranteed
//! to unsubscribe on [`ViewBinding::detach`] or when dropped, whichever comes
//! first.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::cell::{CellReader, SubscriptionGuard};

/// Renders every value a cell delivers, until detached.
pub struct ViewBinding<T> {
    name: String,
    last: Rc<RefCell<Option<T>>>,
    renders: Rc<Cell<usize>>,
    guard: Option<SubscriptionGuard>,
}

impl<T: Clone + fmt::Debug + 'static> ViewBinding<T> {
    /// Subscribe `render` to `source`. The current value is rendered before
    /// this returns.
    pub fn attach<F>(name: impl Into<String>, source: &CellReader<T>, mut render: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        let name = name.into();
        let last = Rc::new(RefCell::new(None));
        let renders = Rc::new(Cell::new(0));

        let (last_c, renders_c, view) = (last.clone(), renders.clone(), name.clone());
        let subscription = source.subscribe(move |value: &T| {
            tracing::trace!(view = %view, ?value, "Render");
            render(value);
            *last_c.borrow_mut() = Some(value.clone());
            renders_c.set(renders_c.get() + 1);
        });

        tracing::debug!(view = %name, id = %subscription.id(), "View attached");
        Self {
            name,
            last,
            renders,
            guard: Some(subscription.into_guard()),
        }
    }

    /// Attach a view that only keeps the last rendered value.
    pub fn attach_passive(name: impl Into<String>, source: &CellReader<T>) -> Self {
        Self::attach(name, source, |_| {})
    }

    /// Stop receiving values. Calling it again is a no-op.
    pub fn detach(&mut self) {
        if let Some(guard) = self.guard.take() {
            tracing::debug!(view = %self.name, id = %guard.id(), "View detached");
            drop(guard);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.guard.as_ref().is_some_and(SubscriptionGuard::is_active)
    }

    pub fn last_rendered(&self) -> Option<T> {
        self.last.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> fmt::Debug for ViewBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewBinding")
            .field("name", &self.name)
            .field("renders", &self.renders.get())
            .field("attached", &self.guard.is_some())
            .finish()
    }
}

// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable values.
//!
//! A [`Property`] stores one value plus an ordered list of change handlers.
//! Every [`set`](Property::set) notifies, even when the new value equals the
//! old one; there is no deduplication.
//!
//! Handlers receive a mutable *context* (`C`) together with the new value.
//! For element attributes the context is the whole
//! [`ElementTree`](crate::element::ElementTree), so a handler may mutate
//! other elements, including setting further properties. To allow that,
//! [`set`](Property::set) does not call handlers itself: it stores the value
//! and returns a [`Notification`] holding a snapshot of the value and the
//! handler list. The caller releases its borrow of the property and then
//! [`dispatch`](Notification::dispatch)es with the context. Handlers attached
//! or detached during dispatch take effect from the next `set`.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//!
//! use proscenium_core::property::Property;
//!
//! let seen = Rc::new(Cell::new(0));
//! let mut p: Property<i32> = Property::new(1);
//! let s = Rc::clone(&seen);
//! p.attach(move |_, v| s.set(*v));
//! p.update(7);
//! assert_eq!(seen.get(), 7);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

/// Identifies one subscription on a [`Property`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

/// A change handler: receives the notification context and the new value.
pub type Handler<T, C> = Rc<dyn Fn(&mut C, &T)>;

/// An observable value with an ordered subscriber list.
pub struct Property<T, C: ?Sized = ()> {
    value: T,
    subscribers: Vec<(SubscriptionId, Handler<T, C>)>,
    next_id: u32,
}

impl<T: fmt::Debug, C: ?Sized> fmt::Debug for Property<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: Default, C: ?Sized> Default for Property<T, C> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, C: ?Sized> Property<T, C> {
    /// Creates a property with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Returns the current value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Appends a change handler. Handlers run in attach order.
    pub fn attach(&mut self, handler: impl Fn(&mut C, &T) + 'static) -> SubscriptionId {
        self.attach_rc(Rc::new(handler))
    }

    /// Appends an already shared change handler.
    pub fn attach_rc(&mut self, handler: Handler<T, C>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, handler));
        id
    }

    /// Removes a handler. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Number of attached handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Detaches every handler, returning them for a later
    /// [`restore_subscribers`](Self::restore_subscribers).
    ///
    /// Used around bulk writes that must not trigger side effects.
    #[must_use = "dropping the detached handlers unsubscribes them for good"]
    pub fn take_subscribers(&mut self) -> Subscribers<T, C> {
        Subscribers(core::mem::take(&mut self.subscribers))
    }

    /// Re-attaches handlers previously taken with
    /// [`take_subscribers`](Self::take_subscribers), ahead of any handler
    /// attached in between.
    pub fn restore_subscribers(&mut self, saved: Subscribers<T, C>) {
        let attached_since = core::mem::replace(&mut self.subscribers, saved.0);
        self.subscribers.extend(attached_since);
    }
}

impl<T: Clone, C: ?Sized> Property<T, C> {
    /// Stores `value` and returns the pending notification.
    ///
    /// The notification must be [dispatched](Notification::dispatch) for
    /// subscribers to run.
    #[must_use = "subscribers only run when the notification is dispatched"]
    pub fn set(&mut self, value: T) -> Notification<T, C> {
        self.value = value;
        Notification {
            value: self.value.clone(),
            handlers: self.subscribers.iter().map(|(_, h)| Rc::clone(h)).collect(),
        }
    }
}

impl<T: Clone> Property<T, ()> {
    /// Stores `value` and runs every subscriber immediately.
    pub fn update(&mut self, value: T) {
        self.set(value).dispatch(&mut ());
    }
}

/// Handlers detached by [`Property::take_subscribers`].
pub struct Subscribers<T, C: ?Sized>(Vec<(SubscriptionId, Handler<T, C>)>);

impl<T, C: ?Sized> fmt::Debug for Subscribers<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscribers").field(&self.0.len()).finish()
    }
}

/// A change notification produced by [`Property::set`].
pub struct Notification<T, C: ?Sized> {
    value: T,
    handlers: Vec<Handler<T, C>>,
}

impl<T: fmt::Debug, C: ?Sized> fmt::Debug for Notification<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("value", &self.value)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<T, C: ?Sized> Notification<T, C> {
    /// Runs the snapshotted handlers in order.
    pub fn dispatch(self, cx: &mut C) {
        for handler in &self.handlers {
            handler(cx, &self.value);
        }
    }

    /// Returns `true` if no handler was attached at the time of the `set`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

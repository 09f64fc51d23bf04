//! Signal - shared observable value
//!
//! `Signal<T>` holds a value behind `Rc<RefCell<T>>` and keeps a list of
//! subscribers that are called synchronously after every write.
//!
//! ## Key Features
//!
//! - **Explicit Subscriptions**: [`Signal::subscribe`] returns a [`Subscription`]
//!   that unsubscribes when dropped.
//! - **Re-entrant Writes**: subscribers receive a snapshot of the new value, so
//!   they may write to any signal, including the one that notified them.
//! - **Lightweight**: cloning a signal clones two `Rc`s; all clones share the
//!   same value and subscriber list.

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

use crate::node::NodeId;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
	next_key: Cell<u64>,
}

/// A reactive value shared between all of its clones
///
/// ## Type Parameter
///
/// * `T` - The type of value stored in the signal. Must be `'static` because
///   subscribers are stored as boxed closures.
pub struct Signal<T: 'static> {
	/// Unique identifier for this signal
	id: NodeId,
	/// The value and subscriber list, shared via reference counting
	inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
				next_key: Cell::new(0),
			}),
		}
	}

	/// Get a clone of the current value
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Borrow the current value for the duration of `f`
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Set the signal to a new value and notify subscribers
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		*self.inner.value.borrow_mut() = value;
		self.notify();
	}

	/// Update the value in place and notify subscribers once
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
		T: Clone,
	{
		f(&mut *self.inner.value.borrow_mut());
		self.notify();
	}

	/// Register a subscriber called after every write
	///
	/// The subscriber stays registered until the returned [`Subscription`] is
	/// dropped, or for the lifetime of the signal after [`Subscription::detach`].
	pub fn subscribe<F>(&self, f: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		let key = self.inner.next_key.get();
		self.inner.next_key.set(key + 1);
		self.inner
			.subscribers
			.borrow_mut()
			.push((key, Rc::new(f)));

		let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
		Subscription {
			signal: self.id,
			cancel: Some(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.subscribers.borrow_mut().retain(|(k, _)| *k != key);
				}
			})),
		}
	}

	/// Number of live subscribers
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}

	fn notify(&self)
	where
		T: Clone,
	{
		let subscribers: Vec<Subscriber<T>> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, s)| Rc::clone(s))
			.collect();
		if subscribers.is_empty() {
			return;
		}

		let snapshot = self.get();
		tracing::trace!(signal = %self.id, subscribers = subscribers.len(), "notifying subscribers");
		for subscriber in subscribers {
			subscriber(&snapshot);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.inner.value.borrow())
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

/// Handle to a registered subscriber
///
/// Dropping the handle removes the subscriber from its signal.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
	signal: NodeId,
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// The signal this subscription belongs to
	pub fn signal(&self) -> NodeId {
		self.signal
	}

	/// Keep the subscriber registered for as long as the signal lives
	pub fn detach(mut self) {
		self.cancel = None;
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("signal", &self.signal)
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

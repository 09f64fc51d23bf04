//! Guarded signals
//!
//! A [`Guarded`] value is a named [`Signal`] whose writes are intercepted.
//! Every write is described by a [`WriteRequest`] and handed to the guard,
//! which returns the (possibly rewritten) request to accept it, or an error
//! to reject it. Rejected writes leave the value untouched and notify no one.

use core::fmt;

extern crate alloc;
use alloc::rc::Rc;

use crate::node::NodeId;
use crate::signal::{Signal, Subscription};

/// Description of a single write handed to a guard.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest<T> {
	/// Name of the property being written.
	pub property: Rc<str>,
	/// Value about to be stored.
	pub value: T,
}

/// Write interceptor.
pub type Guard<T, E> = Rc<dyn Fn(WriteRequest<T>) -> Result<WriteRequest<T>, E>>;

/// A named signal whose writes go through a guard.
pub struct Guarded<T: 'static, E: 'static> {
	property: Rc<str>,
	signal: Signal<T>,
	guard: Guard<T, E>,
}

impl<T: 'static, E: 'static> Clone for Guarded<T, E> {
	fn clone(&self) -> Self {
		Self {
			property: Rc::clone(&self.property),
			signal: self.signal.clone(),
			guard: Rc::clone(&self.guard),
		}
	}
}

impl<T: 'static, E: 'static> Guarded<T, E> {
	/// Creates a guarded property holding `initial`.
	///
	/// The initial value is stored without consulting the guard.
	pub fn new<G>(property: impl Into<Rc<str>>, initial: T, guard: G) -> Self
	where
		G: Fn(WriteRequest<T>) -> Result<WriteRequest<T>, E> + 'static,
	{
		Self {
			property: property.into(),
			signal: Signal::new(initial),
			guard: Rc::new(guard),
		}
	}

	/// Name of the guarded property.
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.signal.get()
	}

	/// Borrow the current value.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		self.signal.with(f)
	}

	/// Attempts a write.
	///
	/// # Errors
	///
	/// Returns whatever the guard returned when it rejected the write.
	pub fn write(&self, value: T) -> Result<(), E>
	where
		T: Clone,
	{
		let request = WriteRequest {
			property: Rc::clone(&self.property),
			value,
		};
		let accepted = (self.guard)(request)?;
		self.signal.set(accepted.value);
		Ok(())
	}

	/// Subscribes to accepted writes.
	pub fn subscribe<F>(&self, f: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		self.signal.subscribe(f)
	}

	/// Underlying signal (read side).
	pub fn signal(&self) -> &Signal<T> {
		&self.signal
	}

	/// Identity of the underlying signal.
	pub fn id(&self) -> NodeId {
		self.signal.id()
	}
}

impl<T: fmt::Debug + 'static, E: 'static> fmt::Debug for Guarded<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Guarded")
			.field("property", &self.property)
			.field("signal", &self.signal)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::cell::Cell;
	use rstest::rstest;

	fn positive(property: &str) -> Guarded<i32, String> {
		Guarded::new(property, 1, |req: WriteRequest<i32>| {
			if req.value > 0 {
				Ok(req)
			} else {
				Err(format!("{} must be positive", req.property))
			}
		})
	}

	#[rstest]
	fn test_accepted_write_is_stored() {
		let value = positive("count");
		assert!(value.write(5).is_ok());
		assert_eq!(value.get(), 5);
	}

	#[rstest]
	fn test_rejected_write_is_discarded() {
		let value = positive("count");
		let err = value.write(-3).unwrap_err();
		assert_eq!(err, "count must be positive");
		assert_eq!(value.get(), 1);
	}

	#[rstest]
	fn test_rejected_write_notifies_nobody() {
		let value = positive("count");
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let _sub = value.subscribe(move |_| counter.set(counter.get() + 1));

		let _ = value.write(0);
		assert_eq!(calls.get(), 0);

		value.write(2).unwrap();
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_guard_may_rewrite_value() {
		let clamped: Guarded<i32, ()> = Guarded::new("clamped", 0, |mut req: WriteRequest<i32>| {
			req.value = req.value.min(10);
			Ok(req)
		});
		clamped.write(50).unwrap();
		assert_eq!(clamped.get(), 10);
	}

	#[rstest]
	fn test_guard_receives_property_name() {
		let seen = Rc::new(core::cell::RefCell::new(String::new()));
		let record = Rc::clone(&seen);
		let value: Guarded<u8, ()> = Guarded::new("volume", 0, move |req: WriteRequest<u8>| {
			record.borrow_mut().push_str(&req.property);
			Ok(req)
		});
		value.write(3).unwrap();
		assert_eq!(value.property(), "volume");
		assert_eq!(*seen.borrow(), "volume");
	}
}

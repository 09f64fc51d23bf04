//! Guarded signal integration tests
//!
//! Covers interaction between guards and subscribers:
//! - Guards consulting other signals
//! - Ordering of notifications across signals
//! - Property: rejected writes never change the stored value

use proptest::prelude::*;
use rstest::*;
use std::cell::RefCell;
use std::rc::Rc;
use waymark_reactive::{Guarded, Signal, WriteRequest};

#[fixture]
fn enabled() -> Signal<bool> {
	Signal::new(false)
}

#[rstest]
fn test_guard_consults_another_signal(enabled: Signal<bool>) {
	let gate = enabled.clone();
	let value: Guarded<Option<u32>, &'static str> =
		Guarded::new("value", None, move |req: WriteRequest<Option<u32>>| {
			if gate.get() || req.value.is_none() {
				Ok(req)
			} else {
				Err("disabled")
			}
		});

	assert_eq!(value.write(Some(1)), Err("disabled"));
	assert_eq!(value.get(), None);

	enabled.set(true);
	assert_eq!(value.write(Some(1)), Ok(()));
	assert_eq!(value.get(), Some(1));
}

#[rstest]
fn test_writes_are_observed_in_issue_order() {
	let a = Signal::new(0);
	let b = Signal::new(0);
	let log = Rc::new(RefCell::new(Vec::new()));

	let log_a = Rc::clone(&log);
	let _sa = a.subscribe(move |v| log_a.borrow_mut().push(format!("a={v}")));
	let log_b = Rc::clone(&log);
	let _sb = b.subscribe(move |v| log_b.borrow_mut().push(format!("b={v}")));

	a.set(1);
	b.set(2);
	a.set(3);

	assert_eq!(*log.borrow(), vec!["a=1", "b=2", "a=3"]);
}

proptest! {
	/// Rejected writes leave the stored value unchanged.
	#[test]
	fn prop_rejected_writes_never_stick(writes in prop::collection::vec(-100i32..100, 0..40)) {
		let value: Guarded<i32, ()> = Guarded::new("n", 0, |req: WriteRequest<i32>| {
			if req.value >= 0 { Ok(req) } else { Err(()) }
		});

		let mut expected = 0;
		for w in writes {
			let result = value.write(w);
			if w >= 0 {
				prop_assert!(result.is_ok());
				expected = w;
			} else {
				prop_assert!(result.is_err());
			}
			prop_assert_eq!(value.get(), expected);
		}
	}
}

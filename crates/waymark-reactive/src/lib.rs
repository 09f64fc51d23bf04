//! # Waymark Reactive
//!
//! Small, synchronous reactive primitives used by the waymark router to expose
//! route parameters as individually observable values.
//!
//! - [`Signal<T>`]: a shared value that notifies subscribers on every write.
//! - [`Subscription`]: RAII handle returned by [`Signal::subscribe`].
//! - [`Guarded<T, E>`]: a named signal whose writes pass through a guard that
//!   may accept, rewrite or reject them.
//!
//! Everything runs to completion on the calling thread. There is no scheduler
//! and no batching: subscribers observe writes in the order they are issued.
//!
//! ## Example
//!
//! ```
//! use waymark_reactive::{Guarded, Signal, WriteRequest};
//!
//! let count = Signal::new(0);
//! let seen = Signal::new(Vec::new());
//!
//! let log = seen.clone();
//! let _sub = count.subscribe(move |value: &i32| log.update(|v| v.push(*value)));
//!
//! count.set(1);
//! count.update(|n| *n += 1);
//! assert_eq!(seen.get(), vec![1, 2]);
//!
//! let even = Guarded::new("even", 0, |req: WriteRequest<i32>| {
//! 	if req.value % 2 == 0 { Ok(req) } else { Err("odd") }
//! });
//! assert!(even.write(4).is_ok());
//! assert_eq!(even.write(3), Err("odd"));
//! assert_eq!(even.get(), 4);
//! ```

mod guarded;
mod node;
mod signal;

pub use guarded::{Guard, Guarded, WriteRequest};
pub use node::NodeId;
pub use signal::{Signal, Subscription};

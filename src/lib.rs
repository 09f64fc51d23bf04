//! # Waymark
//!
//! Typed, reactive client-side routing.
//!
//! Waymark turns a declarative route tree into the path patterns a navigation
//! engine matches against, exposes the parameters of the active route as
//! individually observable values, and lets application code describe paths by
//! walking the tree instead of concatenating strings.
//!
//! ## Feature Flags
//!
//! - `reactive` - Reactive primitives only ([`Signal`](reactive::Signal), [`Guarded`](reactive::Guarded))
//! - `router` (default) - The typed router, implies `reactive`
//!
//! ## Quick Example
//!
//! ```
//! use std::rc::Rc;
//! use waymark::prelude::*;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let tree = RouteTree::new(
//! 	Branch::new().route("users", param("id", |b| b.number(true))),
//! )
//! .unwrap();
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let router = Router::builder(tree).engine(Rc::clone(&history)).build().unwrap();
//! router.start().await.unwrap();
//!
//! let users = router.sub(|p| p.step("users")).unwrap();
//! users.to(|t| t.step(42)).unwrap();
//!
//! assert_eq!(users.state().get::<i64>("id"), Some(42));
//! assert_eq!(history.current_path().as_deref(), Some("/users/42"));
//! # });
//! ```

#[cfg(feature = "reactive")]
pub mod reactive;
#[cfg(feature = "router")]
pub mod router;

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "reactive")]
	pub use crate::reactive::{Guarded, Signal, Subscription, WriteRequest};

	#[cfg(feature = "router")]
	pub use crate::router::{
		Branch, ConstraintBuilder, EnterContext, MemoryHistory, NavigationEngine, ParamKind, ParamState,
		ParamValue, RejectionReason, RouteTree, Router, RouterConfig, RouterError, RouterResult, SubRouter,
		param,
	};
}

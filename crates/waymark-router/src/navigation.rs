//! Navigation engine seam.
//!
//! The router never touches the location itself. It registers one
//! [`RouteEntry`] per endpoint plus a catch-all, and the engine calls each
//! entry's enter hook whenever its pattern matches. A hook may answer with a
//! [`Redirect`] to send the engine somewhere else.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::RouterResult;

/// What the engine knows about a navigation when it calls an enter hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnterContext {
	/// Raw, percent-decoded values captured by the matched pattern.
	pub params: HashMap<String, String>,
	/// Path the engine is leaving, if any.
	pub old_path: Option<String>,
	/// Path being entered.
	pub new_path: Option<String>,
}

/// Instruction to navigate elsewhere instead of entering the matched route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	/// Target path.
	pub to: String,
}

impl Redirect {
	/// Redirect to `path`.
	pub fn to(path: impl Into<String>) -> Self {
		Self { to: path.into() }
	}
}

/// Enter hook invoked when a route matches.
pub type EnterHook = Rc<dyn Fn(&EnterContext) -> Option<Redirect>>;

/// Pattern of a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
	/// A flattened endpoint such as `/users/:id`.
	Endpoint(Endpoint),
	/// Matches anything no endpoint matched.
	CatchAll,
}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Endpoint(endpoint) => fmt::Display::fmt(endpoint, f),
			Self::CatchAll => f.write_str("*"),
		}
	}
}

/// A pattern and the hook to run when it matches.
#[derive(Clone)]
pub struct RouteEntry {
	/// Pattern to match.
	pub pattern: RoutePattern,
	/// Hook to run on entry.
	pub on_enter: EnterHook,
}

impl fmt::Debug for RouteEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteEntry")
			.field("pattern", &self.pattern)
			.finish_non_exhaustive()
	}
}

/// A location-owning navigation engine.
///
/// Implementations are single-threaded: hooks and the router they call back
/// into are `!Send`.
#[async_trait(?Send)]
pub trait NavigationEngine {
	/// Registers routes. Endpoints are matched in registration order and the
	/// catch-all only when no endpoint matched.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`](crate::RouterError::InvalidPattern)
	/// when a pattern cannot be compiled.
	fn register(&self, routes: Vec<RouteEntry>) -> RouterResult<()>;

	/// Resolves the initial location.
	async fn start(&self) -> RouterResult<()>;

	/// Navigates to `path`, running enter hooks and following redirects.
	fn navigate(&self, path: &str) -> RouterResult<()>;

	/// Rewrites the current location without running any hook.
	fn replace_location(&self, path: &str);

	/// Current location, once started.
	fn current_path(&self) -> Option<String>;
}

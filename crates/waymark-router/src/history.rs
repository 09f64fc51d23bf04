//! In-memory navigation engine.
//!
//! [`MemoryHistory`] keeps a stack of visited paths and drives enter hooks the
//! way a browser history router would. It is what the router uses when no
//! other engine is supplied, and what tests use to observe navigation.
//!
//! Enter hooks never overlap. A navigation requested while hooks are running,
//! for example from a parameter subscriber, is queued and runs once the
//! current one has committed.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use crate::config::RouterConfig;
use crate::error::{RouterError, RouterResult};
use crate::navigation::{EnterContext, EnterHook, NavigationEngine, RouteEntry, RoutePattern};
use crate::pattern::PathPattern;

struct Route {
	pattern: PathPattern,
	on_enter: EnterHook,
}

#[derive(Default)]
struct Routes {
	endpoints: Vec<Route>,
	catch_all: Option<EnterHook>,
}

/// Marks hooks as running and restores the previous mark on drop.
struct Settling<'a> {
	flag: &'a Cell<bool>,
	previous: bool,
}

impl<'a> Settling<'a> {
	fn enter(flag: &'a Cell<bool>) -> Self {
		let previous = flag.replace(true);
		Self { flag, previous }
	}
}

impl Drop for Settling<'_> {
	fn drop(&mut self) {
		self.flag.set(self.previous);
	}
}

#[derive(Default)]
struct Entries {
	stack: Vec<String>,
	index: Option<usize>,
}

impl Entries {
	fn current(&self) -> Option<&String> {
		self.index.and_then(|i| self.stack.get(i))
	}

	fn push(&mut self, path: String) {
		let next = self.index.map_or(0, |i| i + 1);
		self.stack.truncate(next);
		self.stack.push(path);
		self.index = Some(next);
	}

	fn replace(&mut self, path: String) {
		match self.index {
			Some(i) => self.stack[i] = path,
			None => self.push(path),
		}
	}
}

/// History-stack navigation engine held entirely in memory.
pub struct MemoryHistory {
	initial: String,
	max_redirects: usize,
	routes: RefCell<Routes>,
	entries: RefCell<Entries>,
	navigations: Cell<usize>,
	settling: Cell<bool>,
	pending: RefCell<VecDeque<String>>,
}

impl MemoryHistory {
	/// Creates an engine that will start at `initial`.
	pub fn new(initial: impl Into<String>) -> Self {
		Self::from_config(initial, &RouterConfig::default())
	}

	/// Creates an engine using the redirect limit of `config`.
	pub fn from_config(initial: impl Into<String>, config: &RouterConfig) -> Self {
		Self {
			initial: initial.into(),
			max_redirects: config.max_redirects,
			routes: RefCell::new(Routes::default()),
			entries: RefCell::new(Entries::default()),
			navigations: Cell::new(0),
			settling: Cell::new(false),
			pending: RefCell::new(VecDeque::new()),
		}
	}

	/// Sets the number of redirects followed before giving up.
	pub fn with_max_redirects(mut self, max: usize) -> Self {
		self.max_redirects = max;
		self
	}

	/// Visited paths, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.entries.borrow().stack.clone()
	}

	/// Number of [`NavigationEngine::navigate`] calls so far.
	pub fn navigation_count(&self) -> usize {
		self.navigations.get()
	}

	/// Goes one entry back. Returns `false` at the start of the history.
	///
	/// # Errors
	///
	/// Same as [`NavigationEngine::navigate`].
	pub fn back(&self) -> RouterResult<bool> {
		self.step(-1)
	}

	/// Goes one entry forward. Returns `false` at the end of the history.
	///
	/// # Errors
	///
	/// Same as [`NavigationEngine::navigate`].
	pub fn forward(&self) -> RouterResult<bool> {
		self.step(1)
	}

	fn step(&self, delta: isize) -> RouterResult<bool> {
		let (target, index, old) = {
			let entries = self.entries.borrow();
			let Some(index) = entries.index.and_then(|i| i.checked_add_signed(delta)) else {
				return Ok(false);
			};
			let Some(target) = entries.stack.get(index) else {
				return Ok(false);
			};
			(target.clone(), index, entries.current().cloned())
		};

		let settled = self.settle(&target, old)?;
		{
			let mut entries = self.entries.borrow_mut();
			entries.index = Some(index);
			entries.stack[index] = settled;
		}
		self.drain()?;
		Ok(true)
	}

	/// Settles `path` and pushes it unless it equals the current entry.
	fn commit(&self, path: &str) -> RouterResult<()> {
		let old = self.current_path();
		let settled = self.settle(path, old.clone())?;
		if old.as_deref() != Some(settled.as_str()) {
			self.entries.borrow_mut().push(settled);
		}
		Ok(())
	}

	/// Runs navigations queued by hooks, in request order.
	fn drain(&self) -> RouterResult<()> {
		loop {
			let next = self.pending.borrow_mut().pop_front();
			let Some(path) = next else {
				return Ok(());
			};
			tracing::debug!(path = %path, "running queued navigation");
			if let Err(e) = self.commit(&path) {
				self.pending.borrow_mut().clear();
				return Err(e);
			}
		}
	}

	fn lookup(&self, path: &str) -> RouterResult<(EnterHook, HashMap<String, String>)> {
		let routes = self.routes.borrow();
		for route in &routes.endpoints {
			if let Some(params) = route.pattern.matches(path) {
				tracing::debug!(path, pattern = %route.pattern.endpoint(), "route matched");
				return Ok((route.on_enter.clone(), params));
			}
		}
		match &routes.catch_all {
			Some(hook) => {
				tracing::debug!(path, "catch-all matched");
				Ok((hook.clone(), HashMap::new()))
			}
			None => Err(RouterError::NavigationFailed(format!(
				"no route matches {}",
				path
			))),
		}
	}

	/// Runs enter hooks for `path`, following redirects, and returns the path
	/// the navigation settled on.
	fn settle(&self, path: &str, old_path: Option<String>) -> RouterResult<String> {
		let _settling = Settling::enter(&self.settling);
		let mut target = path.to_string();
		for _ in 0..=self.max_redirects {
			let (hook, params) = self.lookup(&target)?;
			let context = EnterContext {
				params,
				old_path: old_path.clone(),
				new_path: Some(target.clone()),
			};
			match hook(&context) {
				None => return Ok(target),
				Some(redirect) => {
					tracing::debug!(from = %target, to = %redirect.to, "redirect");
					target = redirect.to;
				}
			}
		}
		tracing::warn!(path, depth = self.max_redirects, "redirect loop");
		Err(RouterError::RedirectLoop {
			path: path.to_string(),
			depth: self.max_redirects,
		})
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

#[async_trait(?Send)]
impl NavigationEngine for MemoryHistory {
	fn register(&self, routes: Vec<RouteEntry>) -> RouterResult<()> {
		let mut compiled = Routes::default();
		for entry in routes {
			match entry.pattern {
				RoutePattern::Endpoint(endpoint) => compiled.endpoints.push(Route {
					pattern: PathPattern::new(&endpoint)?,
					on_enter: entry.on_enter,
				}),
				RoutePattern::CatchAll => compiled.catch_all = Some(entry.on_enter),
			}
		}
		tracing::debug!(routes = compiled.endpoints.len(), "routes registered");
		*self.routes.borrow_mut() = compiled;
		Ok(())
	}

	async fn start(&self) -> RouterResult<()> {
		let settled = self.settle(&self.initial, None)?;
		tracing::debug!(path = %settled, "history started");
		self.entries.borrow_mut().push(settled);
		self.drain()
	}

	fn navigate(&self, path: &str) -> RouterResult<()> {
		self.navigations.set(self.navigations.get() + 1);
		if self.settling.get() {
			tracing::debug!(path, "navigation queued behind running hooks");
			self.pending.borrow_mut().push_back(path.to_string());
			return Ok(());
		}
		if let Err(e) = self.commit(path) {
			self.pending.borrow_mut().clear();
			return Err(e);
		}
		self.drain()
	}

	fn replace_location(&self, path: &str) {
		tracing::debug!(path, "location replaced");
		self.entries.borrow_mut().replace(path.to_string());
	}

	fn current_path(&self) -> Option<String> {
		self.entries.borrow().current().cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::endpoint::Endpoint;
	use crate::navigation::Redirect;
	use rstest::rstest;
	use std::rc::Rc;

	fn entry(pattern: &str, hook: impl Fn(&EnterContext) -> Option<Redirect> + 'static) -> RouteEntry {
		RouteEntry {
			pattern: RoutePattern::Endpoint(Endpoint::parse(pattern)),
			on_enter: Rc::new(hook),
		}
	}

	fn catch_all(to: &'static str) -> RouteEntry {
		RouteEntry {
			pattern: RoutePattern::CatchAll,
			on_enter: Rc::new(move |_| Some(Redirect::to(to))),
		}
	}

	#[tokio::test]
	async fn test_start_enters_initial_path() {
		let seen = Rc::new(RefCell::new(None));
		let log = Rc::clone(&seen);
		let history = MemoryHistory::new("/users/7");
		history
			.register(vec![entry("/users/:id", move |ctx| {
				*log.borrow_mut() = Some(ctx.clone());
				None
			})])
			.unwrap();

		history.start().await.unwrap();

		let ctx = seen.borrow().clone().unwrap();
		assert_eq!(ctx.params["id"], "7");
		assert_eq!(ctx.old_path, None);
		assert_eq!(history.current_path().as_deref(), Some("/users/7"));
	}

	#[rstest]
	fn test_navigate_follows_redirects() {
		let history = MemoryHistory::new("/");
		history
			.register(vec![
				entry("/", |_| None),
				entry("/old", |_| Some(Redirect::to("/new"))),
				entry("/new", |_| None),
			])
			.unwrap();

		history.navigate("/old").unwrap();
		assert_eq!(history.current_path().as_deref(), Some("/new"));
		assert_eq!(history.entries(), vec!["/new"]);
	}

	#[rstest]
	fn test_catch_all_used_when_nothing_matches() {
		let history = MemoryHistory::new("/");
		history
			.register(vec![entry("/", |_| None), catch_all("/")])
			.unwrap();

		history.navigate("/nowhere").unwrap();
		assert_eq!(history.current_path().as_deref(), Some("/"));
	}

	#[rstest]
	fn test_no_match_without_catch_all() {
		let history = MemoryHistory::new("/");
		history.register(vec![entry("/", |_| None)]).unwrap();
		assert!(matches!(
			history.navigate("/x"),
			Err(RouterError::NavigationFailed(_))
		));
	}

	#[rstest]
	fn test_redirect_loop_detected() {
		let history = MemoryHistory::new("/").with_max_redirects(3);
		history
			.register(vec![
				entry("/a", |_| Some(Redirect::to("/b"))),
				entry("/b", |_| Some(Redirect::to("/a"))),
			])
			.unwrap();

		let err = history.navigate("/a").unwrap_err();
		assert_eq!(
			err,
			RouterError::RedirectLoop {
				path: "/a".to_string(),
				depth: 3
			}
		);
	}

	#[tokio::test]
	async fn test_back_and_forward() {
		let history = MemoryHistory::new("/");
		history
			.register(vec![entry("/", |_| None), entry("/:page", |_| None)])
			.unwrap();
		history.start().await.unwrap();
		history.navigate("/one").unwrap();
		history.navigate("/two").unwrap();

		assert!(history.back().unwrap());
		assert_eq!(history.current_path().as_deref(), Some("/one"));
		assert!(history.forward().unwrap());
		assert_eq!(history.current_path().as_deref(), Some("/two"));
		assert!(!history.forward().unwrap());

		history.back().unwrap();
		history.navigate("/three").unwrap();
		assert_eq!(history.entries(), vec!["/", "/one", "/three"]);
	}

	#[rstest]
	fn test_replace_location_runs_no_hook() {
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let history = MemoryHistory::new("/");
		history
			.register(vec![entry("/:page", move |_| {
				counter.set(counter.get() + 1);
				None
			})])
			.unwrap();

		history.navigate("/a").unwrap();
		history.replace_location("/b");

		assert_eq!(calls.get(), 1);
		assert_eq!(history.entries(), vec!["/b"]);
	}

	#[rstest]
	fn test_same_path_adds_no_entry() {
		let history = MemoryHistory::new("/");
		history.register(vec![entry("/:page", |_| None)]).unwrap();
		history.navigate("/a").unwrap();
		history.navigate("/a").unwrap();
		assert_eq!(history.entries(), vec!["/a"]);
		assert_eq!(history.navigation_count(), 2);
	}

	#[rstest]
	fn test_navigate_from_hook_runs_after_commit() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let history = Rc::new(MemoryHistory::new("/"));
		let weak = Rc::downgrade(&history);
		let a_log = Rc::clone(&log);
		let b_log = Rc::clone(&log);
		history
			.register(vec![
				entry("/a", move |_| {
					a_log.borrow_mut().push("enter /a");
					weak.upgrade().unwrap().navigate("/b").unwrap();
					a_log.borrow_mut().push("leave /a");
					None
				}),
				entry("/b", move |ctx| {
					b_log.borrow_mut().push("enter /b");
					assert_eq!(ctx.old_path.as_deref(), Some("/a"));
					None
				}),
			])
			.unwrap();

		history.navigate("/a").unwrap();

		assert_eq!(*log.borrow(), vec!["enter /a", "leave /a", "enter /b"]);
		assert_eq!(history.entries(), vec!["/a", "/b"]);
		assert_eq!(history.current_path().as_deref(), Some("/b"));
		assert_eq!(history.navigation_count(), 2);
	}
}

//! Router facade and sub-routers.

use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::RouterConfig;
use crate::constraint::ConstraintBuilder;
use crate::controller::NavigationController;
use crate::descriptor::{PathDescriptor, TargetDescriptor, child_segment, join_paths, strip_route_prefix};
use crate::endpoint::{Endpoint, flatten};
use crate::error::{RouterError, RouterResult};
use crate::history::MemoryHistory;
use crate::navigation::{EnterContext, EnterHook, NavigationEngine, RouteEntry, RoutePattern};
use crate::params::ParamMap;
use crate::state::ParamState;
use crate::tree::RouteTree;

/// Configures and builds a [`Router`].
pub struct RouterBuilder {
	tree: Rc<RouteTree>,
	engine: Option<Rc<dyn NavigationEngine>>,
	config: RouterConfig,
	constraints: ConstraintBuilder,
}

impl RouterBuilder {
	/// Uses `engine` instead of an in-memory history starting at the fallback path.
	pub fn engine<E>(mut self, engine: Rc<E>) -> Self
	where
		E: NavigationEngine + 'static,
	{
		let engine: Rc<dyn NavigationEngine> = engine;
		self.engine = Some(engine);
		self
	}

	/// Replaces the configuration.
	pub fn config(mut self, config: RouterConfig) -> Self {
		self.config = config;
		self
	}

	/// Declares navigation constraints.
	pub fn constraints<F>(mut self, f: F) -> Self
	where
		F: FnOnce(&mut ConstraintBuilder),
	{
		f(&mut self.constraints);
		self
	}

	/// Builds the router and registers its routes with the engine.
	///
	/// # Errors
	///
	/// - [`RouterError::Config`] when the configuration is invalid
	/// - whatever the engine returns from [`NavigationEngine::register`]
	pub fn build(self) -> RouterResult<Router> {
		self.config.validate()?;
		let engine: Rc<dyn NavigationEngine> = match self.engine {
			Some(engine) => engine,
			None => Rc::new(MemoryHistory::from_config(
				self.config.fallback_path.clone(),
				&self.config,
			)),
		};

		let endpoints = flatten(&self.tree);
		let controller = NavigationController::new(
			&self.tree,
			Rc::clone(&engine),
			self.config,
			self.constraints.finish(),
		);

		let mut routes: Vec<RouteEntry> = endpoints
			.iter()
			.map(|endpoint| RouteEntry {
				pattern: RoutePattern::Endpoint(endpoint.clone()),
				on_enter: endpoint_hook(Rc::downgrade(&controller), endpoint.clone()),
			})
			.collect();
		let weak = Rc::downgrade(&controller);
		routes.push(RouteEntry {
			pattern: RoutePattern::CatchAll,
			on_enter: Rc::new(move |context: &EnterContext| {
				weak.upgrade()
					.and_then(|controller| controller.enter_unknown(context))
			}),
		});

		tracing::debug!(endpoints = endpoints.len(), "registering routes");
		engine.register(routes)?;

		Ok(Router {
			tree: self.tree,
			endpoints,
			controller,
		})
	}
}

fn endpoint_hook(controller: Weak<NavigationController>, endpoint: Endpoint) -> EnterHook {
	Rc::new(move |context: &EnterContext| {
		controller
			.upgrade()
			.and_then(|controller| controller.enter(&endpoint, context))
	})
}

impl fmt::Debug for RouterBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("config", &self.config)
			.field("constraints", &self.constraints)
			.finish_non_exhaustive()
	}
}

/// Typed reactive router.
///
/// ```
/// use waymark_router::{Branch, MemoryHistory, Router, RouteTree, param};
/// use std::rc::Rc;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let tree = RouteTree::new(
/// 	Branch::new().route("users", param("id", |b| b.number(true))),
/// )
/// .unwrap();
/// let history = Rc::new(MemoryHistory::new("/users/42"));
/// let router = Router::builder(tree).engine(history).build().unwrap();
/// router.start().await.unwrap();
///
/// let users = router.state().child("users").unwrap();
/// assert_eq!(users.get::<i64>("id"), Some(42));
/// assert!(router.is(|p| p.step("users")));
/// # });
/// ```
pub struct Router {
	tree: Rc<RouteTree>,
	endpoints: Vec<Endpoint>,
	controller: Rc<NavigationController>,
}

impl Router {
	/// Starts configuring a router for `tree`.
	pub fn builder(tree: RouteTree) -> RouterBuilder {
		let tree = Rc::new(tree);
		RouterBuilder {
			constraints: ConstraintBuilder::new(Rc::clone(&tree)),
			tree,
			engine: None,
			config: RouterConfig::default(),
		}
	}

	/// Resolves the initial location.
	///
	/// # Errors
	///
	/// Whatever the engine returns from [`NavigationEngine::start`].
	pub async fn start(&self) -> RouterResult<()> {
		self.controller.engine().start().await
	}

	/// Reactive parameter state, mirroring the tree.
	pub fn state(&self) -> &ParamState {
		self.controller.state()
	}

	/// Whether the active route is `route` or lies below it.
	pub fn is<P>(&self, route: P) -> bool
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
	{
		let (prefix, _) = route(self.descriptor()).into_parts();
		is_under(self.controller.active_pattern().as_deref(), &prefix)
	}

	/// Navigates to a concrete path.
	///
	/// Returns `Ok(false)` without calling the engine when the target is the
	/// current location.
	///
	/// # Errors
	///
	/// Whatever the engine returns from [`NavigationEngine::navigate`].
	pub fn to<P>(&self, target: P) -> RouterResult<bool>
	where
		P: FnOnce(TargetDescriptor) -> TargetDescriptor,
	{
		let path = join_paths("", &target(TargetDescriptor::new()).build());
		self.controller.go(&path)
	}

	/// Calls `switcher` with the active child segment below `route`.
	///
	/// The segment is `None` when `route` itself is active, or when the active
	/// route is elsewhere.
	pub fn switch<P, S, R>(&self, route: P, switcher: S) -> R
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
		S: FnOnce(Option<&str>) -> R,
	{
		let (prefix, _) = route(self.descriptor()).into_parts();
		switch_on(self.controller.active_pattern().as_deref(), &prefix, switcher)
	}

	/// A router scoped to `route`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::UnknownSegment`] when a literal segment of `route`
	/// has no nested state.
	pub fn sub<P>(&self, route: P) -> RouterResult<SubRouter<'_>>
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
	{
		let (prefix, literals) = route(self.descriptor()).into_parts();
		let state = narrow(self.state(), &literals)?;
		Ok(SubRouter {
			router: self,
			prefix,
			state,
		})
	}

	/// Every flattened endpoint, in registration order.
	pub fn endpoints(&self) -> &[Endpoint] {
		&self.endpoints
	}

	/// Pattern of the active route, such as `/users/:id`.
	pub fn active_route(&self) -> Option<String> {
		self.controller.active_pattern()
	}

	/// Raw values of the active route's parameters.
	pub fn active_params(&self) -> HashMap<String, String> {
		self.controller.active().params
	}

	/// Current location according to the engine.
	pub fn current_path(&self) -> Option<String> {
		self.controller.engine().current_path()
	}

	/// Setters the router uses when a route is entered.
	pub fn param_map(&self) -> &ParamMap {
		self.controller.params()
	}

	/// Route tree.
	pub fn tree(&self) -> &RouteTree {
		&self.tree
	}

	/// Configuration.
	pub fn config(&self) -> &RouterConfig {
		self.controller.config()
	}

	fn descriptor(&self) -> PathDescriptor {
		PathDescriptor::new(Rc::clone(&self.tree))
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("endpoints", &self.endpoints)
			.field("active_route", &self.active_route())
			.finish_non_exhaustive()
	}
}

/// A router scoped to a route prefix.
///
/// Paths given to a sub-router are relative to its prefix, and its state only
/// exposes what lies below the prefix.
pub struct SubRouter<'r> {
	router: &'r Router,
	prefix: String,
	state: ParamState,
}

impl<'r> SubRouter<'r> {
	/// Pattern this router is scoped to.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Parameter state below the prefix.
	pub fn state(&self) -> &ParamState {
		&self.state
	}

	/// No-op: sub-routers share their parent's engine.
	pub async fn start(&self) -> RouterResult<()> {
		Ok(())
	}

	/// Relative form of [`Router::is`].
	pub fn is<P>(&self, route: P) -> bool
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
	{
		let (rest, _) = route(self.router.descriptor()).into_parts();
		is_under(
			self.router.controller.active_pattern().as_deref(),
			&join_paths(&self.prefix, &rest),
		)
	}

	/// Relative form of [`Router::to`].
	///
	/// Placeholders in the prefix are filled from the active route.
	///
	/// # Errors
	///
	/// - [`RouterError::MissingParameter`] when a prefix placeholder is not active
	/// - whatever the engine returns from [`NavigationEngine::navigate`]
	pub fn to<P>(&self, target: P) -> RouterResult<bool>
	where
		P: FnOnce(TargetDescriptor) -> TargetDescriptor,
	{
		let base = Endpoint::parse(&self.prefix).resolve(&self.router.active_params())?;
		let rest = target(TargetDescriptor::new()).build();
		self.router.controller.go(&join_paths(&base, &rest))
	}

	/// Relative form of [`Router::switch`].
	pub fn switch<P, S, R>(&self, route: P, switcher: S) -> R
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
		S: FnOnce(Option<&str>) -> R,
	{
		let (rest, _) = route(self.router.descriptor()).into_parts();
		switch_on(
			self.router.controller.active_pattern().as_deref(),
			&join_paths(&self.prefix, &rest),
			switcher,
		)
	}

	/// Relative form of [`Router::sub`].
	///
	/// # Errors
	///
	/// Returns [`RouterError::UnknownSegment`] when a literal segment has no nested state.
	pub fn sub<P>(&self, route: P) -> RouterResult<SubRouter<'r>>
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
	{
		let (rest, literals) = route(self.router.descriptor()).into_parts();
		Ok(SubRouter {
			router: self.router,
			prefix: join_paths(&self.prefix, &rest),
			state: narrow(&self.state, &literals)?,
		})
	}
}

impl fmt::Debug for SubRouter<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubRouter")
			.field("prefix", &self.prefix)
			.finish_non_exhaustive()
	}
}

fn narrow(state: &ParamState, literals: &[String]) -> RouterResult<ParamState> {
	let mut current = state;
	for literal in literals {
		current = current
			.child(literal)
			.ok_or_else(|| RouterError::UnknownSegment(literal.clone()))?;
	}
	Ok(current.clone())
}

fn is_under(active: Option<&str>, prefix: &str) -> bool {
	active.is_some_and(|route| strip_route_prefix(route, prefix).is_some())
}

fn switch_on<S, R>(active: Option<&str>, prefix: &str, switcher: S) -> R
where
	S: FnOnce(Option<&str>) -> R,
{
	let child = active.and_then(|route| child_segment(route, prefix)).flatten();
	switcher(child)
}

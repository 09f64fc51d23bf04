//! Navigation constraints.
//!
//! Constraints are declared once, when the router is built:
//!
//! ```
//! use waymark_router::{Branch, Router, RouteTree};
//!
//! let tree = RouteTree::new(
//! 	Branch::new()
//! 		.route("admin", Branch::new().route("users", Branch::new()))
//! 		.route("login", Branch::new()),
//! )
//! .unwrap();
//!
//! let router = Router::builder(tree)
//! 	.constraints(|c| {
//! 		c.redirect(|p| p.step("admin"), |t| t.step("login"), |_| true);
//! 	})
//! 	.build()
//! 	.unwrap();
//! # let _ = router;
//! ```
//!
//! Each constraint applies to its route and everything below it. They are
//! checked in declaration order before a route is entered, and the first
//! one whose condition holds wins.

use std::fmt;
use std::rc::Rc;

use crate::descriptor::{PathDescriptor, TargetDescriptor, join_paths, strip_route_prefix};
use crate::navigation::EnterContext;
use crate::tree::RouteTree;

/// Condition deciding whether a constraint applies to a navigation.
pub type Condition = Rc<dyn Fn(&EnterContext) -> bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConstraintAction {
	/// Stay where we were, or go to the fallback path.
	Block,
	/// Go to a fixed path.
	Redirect(String),
}

#[derive(Clone)]
pub(crate) struct Constraint {
	route: String,
	action: ConstraintAction,
	condition: Condition,
}

impl Constraint {
	/// Action to take when this constraint covers `route` and its condition holds.
	pub(crate) fn check(&self, route: &str, context: &EnterContext) -> Option<&ConstraintAction> {
		strip_route_prefix(route, &self.route)?;
		(self.condition)(context).then_some(&self.action)
	}
}

impl fmt::Debug for Constraint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Constraint")
			.field("route", &self.route)
			.field("action", &self.action)
			.finish_non_exhaustive()
	}
}

/// Collects constraints relative to a route prefix.
pub struct ConstraintBuilder {
	tree: Rc<RouteTree>,
	prefix: String,
	constraints: Vec<Constraint>,
}

impl ConstraintBuilder {
	pub(crate) fn new(tree: Rc<RouteTree>) -> Self {
		Self {
			tree,
			prefix: String::new(),
			constraints: Vec::new(),
		}
	}

	fn route<P>(&self, route: P) -> String
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
	{
		let (path, _) = route(PathDescriptor::new(Rc::clone(&self.tree))).into_parts();
		join_paths(&self.prefix, &path)
	}

	/// Blocks navigation into `route` while `condition` holds.
	///
	/// A blocked navigation goes back to the previous path, or to the fallback
	/// path on the initial navigation.
	pub fn block<P, C>(&mut self, route: P, condition: C) -> &mut Self
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
		C: Fn(&EnterContext) -> bool + 'static,
	{
		let route = self.route(route);
		self.constraints.push(Constraint {
			route,
			action: ConstraintAction::Block,
			condition: Rc::new(condition),
		});
		self
	}

	/// Redirects navigation into `route` to `target` while `condition` holds.
	///
	/// The target is absolute.
	pub fn redirect<P, T, C>(&mut self, route: P, target: T, condition: C) -> &mut Self
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
		T: FnOnce(TargetDescriptor) -> TargetDescriptor,
		C: Fn(&EnterContext) -> bool + 'static,
	{
		let route = self.route(route);
		let target = join_paths("", &target(TargetDescriptor::new()).build());
		self.constraints.push(Constraint {
			route,
			action: ConstraintAction::Redirect(target),
			condition: Rc::new(condition),
		});
		self
	}

	/// Declares constraints relative to `route`.
	pub fn sub<P, F>(&mut self, route: P, f: F) -> &mut Self
	where
		P: FnOnce(PathDescriptor) -> PathDescriptor,
		F: FnOnce(&mut ConstraintBuilder),
	{
		let prefix = self.route(route);
		let mut nested = Self {
			tree: Rc::clone(&self.tree),
			prefix,
			constraints: Vec::new(),
		};
		f(&mut nested);
		self.constraints.append(&mut nested.constraints);
		self
	}

	pub(crate) fn finish(self) -> Vec<Constraint> {
		self.constraints
	}
}

impl fmt::Debug for ConstraintBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConstraintBuilder")
			.field("prefix", &self.prefix)
			.field("constraints", &self.constraints)
			.finish()
	}
}

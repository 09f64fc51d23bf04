//! Navigation controller.
//!
//! Owns the active route and its raw parameters, decides what happens when the
//! engine enters a route, and arbitrates every write to the parameter state.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::config::RouterConfig;
use crate::constraint::{Constraint, ConstraintAction};
use crate::endpoint::Endpoint;
use crate::error::{RejectionReason, RouterResult};
use crate::navigation::{EnterContext, NavigationEngine, Redirect};
use crate::params::ParamMap;
use crate::state::{ParamGuard, ParamState, ParamWrite};
use crate::tree::{ParamSpec, RouteTree};
use crate::value::{ParamValue, parse_raw};

/// The route the engine most recently entered.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveNavigation {
	pub(crate) route: Option<Endpoint>,
	pub(crate) params: HashMap<String, String>,
}

/// Sets the applying flag and restores its previous value on drop, even if a
/// setter panics.
struct Applying<'a> {
	flag: &'a Cell<bool>,
	previous: bool,
}

impl<'a> Applying<'a> {
	fn enter(flag: &'a Cell<bool>) -> Self {
		let previous = flag.replace(true);
		Self { flag, previous }
	}
}

impl Drop for Applying<'_> {
	fn drop(&mut self) {
		self.flag.set(self.previous);
	}
}

pub(crate) struct NavigationController {
	active: RefCell<ActiveNavigation>,
	applying: Cell<bool>,
	engine: Rc<dyn NavigationEngine>,
	config: RouterConfig,
	constraints: Vec<Constraint>,
	state: ParamState,
	params: ParamMap,
}

impl NavigationController {
	pub(crate) fn new(
		tree: &RouteTree,
		engine: Rc<dyn NavigationEngine>,
		config: RouterConfig,
		constraints: Vec<Constraint>,
	) -> Rc<Self> {
		Rc::new_cyclic(|weak: &Weak<Self>| {
			let controller = weak.clone();
			let guard: ParamGuard = Rc::new(move |spec: &ParamSpec, request: ParamWrite| {
				match controller.upgrade() {
					Some(controller) => controller.intercept(spec, request),
					None => detached_intercept(spec, request),
				}
			});
			let state = ParamState::build(tree, &guard);
			let params = ParamMap::build(tree, &state);
			Self {
				active: RefCell::new(ActiveNavigation::default()),
				applying: Cell::new(false),
				engine,
				config,
				constraints,
				state,
				params,
			}
		})
	}

	pub(crate) fn state(&self) -> &ParamState {
		&self.state
	}

	pub(crate) fn engine(&self) -> &Rc<dyn NavigationEngine> {
		&self.engine
	}

	pub(crate) fn params(&self) -> &ParamMap {
		&self.params
	}

	pub(crate) fn config(&self) -> &RouterConfig {
		&self.config
	}

	pub(crate) fn active(&self) -> ActiveNavigation {
		self.active.borrow().clone()
	}

	pub(crate) fn active_pattern(&self) -> Option<String> {
		self.active.borrow().route.as_ref().map(ToString::to_string)
	}

	/// Enter hook for a flattened endpoint.
	pub(crate) fn enter(&self, endpoint: &Endpoint, context: &EnterContext) -> Option<Redirect> {
		let pattern = endpoint.to_string();
		if let Some(redirect) = self.check_constraints(&pattern, context) {
			return Some(redirect);
		}

		tracing::debug!(route = %pattern, params = ?context.params, "entering route");
		*self.active.borrow_mut() = ActiveNavigation {
			route: Some(endpoint.clone()),
			params: context.params.clone(),
		};

		for (name, raw) in &context.params {
			let Some(kind) = self.params.kind(name) else {
				continue;
			};
			if parse_raw(kind, Some(raw)).is_some_and(|value| value.is_nan()) {
				tracing::warn!(route = %pattern, param = %name, raw = %raw, "rejecting route with non-numeric parameter");
				return Some(self.go_back(context));
			}
		}

		let _applying = Applying::enter(&self.applying);
		for name in self.params.names() {
			if let Some(setter) = self.params.setter(name) {
				setter(context.params.get(name).map(String::as_str));
			}
		}
		None
	}

	/// Enter hook for the catch-all route.
	pub(crate) fn enter_unknown(&self, context: &EnterContext) -> Option<Redirect> {
		tracing::warn!(path = ?context.new_path, "no route matches");
		Some(self.go_back(context))
	}

	fn check_constraints(&self, pattern: &str, context: &EnterContext) -> Option<Redirect> {
		let action = self
			.constraints
			.iter()
			.find_map(|constraint| constraint.check(pattern, context))?;
		match action {
			ConstraintAction::Block => {
				tracing::warn!(route = %pattern, "navigation blocked");
				Some(self.go_back(context))
			}
			ConstraintAction::Redirect(to) => {
				tracing::warn!(route = %pattern, to = %to, "navigation redirected");
				Some(Redirect::to(to.clone()))
			}
		}
	}

	fn go_back(&self, context: &EnterContext) -> Redirect {
		Redirect::to(
			context
				.old_path
				.clone()
				.unwrap_or_else(|| self.config.fallback_path.clone()),
		)
	}

	/// Write guard for every parameter property.
	fn intercept(&self, spec: &ParamSpec, request: ParamWrite) -> Result<ParamWrite, RejectionReason> {
		check_value(spec, &request)?;
		let name = spec.name();
		let is_active = self.active.borrow().params.contains_key(name);
		let raw = request.value.as_ref().map(ParamValue::to_raw);

		match (is_active, raw) {
			(true, Some(raw)) => {
				self.sync_location(name, raw);
				Ok(request)
			}
			(false, None) => Ok(request),
			(true, None) => Err(RejectionReason::RequiredByActiveRoute),
			(false, Some(_)) => Err(RejectionReason::NotActive),
		}
	}

	fn sync_location(&self, name: &str, raw: String) {
		let path = {
			let mut active = self.active.borrow_mut();
			if active.params.get(name) == Some(&raw) {
				return;
			}
			active.params.insert(name.to_string(), raw);
			if self.applying.get() || !self.config.sync_location {
				return;
			}
			match &active.route {
				Some(route) => route.resolve(&active.params),
				None => return,
			}
		};
		match path {
			Ok(path) => {
				tracing::debug!(param = name, path = %path, "syncing location");
				self.engine.replace_location(&path);
			}
			Err(e) => tracing::warn!(param = name, error = %e, "cannot sync location"),
		}
	}

	/// Navigates to a concrete path. Returns `false` when already there.
	pub(crate) fn go(&self, path: &str) -> RouterResult<bool> {
		if self.engine.current_path().as_deref() == Some(path) {
			tracing::debug!(path, "already at target");
			return Ok(false);
		}
		self.engine.navigate(path)?;
		Ok(true)
	}
}

fn check_value(spec: &ParamSpec, request: &ParamWrite) -> Result<(), RejectionReason> {
	match &request.value {
		Some(value) if value.kind() != spec.kind() => Err(RejectionReason::TypeMismatch {
			expected: spec.kind(),
		}),
		Some(value) if value.is_nan() => Err(RejectionReason::NotANumber),
		_ => Ok(()),
	}
}

// A state that outlived its router has no active route.
fn detached_intercept(spec: &ParamSpec, request: ParamWrite) -> Result<ParamWrite, RejectionReason> {
	check_value(spec, &request)?;
	match request.value {
		None => Ok(request),
		Some(_) => Err(RejectionReason::NotActive),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::param;
	use rstest::rstest;
	use waymark_reactive::WriteRequest;

	fn request(value: Option<ParamValue>) -> ParamWrite {
		WriteRequest {
			property: Rc::from("id"),
			value,
		}
	}

	#[rstest]
	#[case(None, None)]
	#[case(Some(ParamValue::Number(1.0)), None)]
	#[case(Some(ParamValue::Number(f64::NAN)), Some(RejectionReason::NotANumber))]
	#[case(
		Some(ParamValue::Text("1".into())),
		Some(RejectionReason::TypeMismatch { expected: crate::tree::ParamKind::Number })
	)]
	fn test_check_value(#[case] value: Option<ParamValue>, #[case] expected: Option<RejectionReason>) {
		let node = param("id", |b| b.number(true));
		assert_eq!(check_value(node.spec(), &request(value)).err(), expected);
	}

	#[rstest]
	fn test_applying_restores_outer_flag() {
		let flag = Cell::new(false);
		{
			let _outer = Applying::enter(&flag);
			{
				let _inner = Applying::enter(&flag);
				assert!(flag.get());
			}
			assert!(flag.get());
		}
		assert!(!flag.get());
	}

	#[rstest]
	fn test_detached_state_accepts_only_clearing() {
		let node = param("id", |b| b.number(true));
		assert!(detached_intercept(node.spec(), request(None)).is_ok());
		assert_eq!(
			detached_intercept(node.spec(), request(Some(ParamValue::Number(2.0)))).err(),
			Some(RejectionReason::NotActive)
		);
	}
}

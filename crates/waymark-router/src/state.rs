//! Reactive parameter state.
//!
//! [`ParamState`] mirrors the route tree: every branch becomes a nested
//! `ParamState`, every parameter becomes an individually observable property
//! holding `Option<ParamValue>`. A parameter's continuation (`then`) is merged
//! into the object that declares the parameter, so for
//!
//! ```text
//! users -> :id -> edit
//! ```
//!
//! the `users` object holds both the `id` property and the `edit` child.
//!
//! Writes go through the router's write guard: a value may only be set on a
//! parameter that is part of the active route, `NaN` is never stored, and
//! setting an active parameter keeps the location in sync.

use std::fmt;
use std::rc::Rc;

use waymark_reactive::{Guarded, Subscription, WriteRequest};

use crate::error::{RejectionReason, RouterError, RouterResult};
use crate::tree::{ParamSpec, RouteNode, RouteTree};
use crate::value::{FromParamValue, IntoParamValue, ParamValue};

pub(crate) type ParamWrite = WriteRequest<Option<ParamValue>>;

/// Write interceptor shared by every parameter property.
pub(crate) type ParamGuard = Rc<dyn Fn(&ParamSpec, ParamWrite) -> Result<ParamWrite, RejectionReason>>;

/// One observable parameter property.
#[derive(Clone)]
pub(crate) struct ParamCell {
	spec: ParamSpec,
	value: Guarded<Option<ParamValue>, RejectionReason>,
}

impl ParamCell {
	fn new(spec: &ParamSpec, guard: &ParamGuard) -> Self {
		let guard = Rc::clone(guard);
		let guard_spec = spec.clone();
		Self {
			spec: spec.clone(),
			value: Guarded::new(spec.name(), None, move |req| guard(&guard_spec, req)),
		}
	}

	pub(crate) fn spec(&self) -> &ParamSpec {
		&self.spec
	}

	pub(crate) fn write(&self, value: Option<ParamValue>) -> Result<(), RejectionReason> {
		self.value.write(value)
	}

	fn get(&self) -> Option<ParamValue> {
		self.value.get()
	}
}

#[derive(Clone)]
enum Entry {
	Param(ParamCell),
	Branch(ParamState),
}

/// Parameter values of one route point and its descendants.
#[derive(Clone, Default)]
pub struct ParamState {
	entries: Vec<(String, Entry)>,
}

impl ParamState {
	pub(crate) fn build(tree: &RouteTree, guard: &ParamGuard) -> Self {
		let mut state = Self::default();
		state.fill(tree.root(), guard);
		state
	}

	fn fill(&mut self, node: &RouteNode, guard: &ParamGuard) {
		match node {
			RouteNode::Branch(branch) => {
				for (name, child) in branch.children() {
					let mut nested = Self::default();
					nested.fill(child, guard);
					self.entries.push((name.to_string(), Entry::Branch(nested)));
				}
			}
			RouteNode::Param(p) => {
				self.entries.push((
					p.spec().name().to_string(),
					Entry::Param(ParamCell::new(p.spec(), guard)),
				));
				if let Some(next) = p.next() {
					self.fill(next, guard);
				}
			}
		}
	}

	pub(crate) fn cell(&self, name: &str) -> Option<&ParamCell> {
		self.entries.iter().find_map(|(n, e)| match e {
			Entry::Param(cell) if n == name => Some(cell),
			_ => None,
		})
	}

	fn require_cell(&self, name: &str) -> RouterResult<&ParamCell> {
		self.cell(name)
			.ok_or_else(|| RouterError::UnknownParameter(name.to_string()))
	}

	/// Nested state for a literal segment.
	pub fn child(&self, segment: &str) -> Option<&ParamState> {
		self.entries.iter().find_map(|(n, e)| match e {
			Entry::Branch(state) if n == segment => Some(state),
			_ => None,
		})
	}

	/// Typed value of a parameter declared at this level.
	///
	/// Returns `None` when the parameter is unset, unknown, or does not fit `T`.
	pub fn get<T: FromParamValue>(&self, name: &str) -> Option<T> {
		self.value(name)
			.and_then(|value| T::from_param_value(&value))
	}

	/// Raw typed value of a parameter declared at this level.
	pub fn value(&self, name: &str) -> Option<ParamValue> {
		self.cell(name).and_then(ParamCell::get)
	}

	/// Sets a parameter declared at this level.
	///
	/// # Errors
	///
	/// - [`RouterError::UnknownParameter`] when no such parameter is declared here
	/// - [`RouterError::Rejected`] when the write guard discards the value
	pub fn set(&self, name: &str, value: impl IntoParamValue) -> RouterResult<()> {
		self.write(name, Some(value.into_param_value()))
	}

	/// Clears a parameter declared at this level.
	///
	/// # Errors
	///
	/// Same as [`ParamState::set`]; clearing a parameter of the active route is rejected.
	pub fn clear(&self, name: &str) -> RouterResult<()> {
		self.write(name, None)
	}

	fn write(&self, name: &str, value: Option<ParamValue>) -> RouterResult<()> {
		let cell = self.require_cell(name)?;
		cell.write(value).map_err(|reason| {
			tracing::warn!(param = name, %reason, "parameter write rejected");
			RouterError::rejected(name, reason)
		})
	}

	/// Observes accepted writes to a parameter declared at this level.
	///
	/// # Errors
	///
	/// Returns [`RouterError::UnknownParameter`] when no such parameter is declared here.
	pub fn subscribe<F>(&self, name: &str, f: F) -> RouterResult<Subscription>
	where
		F: Fn(Option<&ParamValue>) + 'static,
	{
		let cell = self.require_cell(name)?;
		Ok(cell.value.subscribe(move |value| f(value.as_ref())))
	}

	/// Declaration of a parameter at this level.
	pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
		self.cell(name).map(ParamCell::spec)
	}

	/// Parameters declared at this level.
	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().filter_map(|(n, e)| match e {
			Entry::Param(_) => Some(n.as_str()),
			Entry::Branch(_) => None,
		})
	}

	/// Literal segments nested under this level.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().filter_map(|(n, e)| match e {
			Entry::Branch(_) => Some(n.as_str()),
			Entry::Param(_) => None,
		})
	}
}

impl fmt::Debug for ParamState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut map = f.debug_map();
		for (name, entry) in &self.entries {
			match entry {
				Entry::Param(cell) => map.entry(name, &cell.get()),
				Entry::Branch(state) => map.entry(name, state),
			};
		}
		map.finish()
	}
}

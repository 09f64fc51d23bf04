//! Parameter setters keyed by name.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::state::{ParamCell, ParamState};
use crate::tree::{ParamKind, RouteNode, RouteTree};
use crate::value::{ParamValue, parse_raw};

/// Converts a raw URL value and writes it to the parameter's state.
///
/// Returns the converted value, whether or not the write was accepted.
pub type ParamSetter = Rc<dyn Fn(Option<&str>) -> Option<ParamValue>>;

/// Flat map from parameter name to its setter.
#[derive(Clone, Default)]
pub struct ParamMap {
	kinds: BTreeMap<String, ParamKind>,
	setters: BTreeMap<String, ParamSetter>,
}

impl ParamMap {
	/// Builds setters for every parameter of `tree`, writing into `state`.
	pub fn build(tree: &RouteTree, state: &ParamState) -> Self {
		let mut map = Self::default();
		map.walk(tree.root(), state);
		map
	}

	fn walk(&mut self, node: &RouteNode, state: &ParamState) {
		match node {
			RouteNode::Branch(branch) => {
				for (name, child) in branch.children() {
					if let Some(nested) = state.child(name) {
						self.walk(child, nested);
					}
				}
			}
			RouteNode::Param(p) => {
				if let Some(cell) = state.cell(p.spec().name()) {
					self.insert(cell.clone());
				}
				if let Some(next) = p.next() {
					self.walk(next, state);
				}
			}
		}
	}

	fn insert(&mut self, cell: ParamCell) {
		let name = cell.spec().name().to_string();
		let kind = cell.spec().kind();
		let setter: ParamSetter = Rc::new(move |raw| {
			let value = parse_raw(kind, raw);
			if let Err(reason) = cell.write(value.clone()) {
				tracing::debug!(param = cell.spec().name(), %reason, "setter write discarded");
			}
			value
		});
		self.kinds.insert(name.clone(), kind);
		self.setters.insert(name, setter);
	}

	/// Setter for `name`.
	pub fn setter(&self, name: &str) -> Option<&ParamSetter> {
		self.setters.get(name)
	}

	/// Declared kind of `name`.
	pub fn kind(&self, name: &str) -> Option<ParamKind> {
		self.kinds.get(name).copied()
	}

	/// Parameter names, sorted.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.setters.keys().map(String::as_str)
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.setters.len()
	}

	/// Whether the tree declares no parameters.
	pub fn is_empty(&self) -> bool {
		self.setters.is_empty()
	}
}

impl fmt::Debug for ParamMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.kinds.iter()).finish()
	}
}

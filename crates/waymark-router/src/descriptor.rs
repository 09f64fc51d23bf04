//! Path descriptors.
//!
//! Callers never write path strings by hand. [`PathDescriptor`] walks the
//! route tree by name and produces a pattern such as `/users/:id`;
//! [`TargetDescriptor`] produces a concrete path such as `/users/42`.

use std::fmt;
use std::rc::Rc;

use crate::tree::RouteTree;

/// Builds a route pattern by naming segments and parameters.
#[derive(Debug, Clone)]
pub struct PathDescriptor {
	tree: Rc<RouteTree>,
	path: String,
	literals: Vec<String>,
}

impl PathDescriptor {
	pub(crate) fn new(tree: Rc<RouteTree>) -> Self {
		Self {
			tree,
			path: String::new(),
			literals: Vec::new(),
		}
	}

	/// Descends into `name`: a `:name` placeholder if the tree declares a
	/// parameter of that name, a literal segment otherwise.
	pub fn step(mut self, name: &str) -> Self {
		self.path.push('/');
		if self.tree.is_param(name) {
			self.path.push(':');
		} else {
			self.literals.push(name.to_string());
		}
		self.path.push_str(name);
		self
	}

	/// Pattern built so far, `""` when no step was taken.
	pub fn as_str(&self) -> &str {
		&self.path
	}

	/// Finished pattern.
	pub fn build(self) -> String {
		self.path
	}

	pub(crate) fn into_parts(self) -> (String, Vec<String>) {
		(self.path, self.literals)
	}
}

/// Builds a concrete path from literal values.
#[derive(Debug, Clone, Default)]
pub struct TargetDescriptor {
	path: String,
}

impl TargetDescriptor {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Appends `value` as a percent-encoded segment. An empty value adds
	/// nothing, so an absent optional parameter leaves no trailing `/`.
	pub fn step(mut self, value: impl fmt::Display) -> Self {
		let value = value.to_string();
		if value.is_empty() {
			return self;
		}
		self.path.push('/');
		self.path.push_str(&urlencoding::encode(&value));
		self
	}

	/// Path built so far, `""` when no step was taken.
	pub fn as_str(&self) -> &str {
		&self.path
	}

	/// Finished path.
	pub fn build(self) -> String {
		self.path
	}
}

/// Remainder of `route` after `prefix`, if `prefix` covers whole segments of it.
///
/// Returns `Some("")` for an exact match.
pub(crate) fn strip_route_prefix<'a>(route: &'a str, prefix: &str) -> Option<&'a str> {
	let prefix = prefix.trim_end_matches('/');
	let rest = route.strip_prefix(prefix)?;
	if rest.is_empty() || rest.starts_with('/') || prefix.is_empty() {
		Some(rest.trim_start_matches('/'))
	} else {
		None
	}
}

/// First segment of `route` below `prefix`, with a leading `:` removed.
///
/// `Some(None)` when `route` is exactly `prefix`, `None` when `route` is not
/// under `prefix` at all.
pub(crate) fn child_segment<'a>(route: &'a str, prefix: &str) -> Option<Option<&'a str>> {
	let rest = strip_route_prefix(route, prefix)?;
	if rest.is_empty() {
		return Some(None);
	}
	let first = rest.split('/').next().unwrap_or(rest);
	Some(Some(first.strip_prefix(':').unwrap_or(first)))
}

/// Joins a resolved base path and a relative path.
pub(crate) fn join_paths(base: &str, rest: &str) -> String {
	let base = base.trim_end_matches('/');
	match (base.is_empty(), rest.is_empty()) {
		(true, true) => "/".to_string(),
		(_, true) => base.to_string(),
		_ => format!("{}{}", base, rest),
	}
}

//! Endpoint flattening.
//!
//! An [`Endpoint`] is one concrete path pattern such as `/users/:id`. The
//! flattener walks a [`RouteTree`] once and emits every pattern the
//! navigation engine has to register.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{RouterError, RouterResult};
use crate::tree::{RouteNode, RouteTree};

/// One segment of an endpoint pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
	/// Matched verbatim.
	Literal(String),
	/// `:name` placeholder.
	Param(String),
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(s) => f.write_str(s),
			Self::Param(name) => write!(f, ":{}", name),
		}
	}
}

/// A flattened path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Endpoint {
	segments: Vec<Segment>,
}

impl Endpoint {
	/// The root endpoint, `/`.
	pub fn root() -> Self {
		Self::default()
	}

	/// Parses a `/a/:b` pattern. Empty segments are ignored.
	pub fn parse(pattern: &str) -> Self {
		let segments = pattern
			.split('/')
			.filter(|s| !s.is_empty())
			.map(|s| match s.strip_prefix(':') {
				Some(name) => Segment::Param(name.to_string()),
				None => Segment::Literal(s.to_string()),
			})
			.collect();
		Self { segments }
	}

	/// Segments in path order.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Placeholder names in path order.
	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(|s| match s {
			Segment::Param(name) => Some(name.as_str()),
			Segment::Literal(_) => None,
		})
	}

	/// Whether this is `/`.
	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}

	fn join(&self, segment: Segment) -> Self {
		let mut segments = self.segments.clone();
		segments.push(segment);
		Self { segments }
	}

	/// Substitutes every placeholder with its percent-encoded raw value.
	///
	/// # Errors
	///
	/// Returns [`RouterError::MissingParameter`] for a placeholder without a value.
	pub fn resolve(&self, params: &HashMap<String, String>) -> RouterResult<String> {
		if self.is_root() {
			return Ok("/".to_string());
		}
		let mut path = String::new();
		for segment in &self.segments {
			path.push('/');
			match segment {
				Segment::Literal(s) => path.push_str(s),
				Segment::Param(name) => {
					let value = params
						.get(name)
						.ok_or_else(|| RouterError::MissingParameter(name.clone()))?;
					path.push_str(&urlencoding::encode(value));
				}
			}
		}
		Ok(path)
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.segments.is_empty() {
			return f.write_str("/");
		}
		for segment in &self.segments {
			write!(f, "/{}", segment)?;
		}
		Ok(())
	}
}

#[derive(Default)]
struct Flattened {
	seen: HashSet<Endpoint>,
	ordered: Vec<Endpoint>,
}

impl Flattened {
	fn emit(&mut self, endpoint: &Endpoint) {
		if self.seen.insert(endpoint.clone()) {
			self.ordered.push(endpoint.clone());
		}
	}
}

/// Flattens a route tree into its deduplicated endpoints.
///
/// Order is the depth-first order of first emission, starting with `/`.
pub fn flatten(tree: &RouteTree) -> Vec<Endpoint> {
	let mut out = Flattened::default();
	let root = Endpoint::root();
	out.emit(&root);
	walk(tree.root(), &root, &mut out);
	out.ordered
}

fn walk(node: &RouteNode, at: &Endpoint, out: &mut Flattened) {
	match node {
		RouteNode::Branch(branch) => {
			out.emit(at);
			for (name, child) in branch.children() {
				walk(child, &at.join(Segment::Literal(name.to_string())), out);
			}
		}
		RouteNode::Param(p) => {
			if !p.spec().required() {
				out.emit(at);
			}
			let after = at.join(Segment::Param(p.spec().name().to_string()));
			// A chained parameter decides for itself whether `after` is terminal.
			if !matches!(p.next(), Some(RouteNode::Param(_))) {
				out.emit(&after);
			}
			if let Some(next) = p.next() {
				walk(next, &after, out);
			}
		}
	}
}

//! Route tree authoring.
//!
//! A route tree is an immutable value made of two kinds of nodes:
//!
//! - [`Branch`]: named children, each contributing a literal path segment.
//! - [`ParamNode`]: a typed parameter placeholder, optionally followed by the
//!   node describing what comes after it in the path.
//!
//! ```
//! use waymark_router::{Branch, RouteTree, param};
//!
//! let tree = RouteTree::new(
//! 	Branch::new()
//! 		.route("users", param("id", |b| b.number(true)).then(
//! 			Branch::new().route("posts", param("post", |b| b.string(false))),
//! 		))
//! 		.route("settings", Branch::new()),
//! )
//! .unwrap();
//!
//! assert!(tree.is_param("id"));
//! assert!(!tree.is_param("users"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{RouterError, RouterResult};

/// Primitive kind of a route parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
	/// Parsed as a float; invalid input becomes `NaN` and is rejected.
	Number,
	/// Kept verbatim.
	String,
}

impl fmt::Display for ParamKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number => f.write_str("number"),
			Self::String => f.write_str("string"),
		}
	}
}

/// Declared name, kind and requiredness of one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
	name: String,
	kind: ParamKind,
	required: bool,
}

impl ParamSpec {
	/// Parameter name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Parameter kind.
	pub fn kind(&self) -> ParamKind {
		self.kind
	}

	/// Whether the parameter must be present for its subtree to match.
	pub fn required(&self) -> bool {
		self.required
	}
}

/// Builder handed to [`param`] to pick the parameter kind.
#[derive(Debug)]
pub struct ParamTypeBuilder {
	name: String,
}

impl ParamTypeBuilder {
	/// A numeric parameter.
	pub fn number(self, required: bool) -> ParamSpec {
		ParamSpec {
			name: self.name,
			kind: ParamKind::Number,
			required,
		}
	}

	/// A string parameter.
	pub fn string(self, required: bool) -> ParamSpec {
		ParamSpec {
			name: self.name,
			kind: ParamKind::String,
			required,
		}
	}
}

/// Declares a parameter node.
///
/// Use [`ParamNode::then`] to continue the path after the parameter.
pub fn param<F>(name: impl Into<String>, kind: F) -> ParamNode
where
	F: FnOnce(ParamTypeBuilder) -> ParamSpec,
{
	ParamNode {
		spec: kind(ParamTypeBuilder { name: name.into() }),
		next: None,
	}
}

/// A parameter placeholder in the route tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamNode {
	spec: ParamSpec,
	next: Option<Box<RouteNode>>,
}

impl ParamNode {
	/// Sets the node that follows this parameter.
	pub fn then(mut self, next: impl Into<RouteNode>) -> Self {
		self.next = Some(Box::new(next.into()));
		self
	}

	/// Parameter declaration.
	pub fn spec(&self) -> &ParamSpec {
		&self.spec
	}

	/// Node following the parameter, if any.
	pub fn next(&self) -> Option<&RouteNode> {
		self.next.as_deref()
	}
}

/// Named children of a route point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
	children: Vec<(String, RouteNode)>,
}

impl Branch {
	/// An empty branch (a leaf route).
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a child. Re-adding an existing name replaces that child in place.
	pub fn route(mut self, name: impl Into<String>, node: impl Into<RouteNode>) -> Self {
		let name = name.into();
		let node = node.into();
		match self.children.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = node,
			None => self.children.push((name, node)),
		}
		self
	}

	/// Children in insertion order.
	pub fn children(&self) -> impl Iterator<Item = (&str, &RouteNode)> {
		self.children.iter().map(|(n, c)| (n.as_str(), c))
	}

	/// Looks up a child by name.
	pub fn get(&self, name: &str) -> Option<&RouteNode> {
		self.children
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, c)| c)
	}

	/// Number of children.
	pub fn len(&self) -> usize {
		self.children.len()
	}

	/// Whether the branch is a leaf.
	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}
}

/// A node of the route tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteNode {
	/// Named children.
	Branch(Branch),
	/// A parameter placeholder.
	Param(ParamNode),
}

impl From<Branch> for RouteNode {
	fn from(branch: Branch) -> Self {
		Self::Branch(branch)
	}
}

impl From<ParamNode> for RouteNode {
	fn from(node: ParamNode) -> Self {
		Self::Param(node)
	}
}

/// A validated route tree.
#[derive(Debug, Clone)]
pub struct RouteTree {
	root: RouteNode,
	params: BTreeMap<String, ParamSpec>,
}

impl RouteTree {
	/// Validates `root` and builds a tree.
	///
	/// # Errors
	///
	/// - [`RouterError::InvalidSegment`] for empty names or names containing `/`, `:` or `*`
	/// - [`RouterError::DuplicateParameter`] when two parameters share a name
	/// - [`RouterError::SegmentConflict`] when a segment is named like a parameter
	pub fn new(root: impl Into<RouteNode>) -> RouterResult<Self> {
		let root = root.into();
		let mut params = BTreeMap::new();
		let mut segments = BTreeSet::new();
		collect(&root, &mut params, &mut segments)?;

		if let Some(conflict) = segments.iter().find(|s| params.contains_key(*s)) {
			return Err(RouterError::SegmentConflict(conflict.clone()));
		}

		tracing::debug!(params = params.len(), segments = segments.len(), "route tree built");
		Ok(Self { root, params })
	}

	/// Root node.
	pub fn root(&self) -> &RouteNode {
		&self.root
	}

	/// Whether `name` is a parameter anywhere in the tree.
	pub fn is_param(&self, name: &str) -> bool {
		self.params.contains_key(name)
	}

	/// Declaration of the parameter called `name`.
	pub fn param_spec(&self, name: &str) -> Option<&ParamSpec> {
		self.params.get(name)
	}

	/// All parameter names, sorted.
	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.params.keys().map(String::as_str)
	}
}

fn check_name(name: &str) -> RouterResult<()> {
	if name.is_empty() || name.contains(['/', ':', '*']) {
		return Err(RouterError::InvalidSegment(name.to_string()));
	}
	Ok(())
}

fn collect(
	node: &RouteNode,
	params: &mut BTreeMap<String, ParamSpec>,
	segments: &mut BTreeSet<String>,
) -> RouterResult<()> {
	match node {
		RouteNode::Branch(branch) => {
			for (name, child) in branch.children() {
				check_name(name)?;
				segments.insert(name.to_string());
				collect(child, params, segments)?;
			}
		}
		RouteNode::Param(p) => {
			check_name(p.spec.name())?;
			if params
				.insert(p.spec.name.clone(), p.spec.clone())
				.is_some()
			{
				return Err(RouterError::DuplicateParameter(p.spec.name.clone()));
			}
			if let Some(next) = p.next() {
				collect(next, params, segments)?;
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_param_builder() {
		let node = param("id", |b| b.number(true));
		assert_eq!(node.spec().name(), "id");
		assert_eq!(node.spec().kind(), ParamKind::Number);
		assert!(node.spec().required());
		assert!(node.next().is_none());

		let node = param("q", |b| b.string(false)).then(Branch::new());
		assert_eq!(node.spec().kind(), ParamKind::String);
		assert!(!node.spec().required());
		assert!(node.next().is_some());
	}

	#[rstest]
	fn test_branch_replaces_duplicate_child() {
		let branch = Branch::new()
			.route("a", Branch::new())
			.route("b", Branch::new())
			.route("a", param("x", |b| b.string(true)));
		assert_eq!(branch.len(), 2);
		let names: Vec<_> = branch.children().map(|(n, _)| n).collect();
		assert_eq!(names, vec!["a", "b"]);
		assert!(matches!(branch.get("a"), Some(RouteNode::Param(_))));
	}

	#[rstest]
	fn test_tree_collects_params() {
		let tree = RouteTree::new(
			Branch::new()
				.route(
					"users",
					param("id", |b| b.number(true))
						.then(Branch::new().route("posts", param("post", |b| b.string(false)))),
				)
				.route("about", Branch::new()),
		)
		.unwrap();

		assert_eq!(tree.param_names().collect::<Vec<_>>(), vec!["id", "post"]);
		assert_eq!(tree.param_spec("post").unwrap().kind(), ParamKind::String);
		assert!(!tree.is_param("posts"));
	}

	#[rstest]
	fn test_duplicate_parameter_rejected() {
		let result = RouteTree::new(
			Branch::new()
				.route("a", param("id", |b| b.number(true)))
				.route("b", param("id", |b| b.string(true))),
		);
		assert_eq!(
			result.unwrap_err(),
			RouterError::DuplicateParameter("id".to_string())
		);
	}

	#[rstest]
	fn test_segment_conflict_rejected() {
		let result = RouteTree::new(
			Branch::new()
				.route("id", Branch::new())
				.route("users", param("id", |b| b.number(true))),
		);
		assert_eq!(
			result.unwrap_err(),
			RouterError::SegmentConflict("id".to_string())
		);
	}

	#[rstest]
	#[case("")]
	#[case("a/b")]
	#[case(":id")]
	#[case("*")]
	fn test_invalid_segment_names(#[case] name: &str) {
		let result = RouteTree::new(Branch::new().route(name, Branch::new()));
		assert!(matches!(result, Err(RouterError::InvalidSegment(_))));

		let result = RouteTree::new(param(name, |b| b.string(true)));
		assert!(matches!(result, Err(RouterError::InvalidSegment(_))));
	}

	#[rstest]
	fn test_param_kind_display() {
		assert_eq!(ParamKind::Number.to_string(), "number");
		assert_eq!(ParamKind::String.to_string(), "string");
	}
}

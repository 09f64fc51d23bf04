//! Compiled endpoint patterns used by [`MemoryHistory`](crate::MemoryHistory).

use std::collections::HashMap;

use crate::endpoint::{Endpoint, Segment};
use crate::error::{RouterError, RouterResult};

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// An endpoint compiled to an anchored regex.
///
/// Placeholders match exactly one non-empty segment. A trailing slash is
/// tolerated, and query strings and fragments are ignored when matching.
#[derive(Debug, Clone)]
pub struct PathPattern {
	endpoint: Endpoint,
	regex: regex::Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles `endpoint`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the pattern is longer than
	/// 1024 bytes, has more than 32 segments, or fails to compile.
	pub fn new(endpoint: &Endpoint) -> RouterResult<Self> {
		let source = endpoint.to_string();
		let invalid = |message: String| RouterError::InvalidPattern {
			pattern: source.clone(),
			message,
		};

		if source.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"pattern length {} exceeds maximum allowed length of {} bytes",
				source.len(),
				MAX_PATTERN_LENGTH
			)));
		}
		if endpoint.segments().len() > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"pattern has {} path segments, exceeding maximum of {}",
				endpoint.segments().len(),
				MAX_PATH_SEGMENTS
			)));
		}

		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		for segment in endpoint.segments() {
			regex_str.push('/');
			match segment {
				Segment::Literal(s) => regex_str.push_str(&regex::escape(s)),
				Segment::Param(name) => {
					regex_str.push_str("([^/]+)");
					param_names.push(name.clone());
				}
			}
		}
		regex_str.push_str("/?$");

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| invalid(format!("failed to compile pattern regex: {}", e)))?;

		Ok(Self {
			endpoint: endpoint.clone(),
			regex,
			param_names,
		})
	}

	/// Endpoint this pattern was compiled from.
	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// Matches `path`, returning the percent-decoded captures by name.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let path = strip_query(path);
		let caps = self.regex.captures(path)?;
		Some(
			self.param_names
				.iter()
				.enumerate()
				.filter_map(|(i, name)| {
					caps.get(i + 1)
						.map(|m| (name.clone(), decode(m.as_str())))
				})
				.collect(),
		)
	}
}

fn strip_query(path: &str) -> &str {
	let end = path.find(['?', '#']).unwrap_or(path.len());
	&path[..end]
}

fn decode(raw: &str) -> String {
	match urlencoding::decode(raw) {
		Ok(decoded) => decoded.into_owned(),
		Err(_) => raw.to_string(),
	}
}

//! Router configuration.
//!
//! ```
//! use waymark_router::RouterConfig;
//!
//! let config = RouterConfig::from_toml_str(r#"
//! fallback_path = "/home"
//! max_redirects = 4
//! "#).unwrap();
//!
//! assert_eq!(config.fallback_path, "/home");
//! assert!(config.sync_location);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// Tunables for a [`Router`](crate::Router).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Where rejected navigations go when there is no previous path.
	pub fallback_path: String,
	/// Redirects followed by [`MemoryHistory`](crate::MemoryHistory) before it gives up.
	pub max_redirects: usize,
	/// Whether setting an active parameter rewrites the location.
	pub sync_location: bool,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			fallback_path: "/".to_string(),
			max_redirects: 8,
			sync_location: true,
		}
	}
}

impl RouterConfig {
	/// Parses a TOML document. Missing keys keep their defaults.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Config`] for malformed TOML or a fallback path
	/// that does not start with `/`.
	pub fn from_toml_str(source: &str) -> RouterResult<Self> {
		let config: Self = toml::from_str(source).map_err(|e| RouterError::Config(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Checks invariants that serde cannot express.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Config`] when the fallback path is not absolute.
	pub fn validate(&self) -> RouterResult<()> {
		if !self.fallback_path.starts_with('/') {
			return Err(RouterError::Config(format!(
				"fallback_path must start with '/': {}",
				self.fallback_path
			)));
		}
		Ok(())
	}

	/// Sets the fallback path.
	pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
		self.fallback_path = path.into();
		self
	}

	/// Sets the redirect limit.
	pub fn with_max_redirects(mut self, max: usize) -> Self {
		self.max_redirects = max;
		self
	}

	/// Enables or disables location sync on parameter writes.
	pub fn with_sync_location(mut self, sync: bool) -> Self {
		self.sync_location = sync;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = RouterConfig::default();
		assert_eq!(config.fallback_path, "/");
		assert_eq!(config.max_redirects, 8);
		assert!(config.sync_location);
	}

	#[rstest]
	fn test_empty_toml_is_default() {
		assert_eq!(RouterConfig::from_toml_str("").unwrap(), RouterConfig::default());
	}

	#[rstest]
	#[case("max_redirects = \"many\"")]
	#[case("fallback_path = \"home\"")]
	#[case("not toml at all")]
	fn test_invalid_config(#[case] source: &str) {
		assert!(matches!(
			RouterConfig::from_toml_str(source),
			Err(RouterError::Config(_))
		));
	}

	#[rstest]
	fn test_builder_methods() {
		let config = RouterConfig::default()
			.with_fallback_path("/home")
			.with_max_redirects(2)
			.with_sync_location(false);
		assert_eq!(config.fallback_path, "/home");
		assert_eq!(config.max_redirects, 2);
		assert!(!config.sync_location);
	}
}

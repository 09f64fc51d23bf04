//! Error types for typed routing.

use thiserror::Error;

use crate::tree::ParamKind;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Why a parameter write was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
	/// The value is a number that failed to parse.
	#[error("value is not a number")]
	NotANumber,
	/// The value's kind does not match the parameter's declared kind.
	#[error("expected a {expected} value")]
	TypeMismatch {
		/// Declared kind of the parameter.
		expected: ParamKind,
	},
	/// The parameter is not part of the active route.
	#[error("parameter is not part of the active route")]
	NotActive,
	/// The parameter is part of the active route and cannot be cleared.
	#[error("parameter is required by the active route")]
	RequiredByActiveRoute,
}

/// Router errors.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RouterError {
	/// Two parameter nodes share a name.
	#[error("duplicate parameter name: {0}")]
	DuplicateParameter(String),

	/// A branch segment uses the name of a parameter.
	#[error("segment '{0}' collides with a parameter of the same name")]
	SegmentConflict(String),

	/// A segment or parameter name is empty or contains a reserved character.
	#[error("invalid segment name: '{0}'")]
	InvalidSegment(String),

	/// No nested state exists for a literal segment.
	#[error("unknown route segment: {0}")]
	UnknownSegment(String),

	/// No parameter with this name is declared where it was looked up.
	#[error("unknown parameter: {0}")]
	UnknownParameter(String),

	/// A placeholder could not be resolved to a value.
	#[error("missing parameter: {0}")]
	MissingParameter(String),

	/// A parameter write was discarded.
	#[error("write to '{param}' rejected: {reason}")]
	Rejected {
		/// Parameter name.
		param: String,
		/// Why the write was rejected.
		reason: RejectionReason,
	},

	/// A path pattern failed to compile.
	#[error("invalid route pattern '{pattern}': {message}")]
	InvalidPattern {
		/// Pattern source.
		pattern: String,
		/// Compilation error.
		message: String,
	},

	/// A redirect chain did not settle.
	#[error("redirect loop while navigating to {path} (gave up after {depth} redirects)")]
	RedirectLoop {
		/// Path that started the chain.
		path: String,
		/// Number of redirects followed.
		depth: usize,
	},

	/// The navigation engine could not complete a navigation.
	#[error("navigation failed: {0}")]
	NavigationFailed(String),

	/// Configuration could not be loaded.
	#[error("invalid router configuration: {0}")]
	Config(String),
}

impl RouterError {
	/// Builds a [`RouterError::Rejected`].
	pub fn rejected(param: impl Into<String>, reason: RejectionReason) -> Self {
		Self::Rejected {
			param: param.into(),
			reason,
		}
	}

	/// Returns the rejection reason when this is a rejected write.
	pub fn rejection(&self) -> Option<RejectionReason> {
		match self {
			Self::Rejected { reason, .. } => Some(*reason),
			_ => None,
		}
	}
}

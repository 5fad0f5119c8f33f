//! Error types for routing and data loading.
//!
//! Two families live here:
//!
//! - [`RouterError`]: configuration and contract errors raised by the router
//!   itself (bad patterns, unknown names, stale outlet entries).
//! - [`LoadError`]: failures reported by a route's data loader. The engine
//!   never renders these; it classifies them into an [`ErrorKind`] and hands
//!   a [`ClassifiedError`] to the rendering layer.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error type for router operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// Route not found.
	#[error("Route not found: {0}")]
	NotFound(String),
	/// A route pattern could not be compiled.
	#[error("Invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// Why compilation failed.
		reason: String,
	},
	/// Invalid or duplicate route name.
	#[error("Invalid route name: {0}")]
	InvalidRouteName(String),
	/// Missing parameter for reverse URL.
	#[error("Missing parameter: {0}")]
	MissingParameter(String),
	/// Two distinct route specs resolve to the same full path.
	#[error("Duplicate route path: {0}")]
	DuplicateRoute(String),
	/// Router settings failed validation.
	#[error("Invalid router settings: {0}")]
	InvalidSettings(String),
	/// An outlet was resolved for an entry that is not part of the active stack.
	#[error("Route entry '{0}' is not part of the active route stack")]
	StaleOutletEntry(String),
}

/// Failure reported by a route's data loader.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum LoadError {
	/// The requested resource does not exist.
	#[error("Resource not found: {0}")]
	NotFound(String),
	/// The data source could not be reached.
	#[error("Network failure: {0}")]
	Network(String),
	/// The session expired; a redirect to login is already underway.
	#[error("Session timed out")]
	SessionTimeout,
	/// The data source answered with an unclassified status.
	#[error("Request failed with status {status}: {message}")]
	Status {
		/// HTTP-like status code.
		status: u16,
		/// Message reported with the status.
		message: String,
	},
	/// Any other failure.
	#[error("{0}")]
	Other(String),
}

impl LoadError {
	/// Builds a load error from an HTTP status code.
	///
	/// `404`/`410` become [`LoadError::NotFound`], `0`/`502`/`503`/`504`
	/// become [`LoadError::Network`] and `401`/`419`/`440` become
	/// [`LoadError::SessionTimeout`].
	pub fn from_status(status: u16, message: impl Into<String>) -> Self {
		let message = message.into();
		match status {
			404 | 410 => Self::NotFound(message),
			0 | 502 | 503 | 504 => Self::Network(message),
			401 | 419 | 440 => Self::SessionTimeout,
			_ => Self::Status { status, message },
		}
	}

	/// The classification of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::NotFound(_) => ErrorKind::NotFound,
			Self::Network(_) => ErrorKind::Network,
			Self::SessionTimeout => ErrorKind::SessionTimeout,
			Self::Status { .. } | Self::Other(_) => ErrorKind::Unknown,
		}
	}
}

/// Classification of a terminal transition error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// No route, or the loaded resource does not exist.
	NotFound,
	/// Connectivity failure.
	Network,
	/// Session expired; never surfaced as a visible error.
	SessionTimeout,
	/// Anything else.
	Unknown,
}

impl ErrorKind {
	/// Stable string form, suitable for CSS classes or analytics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::NotFound => "not_found",
			Self::Network => "network",
			Self::SessionTimeout => "session_timeout",
			Self::Unknown => "unknown",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A classified error exposed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
	kind: ErrorKind,
	error: LoadError,
}

impl ClassifiedError {
	/// Classifies a loader error.
	pub fn new(error: LoadError) -> Self {
		Self {
			kind: error.kind(),
			error,
		}
	}

	/// Error for a path no route answers to.
	pub fn route_not_found(path: &str) -> Self {
		Self::new(LoadError::NotFound(path.to_string()))
	}

	/// The classification.
	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	/// The underlying error payload.
	pub fn error(&self) -> &LoadError {
		&self.error
	}

	/// Whether the rendering layer should show this error.
	pub fn is_visible(&self) -> bool {
		self.kind != ErrorKind::SessionTimeout
	}
}

impl From<LoadError> for ClassifiedError {
	fn from(error: LoadError) -> Self {
		Self::new(error)
	}
}

impl fmt::Display for ClassifiedError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}] {}", self.kind, self.error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(404, ErrorKind::NotFound)]
	#[case(410, ErrorKind::NotFound)]
	#[case(0, ErrorKind::Network)]
	#[case(503, ErrorKind::Network)]
	#[case(440, ErrorKind::SessionTimeout)]
	#[case(401, ErrorKind::SessionTimeout)]
	#[case(500, ErrorKind::Unknown)]
	#[case(418, ErrorKind::Unknown)]
	fn test_from_status_classification(#[case] status: u16, #[case] expected: ErrorKind) {
		assert_eq!(LoadError::from_status(status, "boom").kind(), expected);
	}

	#[rstest]
	fn test_session_timeout_is_not_visible() {
		assert!(!ClassifiedError::new(LoadError::SessionTimeout).is_visible());
		assert!(ClassifiedError::new(LoadError::Network("offline".into())).is_visible());
	}

	#[rstest]
	fn test_route_not_found_classification() {
		let error = ClassifiedError::route_not_found("/nowhere");
		assert_eq!(error.kind(), ErrorKind::NotFound);
		assert_eq!(error.to_string(), "[not_found] Resource not found: /nowhere");
	}

	#[rstest]
	fn test_router_error_display() {
		assert_eq!(
			RouterError::NotFound("/test/".to_string()).to_string(),
			"Route not found: /test/"
		);
		assert_eq!(
			RouterError::StaleOutletEntry("/customers/:id".to_string()).to_string(),
			"Route entry '/customers/:id' is not part of the active route stack"
		);
	}

	#[rstest]
	fn test_load_error_serializes_with_tag() {
		let value = serde_json::to_value(LoadError::Network("offline".into())).unwrap();
		assert_eq!(value, serde_json::json!({"type": "network", "message": "offline"}));
	}
}

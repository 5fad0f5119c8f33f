//! Path matching.
//!
//! The router never interprets URL patterns itself: it hands each route's
//! full path to a [`PathMatcher`] at registration time and later asks the
//! matcher which route answers a given path. [`PatternMatcher`] is the bundled
//! implementation built on [`RoutePattern`].

use crate::error::RouterError;
use crate::pattern::RoutePattern;
use crate::registry::RouteId;
use std::collections::HashMap;

/// Result of matching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
	/// The matched leaf route.
	pub route: RouteId,
	/// Raw, percent-decoded parameters extracted from the path.
	pub params: HashMap<String, String>,
	/// `true` when no pattern matched and the default route was returned.
	pub fallback: bool,
}

/// Maps URL paths to registered routes.
pub trait PathMatcher {
	/// Registers a full route path, bound to `route`.
	///
	/// # Errors
	///
	/// Returns an error if the path cannot be compiled.
	fn register(&mut self, path: &str, route: RouteId) -> Result<(), RouterError>;

	/// Matches a path, possibly carrying a query string or fragment.
	///
	/// Unmatched paths resolve to the default route, if one is set.
	fn match_path(&self, path: &str) -> Option<PathMatch>;

	/// Sets the route returned for unmatched paths.
	fn set_default(&mut self, route: RouteId);
}

/// Regex-backed matcher. First registered pattern wins.
#[derive(Debug, Default)]
pub struct PatternMatcher {
	patterns: Vec<(RoutePattern, RouteId)>,
	default_route: Option<RouteId>,
}

impl PatternMatcher {
	/// Creates an empty matcher.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of registered patterns.
	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	/// Whether no pattern is registered.
	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}

/// Strips the query string and fragment from a URL.
pub(crate) fn path_only(url: &str) -> &str {
	let end = url.find(['?', '#']).unwrap_or(url.len());
	&url[..end]
}

impl PathMatcher for PatternMatcher {
	fn register(&mut self, path: &str, route: RouteId) -> Result<(), RouterError> {
		let pattern = RoutePattern::new(path)?;
		tracing::debug!(path, %route, "registered route pattern");
		self.patterns.push((pattern, route));
		Ok(())
	}

	fn match_path(&self, path: &str) -> Option<PathMatch> {
		let path = path_only(path);

		for (pattern, route) in &self.patterns {
			if let Some(params) = pattern.matches(path) {
				return Some(PathMatch {
					route: *route,
					params,
					fallback: false,
				});
			}
		}

		self.default_route.map(|route| PathMatch {
			route,
			params: HashMap::new(),
			fallback: true,
		})
	}

	fn set_default(&mut self, route: RouteId) {
		self.default_route = Some(route);
	}
}

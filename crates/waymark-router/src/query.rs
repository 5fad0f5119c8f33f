//! Query parameter memory.
//!
//! The router remembers the last query parameters used on each route and
//! restores them when the route is entered again. Parameters given
//! explicitly in a navigation target always win over remembered ones.

use crate::registry::RouteId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Decoded query parameters, sorted by key.
pub type QueryParams = BTreeMap<String, String>;

/// Last-seen query parameters per route.
#[derive(Debug, Clone, Default)]
pub struct QueryMemory {
	remembered: HashMap<RouteId, QueryParams>,
}

impl QueryMemory {
	/// Creates an empty memory.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parameters remembered for `route`.
	pub fn get(&self, route: RouteId) -> Option<&QueryParams> {
		self.remembered.get(&route)
	}

	/// Replaces the parameters remembered for `route`.
	///
	/// An empty set forgets the route.
	pub fn remember(&mut self, route: RouteId, params: QueryParams) {
		if params.is_empty() {
			self.remembered.remove(&route);
		} else {
			self.remembered.insert(route, params);
		}
	}

	/// Forgets `route`.
	pub fn forget(&mut self, route: RouteId) -> Option<QueryParams> {
		self.remembered.remove(&route)
	}

	/// Forgets every route.
	pub fn clear(&mut self) {
		self.remembered.clear();
	}

	/// Number of routes with remembered parameters.
	pub fn len(&self) -> usize {
		self.remembered.len()
	}

	/// Whether nothing is remembered.
	pub fn is_empty(&self) -> bool {
		self.remembered.is_empty()
	}
}

/// A URL split into path, decoded query and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlParts {
	/// Path without query or fragment.
	pub path: String,
	/// Decoded query parameters. Repeated keys keep the last value.
	pub query: QueryParams,
	/// Fragment without the leading `#`.
	pub fragment: Option<String>,
}

impl UrlParts {
	/// Splits a URL such as `/customers?page=2#top`.
	pub fn parse(url: &str) -> Self {
		let (rest, fragment) = match url.split_once('#') {
			Some((rest, fragment)) => (rest, Some(fragment.to_string())),
			None => (url, None),
		};
		let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

		let query = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_else(|error| {
				tracing::warn!(%error, url, "ignoring malformed query string");
				QueryParams::new()
			});

		Self {
			path: path.to_string(),
			query,
			fragment,
		}
	}
}

impl fmt::Display for UrlParts {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path)?;
		if !self.query.is_empty() {
			let encoded = serde_urlencoded::to_string(&self.query).map_err(|_| fmt::Error)?;
			write!(f, "?{}", encoded)?;
		}
		if let Some(fragment) = &self.fragment {
			write!(f, "#{}", fragment)?;
		}
		Ok(())
	}
}

/// Merges remembered parameters into `url`. Keys already in `url` win.
pub fn merge_remembered(url: &str, remembered: Option<&QueryParams>) -> String {
	let Some(remembered) = remembered.filter(|params| !params.is_empty()) else {
		return url.to_string();
	};

	let mut parts = UrlParts::parse(url);
	for (key, value) in remembered {
		parts
			.query
			.entry(key.clone())
			.or_insert_with(|| value.clone());
	}
	parts.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn params(pairs: &[(&str, &str)]) -> QueryParams {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_parse_full_url() {
		let parts = UrlParts::parse("/customers?page=2&q=a%20b#top");
		assert_eq!(parts.path, "/customers");
		assert_eq!(parts.query, params(&[("page", "2"), ("q", "a b")]));
		assert_eq!(parts.fragment.as_deref(), Some("top"));
	}

	#[rstest]
	#[case("/customers")]
	#[case("/customers?page=2")]
	#[case("/customers?page=2&sort=name#top")]
	fn test_display_preserves_url(#[case] url: &str) {
		assert_eq!(UrlParts::parse(url).to_string(), url);
	}

	#[rstest]
	fn test_explicit_params_take_precedence() {
		let remembered = params(&[("page", "3"), ("sort", "name")]);
		let merged = merge_remembered("/customers?page=1", Some(&remembered));
		assert_eq!(merged, "/customers?page=1&sort=name");
	}

	#[rstest]
	fn test_merge_without_memory_is_identity() {
		assert_eq!(merge_remembered("/customers?b=1&a=2", None), "/customers?b=1&a=2");
		assert_eq!(
			merge_remembered("/customers", Some(&QueryParams::new())),
			"/customers"
		);
	}

	#[rstest]
	fn test_memory_remember_and_forget() {
		let route = RouteId::new(3);
		let mut memory = QueryMemory::new();
		memory.remember(route, params(&[("page", "2")]));
		assert_eq!(memory.get(route), Some(&params(&[("page", "2")])));

		memory.remember(route, QueryParams::new());
		assert!(memory.get(route).is_none());
		assert!(memory.is_empty());

		memory.remember(route, params(&[("page", "2")]));
		assert!(memory.forget(route).is_some());
		assert_eq!(memory.len(), 0);
	}
}

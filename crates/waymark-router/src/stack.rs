//! Route stacks.
//!
//! A route stack is the root-to-leaf list of [`RouteInfo`] entries for the
//! active leaf route. Views hold `Rc<RouteInfo>` handles to their own entry;
//! the stack compares entries by identity when resolving outlets.

use crate::params::{ParamValue, Params, RawParams, map_params};
use crate::registry::{RouteId, RouteRegistry};
use std::rc::Rc;

/// One level of an active route stack.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
	route: RouteId,
	params: Params,
	data: Option<serde_json::Value>,
}

impl RouteInfo {
	/// Creates an entry with no data.
	pub fn new(route: RouteId, params: Params) -> Self {
		Self {
			route,
			params,
			data: None,
		}
	}

	/// Sets the loaded data.
	pub fn with_data(mut self, data: serde_json::Value) -> Self {
		self.data = Some(data);
		self
	}

	/// The route this entry renders.
	pub fn route(&self) -> RouteId {
		self.route
	}

	/// Typed parameters relevant to this level.
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Looks up one parameter.
	pub fn param(&self, name: &str) -> Option<&ParamValue> {
		self.params.get(name)
	}

	/// Data returned by the route's loader, if any.
	pub fn data(&self) -> Option<&serde_json::Value> {
		self.data.as_ref()
	}

	pub(crate) fn set_data(&mut self, data: Option<serde_json::Value>) {
		self.data = data;
	}
}

/// Builds the entries for `leaf` and its ancestors, root first.
///
/// Each entry's parameters are mapped for its own route; `data` starts unset.
pub fn build_route_stack(registry: &RouteRegistry, leaf: RouteId, raw: &RawParams) -> Vec<RouteInfo> {
	let mut entries: Vec<RouteInfo> = registry
		.ancestors(leaf)
		.map(|id| RouteInfo::new(id, map_params(&registry[id], raw)))
		.collect();
	entries.reverse();
	entries
}

/// A committed, root-first route stack.
#[derive(Debug, Clone, Default)]
pub struct RouteStack {
	entries: Vec<Rc<RouteInfo>>,
}

impl RouteStack {
	/// Wraps loaded entries.
	pub fn from_entries(entries: impl IntoIterator<Item = RouteInfo>) -> Self {
		Self {
			entries: entries.into_iter().map(Rc::new).collect(),
		}
	}

	/// All entries, root first.
	pub fn entries(&self) -> &[Rc<RouteInfo>] {
		&self.entries
	}

	/// Number of levels.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the stack has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The top-level entry.
	pub fn root(&self) -> Option<&Rc<RouteInfo>> {
		self.entries.first()
	}

	/// The deepest entry.
	pub fn leaf(&self) -> Option<&Rc<RouteInfo>> {
		self.entries.last()
	}

	/// Iterates entries root first.
	pub fn iter(&self) -> impl Iterator<Item = &Rc<RouteInfo>> {
		self.entries.iter()
	}

	/// Position of `entry`, compared by identity.
	pub fn position(&self, entry: &Rc<RouteInfo>) -> Option<usize> {
		self.entries.iter().position(|e| Rc::ptr_eq(e, entry))
	}

	/// The entry for `route`, if that route is active.
	pub fn find_route(&self, route: RouteId) -> Option<&Rc<RouteInfo>> {
		self.entries.iter().find(|e| e.route == route)
	}

	/// Route ids root first.
	pub fn routes(&self) -> Vec<RouteId> {
		self.entries.iter().map(|e| e.route).collect()
	}

	/// Whether every non-root entry's route is the child of the previous one.
	pub fn is_well_formed(&self, registry: &RouteRegistry) -> bool {
		self.root()
			.is_none_or(|root| registry.parent(root.route).is_none())
			&& self
				.entries
				.windows(2)
				.all(|pair| registry.parent(pair[1].route) == Some(pair[0].route))
	}
}

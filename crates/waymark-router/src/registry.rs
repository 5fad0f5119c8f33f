//! Route registry construction.
//!
//! Routes are declared as a nested list of [`RouteSpec`]s and registered
//! through a [`RegistryBuilder`], which resolves each node's full path and
//! ancestor-merged parameter types and hands the full path to the
//! [`PathMatcher`]. [`RegistryBuilder::finish`] freezes the result into a
//! [`RouteRegistry`], which exposes no mutators.
//!
//! Parent links are stored as [`RouteId`]s into the registry arena, while
//! child edges are owned lists of ids on each node.
//!
//! # Examples
//!
//! ```
//! use waymark_router::{Component, PatternMatcher, RegistryBuilder, RouteSpec};
//!
//! let routes = vec![
//!     RouteSpec::new("/", Component::new("Home")),
//!     RouteSpec::new("/customers/:customerId", Component::new("Customer"))
//!         .param_type("customerId", "number")
//!         .route(RouteSpec::new("/order", Component::new("Order"))),
//! ];
//!
//! let mut matcher = PatternMatcher::new();
//! let mut builder = RegistryBuilder::new();
//! builder.register(&routes, &mut matcher).unwrap();
//! let registry = builder.finish();
//!
//! let order = registry.find_by_path("/customers/:customerId/order").unwrap();
//! assert_eq!(registry.depth(order), 2);
//! ```

use crate::component::Component;
use crate::error::RouterError;
use crate::matcher::PathMatcher;
use crate::params::ParamType;
use crate::pattern::{RoutePattern, join_paths};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::ops::Index;

/// Identifier of a route in a [`RouteRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
	pub(crate) fn new(index: usize) -> Self {
		Self(index)
	}

	/// Position of the route in registration order.
	pub fn index(&self) -> usize {
		self.0
	}
}

impl fmt::Display for RouteId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Declarative route node.
#[derive(Debug, Clone)]
pub struct RouteSpec {
	path: String,
	component: Component,
	param_types: BTreeMap<String, ParamType>,
	routes: Vec<RouteSpec>,
	name: Option<String>,
}

impl RouteSpec {
	/// Creates a route node for a path segment.
	pub fn new(path: impl Into<String>, component: Component) -> Self {
		Self {
			path: path.into(),
			component,
			param_types: BTreeMap::new(),
			routes: Vec::new(),
			name: None,
		}
	}

	/// Declares the type of a parameter, e.g. `("customerId", "number")`.
	pub fn param_type(mut self, name: impl Into<String>, param_type: impl Into<ParamType>) -> Self {
		self.param_types.insert(name.into(), param_type.into());
		self
	}

	/// Names the route for reverse lookup.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Appends a child route.
	pub fn route(mut self, child: RouteSpec) -> Self {
		self.routes.push(child);
		self
	}

	/// Appends several child routes.
	pub fn routes(mut self, children: impl IntoIterator<Item = RouteSpec>) -> Self {
		self.routes.extend(children);
		self
	}

	/// The path segment as declared.
	pub fn path(&self) -> &str {
		&self.path
	}
}

/// A registered route. Immutable once built.
#[derive(Debug, Clone)]
pub struct RouteDef {
	id: RouteId,
	name: Option<String>,
	path: String,
	full_path: String,
	component: Component,
	param_types: BTreeMap<String, ParamType>,
	pattern: RoutePattern,
	parent: Option<RouteId>,
	children: Vec<RouteId>,
}

impl RouteDef {
	/// The route's id.
	pub fn id(&self) -> RouteId {
		self.id
	}

	/// The route's name, if it was given one.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// The route's own path segment.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The path concatenated from the root.
	pub fn full_path(&self) -> &str {
		&self.full_path
	}

	/// The view component.
	pub fn component(&self) -> &Component {
		&self.component
	}

	/// Parameter types merged from all ancestors, own declarations winning.
	pub fn param_types(&self) -> &BTreeMap<String, ParamType> {
		&self.param_types
	}

	/// The compiled full-path pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// The parent route.
	pub fn parent(&self) -> Option<RouteId> {
		self.parent
	}

	/// Child routes in declaration order.
	pub fn children(&self) -> &[RouteId] {
		&self.children
	}
}

/// Mutable registration phase of a [`RouteRegistry`].
///
/// Registration is idempotent: each spec is keyed by its position in the
/// declared tree together with its full path, and a node already marked
/// finalized is skipped, so a pass that failed midway can be re-run over the
/// same specs.
///
/// A child declared with the path `/` is an index route. It shares its
/// parent's full path and takes precedence over the parent when matching,
/// so the parent renders it through its outlet. Any other pair of specs
/// resolving to the same full path is rejected.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	routes: Vec<RouteDef>,
	roots: Vec<RouteId>,
	by_path: HashMap<String, RouteId>,
	by_name: HashMap<String, RouteId>,
	nodes: HashMap<(Vec<usize>, String), RouteId>,
	finalized: HashSet<RouteId>,
}

impl RegistryBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a list of top-level route specs and their descendants.
	///
	/// Children are handed to the matcher before their parent, so an index
	/// route wins over the parent it shares a path with.
	///
	/// # Errors
	///
	/// Returns an error if a path fails to compile, a route name is used
	/// twice or two specs resolve to the same full path. Nodes registered
	/// before the failure stay registered.
	pub fn register(
		&mut self,
		specs: &[RouteSpec],
		matcher: &mut dyn PathMatcher,
	) -> Result<(), RouterError> {
		let mut trail = Vec::new();
		for (index, spec) in specs.iter().enumerate() {
			trail.push(index);
			self.visit(spec, None, "/", &BTreeMap::new(), &mut trail, matcher)?;
			trail.pop();
		}
		Ok(())
	}

	fn visit(
		&mut self,
		spec: &RouteSpec,
		parent: Option<RouteId>,
		base: &str,
		inherited: &BTreeMap<String, ParamType>,
		trail: &mut Vec<usize>,
		matcher: &mut dyn PathMatcher,
	) -> Result<(), RouterError> {
		let full_path = join_paths(base, &spec.path);
		let key = (trail.clone(), full_path.clone());

		let id = match self.nodes.get(&key).copied() {
			Some(id) if self.finalized.contains(&id) => {
				tracing::debug!(path = %full_path, "route already finalized, skipping");
				return Ok(());
			}
			Some(id) => id,
			None => {
				let id = self.insert(spec, parent, &full_path, inherited)?;
				self.nodes.insert(key, id);
				id
			}
		};

		let merged = self.routes[id.0].param_types.clone();
		for (index, child) in spec.routes.iter().enumerate() {
			trail.push(index);
			self.visit(child, Some(id), &full_path, &merged, trail, matcher)?;
			trail.pop();
		}

		matcher.register(&full_path, id)?;
		self.finalized.insert(id);
		Ok(())
	}

	fn insert(
		&mut self,
		spec: &RouteSpec,
		parent: Option<RouteId>,
		full_path: &str,
		inherited: &BTreeMap<String, ParamType>,
	) -> Result<RouteId, RouterError> {
		if let Some(name) = &spec.name
			&& self.by_name.contains_key(name)
		{
			return Err(RouterError::InvalidRouteName(format!(
				"duplicate route name '{}'",
				name
			)));
		}

		// Only an index child may share its parent's path.
		if let Some(existing) = self.by_path.get(full_path).copied()
			&& Some(existing) != parent
		{
			return Err(RouterError::DuplicateRoute(full_path.to_string()));
		}

		let pattern = RoutePattern::new(full_path)?;
		let id = RouteId(self.routes.len());

		let mut param_types = inherited.clone();
		param_types.extend(
			spec.param_types
				.iter()
				.map(|(name, param_type)| (name.clone(), param_type.clone())),
		);

		self.routes.push(RouteDef {
			id,
			name: spec.name.clone(),
			path: spec.path.clone(),
			full_path: full_path.to_string(),
			component: spec.component.clone(),
			param_types,
			pattern,
			parent,
			children: Vec::new(),
		});

		match parent {
			Some(parent) => self.routes[parent.0].children.push(id),
			None => self.roots.push(id),
		}
		self.by_path.insert(full_path.to_string(), id);
		if let Some(name) = &spec.name {
			self.by_name.insert(name.clone(), id);
		}

		tracing::debug!(
			path = %full_path,
			component = spec.component.name(),
			%id,
			"registered route"
		);
		Ok(id)
	}

	/// Freezes the registered tree.
	pub fn finish(self) -> RouteRegistry {
		RouteRegistry {
			routes: self.routes,
			roots: self.roots,
			by_path: self.by_path,
			by_name: self.by_name,
		}
	}
}

/// Frozen route tree.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
	routes: Vec<RouteDef>,
	roots: Vec<RouteId>,
	by_path: HashMap<String, RouteId>,
	by_name: HashMap<String, RouteId>,
}

impl RouteRegistry {
	/// Looks up a route by id.
	pub fn get(&self, id: RouteId) -> Option<&RouteDef> {
		self.routes.get(id.0)
	}

	/// Top-level routes in declaration order.
	pub fn roots(&self) -> &[RouteId] {
		&self.roots
	}

	/// Children of a route.
	pub fn children(&self, id: RouteId) -> &[RouteId] {
		self.get(id).map(RouteDef::children).unwrap_or_default()
	}

	/// Parent of a route.
	pub fn parent(&self, id: RouteId) -> Option<RouteId> {
		self.get(id).and_then(RouteDef::parent)
	}

	/// Iterates from `id` up to its root, `id` first.
	pub fn ancestors(&self, id: RouteId) -> impl Iterator<Item = RouteId> + '_ {
		std::iter::successors(self.get(id).map(RouteDef::id), move |current| {
			self.parent(*current)
		})
	}

	/// Number of levels from the root to `id`, inclusive. Roots have depth 1.
	pub fn depth(&self, id: RouteId) -> usize {
		self.ancestors(id).count()
	}

	/// Finds a route by name.
	pub fn find_by_name(&self, name: &str) -> Option<RouteId> {
		self.by_name.get(name).copied()
	}

	/// Finds a route by its full path pattern, e.g. `/customers/:customerId`.
	///
	/// When an index route shares the path, the index route is returned.
	pub fn find_by_path(&self, path: &str) -> Option<RouteId> {
		self.by_path.get(&join_paths("/", path)).copied()
	}

	/// Iterates all routes in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &RouteDef> {
		self.routes.iter()
	}

	/// Number of routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl Index<RouteId> for RouteRegistry {
	type Output = RouteDef;

	fn index(&self, id: RouteId) -> &RouteDef {
		&self.routes[id.0]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::matcher::PatternMatcher;
	use rstest::rstest;

	fn specs() -> Vec<RouteSpec> {
		vec![
			RouteSpec::new("/", Component::new("Home")).named("home"),
			RouteSpec::new("/customers/:customerId", Component::new("Customer"))
				.param_type("customerId", "number")
				.param_type("tab", "string")
				.routes([
					RouteSpec::new("/order", Component::new("Order")).named("order"),
					RouteSpec::new("/notes/:noteId", Component::new("Note"))
						.param_type("noteId", "number")
						.param_type("tab", "uuid"),
				]),
		]
	}

	fn build(specs: &[RouteSpec]) -> (RouteRegistry, PatternMatcher) {
		let mut matcher = PatternMatcher::new();
		let mut builder = RegistryBuilder::new();
		builder.register(specs, &mut matcher).unwrap();
		(builder.finish(), matcher)
	}

	#[rstest]
	fn test_tree_shape() {
		let (registry, _) = build(&specs());
		assert_eq!(registry.len(), 4);
		assert_eq!(registry.roots().len(), 2);

		let customer = registry.find_by_path("/customers/:customerId").unwrap();
		let order = registry.find_by_path("/customers/:customerId/order").unwrap();
		assert_eq!(registry.parent(order), Some(customer));
		assert_eq!(registry.children(customer).len(), 2);
		assert_eq!(registry.depth(order), 2);
		assert_eq!(registry.depth(customer), 1);
		assert_eq!(registry[order].path(), "/order");
	}

	#[rstest]
	fn test_param_types_merged_own_wins() {
		let (registry, _) = build(&specs());
		let note = registry.find_by_path("/customers/:customerId/notes/:noteId").unwrap();
		let types = registry[note].param_types();

		assert_eq!(types.get("customerId"), Some(&ParamType::Number));
		assert_eq!(types.get("noteId"), Some(&ParamType::Number));
		assert_eq!(types.get("tab"), Some(&ParamType::Other("uuid".into())));
	}

	#[rstest]
	fn test_full_paths_registered_with_matcher() {
		let (registry, matcher) = build(&specs());
		assert_eq!(matcher.len(), registry.len());

		let found = matcher.match_path("/customers/42/order").unwrap();
		assert_eq!(Some(found.route), registry.find_by_name("order"));
	}

	#[rstest]
	fn test_reregistration_is_noop() {
		let specs = specs();
		let mut matcher = PatternMatcher::new();
		let mut builder = RegistryBuilder::new();
		builder.register(&specs, &mut matcher).unwrap();
		builder.register(&specs, &mut matcher).unwrap();

		assert_eq!(matcher.len(), 4);
		assert_eq!(builder.finish().len(), 4);
	}

	#[rstest]
	fn test_failed_pass_can_be_resumed() {
		let broken = vec![
			RouteSpec::new("/a", Component::new("A"))
				.route(RouteSpec::new("/b", Component::new("B")))
				.route(RouteSpec::new("/:x/:x", Component::new("Broken"))),
		];
		let mut matcher = PatternMatcher::new();
		let mut builder = RegistryBuilder::new();
		assert!(builder.register(&broken, &mut matcher).is_err());

		let fixed = vec![
			RouteSpec::new("/a", Component::new("A"))
				.route(RouteSpec::new("/b", Component::new("B")))
				.route(RouteSpec::new("/c", Component::new("C"))),
		];
		builder.register(&fixed, &mut matcher).unwrap();
		let registry = builder.finish();

		assert_eq!(registry.len(), 3);
		let a = registry.find_by_path("/a").unwrap();
		assert_eq!(registry.children(a).len(), 2);
	}

	#[rstest]
	fn test_index_child_registered_and_preferred() {
		let specs = vec![
			RouteSpec::new("/customers/:customerId", Component::new("Customer"))
				.named("customer")
				.route(RouteSpec::new("/", Component::new("Overview")).named("overview"))
				.route(RouteSpec::new("/order", Component::new("Order"))),
		];
		let (registry, matcher) = build(&specs);

		assert_eq!(registry.len(), 3);
		let customer = registry.find_by_name("customer").unwrap();
		let overview = registry.find_by_name("overview").unwrap();
		assert_eq!(registry.parent(overview), Some(customer));
		assert_eq!(registry[overview].full_path(), "/customers/:customerId");
		assert_eq!(registry.find_by_path("/customers/:customerId"), Some(overview));
		assert_eq!(matcher.len(), 3);
		assert_eq!(matcher.match_path("/customers/42").unwrap().route, overview);
	}

	#[rstest]
	fn test_repeated_path_rejected() {
		let specs = vec![
			RouteSpec::new("/a", Component::new("A1")),
			RouteSpec::new("/a", Component::new("A2"))
				.route(RouteSpec::new("/x", Component::new("X")).named("x")),
		];
		let mut matcher = PatternMatcher::new();
		let mut builder = RegistryBuilder::new();

		let err = builder.register(&specs, &mut matcher).unwrap_err();

		assert_eq!(err, RouterError::DuplicateRoute("/a".to_string()));
	}

	#[rstest]
	fn test_sibling_with_parent_path_rejected() {
		let specs = vec![
			RouteSpec::new("/a", Component::new("A"))
				.route(RouteSpec::new("/b", Component::new("B"))),
			RouteSpec::new("/a/b", Component::new("AB")),
		];
		let mut matcher = PatternMatcher::new();
		let mut builder = RegistryBuilder::new();

		let err = builder.register(&specs, &mut matcher).unwrap_err();

		assert_eq!(err, RouterError::DuplicateRoute("/a/b".to_string()));
	}

	#[rstest]
	fn test_duplicate_name_rejected() {
		let specs = vec![
			RouteSpec::new("/a", Component::new("A")).named("dup"),
			RouteSpec::new("/b", Component::new("B")).named("dup"),
		];
		let mut matcher = PatternMatcher::new();
		let mut builder = RegistryBuilder::new();
		let err = builder.register(&specs, &mut matcher).unwrap_err();
		assert!(matches!(err, RouterError::InvalidRouteName(_)));
	}

	#[rstest]
	#[case("/customers/:customerId/order")]
	#[case("customers/:customerId/order/")]
	fn test_find_by_path_normalizes(#[case] path: &str) {
		let (registry, _) = build(&specs());
		assert_eq!(registry.find_by_path(path), registry.find_by_name("order"));
	}

	#[rstest]
	fn test_ancestors_leaf_first() {
		let (registry, _) = build(&specs());
		let order = registry.find_by_name("order").unwrap();
		let chain: Vec<_> = registry
			.ancestors(order)
			.map(|id| registry[id].full_path().to_string())
			.collect();
		assert_eq!(chain, vec!["/customers/:customerId/order", "/customers/:customerId"]);
	}
}

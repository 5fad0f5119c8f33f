//! Property-based tests for registry construction and stack building
//!
//! Uses proptest to verify:
//! 1. Parameter types are the ancestor-merged union, own types winning
//! 2. Parameter mapping converts numbers and passes other values through
//! 3. Stacks are root first, as deep as the leaf and well formed

use proptest::prelude::*;
use std::collections::BTreeMap;
use waymark_router::{
	Component, ParamType, ParamValue, PatternMatcher, RawParams, RegistryBuilder, RouteRegistry,
	RouteSpec, build_route_stack,
};

type Declared = BTreeMap<String, String>;

fn segment(level: usize) -> String {
	format!("/l{level}/:p{level}")
}

fn full_path(depth: usize) -> String {
	(0..depth).map(segment).collect()
}

/// Builds a single chain of nested routes, one per level.
fn chain(levels: &[Declared]) -> RouteSpec {
	let mut spec: Option<RouteSpec> = None;
	for (level, declared) in levels.iter().enumerate().rev() {
		let mut node = RouteSpec::new(segment(level), Component::new(format!("Level{level}")));
		for (name, tag) in declared {
			node = node.param_type(name.clone(), tag.as_str());
		}
		if let Some(child) = spec.take() {
			node = node.route(child);
		}
		spec = Some(node);
	}
	spec.expect("at least one level")
}

fn registry(levels: &[Declared]) -> RouteRegistry {
	let mut builder = RegistryBuilder::new();
	builder
		.register(&[chain(levels)], &mut PatternMatcher::new())
		.unwrap();
	builder.finish()
}

fn levels_strategy() -> impl Strategy<Value = Vec<Declared>> {
	let name = (0..5usize).prop_map(|i| format!("p{i}"));
	let tag = prop_oneof![Just("number"), Just("string"), Just("uuid")].prop_map(String::from);
	prop::collection::vec(prop::collection::btree_map(name, tag, 0..3), 1..6)
}

// ============================================================================
// Parameter type merge
// ============================================================================

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// Property: each node's types equal its ancestors' types overridden by its own
	#[test]
	fn test_param_types_are_ancestor_merged(levels in levels_strategy()) {
		let registry = registry(&levels);
		let mut expected: BTreeMap<String, ParamType> = BTreeMap::new();

		for (level, declared) in levels.iter().enumerate() {
			for (name, tag) in declared {
				expected.insert(name.clone(), ParamType::from(tag.as_str()));
			}
			let id = registry.find_by_path(&full_path(level + 1)).unwrap();
			prop_assert_eq!(registry[id].param_types(), &expected);
		}
	}

	/// Property: stacks have the leaf's depth, root first, parent-linked
	#[test]
	fn test_stack_shape(
		levels in levels_strategy(),
		values in prop::collection::vec("[a-z0-9.]{1,6}", 5),
	) {
		let registry = registry(&levels);
		let leaf = registry.find_by_path(&full_path(levels.len())).unwrap();
		let raw: RawParams = values
			.iter()
			.enumerate()
			.map(|(i, value)| (format!("p{i}"), value.clone()))
			.collect();

		let entries = build_route_stack(&registry, leaf, &raw);

		prop_assert_eq!(entries.len(), registry.depth(leaf));
		prop_assert_eq!(entries.len(), levels.len());
		prop_assert!(registry.parent(entries[0].route()).is_none());
		for pair in entries.windows(2) {
			prop_assert_eq!(registry.parent(pair[1].route()), Some(pair[0].route()));
		}
		prop_assert_eq!(entries.last().unwrap().route(), leaf);
	}

	/// Property: numbers parse, other types pass through, foreign keys are omitted
	#[test]
	fn test_map_params_conversions(
		levels in levels_strategy(),
		values in prop::collection::vec("[a-z0-9.]{1,6}", 5),
	) {
		let registry = registry(&levels);
		let leaf = registry.find_by_path(&full_path(levels.len())).unwrap();
		let raw: RawParams = values
			.iter()
			.enumerate()
			.map(|(i, value)| (format!("p{i}"), value.clone()))
			.collect();

		for (level, entry) in build_route_stack(&registry, leaf, &raw).iter().enumerate() {
			let types = registry[entry.route()].param_types();
			prop_assert_eq!(entry.params().len(), level + 1);

			for (name, value) in entry.params() {
				let index: usize = name[1..].parse().unwrap();
				prop_assert!(index <= level);
				let raw_value = &values[index];
				let expected = match types.get(name) {
					Some(ParamType::Number) => {
						ParamValue::Number(raw_value.parse::<f64>().unwrap_or(f64::NAN))
					}
					_ => ParamValue::Text(raw_value.clone()),
				};
				prop_assert_eq!(value, &expected);
			}
		}
	}
}

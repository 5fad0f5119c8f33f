//! Typed route parameters.
//!
//! Raw parameters arrive from the matcher as strings. Each route declares a
//! type tag per parameter name ([`ParamType`]); [`map_params`] converts the
//! raw strings accordingly when building a route stack entry.

use crate::registry::RouteDef;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Typed parameters of one route stack entry.
pub type Params = BTreeMap<String, ParamValue>;

/// Raw parameters as extracted by the matcher.
pub type RawParams = HashMap<String, String>;

/// Declared type of a route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
	/// Parsed as a 64-bit float. The whole value must parse, so `"42abc"`
	/// becomes `NaN` rather than the prefix `42`.
	Number,
	/// Kept as the raw string.
	Text,
	/// An unrecognised tag; values pass through as strings.
	Other(String),
}

impl From<&str> for ParamType {
	fn from(tag: &str) -> Self {
		match tag {
			"number" => Self::Number,
			"string" => Self::Text,
			other => Self::Other(other.to_string()),
		}
	}
}

/// A converted parameter value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
	/// Numeric value. Non-numeric input is stored as `NaN`.
	Number(f64),
	/// String value.
	Text(String),
}

impl ParamValue {
	/// Converts a raw string according to its declared type.
	///
	/// `Number` uses a plain float parse: `"42"` becomes `42.0`, while `"abc"`
	/// or `"42abc"` become `NaN` instead of failing.
	pub fn convert(raw: &str, param_type: Option<&ParamType>) -> Self {
		match param_type {
			Some(ParamType::Number) => Self::Number(raw.trim().parse::<f64>().unwrap_or(f64::NAN)),
			_ => Self::Text(raw.to_string()),
		}
	}

	/// The numeric value, if this is a number.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			Self::Text(_) => None,
		}
	}

	/// The string value, if this is text.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			Self::Number(_) => None,
		}
	}
}

// Deep equality for data reuse: NaN compares equal to NaN.
impl PartialEq for ParamValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
			(Self::Text(a), Self::Text(b)) => a == b,
			_ => false,
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(n) => write!(f, "{}", n),
			Self::Text(s) => f.write_str(s),
		}
	}
}

impl From<f64> for ParamValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

/// Converts raw parameters for one route.
///
/// Only keys whose `:key` token appears in the route's full path are kept,
/// so parameters belonging solely to descendants are excluded. Each kept
/// value is converted with the route's declared (ancestor-merged) type.
pub fn map_params(route: &RouteDef, raw: &RawParams) -> Params {
	raw.iter()
		.filter(|(key, _)| route.pattern().has_param(key))
		.map(|(key, value)| {
			(
				key.clone(),
				ParamValue::convert(value, route.param_types().get(key)),
			)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::Component;
	use crate::matcher::PatternMatcher;
	use crate::registry::{RegistryBuilder, RouteSpec};
	use rstest::rstest;

	#[rstest]
	#[case("number", ParamType::Number)]
	#[case("string", ParamType::Text)]
	#[case("uuid", ParamType::Other("uuid".to_string()))]
	fn test_param_type_from_tag(#[case] tag: &str, #[case] expected: ParamType) {
		assert_eq!(ParamType::from(tag), expected);
	}

	#[rstest]
	#[case("42", 42.0)]
	#[case("-1.5", -1.5)]
	#[case("1e3", 1000.0)]
	fn test_number_conversion(#[case] raw: &str, #[case] expected: f64) {
		let value = ParamValue::convert(raw, Some(&ParamType::Number));
		assert_eq!(value.as_number(), Some(expected));
	}

	#[rstest]
	#[case("abc")]
	#[case("42abc")]
	#[case("")]
	fn test_non_numeric_becomes_nan(#[case] raw: &str) {
		let value = ParamValue::convert(raw, Some(&ParamType::Number));
		assert!(value.as_number().unwrap().is_nan());
	}

	#[rstest]
	fn test_nan_values_compare_equal() {
		assert_eq!(ParamValue::Number(f64::NAN), ParamValue::Number(f64::NAN));
		assert_ne!(ParamValue::Number(1.0), ParamValue::Text("1".into()));
	}

	#[rstest]
	#[case(None)]
	#[case(Some(ParamType::Text))]
	#[case(Some(ParamType::Other("date".into())))]
	fn test_untyped_passes_through(#[case] param_type: Option<ParamType>) {
		let value = ParamValue::convert("2024-01-01", param_type.as_ref());
		assert_eq!(value, ParamValue::Text("2024-01-01".into()));
	}

	#[rstest]
	fn test_map_params_excludes_descendant_keys() {
		let mut builder = RegistryBuilder::new();
		let mut matcher = PatternMatcher::new();
		builder
			.register(
				&[
					RouteSpec::new("/customers/:customerId", Component::new("Customer"))
						.param_type("customerId", "number")
						.route(RouteSpec::new("/orders/:orderId", Component::new("Order"))),
				],
				&mut matcher,
			)
			.unwrap();
		let registry = builder.finish();
		let customer = registry.find_by_path("/customers/:customerId").unwrap();
		let order = registry.find_by_path("/customers/:customerId/orders/:orderId").unwrap();

		let raw = RawParams::from([
			("customerId".to_string(), "42".to_string()),
			("orderId".to_string(), "7".to_string()),
			("customer".to_string(), "x".to_string()),
		]);

		let params = map_params(&registry[customer], &raw);
		assert_eq!(params.len(), 1);
		assert_eq!(params["customerId"], ParamValue::Number(42.0));

		let params = map_params(&registry[order], &raw);
		assert_eq!(params.len(), 2);
		assert_eq!(params["customerId"], ParamValue::Number(42.0));
		assert_eq!(params["orderId"], ParamValue::Text("7".into()));
	}

	#[rstest]
	fn test_serialize_untagged() {
		let params = Params::from([
			("id".to_string(), ParamValue::Number(3.0)),
			("slug".to_string(), ParamValue::from("intro")),
		]);
		assert_eq!(
			serde_json::to_value(&params).unwrap(),
			serde_json::json!({ "id": 3.0, "slug": "intro" })
		);
	}
}

//! Path pattern compilation.
//!
//! Route paths use colon-prefixed named tokens:
//! - `/customers/` - Exact match
//! - `/customers/:customerId` - Single path parameter
//! - `/customers/:customerId/orders/:orderId` - Multiple parameters
//! - `/files/*path` - Wildcard matching (rest of path)
//!
//! A trailing slash on either the pattern or the matched path is ignored.
//!
//! # Wildcard Behavior
//!
//! The `*name` wildcard compiles to `(.*)`, which matches **any character
//! including path separators (`/`)**. `/files/*path` matches `/files/a/b/c`,
//! capturing `a/b/c` as a single parameter value.

use crate::error::RouterError;
use std::collections::HashMap;
use std::fmt;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A lexical piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
	Literal(String),
	Param(String),
	Wildcard(String),
}

/// Splits a pattern into literals, `:name` params and `*name` wildcards.
///
/// A `:` or `*` not followed by an identifier character is literal text.
pub(crate) fn tokenize(pattern: &str) -> Vec<Token> {
	let mut tokens = Vec::new();
	let mut literal = String::new();
	let mut chars = pattern.chars().peekable();

	while let Some(c) = chars.next() {
		if c != ':' && c != '*' {
			literal.push(c);
			continue;
		}

		let mut name = String::new();
		while let Some(&next) = chars.peek() {
			if !(next.is_ascii_alphanumeric() || next == '_') {
				break;
			}
			name.push(next);
			chars.next();
		}

		if name.is_empty() {
			literal.push(c);
			continue;
		}

		if !literal.is_empty() {
			tokens.push(Token::Literal(std::mem::take(&mut literal)));
		}
		tokens.push(if c == ':' {
			Token::Param(name)
		} else {
			Token::Wildcard(name)
		});
	}

	if !literal.is_empty() {
		tokens.push(Token::Literal(literal));
	}
	tokens
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex pattern.
	regex: regex::Regex,
	/// Parsed pattern pieces, used for reversing.
	tokens: Vec<Token>,
	/// Parameter names in order.
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a route pattern.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if:
	/// - Pattern exceeds maximum length (1024 bytes)
	/// - Pattern has too many path segments (>32)
	/// - Pattern declares the same parameter twice or otherwise fails to compile
	pub fn new(pattern: &str) -> Result<Self, RouterError> {
		let invalid = |reason: String| RouterError::InvalidPattern {
			pattern: pattern.to_string(),
			reason,
		};

		// Reject patterns exceeding the maximum length to prevent ReDoS
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"{} path segments, exceeding maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			)));
		}

		let tokens = tokenize(pattern);
		let regex_str = Self::compile_tokens(&tokens);
		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| invalid(format!("failed to compile regex: {}", e)))?;

		let param_names = tokens
			.iter()
			.filter_map(|token| match token {
				Token::Param(name) | Token::Wildcard(name) => Some(name.clone()),
				Token::Literal(_) => None,
			})
			.collect();

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			tokens,
			param_names,
		})
	}

	fn compile_tokens(tokens: &[Token]) -> String {
		let mut regex_str = String::from("^");
		let last = tokens.len().saturating_sub(1);

		for (index, token) in tokens.iter().enumerate() {
			match token {
				Token::Literal(text) => {
					let text = if index == last {
						text.trim_end_matches('/')
					} else {
						text
					};
					regex_str.push_str(&regex::escape(text));
				}
				Token::Param(name) => regex_str.push_str(&format!("(?P<{}>[^/]+)", name)),
				Token::Wildcard(name) => regex_str.push_str(&format!("(?P<{}>.*)", name)),
			}
		}

		regex_str.push_str("/?$");
		regex_str
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Whether the pattern declares a `:name` or `*name` token called `name`.
	pub fn has_param(&self, name: &str) -> bool {
		self.param_names.iter().any(|param| param == name)
	}

	/// Attempts to match a path (without query string) against this pattern.
	///
	/// Captured values are percent-decoded.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name).map(|m| {
						let value = urlencoding::decode(m.as_str())
							.map(|decoded| decoded.into_owned())
							.unwrap_or_else(|_| m.as_str().to_string());
						(name.clone(), value)
					})
				})
				.collect()
		})
	}

	/// Checks if this pattern would match the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Returns whether this is an exact match pattern (no parameters).
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Generates a path from this pattern with the given parameters.
	///
	/// `:name` values are percent-encoded; wildcard values are inserted as-is.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String, RouterError> {
		let mut result = String::with_capacity(self.pattern.len());

		for token in &self.tokens {
			match token {
				Token::Literal(text) => result.push_str(text),
				Token::Param(name) => {
					let value = params
						.get(name)
						.ok_or_else(|| RouterError::MissingParameter(name.clone()))?;
					result.push_str(&urlencoding::encode(value));
				}
				Token::Wildcard(name) => {
					let value = params
						.get(name)
						.ok_or_else(|| RouterError::MissingParameter(name.clone()))?;
					result.push_str(value);
				}
			}
		}

		Ok(result)
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

/// Joins a parent path and a child segment, collapsing duplicate slashes.
///
/// The result always starts with `/` and never ends with one (except the root).
pub(crate) fn join_paths(base: &str, segment: &str) -> String {
	let mut joined = String::from("/");
	for part in base
		.split('/')
		.chain(segment.split('/'))
		.filter(|part| !part.is_empty())
	{
		if joined.len() > 1 {
			joined.push('/');
		}
		joined.push_str(part);
	}
	joined
}

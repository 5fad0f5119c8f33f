//! Outlet resolution.
//!
//! A view rendering entry `n` of the active stack asks for its outlet to
//! find entry `n + 1`, the child it should render. Entries are located by
//! identity, so a view holding an entry from a stack that has since been
//! replaced is detected instead of silently rendering stale data.

use crate::error::RouterError;
use crate::registry::RouteRegistry;
use crate::stack::{RouteInfo, RouteStack};
use std::rc::Rc;

/// Returns the entry following `entry` in `stack`, or `None` for the leaf.
///
/// # Errors
///
/// Returns [`RouterError::StaleOutletEntry`] if `entry` is not part of `stack`.
pub fn resolve_outlet(
	stack: &RouteStack,
	entry: &Rc<RouteInfo>,
	registry: &RouteRegistry,
) -> Result<Option<Rc<RouteInfo>>, RouterError> {
	let position = stack.position(entry).ok_or_else(|| {
		let path = registry
			.get(entry.route())
			.map(|route| route.full_path().to_string())
			.unwrap_or_else(|| entry.route().to_string());
		RouterError::StaleOutletEntry(path)
	})?;
	Ok(stack.entries().get(position + 1).cloned())
}

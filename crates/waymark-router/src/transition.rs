//! Transition data resolution.
//!
//! A transition turns a freshly built list of [`RouteInfo`] entries into a
//! loaded stack. Entries whose route and parameters are unchanged from the
//! previous stack reuse its data; every other entry with a loader awaits it,
//! strictly root to leaf, so a child's fetch never starts before its
//! ancestor's completes.
//!
//! Cancellation is cooperative. The router cancels a transition's
//! [`CancellationToken`] as soon as a newer one starts; [`resolve_data`]
//! checks the token before every load and once more before returning, and
//! reports [`LoadOutcome::Cancelled`] instead of a result.

use crate::error::LoadError;
use crate::registry::RouteRegistry;
use crate::stack::{RouteInfo, RouteStack};
use std::cell::Cell;
use std::rc::Rc;

/// Cooperative cancellation flag shared between the router and one transition.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
	cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
	/// Creates a live token.
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks the token cancelled. All clones observe it.
	pub fn cancel(&self) {
		self.cancelled.set(true);
	}

	/// Whether the token was cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.get()
	}
}

/// Lifecycle of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
	/// No transition has run yet.
	#[default]
	Idle,
	/// Data is loading.
	Pending,
	/// The new stack is current.
	Committed,
	/// Superseded by a newer transition or vetoed by a hook.
	Aborted,
	/// A loader failed or no route matched.
	Failed,
}

impl TransitionState {
	/// Whether the transition has finished.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Committed | Self::Aborted | Self::Failed)
	}
}

/// Result of [`resolve_data`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
	/// Every entry resolved.
	Loaded(Vec<RouteInfo>),
	/// The token was cancelled before the chain finished.
	Cancelled,
	/// A loader failed.
	Failed(LoadError),
}

/// Fills in the data of `target`, root to leaf.
pub async fn resolve_data(
	registry: &RouteRegistry,
	mut target: Vec<RouteInfo>,
	previous: Option<&RouteStack>,
	token: &CancellationToken,
) -> LoadOutcome {
	for entry in target.iter_mut() {
		if token.is_cancelled() {
			return LoadOutcome::Cancelled;
		}

		let reused = previous
			.and_then(|stack| stack.find_route(entry.route()))
			.filter(|prev| prev.params() == entry.params());
		if let Some(prev) = reused {
			tracing::debug!(route = %registry[entry.route()].full_path(), "reusing loaded data");
			entry.set_data(prev.data().cloned());
			continue;
		}

		let Some(loader) = registry[entry.route()].component().loader() else {
			continue;
		};
		match loader.load(entry.params()).await {
			Ok(data) => entry.set_data(Some(data)),
			Err(error) => {
				if token.is_cancelled() {
					return LoadOutcome::Cancelled;
				}
				return LoadOutcome::Failed(error);
			}
		}
	}

	if token.is_cancelled() {
		return LoadOutcome::Cancelled;
	}
	LoadOutcome::Loaded(target)
}

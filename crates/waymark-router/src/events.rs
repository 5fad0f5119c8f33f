//! Router events.
//!
//! [`RouterEvents`] groups the typed signals the router sends during a
//! transition. Analytics, spinners and error screens connect to them
//! instead of polling router state.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waymark_router::RouterEvents;
//!
//! let events = RouterEvents::new();
//! let views = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&views);
//! events
//!     .page_view()
//!     .connect(move |view| sink.borrow_mut().push(view.url.clone()));
//! assert_eq!(events.page_view().receiver_count(), 1);
//! ```

use crate::error::ClassifiedError;
use crate::registry::RouteId;
use waymark_core::signals::Signal;

/// Sent when a transition enters the pending state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionStarted {
	/// Transition sequence number.
	pub id: u64,
	/// Target URL.
	pub url: String,
	/// Matched leaf route, if any.
	pub route: Option<RouteId>,
}

/// Sent after a transition commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
	/// Committed URL.
	pub url: String,
	/// Active leaf route.
	pub route: RouteId,
	/// Full path pattern of the leaf route.
	pub full_path: String,
}

/// Why a transition was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
	/// A newer transition started.
	Superseded,
	/// A before-transition hook returned `false`.
	Vetoed,
}

/// Sent when a transition is abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionAborted {
	/// Transition sequence number; `None` for navigations vetoed before starting.
	pub id: Option<u64>,
	/// Target URL.
	pub url: String,
	/// Why.
	pub reason: AbortReason,
}

/// Typed signals sent by the router.
#[derive(Debug, Clone)]
pub struct RouterEvents {
	transition_started: Signal<TransitionStarted>,
	page_view: Signal<PageView>,
	error: Signal<ClassifiedError>,
	loading: Signal<bool>,
	aborted: Signal<TransitionAborted>,
}

impl RouterEvents {
	/// Creates a set of unconnected signals.
	pub fn new() -> Self {
		Self {
			transition_started: Signal::new("transition_started"),
			page_view: Signal::new("page_view"),
			error: Signal::new("error"),
			loading: Signal::new("loading"),
			aborted: Signal::new("transition_aborted"),
		}
	}

	/// Transition entered the pending state.
	pub fn transition_started(&self) -> &Signal<TransitionStarted> {
		&self.transition_started
	}

	/// Transition committed.
	pub fn page_view(&self) -> &Signal<PageView> {
		&self.page_view
	}

	/// Transition failed with a visible error.
	pub fn error(&self) -> &Signal<ClassifiedError> {
		&self.error
	}

	/// Loading indicator shown (`true`) or hidden (`false`).
	pub fn loading(&self) -> &Signal<bool> {
		&self.loading
	}

	/// Transition superseded or vetoed.
	pub fn aborted(&self) -> &Signal<TransitionAborted> {
		&self.aborted
	}
}

impl Default for RouterEvents {
	fn default() -> Self {
		Self::new()
	}
}

//! Session state consumed by the router.

use std::cell::Cell;
use waymark_core::signals::Signal;

/// Authentication state used to gate transitions.
pub trait Session {
	/// Whether the user is signed in.
	fn is_authenticated(&self) -> bool;
}

/// A session that is always signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAuthenticated;

impl Session for AlwaysAuthenticated {
	fn is_authenticated(&self) -> bool {
		true
	}
}

/// Mutable session flag with a change signal.
///
/// Hosts call [`SessionHandle::set_authenticated`] when the user signs in or
/// out and then let the router react through `Router::handle_session_change`.
#[derive(Debug)]
pub struct SessionHandle {
	authenticated: Cell<bool>,
	changed: Signal<bool>,
}

impl SessionHandle {
	/// Creates a handle with the given initial state.
	pub fn new(authenticated: bool) -> Self {
		Self {
			authenticated: Cell::new(authenticated),
			changed: Signal::new("session_changed"),
		}
	}

	/// Updates the state. The signal is sent only when the value changes.
	pub fn set_authenticated(&self, authenticated: bool) {
		if self.authenticated.replace(authenticated) != authenticated {
			self.changed.send(&authenticated);
		}
	}

	/// Signal sent with the new state after each change.
	pub fn changed(&self) -> &Signal<bool> {
		&self.changed
	}
}

impl Session for SessionHandle {
	fn is_authenticated(&self) -> bool {
		self.authenticated.get()
	}
}

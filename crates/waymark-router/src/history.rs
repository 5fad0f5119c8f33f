//! History bridge and before-transition hooks.
//!
//! The router reads and writes the visible URL through a [`HistoryBridge`].
//! In a browser this wraps the History API; [`MemoryHistory`] keeps the
//! entries in memory for tests and non-browser hosts.
//!
//! Before any navigation is applied, the router awaits every registered
//! [`BeforeTransitionHooks`] listener. A single `false` vetoes it.

use futures::future::{FutureExt, LocalBoxFuture, join_all};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use waymark_core::signals::Signal;

/// How the URL changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
	/// New history entry.
	Push,
	/// Current entry replaced.
	Replace,
	/// Back/forward movement not initiated by the router.
	Pop,
}

/// Notification sent on every URL change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryChange {
	/// The new URL.
	pub url: String,
	/// How it changed.
	pub kind: NavigationType,
}

/// Access to the visible URL.
pub trait HistoryBridge {
	/// Current URL, including query string and fragment.
	fn location(&self) -> String;

	/// Adds a history entry.
	fn push(&self, url: &str);

	/// Replaces the current history entry.
	fn replace(&self, url: &str);

	/// Signal sent after every URL change.
	fn changes(&self) -> &Signal<HistoryChange>;
}

/// In-memory history stack.
#[derive(Debug)]
pub struct MemoryHistory {
	entries: RefCell<Vec<String>>,
	index: Cell<usize>,
	changes: Signal<HistoryChange>,
}

impl MemoryHistory {
	/// Creates a history with a single entry.
	pub fn new(initial: impl Into<String>) -> Self {
		Self {
			entries: RefCell::new(vec![initial.into()]),
			index: Cell::new(0),
			changes: Signal::new("history_change"),
		}
	}

	/// Moves one entry back. Returns `false` at the first entry.
	pub fn back(&self) -> bool {
		let index = self.index.get();
		if index == 0 {
			return false;
		}
		self.index.set(index - 1);
		self.notify(NavigationType::Pop);
		true
	}

	/// Moves one entry forward. Returns `false` at the last entry.
	pub fn forward(&self) -> bool {
		let index = self.index.get();
		if index + 1 >= self.entries.borrow().len() {
			return false;
		}
		self.index.set(index + 1);
		self.notify(NavigationType::Pop);
		true
	}

	/// All entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.entries.borrow().clone()
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.index.get()
	}

	fn notify(&self, kind: NavigationType) {
		let change = HistoryChange {
			url: self.location(),
			kind,
		};
		self.changes.send(&change);
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl HistoryBridge for MemoryHistory {
	fn location(&self) -> String {
		self.entries.borrow()[self.index.get()].clone()
	}

	fn push(&self, url: &str) {
		{
			let mut entries = self.entries.borrow_mut();
			let index = self.index.get();
			entries.truncate(index + 1);
			entries.push(url.to_string());
			self.index.set(index + 1);
		}
		self.notify(NavigationType::Push);
	}

	fn replace(&self, url: &str) {
		self.entries.borrow_mut()[self.index.get()] = url.to_string();
		self.notify(NavigationType::Replace);
	}

	fn changes(&self) -> &Signal<HistoryChange> {
		&self.changes
	}
}

/// A pending navigation, passed to hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
	/// URL being left.
	pub from: String,
	/// URL being entered.
	pub to: String,
}

/// Identifier of a registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

type HookFn = Rc<dyn Fn(TransitionRequest) -> LocalBoxFuture<'static, bool>>;

/// Async listeners consulted before a navigation is applied.
#[derive(Default)]
pub struct BeforeTransitionHooks {
	hooks: RefCell<Vec<(HookId, HookFn)>>,
	next_id: Cell<u64>,
}

impl BeforeTransitionHooks {
	/// Creates an empty hook list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a hook. Resolve to `false` to veto the navigation.
	pub fn add<F, Fut>(&self, hook: F) -> HookId
	where
		F: Fn(TransitionRequest) -> Fut + 'static,
		Fut: Future<Output = bool> + 'static,
	{
		let id = HookId(self.next_id.get());
		self.next_id.set(id.0 + 1);
		let hook: HookFn = Rc::new(move |request| hook(request).boxed_local());
		self.hooks.borrow_mut().push((id, hook));
		id
	}

	/// Removes a hook. Returns `false` if it was not registered.
	pub fn remove(&self, id: HookId) -> bool {
		let mut hooks = self.hooks.borrow_mut();
		let before = hooks.len();
		hooks.retain(|(hook_id, _)| *hook_id != id);
		hooks.len() < before
	}

	/// Number of registered hooks.
	pub fn len(&self) -> usize {
		self.hooks.borrow().len()
	}

	/// Whether no hook is registered.
	pub fn is_empty(&self) -> bool {
		self.hooks.borrow().is_empty()
	}

	/// Awaits every hook; `true` only if all of them allow the navigation.
	pub async fn allow(&self, request: &TransitionRequest) -> bool {
		let hooks: Vec<HookFn> = self
			.hooks
			.borrow()
			.iter()
			.map(|(_, hook)| Rc::clone(hook))
			.collect();
		let pending: Vec<_> = hooks.iter().map(|hook| hook(request.clone())).collect();
		if pending.is_empty() {
			return true;
		}
		join_all(pending).await.into_iter().all(|allowed| allowed)
	}
}

impl std::fmt::Debug for BeforeTransitionHooks {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BeforeTransitionHooks")
			.field("hooks", &self.len())
			.finish()
	}
}

//! Typed signal dispatch
//!
//! A [`Signal<T>`] broadcasts values of one payload type to every connected
//! receiver, in priority order. Receivers can be registered under a
//! `dispatch_uid` so that re-registration replaces instead of duplicating, and
//! can be guarded by a predicate.
//!
//! Dispatch is synchronous: the engine sends events at well-defined points of
//! a transition and receivers run before [`Signal::send`] returns.
//!
//! # Examples
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waymark_core::signals::Signal;
//!
//! let page_views = Signal::<String>::new("page_view");
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! page_views.connect(move |path| sink.borrow_mut().push(path.clone()));
//!
//! page_views.send(&"/customers/42".to_string());
//! assert_eq!(*seen.borrow(), vec!["/customers/42".to_string()]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type ReceiverFn<T> = Rc<dyn Fn(&T)>;
type PredicateFn<T> = Rc<dyn Fn(&T) -> bool>;

/// Identifier of a connected receiver, returned by the `connect*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

/// Information about a connected receiver
struct ReceiverInfo<T: 'static> {
	id: ReceiverId,
	receiver: ReceiverFn<T>,
	dispatch_uid: Option<String>,
	priority: i32, // Higher values execute first
	predicate: Option<PredicateFn<T>>,
}

impl<T: 'static> Clone for ReceiverInfo<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			receiver: Rc::clone(&self.receiver),
			dispatch_uid: self.dispatch_uid.clone(),
			priority: self.priority,
			predicate: self.predicate.clone(),
		}
	}
}

/// A signal that dispatches values to connected receivers
pub struct Signal<T: 'static> {
	receivers: Rc<RefCell<Vec<ReceiverInfo<T>>>>,
	next_id: Rc<Cell<u64>>,
	name: Rc<str>,
}

impl<T: 'static> Signal<T> {
	/// Create a new signal with a descriptive name
	pub fn new(name: impl Into<Rc<str>>) -> Self {
		Self {
			receivers: Rc::new(RefCell::new(Vec::new())),
			next_id: Rc::new(Cell::new(1)),
			name: name.into(),
		}
	}

	/// Name of this signal
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Connect a receiver with all available options
	///
	/// # Arguments
	/// * `receiver` - The receiver function to connect
	/// * `dispatch_uid` - Optional unique identifier; an existing receiver with the
	///   same uid is replaced
	/// * `priority` - Execution priority (higher values execute first, default: 0)
	/// * `predicate` - Optional condition that must be true for the receiver to run
	pub fn connect_with_options<F, P>(
		&self,
		receiver: F,
		dispatch_uid: Option<String>,
		priority: i32,
		predicate: Option<P>,
	) -> ReceiverId
	where
		F: Fn(&T) + 'static,
		P: Fn(&T) -> bool + 'static,
	{
		let id = ReceiverId(self.next_id.get());
		self.next_id.set(id.0 + 1);

		let mut receivers = self.receivers.borrow_mut();
		if let Some(ref uid) = dispatch_uid {
			receivers.retain(|r| r.dispatch_uid.as_ref() != Some(uid));
		}

		receivers.push(ReceiverInfo {
			id,
			receiver: Rc::new(receiver),
			dispatch_uid,
			priority,
			predicate: predicate.map(|p| Rc::new(p) as PredicateFn<T>),
		});

		// Stable sort keeps connection order among equal priorities
		receivers.sort_by(|a, b| b.priority.cmp(&a.priority));
		id
	}

	/// Connect a receiver function to this signal
	pub fn connect<F>(&self, receiver: F) -> ReceiverId
	where
		F: Fn(&T) + 'static,
	{
		self.connect_with_options::<F, fn(&T) -> bool>(receiver, None, 0, None)
	}

	/// Connect a receiver with priority
	pub fn connect_with_priority<F>(&self, receiver: F, priority: i32) -> ReceiverId
	where
		F: Fn(&T) + 'static,
	{
		self.connect_with_options::<F, fn(&T) -> bool>(receiver, None, priority, None)
	}

	/// Connect a receiver that only runs when `predicate` holds for the value
	pub fn connect_if<F, P>(&self, receiver: F, predicate: P) -> ReceiverId
	where
		F: Fn(&T) + 'static,
		P: Fn(&T) -> bool + 'static,
	{
		self.connect_with_options(receiver, None, 0, Some(predicate))
	}

	/// Disconnect a receiver by id
	pub fn disconnect(&self, id: ReceiverId) -> bool {
		let mut receivers = self.receivers.borrow_mut();
		let original_len = receivers.len();
		receivers.retain(|r| r.id != id);
		receivers.len() < original_len
	}

	/// Disconnect a receiver by dispatch_uid
	pub fn disconnect_uid(&self, dispatch_uid: &str) -> bool {
		let mut receivers = self.receivers.borrow_mut();
		let original_len = receivers.len();
		receivers.retain(|r| r.dispatch_uid.as_deref() != Some(dispatch_uid));
		receivers.len() < original_len
	}

	/// Send a value to all connected receivers.
	///
	/// Returns the number of receivers that ran.
	pub fn send(&self, instance: &T) -> usize {
		// Snapshot so receivers may connect or disconnect while running
		let receivers = self.receivers.borrow().clone();
		let mut delivered = 0;

		for receiver_info in receivers {
			if let Some(ref predicate) = receiver_info.predicate
				&& !predicate(instance)
			{
				continue;
			}
			(receiver_info.receiver)(instance);
			delivered += 1;
		}

		tracing::trace!(signal = %self.name, delivered, "signal sent");
		delivered
	}

	/// Get number of connected receivers
	pub fn receiver_count(&self) -> usize {
		self.receivers.borrow().len()
	}

	/// Clear all receivers
	pub fn disconnect_all(&self) {
		self.receivers.borrow_mut().clear();
	}
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			receivers: Rc::clone(&self.receivers),
			next_id: Rc::clone(&self.next_id),
			name: Rc::clone(&self.name),
		}
	}
}

impl<T: 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("name", &self.name)
			.field("receiver_count", &self.receiver_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn recorder() -> (Rc<RefCell<Vec<String>>>, Signal<String>) {
		(Rc::new(RefCell::new(Vec::new())), Signal::new("test"))
	}

	#[rstest]
	fn test_send_reaches_all_receivers() {
		let (log, signal) = recorder();
		for tag in ["a", "b"] {
			let log = Rc::clone(&log);
			signal.connect(move |value: &String| log.borrow_mut().push(format!("{tag}:{value}")));
		}

		assert_eq!(signal.send(&"x".to_string()), 2);
		assert_eq!(*log.borrow(), vec!["a:x", "b:x"]);
	}

	#[rstest]
	fn test_priority_order() {
		let (log, signal) = recorder();
		let low = Rc::clone(&log);
		signal.connect_with_priority(move |_| low.borrow_mut().push("low".into()), -5);
		let high = Rc::clone(&log);
		signal.connect_with_priority(move |_| high.borrow_mut().push("high".into()), 10);

		signal.send(&String::new());
		assert_eq!(*log.borrow(), vec!["high", "low"]);
	}

	#[rstest]
	fn test_dispatch_uid_replaces_receiver() {
		let (log, signal) = recorder();
		for tag in ["first", "second"] {
			let log = Rc::clone(&log);
			signal.connect_with_options::<_, fn(&String) -> bool>(
				move |_| log.borrow_mut().push(tag.into()),
				Some("analytics".into()),
				0,
				None,
			);
		}

		assert_eq!(signal.receiver_count(), 1);
		signal.send(&String::new());
		assert_eq!(*log.borrow(), vec!["second"]);
		assert!(signal.disconnect_uid("analytics"));
		assert_eq!(signal.receiver_count(), 0);
	}

	#[rstest]
	fn test_connect_if_filters() {
		let (log, signal) = recorder();
		let sink = Rc::clone(&log);
		signal.connect_if(
			move |value: &String| sink.borrow_mut().push(value.clone()),
			|value: &String| value.starts_with('/'),
		);

		assert_eq!(signal.send(&"skip".to_string()), 0);
		assert_eq!(signal.send(&"/keep".to_string()), 1);
		assert_eq!(*log.borrow(), vec!["/keep"]);
	}

	#[rstest]
	fn test_disconnect_by_id() {
		let (log, signal) = recorder();
		let sink = Rc::clone(&log);
		let id = signal.connect(move |value: &String| sink.borrow_mut().push(value.clone()));

		assert!(signal.disconnect(id));
		assert!(!signal.disconnect(id));
		assert_eq!(signal.send(&"x".to_string()), 0);
		assert!(log.borrow().is_empty());
	}

	#[rstest]
	fn test_receiver_may_connect_during_send() {
		let signal: Signal<String> = Signal::new("reentrant");
		let inner = signal.clone();
		signal.connect(move |_| {
			inner.connect(|_| {});
		});

		signal.send(&String::new());
		assert_eq!(signal.receiver_count(), 2);
	}
}

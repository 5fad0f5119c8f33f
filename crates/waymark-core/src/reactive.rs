//! Signal - Observable state cell
//!
//! `Signal<T>` holds a value shared between the component that owns the state
//! and the views that render it. Writers call [`Signal::set`] or
//! [`Signal::update`]; readers either pull the value with [`Signal::get`] or
//! register an observer with [`Signal::subscribe`] and re-read when notified.
//!
//! ## Example
//!
//! ```
//! use waymark_core::reactive::Signal;
//!
//! let count = Signal::new(0);
//! assert_eq!(count.get(), 0);
//!
//! count.set(42);
//! assert_eq!(count.get(), 42);
//!
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

type ObserverFn = Rc<dyn Fn()>;

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`Signal::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
	fn next() -> Self {
		Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// A shared, observable value.
///
/// ## Cloning
///
/// `Signal<T>` implements `Clone` and shares the value via `Rc<RefCell<T>>`.
/// All clones of the same Signal share the same value and the same observers.
pub struct Signal<T: 'static> {
	value: Rc<RefCell<T>>,
	observers: Rc<RefCell<Vec<(ObserverId, ObserverFn)>>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			observers: Rc::clone(&self.observers),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			value: Rc::new(RefCell::new(value)),
			observers: Rc::new(RefCell::new(Vec::new())),
		}
	}

	/// Get a clone of the current value
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Read the current value without cloning it
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Set the signal to a new value and notify observers
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		self.notify();
	}

	/// Update the value in place, notifying observers once
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut self.value.borrow_mut());
		self.notify();
	}

	/// Register an observer called after every change.
	///
	/// Observers receive no arguments; they read the new value through the
	/// signal, which is no longer borrowed when they run.
	pub fn subscribe<F>(&self, observer: F) -> ObserverId
	where
		F: Fn() + 'static,
	{
		let id = ObserverId::next();
		self.observers.borrow_mut().push((id, Rc::new(observer)));
		id
	}

	/// Remove an observer. Returns `false` if it was not registered.
	pub fn unsubscribe(&self, id: ObserverId) -> bool {
		let mut observers = self.observers.borrow_mut();
		let before = observers.len();
		observers.retain(|(observer_id, _)| *observer_id != id);
		observers.len() < before
	}

	/// Number of registered observers
	pub fn observer_count(&self) -> usize {
		self.observers.borrow().len()
	}

	fn notify(&self) {
		// Snapshot so observers may subscribe or unsubscribe while running
		let observers: Vec<ObserverFn> = self
			.observers
			.borrow()
			.iter()
			.map(|(_, observer)| Rc::clone(observer))
			.collect();
		for observer in observers {
			observer();
		}
	}
}

impl<T: Default + 'static> Default for Signal<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("value", &*self.value.borrow())
			.field("observers", &self.observer_count())
			.finish()
	}
}

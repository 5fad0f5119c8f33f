//! Waymark Core - state primitives shared by the navigation engine
//!
//! This crate provides the two small building blocks the router is composed from:
//!
//! - [`reactive`]: [`reactive::Signal<T>`], a shared, observable value cell used to
//!   expose router state (active stack, error, loading flag) to a rendering layer.
//! - [`signals`]: [`signals::Signal<T>`], a typed publish/subscribe dispatcher used
//!   for router events (page views, transition start, errors).
//!
//! Both are single-threaded (`Rc`/`RefCell`): the navigation engine runs on one
//! logical task queue and never shares its state across threads.

#![warn(missing_docs)]

pub mod reactive;
pub mod signals;

pub use reactive::ObserverId;
pub use signals::ReceiverId;

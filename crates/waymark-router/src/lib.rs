//! # Waymark Router
//!
//! Route-tree resolution and transitions for client-side navigation.
//!
//! A URL change flows through the router like this:
//!
//! 1. The [`PathMatcher`] resolves the path to a leaf route and raw parameters.
//! 2. A root-to-leaf stack of [`RouteInfo`] entries is built, each with its
//!    own typed [`Params`].
//! 3. Each entry's data loader runs, strictly root to leaf. Entries whose
//!    route and parameters are unchanged reuse the previous data.
//! 4. On success the stack is committed and views render it, each one
//!    asking [`Router::outlet`] for the child entry it should render.
//!
//! Only one transition is authoritative at a time. Starting a new one
//! cancels the previous one, whose results are then discarded.
//!
//! ## Features
//!
//! - Nested routes with ancestor-merged parameter types
//! - Sequential data loading with cooperative cancellation
//! - Error classification (not found, network, session timeout)
//! - Per-route query parameter memory
//! - Before-transition hooks and a login gate
//! - Typed event signals for analytics and loading indicators
//!
//! All state is single-threaded (`Rc`/`RefCell`); loaders return
//! non-`Send` futures.

#![warn(missing_docs)]

pub mod component;
pub mod error;
pub mod events;
pub mod history;
pub mod matcher;
pub mod outlet;
pub mod params;
pub mod pattern;
pub mod query;
pub mod registry;
pub mod router;
pub mod session;
pub mod settings;
pub mod stack;
pub mod transition;

pub use component::{Component, DataLoader, LoadFuture, loader_fn};
pub use error::{ClassifiedError, ErrorKind, LoadError, RouterError};
pub use events::{AbortReason, PageView, RouterEvents, TransitionAborted, TransitionStarted};
pub use history::{
	BeforeTransitionHooks, HistoryBridge, HistoryChange, HookId, MemoryHistory, NavigationType,
	TransitionRequest,
};
pub use matcher::{PathMatch, PathMatcher, PatternMatcher};
pub use outlet::resolve_outlet;
pub use params::{ParamType, ParamValue, Params, RawParams, map_params};
pub use pattern::RoutePattern;
pub use query::{QueryMemory, QueryParams, UrlParts, merge_remembered};
pub use registry::{RegistryBuilder, RouteDef, RouteId, RouteRegistry, RouteSpec};
pub use router::{Router, RouterBuilder};
pub use session::{AlwaysAuthenticated, Session, SessionHandle};
pub use settings::{RouterSettings, SettingsError};
pub use stack::{RouteInfo, RouteStack, build_route_stack};
pub use transition::{CancellationToken, LoadOutcome, TransitionState, resolve_data};

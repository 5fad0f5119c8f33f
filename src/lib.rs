//! # Waymark
//!
//! Client-side navigation for single-threaded UI runtimes.
//!
//! Waymark maps URL paths to a tree of view components, loads each level's
//! data before rendering, and keeps the history and in-memory view state
//! consistent. Parent views render their active child through an outlet,
//! without knowing the shape of the route tree.
//!
//! ## Feature Flags
//!
//! - `core` - Reactive state cells and typed signals
//! - `router` - Route registry, transition engine, outlets and query memory
//! - `full` (default) - Everything
//!
//! ## Quick Start
//!
//! ```rust
//! use waymark::router::{Component, Router, RouteSpec};
//!
//! # block_on(async {
//! let router = Router::builder()
//!     .route(RouteSpec::new("/", Component::new("Home")))
//!     .route(
//!         RouteSpec::new("/customers/:customerId", Component::new("Customer"))
//!             .param_type("customerId", "number"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! router.navigate("/customers/42").await;
//! let root = router.root_entry().unwrap();
//! assert_eq!(root.param("customerId").unwrap().as_number(), Some(42.0));
//! # });
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "router")]
pub mod router;

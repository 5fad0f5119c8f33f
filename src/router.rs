//! Route-tree resolution and transitions
//!
//! This module provides access to waymark-router.
//!
//! ## Architecture
//!
//! - **Registry**: a frozen route tree with ancestor-merged parameter types
//! - **Transitions**: root-to-leaf data loading with cooperative cancellation
//! - **Outlets**: parent views locate their active child entry
//! - **Query memory**: per-route query parameters restored on re-entry

// Re-export all waymark-router functionality
pub use waymark_router::*;

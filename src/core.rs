//! Reactive state and typed signals
//!
//! This module provides access to waymark-core:
//!
//! - [`reactive::Signal`]: a shared, observable value the rendering layer
//!   subscribes to
//! - [`signals::Signal`]: typed publish/subscribe with priorities,
//!   `dispatch_uid` deduplication and predicates

// Re-export all waymark-core functionality
pub use waymark_core::*;

//! View components and their optional data loaders.
//!
//! A route's [`Component`] is an opaque handle to a view. The engine only
//! cares whether it exposes a [`DataLoader`]: when it does, the loader runs
//! with the entry's typed parameters before the transition commits.

use crate::error::LoadError;
use crate::params::Params;
use futures::future::{FutureExt, LocalBoxFuture};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Future returned by a data loader.
pub type LoadFuture = LocalBoxFuture<'static, Result<serde_json::Value, LoadError>>;

/// Asynchronous data source for a route level.
///
/// Loaders run on the router's single logical task queue, so the returned
/// future need not be `Send`.
pub trait DataLoader {
	/// Starts loading data for the given parameters.
	fn load(&self, params: &Params) -> LoadFuture;
}

/// Loader wrapping a `Fn(Params) -> impl Future` closure.
pub(crate) struct FnLoader<F> {
	loader: F,
}

impl<F, Fut> DataLoader for FnLoader<F>
where
	F: Fn(Params) -> Fut,
	Fut: Future<Output = Result<serde_json::Value, LoadError>> + 'static,
{
	fn load(&self, params: &Params) -> LoadFuture {
		(self.loader)(params.clone()).boxed_local()
	}
}

/// Helper function to wrap a closure as a shared loader.
pub fn loader_fn<F, Fut>(loader: F) -> Rc<dyn DataLoader>
where
	F: Fn(Params) -> Fut + 'static,
	Fut: Future<Output = Result<serde_json::Value, LoadError>> + 'static,
{
	Rc::new(FnLoader { loader })
}

/// Handle to a view, optionally exposing a data loader.
#[derive(Clone)]
pub struct Component {
	name: String,
	loader: Option<Rc<dyn DataLoader>>,
}

impl Component {
	/// Creates a component without a data phase.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			loader: None,
		}
	}

	/// Attaches a closure loader.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_router::Component;
	///
	/// let customer = Component::new("Customer").with_loader(|params| async move {
	///     Ok::<_, waymark_router::LoadError>(serde_json::json!({
	///         "id": params["customerId"].as_number(),
	///     }))
	/// });
	/// assert!(customer.has_loader());
	/// ```
	pub fn with_loader<F, Fut>(self, loader: F) -> Self
	where
		F: Fn(Params) -> Fut + 'static,
		Fut: Future<Output = Result<serde_json::Value, LoadError>> + 'static,
	{
		self.with_data_loader(loader_fn(loader))
	}

	/// Attaches an existing loader.
	pub fn with_data_loader(mut self, loader: Rc<dyn DataLoader>) -> Self {
		self.loader = Some(loader);
		self
	}

	/// Component name, used in logs.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The loader, if any.
	pub fn loader(&self) -> Option<&Rc<dyn DataLoader>> {
		self.loader.as_ref()
	}

	/// Whether this component has a data phase.
	pub fn has_loader(&self) -> bool {
		self.loader.is_some()
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.field("has_loader", &self.has_loader())
			.finish()
	}
}

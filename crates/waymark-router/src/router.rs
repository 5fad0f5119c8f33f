//! The router.
//!
//! [`Router`] ties the pieces together: it owns the frozen registry, the
//! matcher, the history bridge and session, query memory, event signals and
//! the reactive state the rendering layer observes. Exactly one transition
//! is authoritative at a time; starting a new one cancels the previous
//! transition's token before any await.
//!
//! ```
//! use waymark_router::{Component, Router, RouteSpec, TransitionState};
//!
//! # futures::executor::block_on(async {
//! let router = Router::builder()
//!     .route(RouteSpec::new("/", Component::new("Home")))
//!     .route(
//!         RouteSpec::new("/customers/:customerId", Component::new("Customer"))
//!             .param_type("customerId", "number")
//!             .route(RouteSpec::new("/order", Component::new("Order"))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(router.navigate("/customers/42/order").await, TransitionState::Committed);
//! assert_eq!(router.current_stack().unwrap().len(), 2);
//! # });
//! ```

use crate::error::{ClassifiedError, RouterError};
use crate::events::{AbortReason, PageView, RouterEvents, TransitionAborted, TransitionStarted};
use crate::history::{
	BeforeTransitionHooks, HistoryBridge, HistoryChange, MemoryHistory, NavigationType,
	TransitionRequest,
};
use crate::matcher::{PathMatch, PathMatcher, PatternMatcher, path_only};
use crate::outlet::resolve_outlet;
use crate::query::{QueryMemory, QueryParams, UrlParts, merge_remembered};
use crate::registry::{RegistryBuilder, RouteId, RouteRegistry, RouteSpec};
use crate::session::{AlwaysAuthenticated, Session, SessionHandle};
use crate::settings::RouterSettings;
use crate::stack::{RouteInfo, RouteStack, build_route_stack};
use crate::transition::{CancellationToken, LoadOutcome, TransitionState, resolve_data};
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use waymark_core::ReceiverId;
use waymark_core::reactive::Signal;

/// Builder for [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
	settings: RouterSettings,
	routes: Vec<RouteSpec>,
	matcher: Option<Box<dyn PathMatcher>>,
	history: Option<Rc<dyn HistoryBridge>>,
	session: Option<Rc<dyn Session>>,
}

impl RouterBuilder {
	/// Creates a builder with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the settings.
	pub fn settings(mut self, settings: RouterSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Adds a top-level route.
	pub fn route(mut self, spec: RouteSpec) -> Self {
		self.routes.push(spec);
		self
	}

	/// Adds several top-level routes.
	pub fn routes(mut self, specs: impl IntoIterator<Item = RouteSpec>) -> Self {
		self.routes.extend(specs);
		self
	}

	/// Uses a custom path matcher instead of [`PatternMatcher`].
	pub fn matcher(mut self, matcher: impl PathMatcher + 'static) -> Self {
		self.matcher = Some(Box::new(matcher));
		self
	}

	/// Uses the given history. Defaults to a [`MemoryHistory`] at `home_path`.
	pub fn history<H: HistoryBridge + 'static>(mut self, history: Rc<H>) -> Self {
		self.history = Some(history as Rc<dyn HistoryBridge>);
		self
	}

	/// Uses the given session. Defaults to [`AlwaysAuthenticated`].
	pub fn session<S: Session + 'static>(mut self, session: Rc<S>) -> Self {
		self.session = Some(session as Rc<dyn Session>);
		self
	}

	/// Registers the routes and builds the router.
	///
	/// # Errors
	///
	/// Returns an error if the settings fail validation, if a route fails to
	/// register, if `not_found_path` names an unregistered route, or if
	/// `require_auth` is set without a route at `login_path`.
	pub fn build(self) -> Result<Router, RouterError> {
		let settings = self.settings;
		settings
			.validate()
			.map_err(|error| RouterError::InvalidSettings(error.to_string()))?;
		let mut matcher: Box<dyn PathMatcher> = match self.matcher {
			Some(matcher) => matcher,
			None => Box::new(PatternMatcher::new()),
		};

		let mut builder = RegistryBuilder::new();
		builder.register(&self.routes, matcher.as_mut())?;
		let registry = builder.finish();

		if let Some(path) = &settings.not_found_path {
			let route = registry
				.find_by_path(path)
				.ok_or_else(|| RouterError::NotFound(path.clone()))?;
			matcher.set_default(route);
		}

		let login_route = registry.find_by_path(&settings.login_path);
		if settings.require_auth && login_route.is_none() {
			return Err(RouterError::NotFound(settings.login_path.clone()));
		}

		let history: Rc<dyn HistoryBridge> = match self.history {
			Some(history) => history,
			None => Rc::new(MemoryHistory::new(settings.home_path.clone())),
		};
		let session: Rc<dyn Session> = match self.session {
			Some(session) => session,
			None => Rc::new(AlwaysAuthenticated),
		};

		tracing::info!(routes = registry.len(), "router built");

		Ok(Router {
			registry,
			matcher,
			history,
			session,
			settings,
			hooks: BeforeTransitionHooks::new(),
			events: RouterEvents::new(),
			query_memory: RefCell::new(QueryMemory::new()),
			state: RefCell::new(EngineState::default()),
			stack: Signal::new(None),
			active_route: Signal::new(None),
			error: Signal::new(None),
			loading: Signal::new(false),
			transition_state: Signal::new(TransitionState::Idle),
			login_route,
		})
	}
}

struct ActiveTransition {
	id: u64,
	token: CancellationToken,
	url: String,
}

struct EngineState {
	current: Option<ActiveTransition>,
	next_id: u64,
	first_load: bool,
	current_url: Option<String>,
	return_to: Option<String>,
}

impl Default for EngineState {
	fn default() -> Self {
		Self {
			current: None,
			next_id: 1,
			first_load: true,
			current_url: None,
			return_to: None,
		}
	}
}

/// Client-side router.
///
/// The router reacts to URL and session changes only when told to. Hosts
/// either call [`Router::handle_location_change`] and
/// [`Router::handle_session_change`] from their own listeners, or wire the
/// history and session signals once with [`Router::follow_history`] and
/// [`Router::follow_session`].
pub struct Router {
	registry: RouteRegistry,
	matcher: Box<dyn PathMatcher>,
	history: Rc<dyn HistoryBridge>,
	session: Rc<dyn Session>,
	settings: RouterSettings,
	hooks: BeforeTransitionHooks,
	events: RouterEvents,
	query_memory: RefCell<QueryMemory>,
	state: RefCell<EngineState>,
	stack: Signal<Option<Rc<RouteStack>>>,
	active_route: Signal<Option<RouteId>>,
	error: Signal<Option<ClassifiedError>>,
	loading: Signal<bool>,
	transition_state: Signal<TransitionState>,
	login_route: Option<RouteId>,
}

impl Router {
	/// Starts building a router.
	pub fn builder() -> RouterBuilder {
		RouterBuilder::new()
	}

	/// Transitions to the current history location. Call once at startup.
	pub async fn start(&self) -> TransitionState {
		let url = self.history.location();
		self.transition_to(&url).await
	}

	/// Navigates to `url`, adding a history entry.
	///
	/// Remembered query parameters for the destination are merged in first,
	/// then every before-transition hook is awaited. A veto leaves the URL
	/// untouched and returns [`TransitionState::Aborted`].
	pub async fn navigate(&self, url: &str) -> TransitionState {
		self.go(url, NavigationType::Push).await
	}

	/// Navigates to `url`, replacing the current history entry.
	pub async fn replace(&self, url: &str) -> TransitionState {
		self.go(url, NavigationType::Replace).await
	}

	async fn go(&self, url: &str, kind: NavigationType) -> TransitionState {
		let target = self.build_url(url);
		let request = TransitionRequest {
			from: self.history.location(),
			to: target.clone(),
		};
		if !self.hooks.allow(&request).await {
			self.vetoed(&target);
			return TransitionState::Aborted;
		}

		match kind {
			NavigationType::Push => self.history.push(&target),
			NavigationType::Replace | NavigationType::Pop => self.history.replace(&target),
		}
		self.transition_to(&target).await
	}

	/// Reacts to a URL change the router did not initiate, such as back or
	/// forward. A hook veto restores the previous URL.
	pub async fn handle_location_change(&self) -> TransitionState {
		let url = self.history.location();
		let previous = self.state.borrow().current_url.clone();
		if previous.as_deref() == Some(url.as_str()) {
			return self.transition_state.get();
		}

		if let Some(from) = previous {
			let request = TransitionRequest {
				from: from.clone(),
				to: url.clone(),
			};
			if !self.hooks.allow(&request).await {
				self.history.replace(&from);
				self.vetoed(&url);
				return TransitionState::Aborted;
			}
		}
		self.transition_to(&url).await
	}

	/// Follows back/forward changes of the history bridge.
	///
	/// Every [`NavigationType::Pop`] change schedules
	/// [`Router::handle_location_change`] through `spawn`, typically a
	/// runtime's `spawn_local`. Pushes and replaces come from the router
	/// itself and are not followed. The receiver holds a weak reference to
	/// the router; disconnect it from [`HistoryBridge::changes`] with the
	/// returned id.
	pub fn follow_history<F>(self: &Rc<Self>, spawn: F) -> ReceiverId
	where
		F: Fn(LocalBoxFuture<'static, ()>) + 'static,
	{
		let router = Rc::downgrade(self);
		self.history.changes().connect_if(
			move |_| {
				if let Some(router) = router.upgrade() {
					spawn(Box::pin(async move {
						router.handle_location_change().await;
					}));
				}
			},
			|change: &HistoryChange| change.kind == NavigationType::Pop,
		)
	}

	/// Follows sign-in and sign-out on `session`.
	///
	/// Each change schedules [`Router::handle_session_change`] through
	/// `spawn`. `session` should be the handle the router was built with.
	pub fn follow_session<F>(self: &Rc<Self>, session: &SessionHandle, spawn: F) -> ReceiverId
	where
		F: Fn(LocalBoxFuture<'static, ()>) + 'static,
	{
		let router = Rc::downgrade(self);
		session.changed().connect(move |_| {
			if let Some(router) = router.upgrade() {
				spawn(Box::pin(async move {
					router.handle_session_change().await;
				}));
			}
		})
	}

	/// Re-evaluates the session after a sign-in or sign-out.
	///
	/// Signing out away from the login route redirects to login and
	/// remembers the current URL; signing in on the login route returns to
	/// that URL, or to `home_path`.
	pub async fn handle_session_change(&self) -> TransitionState {
		let on_login = self.login_route.is_some() && self.active_route.get() == self.login_route;

		if self.session.is_authenticated() {
			if !on_login {
				return self.transition_state.get();
			}
			let target = self
				.state
				.borrow_mut()
				.return_to
				.take()
				.filter(|url| path_only(url) != self.settings.login_path)
				.unwrap_or_else(|| self.settings.home_path.clone());
			tracing::info!(url = %target, "signed in, leaving login");
			return self.replace(&target).await;
		}

		if self.settings.require_auth && !on_login {
			let url = self.history.location();
			return self.transition_to(&url).await;
		}
		self.transition_state.get()
	}

	fn requires_login(&self, route: RouteId) -> bool {
		self.settings.require_auth
			&& Some(route) != self.login_route
			&& !self.session.is_authenticated()
	}

	async fn transition_to(&self, url: &str) -> TransitionState {
		let Some(mut found) = self.matcher.match_path(url) else {
			let id = self.begin(url, None);
			tracing::debug!(url, "no route matches");
			self.fail(id, ClassifiedError::route_not_found(path_only(url)));
			return TransitionState::Failed;
		};

		let mut url = url.to_string();
		if self.requires_login(found.route)
			&& let Some(login) = self.login_route
		{
			tracing::info!(url = %url, "unauthenticated, redirecting to login");
			self.state.borrow_mut().return_to = Some(url);
			url = self.settings.login_path.clone();
			self.history.replace(&url);
			found = PathMatch {
				route: login,
				params: HashMap::new(),
				fallback: false,
			};
		}

		let id = self.begin(&url, Some(found.route));
		let Some(token) = self.token_for(id) else {
			return TransitionState::Aborted;
		};

		let entries = build_route_stack(&self.registry, found.route, &found.params);
		let previous = self.stack.get();
		match resolve_data(&self.registry, entries, previous.as_deref(), &token).await {
			LoadOutcome::Loaded(entries) => self.commit(id, &url, found.route, entries),
			LoadOutcome::Cancelled => {
				tracing::debug!(id, url = %url, "stale transition discarded");
				TransitionState::Aborted
			}
			LoadOutcome::Failed(error) => {
				if !self.is_current(id) {
					return TransitionState::Aborted;
				}
				self.fail(id, error.into());
				TransitionState::Failed
			}
		}
	}

	fn begin(&self, url: &str, route: Option<RouteId>) -> u64 {
		let previous_was_login =
			self.login_route.is_some() && self.active_route.get() == self.login_route;

		let (id, superseded, show_loading) = {
			let mut state = self.state.borrow_mut();
			let superseded = state.current.take().map(|previous| {
				previous.token.cancel();
				(previous.id, previous.url)
			});
			let id = state.next_id;
			state.next_id += 1;
			state.current = Some(ActiveTransition {
				id,
				token: CancellationToken::new(),
				url: url.to_string(),
			});
			let show_loading = !state.first_load && !previous_was_login;
			state.first_load = false;
			(id, superseded, show_loading)
		};

		if let Some((old_id, old_url)) = superseded {
			tracing::debug!(id = old_id, url = %old_url, "transition superseded");
			self.events.aborted().send(&TransitionAborted {
				id: Some(old_id),
				url: old_url,
				reason: AbortReason::Superseded,
			});
		}

		tracing::debug!(id, url, "transition started");
		self.transition_state.set(TransitionState::Pending);
		if show_loading {
			self.set_loading(true);
		}
		self.events.transition_started().send(&TransitionStarted {
			id,
			url: url.to_string(),
			route,
		});
		id
	}

	fn token_for(&self, id: u64) -> Option<CancellationToken> {
		self.state
			.borrow()
			.current
			.as_ref()
			.filter(|current| current.id == id)
			.map(|current| current.token.clone())
	}

	fn is_current(&self, id: u64) -> bool {
		self.state
			.borrow()
			.current
			.as_ref()
			.is_some_and(|current| current.id == id)
	}

	fn commit(&self, id: u64, url: &str, leaf: RouteId, entries: Vec<RouteInfo>) -> TransitionState {
		{
			let mut state = self.state.borrow_mut();
			if state.current.as_ref().map(|current| current.id) != Some(id) {
				return TransitionState::Aborted;
			}
			state.current = None;
			state.current_url = Some(url.to_string());
		}

		if self.settings.remember_query {
			let query = UrlParts::parse(url).query;
			if !query.is_empty() {
				self.query_memory.borrow_mut().remember(leaf, query);
			}
		}

		let full_path = self.registry[leaf].full_path().to_string();
		self.stack
			.set(Some(Rc::new(RouteStack::from_entries(entries))));
		self.active_route.set(Some(leaf));
		self.error.set(None);
		self.set_loading(false);
		self.transition_state.set(TransitionState::Committed);

		tracing::info!(id, url, route = %full_path, "transition committed");
		self.events.page_view().send(&PageView {
			url: url.to_string(),
			route: leaf,
			full_path,
		});
		TransitionState::Committed
	}

	fn fail(&self, id: u64, error: ClassifiedError) {
		{
			let mut state = self.state.borrow_mut();
			if state.current.as_ref().map(|current| current.id) == Some(id)
				&& let Some(failed) = state.current.take()
			{
				// The failed URL is what history shows now.
				state.current_url = Some(failed.url);
			}
		}

		self.stack.set(None);
		self.set_loading(false);
		self.transition_state.set(TransitionState::Failed);

		if !error.is_visible() {
			tracing::debug!(id, %error, "session timeout swallowed");
			self.error.set(None);
			return;
		}

		tracing::warn!(id, %error, "transition failed");
		self.error.set(Some(error.clone()));
		self.events.error().send(&error);
	}

	fn vetoed(&self, url: &str) {
		tracing::info!(url, "navigation vetoed by before-transition hook");
		self.events.aborted().send(&TransitionAborted {
			id: None,
			url: url.to_string(),
			reason: AbortReason::Vetoed,
		});
	}

	fn set_loading(&self, loading: bool) {
		if self.loading.get() != loading {
			self.loading.set(loading);
			self.events.loading().send(&loading);
		}
	}

	/// Returns the child entry the view rendering `entry` should render.
	///
	/// # Panics
	///
	/// Panics if `entry` is not part of the current stack, which means the
	/// caller is rendering with a stale entry. Use [`Router::try_outlet`] to
	/// handle that case.
	pub fn outlet(&self, entry: &Rc<RouteInfo>) -> Option<Rc<RouteInfo>> {
		match self.try_outlet(entry) {
			Ok(child) => child,
			Err(error) => panic!("{}", error),
		}
	}

	/// Non-panicking [`Router::outlet`].
	pub fn try_outlet(&self, entry: &Rc<RouteInfo>) -> Result<Option<Rc<RouteInfo>>, RouterError> {
		let stack = self.stack.get().unwrap_or_default();
		resolve_outlet(&stack, entry, &self.registry)
	}

	/// Entry for the top-level view.
	pub fn root_entry(&self) -> Option<Rc<RouteInfo>> {
		self.stack
			.with(|stack| stack.as_ref().and_then(|stack| stack.root().cloned()))
	}

	/// The committed stack, if any.
	pub fn current_stack(&self) -> Option<Rc<RouteStack>> {
		self.stack.get()
	}

	/// Reactive handle to the committed stack.
	pub fn stack(&self) -> &Signal<Option<Rc<RouteStack>>> {
		&self.stack
	}

	/// The committed leaf route.
	pub fn active_route(&self) -> Option<RouteId> {
		self.active_route.get()
	}

	/// Reactive handle to the committed leaf route.
	pub fn active_route_signal(&self) -> &Signal<Option<RouteId>> {
		&self.active_route
	}

	/// The visible error of the last failed transition.
	pub fn error(&self) -> Option<ClassifiedError> {
		self.error.get()
	}

	/// Reactive handle to the visible error.
	pub fn error_signal(&self) -> &Signal<Option<ClassifiedError>> {
		&self.error
	}

	/// Whether the loading indicator should be shown.
	pub fn is_loading(&self) -> bool {
		self.loading.get()
	}

	/// Reactive handle to the loading indicator.
	pub fn loading_signal(&self) -> &Signal<bool> {
		&self.loading
	}

	/// State of the latest transition.
	pub fn transition_state(&self) -> TransitionState {
		self.transition_state.get()
	}

	/// Reactive handle to the latest transition state.
	pub fn transition_state_signal(&self) -> &Signal<TransitionState> {
		&self.transition_state
	}

	/// Value of `key` in the current URL's query string.
	pub fn query_param(&self, key: &str) -> Option<String> {
		UrlParts::parse(&self.history.location())
			.query
			.get(key)
			.cloned()
	}

	/// Sets `key` in the current URL's query string.
	///
	/// The URL is replaced without a transition, and the resulting query is
	/// remembered for the active route.
	pub fn set_query_param(&self, key: impl Into<String>, value: impl Into<String>) {
		let (key, value) = (key.into(), value.into());
		self.update_query(move |query| {
			query.insert(key, value);
		});
	}

	/// Removes `key` from the current URL's query string.
	pub fn delete_query_param(&self, key: &str) {
		self.update_query(|query| {
			query.remove(key);
		});
	}

	fn update_query(&self, change: impl FnOnce(&mut QueryParams)) {
		let mut parts = UrlParts::parse(&self.history.location());
		change(&mut parts.query);
		let url = parts.to_string();

		if self.settings.remember_query
			&& let Some(route) = self.active_route.get()
		{
			self.query_memory
				.borrow_mut()
				.remember(route, parts.query);
		}
		self.state.borrow_mut().current_url = Some(url.clone());
		self.history.replace(&url);
	}

	/// Builds a navigation target, merging in the destination's remembered
	/// query parameters. Parameters present in `url` take precedence.
	pub fn build_url(&self, url: &str) -> String {
		if !self.settings.remember_query {
			return url.to_string();
		}
		match self.matcher.match_path(url) {
			Some(found) if !found.fallback => {
				merge_remembered(url, self.query_memory.borrow().get(found.route))
			}
			_ => url.to_string(),
		}
	}

	/// Query parameters remembered for `route`.
	pub fn remembered_query(&self, route: RouteId) -> Option<QueryParams> {
		self.query_memory.borrow().get(route).cloned()
	}

	/// Builds the URL of a named route.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidRouteName`] for unknown names and
	/// [`RouterError::MissingParameter`] if a path parameter is not supplied.
	pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
		let route = self
			.registry
			.find_by_name(name)
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;
		let params: HashMap<String, String> = params
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect();
		self.registry[route].pattern().reverse(&params)
	}

	/// Whether the named route is part of the committed stack.
	pub fn is_active(&self, name: &str) -> bool {
		self.stack.with(|stack| {
			stack.as_ref().is_some_and(|stack| {
				stack
					.iter()
					.any(|entry| self.registry[entry.route()].name() == Some(name))
			})
		})
	}

	/// The frozen route tree.
	pub fn registry(&self) -> &RouteRegistry {
		&self.registry
	}

	/// Router events.
	pub fn events(&self) -> &RouterEvents {
		&self.events
	}

	/// Before-transition hooks.
	pub fn hooks(&self) -> &BeforeTransitionHooks {
		&self.hooks
	}

	/// The history bridge.
	pub fn history(&self) -> &Rc<dyn HistoryBridge> {
		&self.history
	}

	/// The settings the router was built with.
	pub fn settings(&self) -> &RouterSettings {
		&self.settings
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.registry.len())
			.field("location", &self.history.location())
			.field("active_route", &self.active_route.get())
			.field("transition_state", &self.transition_state.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::Component;
	use crate::error::{ErrorKind, LoadError};
	use rstest::rstest;
	use serde_json::json;
	use std::cell::Cell;

	fn routes() -> Vec<RouteSpec> {
		vec![
			RouteSpec::new("/", Component::new("Home")).named("home"),
			RouteSpec::new("/login", Component::new("Login")).named("login"),
			RouteSpec::new("/404", Component::new("NotFound")),
			RouteSpec::new("/customers/:customerId", Component::new("Customer"))
				.param_type("customerId", "number")
				.named("customer")
				.route(RouteSpec::new("/order", Component::new("Order")).named("order")),
		]
	}

	fn router() -> Router {
		Router::builder().routes(routes()).build().unwrap()
	}

	#[rstest]
	fn test_build_rejects_unknown_not_found_path() {
		let result = Router::builder()
			.routes(routes())
			.settings(RouterSettings::default().with_not_found_path("/missing"))
			.build();
		assert!(matches!(result, Err(RouterError::NotFound(path)) if path == "/missing"));
	}

	#[rstest]
	fn test_build_requires_login_route_for_auth() {
		let result = Router::builder()
			.route(RouteSpec::new("/", Component::new("Home")))
			.settings(RouterSettings::default().with_require_auth(true))
			.build();
		assert!(matches!(result, Err(RouterError::NotFound(path)) if path == "/login"));
	}

	#[rstest]
	#[case(RouterSettings::default().with_login_path("login"))]
	#[case(RouterSettings::default().with_home_path("home"))]
	#[case(RouterSettings::default().with_not_found_path("404"))]
	fn test_build_rejects_relative_paths(#[case] settings: RouterSettings) {
		let result = Router::builder().routes(routes()).settings(settings).build();
		assert!(matches!(result, Err(RouterError::InvalidSettings(_))));
	}

	#[tokio::test]
	async fn test_start_uses_history_location() {
		let history = Rc::new(MemoryHistory::new("/customers/7"));
		let router = Router::builder()
			.routes(routes())
			.history(Rc::clone(&history))
			.build()
			.unwrap();

		assert_eq!(router.start().await, TransitionState::Committed);
		assert_eq!(router.active_route(), router.registry().find_by_name("customer"));
	}

	#[tokio::test]
	async fn test_unmatched_path_fails_not_found() {
		let router = router();
		assert_eq!(router.navigate("/nowhere").await, TransitionState::Failed);
		assert_eq!(router.error().unwrap().kind(), ErrorKind::NotFound);
		assert!(router.current_stack().is_none());
	}

	#[tokio::test]
	async fn test_unmatched_path_uses_not_found_route() {
		let router = Router::builder()
			.routes(routes())
			.settings(RouterSettings::default().with_not_found_path("/404"))
			.build()
			.unwrap();

		assert_eq!(router.navigate("/nowhere").await, TransitionState::Committed);
		assert_eq!(router.active_route(), router.registry().find_by_path("/404"));
		assert!(router.error().is_none());
	}

	#[tokio::test]
	async fn test_commit_clears_previous_error() {
		let router = router();
		router.navigate("/nowhere").await;
		assert!(router.error().is_some());

		router.navigate("/").await;
		assert!(router.error().is_none());
		assert_eq!(router.transition_state(), TransitionState::Committed);
	}

	#[tokio::test]
	async fn test_url_for_and_is_active() {
		let router = router();
		assert_eq!(
			router.url_for("order", &[("customerId", "42")]).unwrap(),
			"/customers/42/order"
		);
		assert!(matches!(
			router.url_for("nope", &[]),
			Err(RouterError::InvalidRouteName(_))
		));

		router.navigate("/customers/42/order").await;
		assert!(router.is_active("customer"));
		assert!(router.is_active("order"));
		assert!(!router.is_active("home"));
	}

	#[tokio::test]
	async fn test_query_param_operations() {
		let router = router();
		router.navigate("/customers/1").await;

		router.set_query_param("tab", "orders");
		assert_eq!(router.query_param("tab").as_deref(), Some("orders"));
		assert_eq!(router.history().location(), "/customers/1?tab=orders");

		router.delete_query_param("tab");
		assert_eq!(router.query_param("tab"), None);
		assert_eq!(router.history().location(), "/customers/1");
	}

	#[tokio::test]
	async fn test_session_timeout_is_swallowed() {
		let router = Router::builder()
			.route(RouteSpec::new(
				"/",
				Component::new("Home").with_loader(|_| async {
					Err::<serde_json::Value, _>(LoadError::SessionTimeout)
				}),
			))
			.build()
			.unwrap();

		let errors = Rc::new(Cell::new(0));
		let counter = Rc::clone(&errors);
		router.events().error().connect(move |_| counter.set(counter.get() + 1));

		assert_eq!(router.navigate("/").await, TransitionState::Failed);
		assert!(router.current_stack().is_none());
		assert!(router.error().is_none());
		assert_eq!(errors.get(), 0);
	}

	#[tokio::test]
	async fn test_auth_gate_and_return() {
		let session = Rc::new(SessionHandle::new(false));
		let router = Router::builder()
			.routes(routes())
			.settings(RouterSettings::default().with_require_auth(true))
			.session(Rc::clone(&session))
			.build()
			.unwrap();

		assert_eq!(router.navigate("/customers/5").await, TransitionState::Committed);
		assert_eq!(router.active_route(), router.registry().find_by_name("login"));
		assert_eq!(router.history().location(), "/login");

		session.set_authenticated(true);
		assert_eq!(router.handle_session_change().await, TransitionState::Committed);
		assert_eq!(router.active_route(), router.registry().find_by_name("customer"));
		assert_eq!(router.history().location(), "/customers/5");

		session.set_authenticated(false);
		router.handle_session_change().await;
		assert_eq!(router.active_route(), router.registry().find_by_name("login"));
	}

	#[tokio::test]
	async fn test_page_view_sent_on_commit() {
		let router = Router::builder()
			.route(RouteSpec::new(
				"/",
				Component::new("Home").with_loader(|_| async { Ok::<_, LoadError>(json!(1)) }),
			))
			.build()
			.unwrap();
		let views = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&views);
		router
			.events()
			.page_view()
			.connect(move |view: &PageView| sink.borrow_mut().push(view.full_path.clone()));

		router.navigate("/").await;
		assert_eq!(*views.borrow(), vec!["/"]);
		assert_eq!(router.root_entry().unwrap().data(), Some(&json!(1)));
	}
}

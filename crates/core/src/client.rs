//! Client façade and composition root.
//!
//! [`Client`] is the single object applications hold. It owns the component
//! registry, exposes typed lookup of modules and services, delegates `login`
//! to the login module, dispatches platform notifications to the listener and
//! tears everything down on [`Client::dispose`].
//!
//! # Composition
//!
//! [`ClientBuilder::build`] populates the registry once, in this order:
//!
//! 1. services: `dyn HttpService`, `dyn Logger`, `dyn ActionFactory`
//! 2. the back-reference: [`ClientContext`]
//! 3. modules: `StoreModule`, `SessionModule`, `AccountModule`, `dyn LoginModule`
//! 4. extra registrations, in the order they were added to the builder
//!
//! Each step may resolve anything registered before it. A failed resolution
//! aborts the build, so a half-wired client is never handed out. After the
//! build the registry is read-only and lookups take no lock.
//!
//! # Example
//!
//! ```ignore
//! use wx::{Client, NotifyEventKind};
//!
//! let client = Client::builder()
//!     .on_notify(|_client, event| {
//!         if event.kind == NotifyEventKind::LoginSuccess {
//!             println!("signed in: {}", event.target);
//!         }
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let result = client.login(None).await?;
//! let session = client.get_module::<wx::modules::SessionModule>()?;
//! assert!(session.is_online());
//!
//! client.dispose();
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use std::thread;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use wx_protocol::{ActionEvent, NotifyEvent};
use wx_runtime::{Registration, Registry, TracingLogger, lifecycle};

use crate::config::ClientConfig;
use crate::error::{BoxError, Error, Result};
use crate::modules::{AccountModule, ActionEventListener, DefaultLoginModule, LoginModule, SessionModule, StoreModule};
use crate::notify::{Delivery, NotifyDispatcher, NotifyListener};
use crate::services::{ActionFactory, HttpService, Logger, ReqwestHttpService, WebActionFactory};
use crate::{Disposable, Module, Service};

/// Builds an extra registration from the registry composed so far.
pub type ComponentFactory = Box<dyn FnOnce(&Registry) -> Result<Registration> + Send>;

/// Builds the login module from the registry composed so far.
pub type LoginModuleFactory = Box<dyn FnOnce(&Registry) -> Result<Arc<dyn LoginModule>> + Send>;

/// Registry plus the logger resolved from it, set once after composition.
struct Composed {
	registry: Registry,
	logger: Arc<dyn Logger>,
}

struct ClientInner {
	config: ClientConfig,
	dispatcher: NotifyDispatcher,
	composed: OnceLock<Composed>,
}

/// Handle to a composed client. Cloning is cheap and shares the same components.
///
/// The client is never torn down implicitly: dropping the last handle frees
/// memory but does not run release hooks. Call [`Client::dispose`] once all
/// other activity on the client has finished.
#[derive(Clone)]
pub struct Client {
	inner: Arc<ClientInner>,
}

impl Client {
	/// Composes a client with default services and an optional listener.
	pub fn new(listener: Option<NotifyListener>) -> Result<Self> {
		let mut builder = Self::builder();
		if let Some(listener) = listener {
			builder = builder.notify_listener(listener);
		}
		builder.build()
	}

	pub fn builder() -> ClientBuilder {
		ClientBuilder::default()
	}

	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	pub fn has_listener(&self) -> bool {
		self.inner.dispatcher.has_listener()
	}

	fn composed(&self) -> Result<&Composed> {
		self.inner
			.composed
			.get()
			.ok_or_else(|| Error::ClientUnavailable("client is still being composed".to_string()))
	}

	/// Returns the service registered for `T`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnregisteredType`] if `T` was never registered.
	pub fn get_service<T: ?Sized + Service>(&self) -> Result<Arc<T>> {
		self.composed()?.registry.resolve::<T>()
	}

	/// Returns the module registered for `T`.
	///
	/// Only module types are accepted, so a service cannot be fetched through
	/// this accessor by mistake.
	///
	/// # Errors
	///
	/// Returns [`Error::UnregisteredType`] if `T` was never registered.
	pub fn get_module<T: ?Sized + Module>(&self) -> Result<Arc<T>> {
		self.composed()?.registry.resolve::<T>()
	}

	/// Logs in through the registered login module.
	///
	/// The module's error is returned unchanged. Timeouts, retries and
	/// cancellation are the module's business.
	pub async fn login(&self, listener: Option<ActionEventListener>) -> Result<ActionEvent> {
		let login = self.get_module::<dyn LoginModule>()?;
		login.login(listener).await
	}

	/// Delivers `event` to the listener on the calling thread.
	///
	/// Never fails: a missing listener drops the event, a failing listener is
	/// logged through the `Logger` service.
	pub fn fire_notify(&self, event: NotifyEvent) -> Delivery {
		let Ok(composed) = self.composed() else {
			debug!(target = "wx.notify", kind = ?event.kind, "client not composed; dropping notification");
			return Delivery::NoListener;
		};
		self.inner.dispatcher.dispatch(self, &event, composed.logger.as_ref())
	}

	/// Schedules [`fire_notify`](Self::fire_notify) off the calling thread and
	/// returns at once.
	///
	/// Inside a tokio runtime the dispatch runs on its blocking pool and the
	/// returned handle tells when it finished. Outside a runtime it runs on a
	/// detached thread and `None` is returned. The listener's outcome is never
	/// reported back.
	pub fn fire_notify_async(&self, event: NotifyEvent) -> Option<JoinHandle<()>> {
		let client = self.clone();
		let dispatch = move || {
			client.fire_notify(event);
		};

		if let Ok(runtime) = Handle::try_current() {
			return Some(runtime.spawn_blocking(dispatch));
		}

		trace!(target = "wx.notify", "no tokio runtime; dispatching on a detached thread");
		if let Err(err) = thread::Builder::new().name("wx-notify".to_string()).spawn(dispatch) {
			// The closure is consumed even on failure, so the event is lost.
			warn!(target = "wx.notify", error = %err, "failed to spawn notify thread; notification dropped");
		}
		None
	}

	/// Releases every disposable module and service.
	///
	/// Failures are logged per component and never abort the remaining
	/// releases. Not guarded against repeated calls: every call runs every
	/// release hook again.
	pub fn dispose(&self) {
		let Ok(composed) = self.composed() else {
			return;
		};
		info!(target = "wx.client", components = composed.registry.len(), "disposing client");
		let report = lifecycle::dispose_all(&composed.registry, composed.logger.as_ref());
		if !report.failed.is_empty() {
			warn!(target = "wx.client", failed = ?report.failed, "client disposed with failures");
		}
	}

	fn context(&self) -> ClientContext {
		ClientContext {
			inner: Arc::downgrade(&self.inner),
		}
	}
}

impl fmt::Debug for Client {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut debug = f.debug_struct("Client");
		debug.field("has_listener", &self.has_listener());
		if let Some(composed) = self.inner.composed.get() {
			debug.field("registry", &composed.registry);
		}
		debug.finish()
	}
}

/// Weak back-reference to the client, registered for modules to resolve.
///
/// Modules report platform events through it without keeping the client
/// alive. Once the client is gone, notifications are dropped.
#[derive(Clone)]
pub struct ClientContext {
	inner: Weak<ClientInner>,
}

impl ClientContext {
	/// A context not attached to any client. Notifications go nowhere.
	pub fn detached() -> Self {
		Self { inner: Weak::new() }
	}

	/// Returns a strong handle to the client.
	pub fn client(&self) -> Result<Client> {
		self.inner
			.upgrade()
			.map(|inner| Client { inner })
			.ok_or_else(|| Error::ClientUnavailable("client has been dropped".to_string()))
	}

	pub fn fire_notify(&self, event: NotifyEvent) -> Delivery {
		match self.client() {
			Ok(client) => client.fire_notify(event),
			Err(_) => {
				debug!(target = "wx.notify", kind = ?event.kind, "no client behind context; dropping notification");
				Delivery::NoListener
			}
		}
	}

	/// Schedules a notification; `None` when no client is attached or no
	/// tokio runtime is current.
	pub fn fire_notify_async(&self, event: NotifyEvent) -> Option<JoinHandle<()>> {
		self.client().ok().and_then(|client| client.fire_notify_async(event))
	}
}

impl fmt::Debug for ClientContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClientContext").field("attached", &(self.inner.strong_count() > 0)).finish()
	}
}

/// A service handed to the builder, with its release handle when the client
/// owns its lifetime.
struct Injected<T: ?Sized> {
	instance: Arc<T>,
	release: Option<Arc<dyn Disposable>>,
}

impl<T: ?Sized + Send + Sync + 'static> Injected<T> {
	fn shared(instance: Arc<T>) -> Self {
		Self { instance, release: None }
	}

	fn owned(instance: Arc<T>, release: Arc<dyn Disposable>) -> Self {
		Self {
			instance,
			release: Some(release),
		}
	}

	fn into_registration(self) -> Registration {
		let registration = Registration::new(self.instance).service();
		match self.release {
			Some(release) => registration.disposable(release),
			None => registration,
		}
	}
}

/// Configures and composes a [`Client`].
///
/// Services passed to `http_service`, `logger` and `action_factory` stay
/// owned by the caller and are not released by [`Client::dispose`]. The
/// `owned_*` variants hand their release over to the client.
#[derive(Default)]
pub struct ClientBuilder {
	config: ClientConfig,
	listener: Option<NotifyListener>,
	http: Option<Injected<dyn HttpService>>,
	logger: Option<Injected<dyn Logger>>,
	actions: Option<Injected<dyn ActionFactory>>,
	login: Option<LoginModuleFactory>,
	extensions: Vec<ComponentFactory>,
}

impl ClientBuilder {
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;
		self
	}

	pub fn notify_listener(mut self, listener: NotifyListener) -> Self {
		self.listener = Some(listener);
		self
	}

	/// Sets the notify listener from a closure.
	pub fn on_notify<F>(self, listener: F) -> Self
	where
		F: Fn(&Client, &NotifyEvent) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
	{
		self.notify_listener(Arc::new(listener))
	}

	/// Replaces the default `reqwest` transport.
	pub fn http_service(mut self, http: Arc<dyn HttpService>) -> Self {
		self.http = Some(Injected::shared(http));
		self
	}

	/// Replaces the default transport and releases it on [`Client::dispose`].
	pub fn owned_http_service<S: HttpService + Disposable>(mut self, http: Arc<S>) -> Self {
		self.http = Some(Injected::<dyn HttpService>::owned(http.clone(), http));
		self
	}

	/// Replaces the default `tracing` logger.
	pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
		self.logger = Some(Injected::shared(logger));
		self
	}

	/// Replaces the default logger and releases it on [`Client::dispose`].
	pub fn owned_logger<L: Logger + Disposable>(mut self, logger: Arc<L>) -> Self {
		self.logger = Some(Injected::<dyn Logger>::owned(logger.clone(), logger));
		self
	}

	/// Replaces the default web action factory.
	pub fn action_factory(mut self, actions: Arc<dyn ActionFactory>) -> Self {
		self.actions = Some(Injected::shared(actions));
		self
	}

	/// Replaces the default action factory and releases it on [`Client::dispose`].
	pub fn owned_action_factory<A: ActionFactory + Disposable>(mut self, actions: Arc<A>) -> Self {
		self.actions = Some(Injected::<dyn ActionFactory>::owned(actions.clone(), actions));
		self
	}

	/// Replaces the default login module.
	pub fn login_module<F>(mut self, factory: F) -> Self
	where
		F: FnOnce(&Registry) -> Result<Arc<dyn LoginModule>> + Send + 'static,
	{
		self.login = Some(Box::new(factory));
		self
	}

	/// Adds a prebuilt registration after the built-in components.
	pub fn register(self, registration: Registration) -> Self {
		self.register_with(move |_| Ok(registration))
	}

	/// Adds a registration built from the components registered before it.
	pub fn register_with<F>(mut self, factory: F) -> Self
	where
		F: FnOnce(&Registry) -> Result<Registration> + Send + 'static,
	{
		self.extensions.push(Box::new(factory));
		self
	}

	/// Composes the client.
	///
	/// # Errors
	///
	/// Fails if the configuration is invalid, a default service cannot be
	/// built, a component resolves an unregistered type, or two components
	/// claim the same type.
	pub fn build(self) -> Result<Client> {
		self.config.validate()?;

		let ClientBuilder {
			config,
			listener,
			http,
			logger,
			actions,
			login,
			extensions,
		} = self;

		let client = Client {
			inner: Arc::new(ClientInner {
				config,
				dispatcher: NotifyDispatcher::new(listener),
				composed: OnceLock::new(),
			}),
		};

		let config = &client.inner.config;
		let mut registry = Registry::new();

		// Services.
		let http = match http {
			Some(http) => http,
			None => {
				let http = Arc::new(ReqwestHttpService::new(config)?);
				Injected::<dyn HttpService>::owned(http.clone(), http)
			}
		};
		registry.register(http.into_registration())?;
		let logger = match logger {
			Some(logger) => logger,
			None => Injected::<dyn Logger>::shared(Arc::new(TracingLogger::new(config.log_level()?))),
		};
		registry.register(logger.into_registration())?;
		let actions = match actions {
			Some(actions) => actions,
			None => Injected::<dyn ActionFactory>::shared(Arc::new(WebActionFactory::new(config))),
		};
		registry.register(actions.into_registration())?;

		// Back-reference.
		registry.register(Registration::new(Arc::new(client.context())))?;

		// Modules.
		let store = Arc::new(StoreModule::new());
		registry.register(Registration::new(store.clone()).module().disposable(store))?;
		let session = Arc::new(SessionModule::new((*registry.resolve::<ClientContext>()?).clone()));
		registry.register(Registration::new(session.clone()).module().disposable(session))?;
		let account = Arc::new(AccountModule::new());
		registry.register(Registration::new(account.clone()).module().disposable(account))?;
		let login: Arc<dyn LoginModule> = match login {
			Some(factory) => factory(&registry)?,
			None => Arc::new(DefaultLoginModule::from_registry(&registry)?),
		};
		registry.register(Registration::new(login).module())?;

		for factory in extensions {
			let registration = factory(&registry)?;
			registry.register(registration)?;
		}

		let logger = registry.resolve::<dyn Logger>()?;
		info!(target = "wx.client", components = registry.len(), "client composed");

		client
			.inner
			.composed
			.set(Composed { registry, logger })
			.map_err(|_| Error::ClientUnavailable("client composed twice".to_string()))?;
		Ok(client)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::FakeHttpService;

	fn offline_client() -> Client {
		Client::builder().http_service(Arc::new(FakeHttpService::new())).build().unwrap()
	}

	#[test]
	fn context_registration_points_back_at_the_client() {
		let client = offline_client();
		let registry = &client.composed().unwrap().registry;
		let context = registry.resolve::<ClientContext>().unwrap();
		let resolved = context.client().unwrap();
		assert!(Arc::ptr_eq(&resolved.inner, &client.inner));

		// The back-reference is plain data, not a module or service.
		let registration = registry.iter().find(|r| r.is::<ClientContext>()).unwrap();
		assert!(registration.capabilities().is_empty());
	}

	#[test]
	fn context_does_not_keep_the_client_alive() {
		let client = offline_client();
		let context = client.context();
		drop(client);
		assert!(matches!(context.client(), Err(Error::ClientUnavailable(_))));
		assert_eq!(context.fire_notify(NotifyEvent::bare(wx_protocol::NotifyEventKind::Offline)), Delivery::NoListener);
	}

	#[test]
	fn composition_order_is_services_context_modules() {
		let client = offline_client();
		let names: Vec<_> = client.composed().unwrap().registry.iter().map(Registration::type_name).collect();
		let position = |needle: &str| names.iter().position(|name| name.contains(needle)).unwrap();

		assert!(position("HttpService") < position("ClientContext"));
		assert!(position("Logger") < position("ClientContext"));
		assert!(position("ActionFactory") < position("ClientContext"));
		assert!(position("ClientContext") < position("StoreModule"));
		assert!(position("AccountModule") < position("LoginModule"));
	}

	#[test]
	fn invalid_config_aborts_build() {
		let config = ClientConfig {
			log_level: "chatty".to_string(),
			..ClientConfig::default()
		};
		assert!(matches!(Client::builder().config(config).build(), Err(Error::Config(_))));
	}
}

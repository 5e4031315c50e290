//! Typed singleton registry.
//!
//! Maps the `TypeId` of a requested type to one shared instance plus its
//! capability tags. The requested type may be concrete (`StoreModule`) or a
//! trait object (`dyn LoginModule`); instances are kept as `Arc<T>` behind
//! `dyn Any`, so resolving never needs reflection-style assignability checks.
//!
//! A registry is populated once, single-threaded, during client composition
//! and only read afterwards. It has no removal or replacement operations.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = Registry::new();
//! let store = Arc::new(StoreModule::new());
//! registry.register(Registration::new(store.clone()).module().disposable(store))?;
//!
//! let resolved: Arc<StoreModule> = registry.resolve()?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::capability::{Capabilities, Disposable};
use crate::error::{Error, Result};

/// One registered singleton.
pub struct Registration {
	type_id: TypeId,
	type_name: &'static str,
	/// Always an `Arc<T>` where `T` is the requested type.
	instance: Box<dyn Any + Send + Sync>,
	capabilities: Capabilities,
	disposer: Option<Arc<dyn Disposable>>,
}

impl Registration {
	/// Wraps `instance` as the singleton for requested type `T`, with no tags.
	pub fn new<T>(instance: Arc<T>) -> Self
	where
		T: ?Sized + Send + Sync + 'static,
	{
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			instance: Box::new(instance),
			capabilities: Capabilities::NONE,
			disposer: None,
		}
	}

	/// Tags the registration as a module.
	pub fn module(mut self) -> Self {
		self.capabilities |= Capabilities::MODULE;
		self
	}

	/// Tags the registration as a service.
	pub fn service(mut self) -> Self {
		self.capabilities |= Capabilities::SERVICE;
		self
	}

	/// Attaches the release handle and tags the registration as disposable.
	///
	/// `handle` is normally the same allocation as the instance, viewed as
	/// `dyn Disposable`.
	pub fn disposable(mut self, handle: Arc<dyn Disposable>) -> Self {
		self.capabilities |= Capabilities::DISPOSABLE;
		self.disposer = Some(handle);
		self
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn capabilities(&self) -> Capabilities {
		self.capabilities
	}

	/// Release handle, present iff the registration is tagged disposable.
	pub fn disposer(&self) -> Option<&Arc<dyn Disposable>> {
		self.disposer.as_ref()
	}

	pub fn is<T: ?Sized + 'static>(&self) -> bool {
		self.type_id == TypeId::of::<T>()
	}

	fn instance<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
		self.instance.downcast_ref::<Arc<T>>().cloned()
	}
}

impl fmt::Debug for Registration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registration")
			.field("type_name", &self.type_name)
			.field("capabilities", &self.capabilities)
			.finish()
	}
}

/// Store of singleton registrations keyed by requested type.
#[derive(Default)]
pub struct Registry {
	entries: Vec<Registration>,
	index: HashMap<TypeId, usize>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a registration.
	///
	/// # Errors
	///
	/// Returns [`Error::DuplicateRegistration`] if the requested type already
	/// has an instance.
	pub fn register(&mut self, registration: Registration) -> Result<()> {
		if self.index.contains_key(&registration.type_id) {
			return Err(Error::DuplicateRegistration(registration.type_name));
		}

		debug!(
			target = "wx.registry",
			type_name = registration.type_name,
			capabilities = ?registration.capabilities,
			"registered component"
		);

		self.index.insert(registration.type_id, self.entries.len());
		self.entries.push(registration);
		Ok(())
	}

	/// Returns the singleton registered for `T`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnregisteredType`] if `T` was never registered.
	pub fn resolve<T: ?Sized + 'static>(&self) -> Result<Arc<T>> {
		let type_name = std::any::type_name::<T>();
		let instance = self.index.get(&TypeId::of::<T>()).and_then(|&slot| self.entries[slot].instance::<T>());

		match instance {
			Some(instance) => Ok(instance),
			None => {
				debug!(target = "wx.registry", type_name, "lookup of unregistered type");
				Err(Error::UnregisteredType(type_name))
			}
		}
	}

	pub fn contains<T: ?Sized + 'static>(&self) -> bool {
		self.index.contains_key(&TypeId::of::<T>())
	}

	/// Iterates registrations in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Registration> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.entries.iter()).finish()
	}
}

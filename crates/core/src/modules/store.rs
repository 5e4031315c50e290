//! Key/value store module.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::BoxError;
use crate::{Disposable, Module};

/// In-memory store of JSON values shared by the other modules.
#[derive(Debug, Default)]
pub struct StoreModule {
	entries: RwLock<HashMap<String, Value>>,
}

impl StoreModule {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<Value> {
		self.entries.read().get(key).cloned()
	}

	/// Stores `value` under `key`, returning the previous value.
	pub fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.entries.write().insert(key.into(), value)
	}

	pub fn remove(&self, key: &str) -> Option<Value> {
		self.entries.write().remove(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.read().contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

impl Module for StoreModule {}

impl Disposable for StoreModule {
	fn dispose(&self) -> std::result::Result<(), BoxError> {
		self.clear();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn set_replaces_and_returns_previous() {
		let store = StoreModule::new();
		assert_eq!(store.set("sync_key", json!(1)), None);
		assert_eq!(store.set("sync_key", json!(2)), Some(json!(1)));
		assert_eq!(store.get("sync_key"), Some(json!(2)));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn dispose_clears_everything() {
		let store = StoreModule::new();
		store.set("a", json!("x"));
		store.set("b", json!("y"));
		store.dispose().unwrap();
		assert!(store.is_empty());
		assert!(!store.contains_key("a"));

		// Releasing an empty store is harmless.
		store.dispose().unwrap();
	}
}

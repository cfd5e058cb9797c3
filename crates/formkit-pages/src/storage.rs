//! `localStorage` backed key-value store

use crate::dom::{js_message, window};
use formkit_forms::{FormError, FormResult, KeyValueStore};
use web_sys::Storage;

/// [`KeyValueStore`] over `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStore {
	storage: Storage,
}

impl LocalStore {
	/// Opens the page's local storage.
	///
	/// Fails when storage is disabled (private browsing, sandboxed frames).
	pub fn open() -> FormResult<Self> {
		let storage = window()?
			.local_storage()
			.map_err(|e| FormError::Storage(js_message(&e)))?
			.ok_or_else(|| FormError::Storage("localStorage is unavailable".to_string()))?;
		Ok(Self { storage })
	}
}

impl KeyValueStore for LocalStore {
	fn get(&self, key: &str) -> FormResult<Option<String>> {
		self.storage
			.get_item(key)
			.map_err(|e| FormError::Storage(js_message(&e)))
	}

	fn set(&self, key: &str, value: &str) -> FormResult<()> {
		self.storage
			.set_item(key, value)
			.map_err(|e| FormError::Storage(js_message(&e)))
	}

	fn remove(&self, key: &str) -> FormResult<()> {
		self.storage
			.remove_item(key)
			.map_err(|e| FormError::Storage(js_message(&e)))
	}
}

//! Form state persistence
//!
//! [`FormStateCache`] keeps one [`FormSnapshot`] per form under
//! `form_state_<form id>` in a [`KeyValueStore`]. The browser layer backs
//! the store with `localStorage`; [`MemoryStore`] serves native code and
//! tests.
//!
//! ```
//! use formkit_forms::settings::StateCacheSettings;
//! use formkit_forms::snapshot::FormSnapshot;
//! use formkit_forms::state_cache::{FormStateCache, MemoryStore};
//!
//! let cache = FormStateCache::new("contact", MemoryStore::new(), &StateCacheSettings::default());
//! cache.save(&FormSnapshot::from_pairs([("email", "x@y.com")])).unwrap();
//!
//! let form = FormSnapshot::from_pairs([("email", ""), ("name", "")]);
//! assert_eq!(
//!     cache.restore_into(&form).unwrap(),
//!     vec![("email".to_string(), "x@y.com".to_string())]
//! );
//! ```

use crate::error::FormResult;
use crate::settings::StateCacheSettings;
use crate::snapshot::FormSnapshot;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// String key-value persistence.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> FormResult<Option<String>>;

	fn set(&self, key: &str, value: &str) -> FormResult<()>;

	fn remove(&self, key: &str) -> FormResult<()>;
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> FormResult<Option<String>> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> FormResult<()> {
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> FormResult<()> {
		self.entries.borrow_mut().remove(key);
		Ok(())
	}
}

/// Anything holding persisted form state that a successful submission
/// should discard.
pub trait CachedState {
	fn clear_state(&self) -> FormResult<()>;
}

/// Persisted snapshot of one form.
#[derive(Debug, Clone)]
pub struct FormStateCache<S: KeyValueStore> {
	store: S,
	key: String,
}

impl<S: KeyValueStore> FormStateCache<S> {
	pub fn new(form_id: &str, store: S, settings: &StateCacheSettings) -> Self {
		Self {
			store,
			key: format!("{}{}", settings.key_prefix, form_id),
		}
	}

	pub fn storage_key(&self) -> &str {
		&self.key
	}

	pub fn save(&self, snapshot: &FormSnapshot) -> FormResult<()> {
		self.store.set(&self.key, &snapshot.to_json()?)
	}

	/// The saved snapshot. Malformed entries are logged and read as absent.
	pub fn load(&self) -> FormResult<Option<FormSnapshot>> {
		let Some(json) = self.store.get(&self.key)? else {
			return Ok(None);
		};
		match FormSnapshot::from_json(&json) {
			Ok(snapshot) => Ok(Some(snapshot)),
			Err(e) => {
				tracing::warn!(key = %self.key, error = %e, "ignoring malformed saved form state");
				Ok(None)
			}
		}
	}

	/// Saved values for fields that exist in `current` and are empty there.
	pub fn restore_into(&self, current: &FormSnapshot) -> FormResult<Vec<(String, String)>> {
		let Some(saved) = self.load()? else {
			return Ok(Vec::new());
		};
		Ok(saved
			.into_iter()
			.filter(|(name, _)| current.get(name).is_some_and(str::is_empty))
			.collect())
	}

	pub fn clear(&self) -> FormResult<()> {
		tracing::debug!(key = %self.key, "clearing saved form state");
		self.store.remove(&self.key)
	}

	/// Runs after the post-submit settle delay; clears the entry when no
	/// error marker remains. Returns whether it was cleared.
	pub fn settle_after_submit(&self, error_markers_remaining: bool) -> FormResult<bool> {
		if error_markers_remaining {
			return Ok(false);
		}
		self.clear()?;
		Ok(true)
	}

	/// Runs on `beforeunload`; an empty form leaves nothing behind.
	pub fn on_unload(&self, current: &FormSnapshot) -> FormResult<bool> {
		if !current.has_no_values() {
			return Ok(false);
		}
		self.clear()?;
		Ok(true)
	}
}

impl<S: KeyValueStore> CachedState for FormStateCache<S> {
	fn clear_state(&self) -> FormResult<()> {
		self.clear()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn store() -> MemoryStore {
		MemoryStore::new()
	}

	fn cache(store: &MemoryStore) -> FormStateCache<MemoryStore> {
		FormStateCache::new("contact", store.clone(), &StateCacheSettings::default())
	}

	#[rstest]
	fn test_storage_key(store: MemoryStore) {
		assert_eq!(cache(&store).storage_key(), "form_state_contact");
	}

	#[rstest]
	fn test_restore_skips_filled_and_unknown_fields(store: MemoryStore) {
		let cache = cache(&store);
		cache
			.save(&FormSnapshot::from_pairs([
				("email", "x@y.com"),
				("name", "Saved"),
				("removed", "gone"),
			]))
			.unwrap();

		let form = FormSnapshot::from_pairs([("email", ""), ("name", "Typed")]);
		assert_eq!(
			cache.restore_into(&form).unwrap(),
			vec![("email".to_string(), "x@y.com".to_string())]
		);
	}

	#[rstest]
	fn test_malformed_entry_reads_as_absent(store: MemoryStore) {
		store.set("form_state_contact", "{not json").unwrap();
		let cache = cache(&store);
		assert_eq!(cache.load().unwrap(), None);
		assert!(cache.restore_into(&FormSnapshot::from_pairs([("email", "")])).unwrap().is_empty());
	}

	#[rstest]
	fn test_settle_clears_only_without_error_markers(store: MemoryStore) {
		let cache = cache(&store);
		cache.save(&FormSnapshot::from_pairs([("email", "x")])).unwrap();

		assert!(!cache.settle_after_submit(true).unwrap());
		assert_eq!(store.len(), 1);
		assert!(cache.settle_after_submit(false).unwrap());
		assert!(store.is_empty());
	}

	#[rstest]
	fn test_unload_clears_empty_form(store: MemoryStore) {
		let cache = cache(&store);
		cache.save(&FormSnapshot::from_pairs([("email", "x")])).unwrap();

		assert!(!cache.on_unload(&FormSnapshot::from_pairs([("email", "x")])).unwrap());
		assert_eq!(store.len(), 1);
		assert!(cache.on_unload(&FormSnapshot::from_pairs([("email", "")])).unwrap());
		assert!(store.is_empty());
	}

	#[rstest]
	fn test_caches_are_keyed_per_form(store: MemoryStore) {
		let contact = cache(&store);
		let signup = FormStateCache::new("signup", store.clone(), &StateCacheSettings::default());
		contact.save(&FormSnapshot::from_pairs([("email", "a")])).unwrap();
		signup.save(&FormSnapshot::from_pairs([("email", "b")])).unwrap();

		contact.clear_state().unwrap();
		assert_eq!(contact.load().unwrap(), None);
		assert_eq!(signup.load().unwrap().unwrap().get("email"), Some("b"));
	}
}

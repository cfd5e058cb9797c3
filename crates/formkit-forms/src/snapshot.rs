//! Form snapshots
//!
//! A [`FormSnapshot`] is the flat name → value mapping of a form at one
//! instant. It is the submission payload and the persisted cache entry, and
//! serialises as a plain JSON object.

use crate::error::FormResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name → current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot(BTreeMap<String, String>);

impl FormSnapshot {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a snapshot from name/value pairs. A repeated name keeps its
	/// last value.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::snapshot::FormSnapshot;
	///
	/// let snapshot = FormSnapshot::from_pairs([("city", "Rabat"), ("city", "Fès")]);
	/// assert_eq!(snapshot.get("city"), Some("Fès"));
	/// assert_eq!(snapshot.len(), 1);
	/// ```
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self(
			pairs
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}

	/// Sets `name` to `value`, replacing any previous value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// True when no field holds a non-empty value.
	pub fn has_no_values(&self) -> bool {
		self.0.values().all(|v| v.is_empty())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn to_json(&self) -> FormResult<String> {
		Ok(serde_json::to_string(self)?)
	}

	pub fn from_json(json: &str) -> FormResult<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSnapshot {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self::from_pairs(iter)
	}
}

impl IntoIterator for FormSnapshot {
	type Item = (String, String);
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

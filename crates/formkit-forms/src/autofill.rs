//! Auto-fill from the logged-in user's profile
//!
//! The page exposes `window.currentUser = {isAuthenticated, data}`. For an
//! authenticated user, empty profile fields of every form are filled from
//! `data`.

use crate::snapshot::FormSnapshot;
use serde::{Deserialize, Serialize};

/// Form field name → profile key.
pub const AUTOFILL_FIELDS: [(&str, &str); 5] = [
	("full_name", "full_name"),
	("email", "email"),
	("phone", "phone"),
	("city", "city"),
	("name", "full_name"),
];

/// The `window.currentUser` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
	#[serde(rename = "isAuthenticated", default)]
	pub is_authenticated: bool,
	#[serde(default)]
	pub data: Option<UserProfile>,
}

/// Profile values usable for auto-fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	#[serde(default)]
	pub full_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub city: Option<String>,
}

impl UserProfile {
	/// Looks up a profile key from [`AUTOFILL_FIELDS`].
	pub fn value(&self, key: &str) -> Option<&str> {
		let value = match key {
			"full_name" => self.full_name.as_deref(),
			"email" => self.email.as_deref(),
			"phone" => self.phone.as_deref(),
			"city" => self.city.as_deref(),
			_ => None,
		};
		value.filter(|v| !v.is_empty())
	}
}

impl CurrentUser {
	/// Profile of an authenticated user, if any.
	pub fn profile(&self) -> Option<&UserProfile> {
		self.data.as_ref().filter(|_| self.is_authenticated)
	}
}

/// Values to write into a form, given its current field values.
///
/// A field is filled only when it exists in `current`, is empty, and the
/// profile has a non-empty value for it.
///
/// # Examples
///
/// ```
/// use formkit_forms::autofill::{autofill_values, CurrentUser, UserProfile};
/// use formkit_forms::snapshot::FormSnapshot;
///
/// let user = CurrentUser {
///     is_authenticated: true,
///     data: Some(UserProfile { full_name: Some("Amina".into()), ..Default::default() }),
/// };
/// let form = FormSnapshot::from_pairs([("name", ""), ("email", "")]);
/// assert_eq!(autofill_values(&user, &form), vec![("name".to_string(), "Amina".to_string())]);
/// ```
pub fn autofill_values(user: &CurrentUser, current: &FormSnapshot) -> Vec<(String, String)> {
	let Some(profile) = user.profile() else {
		return Vec::new();
	};

	AUTOFILL_FIELDS
		.iter()
		.filter(|(field, _)| current.get(field).is_some_and(str::is_empty))
		.filter_map(|(field, key)| {
			profile
				.value(key)
				.map(|value| (field.to_string(), value.to_string()))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn user() -> CurrentUser {
		serde_json::from_str(
			r#"{
				"isAuthenticated": true,
				"data": {
					"full_name": "Amina B.",
					"email": "amina@example.ma",
					"phone": "",
					"city": "Rabat"
				}
			}"#,
		)
		.unwrap()
	}

	#[rstest]
	fn test_fills_only_empty_existing_fields(user: CurrentUser) {
		let form = FormSnapshot::from_pairs([
			("full_name", ""),
			("email", "already@set.ma"),
			("phone", ""),
			("message", ""),
		]);
		assert_eq!(
			autofill_values(&user, &form),
			vec![("full_name".to_string(), "Amina B.".to_string())]
		);
	}

	#[rstest]
	fn test_name_maps_to_full_name(user: CurrentUser) {
		let form = FormSnapshot::from_pairs([("name", ""), ("city", "")]);
		let values = autofill_values(&user, &form);
		assert!(values.contains(&("name".to_string(), "Amina B.".to_string())));
		assert!(values.contains(&("city".to_string(), "Rabat".to_string())));
	}

	#[rstest]
	fn test_anonymous_user_fills_nothing(mut user: CurrentUser) {
		user.is_authenticated = false;
		let form = FormSnapshot::from_pairs([("email", "")]);
		assert!(autofill_values(&user, &form).is_empty());
	}

	#[rstest]
	fn test_missing_data_fills_nothing() {
		let user: CurrentUser = serde_json::from_str(r#"{"isAuthenticated": true}"#).unwrap();
		let form = FormSnapshot::from_pairs([("email", "")]);
		assert!(autofill_values(&user, &form).is_empty());
	}
}

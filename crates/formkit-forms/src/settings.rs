//! Widget settings
//!
//! Every widget reads its options from a serde struct with French defaults.
//! Options may be given per widget (the second constructor argument on the
//! JavaScript side) or for the whole page through [`FormkitSettings`], which
//! the bootstrap reads from a `<script type="application/json"
//! id="formkit-settings">` block.
//!
//! ```
//! use formkit_forms::settings::FormkitSettings;
//!
//! let settings = FormkitSettings::from_json(r#"{"autocomplete": {"max_results": 8}}"#).unwrap();
//! assert_eq!(settings.autocomplete.max_results, 8);
//! assert_eq!(settings.autocomplete.min_chars, 2);
//! ```

use crate::error::{FormError, FormResult};
use serde::{Deserialize, Serialize};

/// Page-wide settings, one section per widget.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormkitSettings {
	/// Validation and submission
	pub validator: ValidatorSettings,

	/// Phone country selector
	pub phone: PhoneSettings,

	/// City autocomplete
	pub autocomplete: AutocompleteSettings,

	/// Form state persistence
	#[serde(alias = "stateCache")]
	pub state_cache: StateCacheSettings,
}

impl FormkitSettings {
	/// Parses settings from a JSON document. Missing keys keep their defaults.
	pub fn from_json(json: &str) -> FormResult<Self> {
		parse_settings(json)
	}
}

/// Parses any settings section from JSON, mapping failures to
/// [`FormError::Settings`].
///
/// An empty or blank document yields the defaults.
pub fn parse_settings<T>(json: &str) -> FormResult<T>
where
	T: for<'de> Deserialize<'de> + Default,
{
	if json.trim().is_empty() || json.trim() == "null" {
		return Ok(T::default());
	}
	serde_json::from_str(json).map_err(|e| FormError::Settings(e.to_string()))
}

/// Options of the validation engine and submission controller.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
	/// Validate on blur/input and clear on focus
	pub realtime: bool,

	/// Render inline error nodes; when off, invalid fields are only reset
	#[serde(alias = "showErrors")]
	pub show_errors: bool,

	/// Focus and scroll to the first invalid field after a failed submit
	#[serde(alias = "scrollToError")]
	pub scroll_to_error: bool,

	/// Reset the form (and its cached state) after a successful submission
	#[serde(alias = "resetOnSuccess")]
	pub reset_on_success: bool,

	/// Email/tel fields are validated while typing once the raw value is
	/// longer than this many characters
	#[serde(alias = "realtimeMinChars")]
	pub realtime_min_chars: usize,

	/// User-facing strings
	pub messages: ValidationMessages,
}

impl Default for ValidatorSettings {
	fn default() -> Self {
		Self {
			realtime: true,
			show_errors: true,
			scroll_to_error: true,
			reset_on_success: false,
			realtime_min_chars: 3,
			messages: ValidationMessages::default(),
		}
	}
}

/// Strings shown to the user.
///
/// `min_length` and `max_length` are templates; `{n}` is replaced with the
/// configured bound.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationMessages {
	pub required: String,
	pub invalid_email: String,
	pub invalid_phone: String,
	pub invalid_format: String,
	pub min_length: String,
	pub max_length: String,
	pub submit_success: String,
	pub submit_error: String,
	pub network_error: String,
	pub loading_label: String,
	pub submit_label: String,
}

impl Default for ValidationMessages {
	fn default() -> Self {
		Self {
			required: "Ce champ est requis".to_string(),
			invalid_email: "Format email invalide".to_string(),
			invalid_phone: "Format téléphone invalide".to_string(),
			invalid_format: "Format invalide".to_string(),
			min_length: "Minimum {n} caractères".to_string(),
			max_length: "Maximum {n} caractères".to_string(),
			submit_success: "Formulaire envoyé avec succès".to_string(),
			submit_error: "Une erreur est survenue".to_string(),
			network_error: "Erreur de connexion. Veuillez réessayer.".to_string(),
			loading_label: "Traitement...".to_string(),
			submit_label: "Envoyer".to_string(),
		}
	}
}

impl ValidationMessages {
	/// Renders the minimum-length message for `n`.
	pub fn min_length(&self, n: usize) -> String {
		self.min_length.replace("{n}", &n.to_string())
	}

	/// Renders the maximum-length message for `n`.
	pub fn max_length(&self, n: usize) -> String {
		self.max_length.replace("{n}", &n.to_string())
	}
}

/// Options of the phone country selector.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneSettings {
	/// ISO code of the initially selected country
	#[serde(alias = "defaultCountry")]
	pub default_country: String,

	/// ISO codes listed first in the dropdown, in this order
	#[serde(alias = "preferredCountries")]
	pub preferred_countries: Vec<String>,
}

impl Default for PhoneSettings {
	fn default() -> Self {
		Self {
			default_country: "MA".to_string(),
			preferred_countries: ["MA", "FR", "DZ", "TN"].map(String::from).to_vec(),
		}
	}
}

/// Options of the city autocomplete.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
	/// Static candidate list; when empty the list is fetched from `endpoint`
	pub cities: Vec<String>,

	/// Minimum trimmed query length before suggestions are shown
	#[serde(alias = "minChars")]
	pub min_chars: usize,

	/// Maximum number of suggestions rendered
	#[serde(alias = "maxResults")]
	pub max_results: usize,

	/// City list endpoint
	pub endpoint: String,

	/// Delay before a blur closes the list, letting pointer clicks land
	#[serde(alias = "blurGraceMs")]
	pub blur_grace_ms: u32,
}

impl Default for AutocompleteSettings {
	fn default() -> Self {
		Self {
			cities: Vec::new(),
			min_chars: 2,
			max_results: 5,
			endpoint: "/api/cities/".to_string(),
			blur_grace_ms: 200,
		}
	}
}

/// Options of the form state cache.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateCacheSettings {
	/// Quiet period before a snapshot is written
	#[serde(alias = "debounceMs")]
	pub debounce_ms: u32,

	/// Delay after submit before checking for remaining error markers
	#[serde(alias = "settleMs")]
	pub settle_ms: u32,

	/// Prefix of the storage key; the form id is appended
	#[serde(alias = "keyPrefix")]
	pub key_prefix: String,
}

impl Default for StateCacheSettings {
	fn default() -> Self {
		Self {
			debounce_ms: 500,
			settle_ms: 1000,
			key_prefix: "form_state_".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults_match_page_behaviour() {
		let settings = FormkitSettings::default();
		assert!(settings.validator.realtime);
		assert!(settings.validator.show_errors);
		assert!(!settings.validator.reset_on_success);
		assert_eq!(settings.phone.default_country, "MA");
		assert_eq!(settings.autocomplete.min_chars, 2);
		assert_eq!(settings.autocomplete.max_results, 5);
		assert_eq!(settings.state_cache.debounce_ms, 500);
		assert_eq!(settings.state_cache.settle_ms, 1000);
	}

	#[rstest]
	#[case("")]
	#[case("   ")]
	#[case("null")]
	fn test_blank_document_yields_defaults(#[case] json: &str) {
		let settings: ValidatorSettings = parse_settings(json).unwrap();
		assert_eq!(settings.realtime_min_chars, 3);
	}

	#[rstest]
	fn test_partial_document_keeps_other_defaults() {
		let settings: ValidatorSettings =
			parse_settings(r#"{"reset_on_success": true, "messages": {"required": "Required"}}"#)
				.unwrap();
		assert!(settings.reset_on_success);
		assert!(settings.scroll_to_error);
		assert_eq!(settings.messages.required, "Required");
		assert_eq!(settings.messages.invalid_email, "Format email invalide");
	}

	#[rstest]
	fn test_invalid_document_is_settings_error() {
		let result = FormkitSettings::from_json(r#"{"validator": {"realtime": "yes"}}"#);
		assert!(matches!(result, Err(FormError::Settings(_))));
	}

	#[rstest]
	fn test_javascript_option_names_are_accepted() {
		let settings: ValidatorSettings =
			parse_settings(r#"{"showErrors": false, "resetOnSuccess": true}"#).unwrap();
		assert!(!settings.show_errors);
		assert!(settings.reset_on_success);

		let phone: PhoneSettings = parse_settings(r#"{"defaultCountry": "FR"}"#).unwrap();
		assert_eq!(phone.default_country, "FR");
	}

	#[rstest]
	fn test_length_templates() {
		let messages = ValidationMessages::default();
		assert_eq!(messages.min_length(5), "Minimum 5 caractères");
		assert_eq!(messages.max_length(20), "Maximum 20 caractères");
	}
}

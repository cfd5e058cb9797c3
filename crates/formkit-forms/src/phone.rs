//! Phone input with a country dial-code picker
//!
//! [`PhoneCountrySelector`] keeps the selected country and the dropdown
//! state, and normalises what the user types: non-digits are dropped and a
//! re-typed copy of the dial code is removed, so the field only ever holds
//! the national number.
//!
//! The number itself stays in the input. Resets, restored values and
//! scripts change it without an `input` event, so every operation that
//! needs it takes the field's current value.
//!
//! ```
//! use formkit_forms::phone::PhoneCountrySelector;
//!
//! let mut phone = PhoneCountrySelector::default();
//! phone.select("FR", "").unwrap();
//! assert_eq!(phone.handle_input("33612345678"), "612345678");
//! assert_eq!(phone.full_number("612345678"), "+33612345678");
//! ```

use crate::error::{FormError, FormResult};
use crate::settings::PhoneSettings;
use serde::Serialize;

/// A selectable country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
	pub dial_code: &'static str,
	pub flag: &'static str,
	pub name: &'static str,
	pub iso: &'static str,
}

impl Country {
	const fn new(
		dial_code: &'static str,
		flag: &'static str,
		name: &'static str,
		iso: &'static str,
	) -> Self {
		Self {
			dial_code,
			flag,
			name,
			iso,
		}
	}

	/// Dial code without the leading `+`.
	pub fn dial_digits(&self) -> &'static str {
		self.dial_code.trim_start_matches('+')
	}
}

/// Supported countries in display order.
pub const COUNTRIES: [Country; 8] = [
	Country::new("+212", "🇲🇦", "Maroc", "MA"),
	Country::new("+33", "🇫🇷", "France", "FR"),
	Country::new("+213", "🇩🇿", "Algérie", "DZ"),
	Country::new("+216", "🇹🇳", "Tunisie", "TN"),
	Country::new("+1", "🇺🇸", "États-Unis", "US"),
	Country::new("+44", "🇬🇧", "Royaume-Uni", "GB"),
	Country::new("+49", "🇩🇪", "Allemagne", "DE"),
	Country::new("+34", "🇪🇸", "Espagne", "ES"),
];

/// Flag shown for an unknown ISO code.
pub const UNKNOWN_FLAG: &str = "🇺🇳";

/// Looks up a country by ISO code, case-insensitively.
pub fn find_country(iso: &str) -> Option<&'static Country> {
	COUNTRIES.iter().find(|c| c.iso.eq_ignore_ascii_case(iso))
}

/// Flag of `iso`, or the UN flag when unknown.
pub fn country_flag(iso: &str) -> &'static str {
	find_country(iso).map_or(UNKNOWN_FLAG, |c| c.flag)
}

/// Keeps ASCII digits only.
pub fn digits_only(raw: &str) -> String {
	raw.chars().filter(char::is_ascii_digit).collect()
}

/// Digits of `raw` without one leading copy of `dial_digits`.
pub fn strip_dial_code(raw: &str, dial_digits: &str) -> String {
	let digits = digits_only(raw);
	match digits.strip_prefix(dial_digits) {
		Some(rest) if !dial_digits.is_empty() => rest.to_string(),
		_ => digits,
	}
}

/// State of a phone input decorated with a country picker.
#[derive(Debug, Clone)]
pub struct PhoneCountrySelector {
	country: &'static Country,
	preferred: Vec<String>,
	dropdown_open: bool,
}

impl Default for PhoneCountrySelector {
	fn default() -> Self {
		Self::new(&PhoneSettings::default())
	}
}

impl PhoneCountrySelector {
	/// Creates a selector on `default_country`; an unknown code falls back to
	/// Morocco.
	pub fn new(settings: &PhoneSettings) -> Self {
		let country = find_country(&settings.default_country).unwrap_or_else(|| {
			tracing::warn!(
				iso = %settings.default_country,
				"unknown default country, falling back to MA"
			);
			&COUNTRIES[0]
		});
		Self {
			country,
			preferred: settings.preferred_countries.clone(),
			dropdown_open: false,
		}
	}

	pub fn country(&self) -> &'static Country {
		self.country
	}

	pub fn dial_code(&self) -> &'static str {
		self.country.dial_code
	}

	/// Countries with the preferred ones first, each group in display order.
	pub fn countries(&self) -> Vec<&'static Country> {
		let is_preferred = |c: &Country| {
			self.preferred
				.iter()
				.any(|p| p.eq_ignore_ascii_case(c.iso))
		};
		let mut ordered: Vec<&'static Country> = self
			.preferred
			.iter()
			.filter_map(|iso| find_country(iso))
			.collect();
		ordered.dedup_by_key(|c| c.iso);
		ordered.extend(COUNTRIES.iter().filter(|c| !is_preferred(c)));
		ordered
	}

	/// Toggle button label parts: flag and dial code.
	pub fn button_label(&self) -> (&'static str, &'static str) {
		(self.country.flag, self.country.dial_code)
	}

	/// Placeholder for the number input.
	pub fn placeholder(&self) -> String {
		format!("{} XX XX XX XX", self.country.dial_code)
	}

	pub fn is_open(&self) -> bool {
		self.dropdown_open
	}

	pub fn toggle_dropdown(&mut self) -> bool {
		self.dropdown_open = !self.dropdown_open;
		self.dropdown_open
	}

	pub fn close_dropdown(&mut self) {
		self.dropdown_open = false;
	}

	/// A document click closes the dropdown unless it landed inside the
	/// selector.
	pub fn handle_document_click(&mut self, inside_selector: bool) {
		if !inside_selector {
			self.close_dropdown();
		}
	}

	/// Selects a country, closes the dropdown and re-normalises `current`,
	/// the field's value, against the new dial code.
	pub fn select(&mut self, iso: &str, current: &str) -> FormResult<String> {
		let country = find_country(iso).ok_or_else(|| FormError::UnknownCountry(iso.to_string()))?;
		self.country = country;
		self.dropdown_open = false;
		Ok(strip_dial_code(current, country.dial_digits()))
	}

	/// Normalises raw input; returns the value to write back into the field.
	pub fn handle_input(&self, raw: &str) -> String {
		strip_dial_code(raw, self.country.dial_digits())
	}

	/// Dial code followed by the digits of `current`.
	pub fn full_number(&self, current: &str) -> String {
		format!("{}{}", self.country.dial_code, digits_only(current))
	}
}

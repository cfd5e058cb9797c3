//! City autocomplete model
//!
//! Candidates come from settings or from the city-list endpoint; the browser
//! layer fetches them once and hands the result to
//! [`LocationAutocomplete::with_fetched`]. Everything else (filtering,
//! highlight movement, open/close) is plain state kept here.

use crate::error::TransportError;
use crate::settings::AutocompleteSettings;
use serde::{Deserialize, Serialize};

/// Used when the city list cannot be fetched.
pub const FALLBACK_CITIES: [&str; 10] = [
	"Casablanca",
	"Rabat",
	"Tanger",
	"Marrakech",
	"Agadir",
	"Fès",
	"Meknès",
	"Oujda",
	"Laâyoune",
	"Dakhla",
];

/// Body of `GET /api/cities/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityListResponse {
	#[serde(default)]
	pub cities: Vec<String>,
}

/// Case-insensitive substring filter, capped at `max_results`.
///
/// ```
/// use formkit_forms::autocomplete::filter_candidates;
///
/// let cities = vec!["Casablanca".to_string(), "Rabat".to_string()];
/// assert_eq!(filter_candidates(&cities, "CASA", 5), vec!["Casablanca".to_string()]);
/// ```
pub fn filter_candidates(candidates: &[String], query: &str, max_results: usize) -> Vec<String> {
	let needle = query.to_lowercase();
	candidates
		.iter()
		.filter(|c| c.to_lowercase().contains(&needle))
		.take(max_results)
		.cloned()
		.collect()
}

/// Highlighted row, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
	index: Option<usize>,
}

impl SelectionState {
	pub fn index(&self) -> Option<usize> {
		self.index
	}

	/// Moves down with wraparound; from no highlight goes to the first row.
	pub fn next(&mut self, len: usize) -> Option<usize> {
		self.index = match (len, self.index) {
			(0, _) => None,
			(_, None) => Some(0),
			(len, Some(i)) => Some((i + 1) % len),
		};
		self.index
	}

	/// Moves up with wraparound; from no highlight goes to the last row.
	pub fn prev(&mut self, len: usize) -> Option<usize> {
		self.index = match (len, self.index) {
			(0, _) => None,
			(len, None) | (len, Some(0)) => Some(len - 1),
			(_, Some(i)) => Some(i - 1),
		};
		self.index
	}

	pub fn reset(&mut self) {
		self.index = None;
	}
}

/// Keys the autocomplete reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
	ArrowDown,
	ArrowUp,
	Enter,
	Escape,
	Other,
}

impl Key {
	/// Maps a `KeyboardEvent.key` value.
	pub fn from_key_name(name: &str) -> Self {
		match name {
			"ArrowDown" => Self::ArrowDown,
			"ArrowUp" => Self::ArrowUp,
			"Enter" => Self::Enter,
			"Escape" => Self::Escape,
			_ => Self::Other,
		}
	}
}

/// Result of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
	/// Nothing to do; the event keeps its default action.
	Ignored,
	/// Highlight moved to this row.
	Highlight(usize),
	/// A row was chosen: write it into the input and dispatch `change`.
	/// The key's default action (form submission) must be prevented.
	Selected(String),
	/// The list was closed.
	Closed,
}

impl KeyOutcome {
	/// Whether the browser default for the key must be suppressed.
	pub fn prevents_default(&self) -> bool {
		matches!(self, Self::Highlight(_) | Self::Selected(_))
	}
}

/// State of one autocomplete-enabled input.
#[derive(Debug, Clone)]
pub struct LocationAutocomplete {
	settings: AutocompleteSettings,
	candidates: Vec<String>,
	loaded: bool,
	suggestions: Vec<String>,
	selection: SelectionState,
	open: bool,
}

impl Default for LocationAutocomplete {
	fn default() -> Self {
		Self::new(AutocompleteSettings::default())
	}
}

impl LocationAutocomplete {
	/// Uses `settings.cities` as candidates when non-empty; otherwise the
	/// list must be fetched.
	pub fn new(settings: AutocompleteSettings) -> Self {
		let candidates = settings.cities.clone();
		let loaded = !candidates.is_empty();
		Self {
			settings,
			candidates,
			loaded,
			suggestions: Vec::new(),
			selection: SelectionState::default(),
			open: false,
		}
	}

	pub fn settings(&self) -> &AutocompleteSettings {
		&self.settings
	}

	/// True until candidates were configured or fetched.
	pub fn needs_fetch(&self) -> bool {
		!self.loaded
	}

	/// Installs the fetched city list, or the fallback list when the fetch
	/// failed.
	pub fn with_fetched(&mut self, fetched: Result<Vec<String>, TransportError>) {
		self.candidates = match fetched {
			Ok(cities) => cities,
			Err(e) => {
				tracing::warn!(error = %e, "city list unavailable, using fallback cities");
				FALLBACK_CITIES.iter().map(|c| c.to_string()).collect()
			}
		};
		self.loaded = true;
	}

	pub fn candidates(&self) -> &[String] {
		&self.candidates
	}

	pub fn suggestions(&self) -> &[String] {
		&self.suggestions
	}

	pub fn is_open(&self) -> bool {
		self.open
	}

	pub fn highlighted(&self) -> Option<usize> {
		self.selection.index()
	}

	/// Recomputes suggestions for `query` and opens the list when any match.
	///
	/// Queries shorter than `min_chars` (after trimming) hide the list.
	pub fn handle_input(&mut self, query: &str) -> &[String] {
		let query = query.trim();
		self.selection.reset();
		self.suggestions = if query.chars().count() >= self.settings.min_chars {
			filter_candidates(&self.candidates, query, self.settings.max_results)
		} else {
			Vec::new()
		};
		self.open = !self.suggestions.is_empty();
		&self.suggestions
	}

	/// Focus behaves like input with the current value.
	pub fn handle_focus(&mut self, current: &str) -> &[String] {
		self.handle_input(current)
	}

	pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
		if !self.open {
			return KeyOutcome::Ignored;
		}
		let len = self.suggestions.len();
		match key {
			Key::ArrowDown => self
				.selection
				.next(len)
				.map_or(KeyOutcome::Ignored, KeyOutcome::Highlight),
			Key::ArrowUp => self
				.selection
				.prev(len)
				.map_or(KeyOutcome::Ignored, KeyOutcome::Highlight),
			Key::Enter => match self.selection.index() {
				Some(index) => self
					.select(index)
					.map_or(KeyOutcome::Ignored, KeyOutcome::Selected),
				None => KeyOutcome::Ignored,
			},
			Key::Escape => {
				self.hide();
				KeyOutcome::Closed
			}
			Key::Other => KeyOutcome::Ignored,
		}
	}

	/// Chooses suggestion `index` and closes the list.
	pub fn select(&mut self, index: usize) -> Option<String> {
		let value = self.suggestions.get(index).cloned()?;
		self.hide();
		Some(value)
	}

	pub fn hide(&mut self) {
		self.open = false;
		self.selection.reset();
	}

	/// Runs once the blur grace delay has elapsed.
	pub fn handle_blur_settled(&mut self, focus_inside_list: bool) {
		if !focus_inside_list {
			self.hide();
		}
	}
}

//! Page bootstrap
//!
//! `initForms()` scans the document once and mounts a widget on every
//! marked element:
//!
//! | Selector | Widget |
//! |----------|--------|
//! | `form[data-validate]` | validation + submission |
//! | `input[type="tel"][data-phone-input]` | phone country selector |
//! | `input[data-city-autocomplete]` | city autocomplete |
//! | `form[id]` | state cache |
//!
//! then auto-fills profile fields for a logged-in user. Page-wide options are
//! read from `<script type="application/json" id="formkit-settings">`.
//! `teardownForms()` drops every mounted widget, detaching its listeners and
//! cancelling its timers.

/// Forms validated and submitted over AJAX.
pub const VALIDATE_SELECTOR: &str = "form[data-validate]";

/// Phone inputs given a country selector.
pub const PHONE_SELECTOR: &str = "input[type=\"tel\"][data-phone-input]";

/// Inputs given city suggestions.
pub const AUTOCOMPLETE_SELECTOR: &str = "input[data-city-autocomplete]";

/// Forms whose values are cached.
pub const STATE_SELECTOR: &str = "form[id]";

/// Id of the JSON settings block.
pub const SETTINGS_SCRIPT_ID: &str = "formkit-settings";

#[cfg(target_arch = "wasm32")]
pub use self::wasm::{init_forms, mount_all, teardown_forms};

#[cfg(target_arch = "wasm32")]
mod wasm {
	use super::*;
	use crate::autofill::autofill_page;
	use crate::dom::{document, query_document};
	use crate::page::page_context;
	use crate::widgets::{AutocompleteWidget, PhoneWidget, StateWidget, ValidatorWidget};
	use crate::{info_log, warn_log};
	use formkit_forms::{FormResult, FormkitSettings};
	use std::cell::RefCell;
	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::*;

	/// Widgets mounted by the bootstrap.
	#[derive(Default)]
	struct Mounted {
		validators: Vec<ValidatorWidget>,
		phones: Vec<PhoneWidget>,
		autocompletes: Vec<AutocompleteWidget>,
		states: Vec<StateWidget>,
	}

	impl Mounted {
		fn len(&self) -> usize {
			self.validators.len() + self.phones.len() + self.autocompletes.len() + self.states.len()
		}
	}

	thread_local! {
		static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
	}

	fn page_settings() -> FormkitSettings {
		let text = document()
			.ok()
			.and_then(|d| d.get_element_by_id(SETTINGS_SCRIPT_ID))
			.and_then(|script| script.text_content());
		match text.as_deref().map(FormkitSettings::from_json) {
			Some(Ok(settings)) => settings,
			Some(Err(e)) => {
				warn_log!("ignoring #{}: {}", SETTINGS_SCRIPT_ID, e);
				FormkitSettings::default()
			}
			None => FormkitSettings::default(),
		}
	}

	fn mount_each<W>(
		selector: &str,
		widgets: &mut Vec<W>,
		mut mount: impl FnMut(&str) -> FormResult<W>,
	) {
		for element in query_document(selector) {
			let id = element.id();
			if id.is_empty() {
				warn_log!("skipping {} without an id", selector);
				continue;
			}
			match mount(&id) {
				Ok(widget) => widgets.push(widget),
				Err(e) => warn_log!("could not mount #{}: {}", id, e),
			}
		}
	}

	/// Mounts every widget of the page with `settings`.
	pub fn mount_all(settings: &FormkitSettings) -> usize {
		let mut mounted = Mounted::default();
		let context = page_context();

		mount_each(VALIDATE_SELECTOR, &mut mounted.validators, |id| {
			ValidatorWidget::mount(
				id,
				settings.validator.clone(),
				&settings.state_cache,
				context.clone(),
			)
		});
		mount_each(PHONE_SELECTOR, &mut mounted.phones, |id| {
			PhoneWidget::mount(id, &settings.phone)
		});
		mount_each(AUTOCOMPLETE_SELECTOR, &mut mounted.autocompletes, |id| {
			AutocompleteWidget::mount(id, settings.autocomplete.clone())
		});
		mount_each(STATE_SELECTOR, &mut mounted.states, |id| {
			StateWidget::mount(id, &settings.state_cache)
		});

		autofill_page(&context);

		let count = mounted.len();
		info_log!("mounted {} widgets", count);
		MOUNTED.with(|slot| slot.replace(Some(mounted)));
		count
	}

	/// Mounts every widget once the document is parsed.
	///
	/// Calling it again after a successful scan does nothing; returns the
	/// number of mounted widgets (0 while waiting for `DOMContentLoaded`).
	#[wasm_bindgen(js_name = initForms)]
	pub fn init_forms() -> Result<usize, JsValue> {
		#[cfg(feature = "console_error_panic_hook")]
		console_error_panic_hook::set_once();

		if let Some(count) = MOUNTED.with(|slot| slot.borrow().as_ref().map(Mounted::len)) {
			return Ok(count);
		}

		let document = document().map_err(crate::dom::to_js_error)?;
		if document.ready_state() == "loading" {
			let on_ready = Closure::once_into_js(|| {
				mount_all(&page_settings());
			});
			document
				.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
			return Ok(0);
		}
		Ok(mount_all(&page_settings()))
	}

	/// Drops every widget mounted by [`init_forms`].
	#[wasm_bindgen(js_name = teardownForms)]
	pub fn teardown_forms() {
		// Taken out first so that widget destructors run without the
		// registry borrowed.
		let mounted = MOUNTED.with(|slot| slot.borrow_mut().take());
		drop(mounted);
	}

	#[cfg(feature = "auto-start")]
	#[wasm_bindgen(start)]
	fn start() -> Result<(), JsValue> {
		init_forms().map(|_| ())
	}
}

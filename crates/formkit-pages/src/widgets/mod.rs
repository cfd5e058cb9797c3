//! Widgets exported to JavaScript
//!
//! Each widget has a Rust side (`*Widget`, mounted by the bootstrap) and a
//! thin `#[wasm_bindgen]` class for pages that construct widgets by hand:
//!
//! | JavaScript class | Rust widget |
//! |------------------|-------------|
//! | `FormValidator` | [`ValidatorWidget`] |
//! | `PhoneInput` | [`PhoneWidget`] |
//! | `CityAutocomplete` | [`AutocompleteWidget`] |
//! | `FormStateManager` | [`StateWidget`] |
//!
//! Widgets own their event listeners and timers; dropping one detaches it
//! from the page.

pub mod autocomplete;
pub mod phone;
pub mod state;
pub mod validator;

pub use autocomplete::{AutocompleteWidget, CityAutocomplete};
pub use phone::{PhoneInput, PhoneWidget};
pub use state::{FormStateManager, StateWidget};
pub use validator::{FormValidator, ValidatorWidget};

use crate::dom::{document, form_error};
use formkit_forms::{Callback, FormResult};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

/// CSS class hiding a dropdown.
pub const HIDDEN_CLASS: &str = "hidden";

/// Converts a serde value into a plain JavaScript object.
pub(crate) fn to_js_value<T: Serialize>(value: &T) -> JsValue {
	serde_json::to_string(value)
		.ok()
		.and_then(|json| js_sys::JSON::parse(&json).ok())
		.unwrap_or(JsValue::NULL)
}

/// Wraps the function stored under `key` in `options`, if any.
pub(crate) fn js_callback<T>(options: &JsValue, key: &str) -> Option<Callback<T>>
where
	T: Serialize + 'static,
{
	if !options.is_object() {
		return None;
	}
	let function = js_sys::Reflect::get(options, &JsValue::from_str(key))
		.ok()?
		.dyn_into::<js_sys::Function>()
		.ok()?;
	Some(Callback::new(move |value: T| {
		if let Err(e) = function.call1(&JsValue::NULL, &to_js_value(&value)) {
			crate::warn_log!("callback threw: {}", crate::dom::js_message(&e));
		}
	}))
}

/// Creates `<tag class="class">`.
pub(crate) fn create(tag: &str, class: &str) -> FormResult<Element> {
	let element = document()?
		.create_element(tag)
		.map_err(|e| form_error("createElement", e))?;
	element.set_class_name(class);
	Ok(element)
}

/// Creates `<span class="class">text</span>`.
pub(crate) fn span(class: &str, text: &str) -> FormResult<Element> {
	let element = create("span", class)?;
	element.set_text_content(Some(text));
	Ok(element)
}

/// Moves `element` into a new `<div class="class">` placed where it was.
pub(crate) fn wrap(element: &Element, class: &str) -> FormResult<Element> {
	let wrapper = create("div", class)?;
	if let Some(parent) = element.parent_node() {
		parent
			.insert_before(&wrapper, Some(element))
			.map_err(|e| form_error("insertBefore", e))?;
	}
	wrapper
		.append_child(element)
		.map_err(|e| form_error("appendChild", e))?;
	Ok(wrapper)
}

/// Toggles [`HIDDEN_CLASS`] so that `element` is shown when `open`.
pub(crate) fn set_open(element: &Element, open: bool) {
	let _ = element.class_list().toggle_with_force(HIDDEN_CLASS, !open);
}

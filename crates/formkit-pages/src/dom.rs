//! DOM helpers shared by the widgets
//!
//! - [`ListenerHandle`]: an event listener removed when the handle drops
//! - reading controls into [`Field`]s and [`FormSnapshot`]s
//! - `JsValue` ↔ [`FormError`] conversion at the JavaScript boundary

use formkit_forms::field::{
	ERROR_MESSAGE_ATTR, PATTERN_INFERRED_ATTR, SUBMIT_ERROR_ATTR, parse_length_attr,
};
use formkit_forms::{Field, FormError, FormResult, FormSnapshot, InputType};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, Event, EventInit, EventTarget, HtmlFormElement, HtmlInputElement,
	HtmlSelectElement, HtmlTextAreaElement, Window,
};

/// Selector of every form control a form validates.
pub const CONTROL_SELECTOR: &str = "input, textarea, select";

/// An attached event listener. Dropping the handle detaches it.
pub struct ListenerHandle {
	target: EventTarget,
	event: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

impl ListenerHandle {
	pub fn event(&self) -> &'static str {
		self.event
	}
}

impl Drop for ListenerHandle {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
	}
}

impl std::fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerHandle")
			.field("event", &self.event)
			.finish_non_exhaustive()
	}
}

/// Attaches `handler` for `event` on `target`.
pub fn listen<F>(
	target: &EventTarget,
	event: &'static str,
	handler: F,
) -> FormResult<ListenerHandle>
where
	F: FnMut(Event) + 'static,
{
	let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
	target
		.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
		.map_err(|e| form_error("addEventListener", e))?;
	Ok(ListenerHandle {
		target: target.clone(),
		event,
		closure,
	})
}

/// Dispatches a bubbling event of type `event`.
pub fn dispatch(target: &EventTarget, event: &str) -> FormResult<()> {
	let init = EventInit::new();
	init.set_bubbles(true);
	let event = Event::new_with_event_init_dict(event, &init)
		.map_err(|e| form_error("new Event", e))?;
	target
		.dispatch_event(&event)
		.map_err(|e| form_error("dispatchEvent", e))?;
	Ok(())
}

pub fn window() -> FormResult<Window> {
	web_sys::window().ok_or_else(|| FormError::ElementNotFound("window".to_string()))
}

pub fn document() -> FormResult<Document> {
	window()?
		.document()
		.ok_or_else(|| FormError::ElementNotFound("document".to_string()))
}

/// Element with `id`, cast to `T`.
pub fn element_by_id<T: JsCast>(id: &str) -> FormResult<T> {
	document()?
		.get_element_by_id(id)
		.and_then(|el| el.dyn_into::<T>().ok())
		.ok_or_else(|| FormError::ElementNotFound(id.to_string()))
}

/// Elements matching `selector` under `root`.
pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
	let Ok(list) = root.query_selector_all(selector) else {
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect()
}

/// Same as [`query_all`] over the whole document.
pub fn query_document(selector: &str) -> Vec<Element> {
	match document().and_then(|doc| {
		doc.document_element()
			.ok_or_else(|| FormError::ElementNotFound("html".to_string()))
	}) {
		Ok(root) => query_all(&root, selector),
		Err(_) => Vec::new(),
	}
}

/// Current value of an input, textarea or select.
pub fn control_value(element: &Element) -> Option<String> {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		Some(input.value())
	} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
		Some(area.value())
	} else {
		element.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
	}
}

pub fn set_control_value(element: &Element, value: &str) {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		input.set_value(value);
	} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
		area.set_value(value);
	} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
		select.set_value(value);
	}
}

/// The control's `name`, falling back to its id.
pub fn control_name(element: &Element) -> Option<String> {
	element
		.get_attribute("name")
		.filter(|n| !n.is_empty())
		.or_else(|| Some(element.id()).filter(|id| !id.is_empty()))
}

fn input_type(element: &Element) -> InputType {
	match element.tag_name().to_ascii_lowercase().as_str() {
		"textarea" => InputType::Textarea,
		"select" => InputType::Select,
		_ => InputType::from_attr(&element.get_attribute("type").unwrap_or_default()),
	}
}

/// Buttons and file pickers take no part in validation or snapshots.
fn is_data_control(element: &Element) -> bool {
	!matches!(
		element
			.get_attribute("type")
			.unwrap_or_default()
			.to_ascii_lowercase()
			.as_str(),
		"submit" | "button" | "reset" | "image" | "file"
	)
}

/// Reads a control into a [`Field`].
///
/// Patterns marked as inferred are left out so that only declared patterns
/// are validated.
pub fn field_from_element(element: &Element) -> Option<Field> {
	let name = control_name(element)?;
	let value = control_value(element)?;
	let pattern = if element.has_attribute(PATTERN_INFERRED_ATTR) {
		None
	} else {
		element.get_attribute("pattern").filter(|p| !p.is_empty())
	};

	Some(Field {
		id: Some(element.id()).filter(|id| !id.is_empty()),
		name,
		value,
		input_type: input_type(element),
		required: element.has_attribute("required"),
		min_length: parse_length_attr(element.get_attribute("minlength").as_deref()),
		max_length: parse_length_attr(element.get_attribute("maxlength").as_deref()),
		pattern,
		error_message: element.get_attribute(ERROR_MESSAGE_ATTR),
		submit_error: element.get_attribute(SUBMIT_ERROR_ATTR).as_deref() == Some("true"),
	})
}

/// Controls of `form` that take part in validation.
pub fn form_controls(form: &HtmlFormElement) -> Vec<Element> {
	query_all(form, CONTROL_SELECTOR)
		.into_iter()
		.filter(is_data_control)
		.collect()
}

/// First control of `form` named `name`.
pub fn control_by_name(form: &HtmlFormElement, name: &str) -> Option<Element> {
	query_all(form, CONTROL_SELECTOR)
		.into_iter()
		.find(|el| control_name(el).as_deref() == Some(name))
}

/// Name → value of the successful controls of `form`, like `FormData`:
/// disabled controls and unchecked boxes are skipped.
pub fn form_snapshot(form: &HtmlFormElement) -> FormSnapshot {
	form_controls(form)
		.iter()
		.filter(|el| !el.has_attribute("disabled"))
		.filter_map(|el| {
			let name = el.get_attribute("name").filter(|n| !n.is_empty())?;
			if let Some(input) = el.dyn_ref::<HtmlInputElement>()
				&& matches!(input.type_().as_str(), "checkbox" | "radio")
				&& !input.checked()
			{
				return None;
			}
			Some((name, control_value(el)?))
		})
		.collect()
}

/// Parses widget options given from JavaScript.
///
/// `undefined` and `null` give the defaults; functions inside the object are
/// ignored.
pub fn options_from_js<T>(options: &JsValue) -> FormResult<T>
where
	T: DeserializeOwned + Default,
{
	if options.is_undefined() || options.is_null() {
		return Ok(T::default());
	}
	let json = js_sys::JSON::stringify(options)
		.map_err(|e| FormError::Settings(js_message(&e)))?
		.as_string()
		.unwrap_or_default();
	formkit_forms::settings::parse_settings(&json)
}

/// Best-effort text of a thrown JavaScript value.
pub fn js_message(value: &JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{:?}", value))
}

/// Wraps a failed DOM call.
pub fn form_error(operation: &str, value: JsValue) -> FormError {
	FormError::ElementNotFound(format!("{} failed: {}", operation, js_message(&value)))
}

/// Converts an error for the JavaScript caller.
pub fn to_js_error(error: FormError) -> JsValue {
	js_sys::Error::new(&error.to_string()).into()
}

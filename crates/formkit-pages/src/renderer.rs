//! DOM renderer for validation results
//!
//! [`apply_annotation`] turns a [`FieldAnnotation`] into class, ARIA and
//! error-node changes on a control; [`DomForm`] implements [`FormView`] over
//! a `<form>` element so that the submission controller can drive it.

use crate::dom::{
	control_by_name, control_value, document, field_from_element, form_controls, form_error,
	form_snapshot, query_all, window,
};
use formkit_forms::field::SUBMIT_ERROR_ATTR;
use formkit_forms::submission::CSRF_FORM_FIELD;
use formkit_forms::{
	ERROR_CLASS, ERROR_NODE_CLASS, Field, FieldAnnotation, FormResult, FormSnapshot, FormView,
	SUCCESS_CLASS,
};
use wasm_bindgen::JsCast;
use web_sys::{
	Element, HtmlElement, HtmlFormElement, HtmlInputElement, ScrollBehavior,
	ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions,
};

/// Attribute keeping the submit button's label during loading.
pub const ORIGINAL_TEXT_ATTR: &str = "data-original-text";

/// Class of the spinner shown in the submit button while loading.
pub const LOADER_CLASS: &str = "loader";

const SUBMIT_SELECTOR: &str = "[type=\"submit\"]";

/// Applies `annotation` to `element`.
pub fn apply_annotation(element: &Element, annotation: &FieldAnnotation) {
	let classes = element.class_list();
	match annotation {
		FieldAnnotation::Neutral | FieldAnnotation::Success => {
			let _ = classes.remove_1(ERROR_CLASS);
			let _ = element.set_attribute("aria-invalid", "false");
			remove_error_node(element);
			if matches!(annotation, FieldAnnotation::Success) {
				let _ = classes.add_1(SUCCESS_CLASS);
			} else {
				let _ = classes.remove_1(SUCCESS_CLASS);
			}
		}
		FieldAnnotation::Error {
			message,
			error_id,
			focus,
			scroll,
		} => {
			let _ = classes.add_1(ERROR_CLASS);
			let _ = classes.remove_1(SUCCESS_CLASS);
			let _ = element.set_attribute("aria-invalid", "true");
			let _ = element.set_attribute("aria-describedby", error_id);
			if let Err(e) = show_error_node(element, message, error_id) {
				crate::warn_log!("could not render error for {}: {}", error_id, e);
			}
			if *focus {
				focus_element(element, *scroll);
			}
		}
		FieldAnnotation::Cleared => {
			let _ = classes.remove_1(ERROR_CLASS);
			let _ = element.remove_attribute("aria-invalid");
			let _ = element.remove_attribute("aria-describedby");
			let _ = element.remove_attribute(SUBMIT_ERROR_ATTR);
			remove_error_node(element);
		}
	}
}

fn error_node(element: &Element) -> Option<Element> {
	element
		.parent_element()?
		.query_selector(&format!(".{}", ERROR_NODE_CLASS))
		.ok()
		.flatten()
}

fn remove_error_node(element: &Element) {
	if let Some(node) = error_node(element) {
		node.remove();
	}
}

fn show_error_node(element: &Element, message: &str, error_id: &str) -> FormResult<()> {
	let node = match error_node(element) {
		Some(node) => node,
		None => {
			let node = document()?
				.create_element("div")
				.map_err(|e| form_error("createElement", e))?;
			node.set_class_name(ERROR_NODE_CLASS);
			node.set_attribute("role", "alert")
				.map_err(|e| form_error("setAttribute", e))?;
			if let Some(parent) = element.parent_element() {
				parent
					.append_child(&node)
					.map_err(|e| form_error("appendChild", e))?;
			}
			node
		}
	};
	node.set_id(error_id);
	node.set_text_content(Some(message));
	Ok(())
}

/// Focuses `element`, optionally scrolling it to the middle of the viewport.
pub fn focus_element(element: &Element, scroll: bool) {
	if let Some(html) = element.dyn_ref::<HtmlElement>() {
		let _ = html.focus();
	}
	if scroll {
		let options = ScrollIntoViewOptions::new();
		options.set_behavior(ScrollBehavior::Smooth);
		options.set_block(ScrollLogicalPosition::Center);
		element.scroll_into_view_with_scroll_into_view_options(&options);
	}
}

/// A `<form>` element seen through [`FormView`].
#[derive(Debug, Clone)]
pub struct DomForm {
	form: HtmlFormElement,
}

impl DomForm {
	pub fn new(form: HtmlFormElement) -> Self {
		Self { form }
	}

	/// Looks up the form by id.
	pub fn by_id(id: &str) -> FormResult<Self> {
		crate::dom::element_by_id::<HtmlFormElement>(id).map(Self::new)
	}

	pub fn element(&self) -> &HtmlFormElement {
		&self.form
	}

	/// Adds `aria-required` and the default email/tel patterns.
	pub fn apply_inferred_attributes(&self) {
		for element in form_controls(&self.form) {
			let Some(field) = field_from_element(&element) else {
				continue;
			};
			for (name, value) in field.inferred_attributes(element.has_attribute("aria-required")) {
				let _ = element.set_attribute(name, value);
			}
		}
	}

	/// Whether any inline error node is left in the form.
	pub fn has_error_nodes(&self) -> bool {
		!query_all(&self.form, &format!(".{}", ERROR_NODE_CLASS)).is_empty()
	}

	/// Writes `value` into the control named `name`.
	pub fn set_value(&self, name: &str, value: &str) -> Option<Element> {
		let element = control_by_name(&self.form, name)?;
		crate::dom::set_control_value(&element, value);
		Some(element)
	}

	fn buttons(&self) -> Vec<Element> {
		query_all(&self.form, "button, input[type=\"submit\"], input[type=\"button\"]")
	}

	fn set_button_label(button: &Element, label: &str, loading: bool) -> FormResult<()> {
		if let Some(input) = button.dyn_ref::<HtmlInputElement>() {
			input.set_value(label);
			return Ok(());
		}
		if !loading {
			button.set_inner_html(label);
			return Ok(());
		}
		let document = document()?;
		let loader = document
			.create_element("span")
			.map_err(|e| form_error("createElement", e))?;
		loader.set_class_name(LOADER_CLASS);
		button.set_inner_html("");
		button
			.append_child(&loader)
			.map_err(|e| form_error("appendChild", e))?;
		button
			.append_child(&document.create_text_node(&format!(" {}", label)))
			.map_err(|e| form_error("appendChild", e))?;
		Ok(())
	}
}

impl FormView for DomForm {
	fn fields(&self) -> Vec<Field> {
		form_controls(&self.form)
			.iter()
			.filter(|el| el.get_attribute("type").as_deref() != Some("hidden"))
			.filter_map(field_from_element)
			.collect()
	}

	fn field(&self, name: &str) -> Option<Field> {
		control_by_name(&self.form, name).and_then(|el| field_from_element(&el))
	}

	fn snapshot(&self) -> FormSnapshot {
		form_snapshot(&self.form)
	}

	fn present(&self, name: &str, annotation: &FieldAnnotation) {
		if let Some(element) = control_by_name(&self.form, name) {
			apply_annotation(&element, annotation);
		}
	}

	fn mark_submit_error(&self, name: &str, flagged: bool) {
		if let Some(element) = control_by_name(&self.form, name) {
			let _ = if flagged {
				element.set_attribute(SUBMIT_ERROR_ATTR, "true")
			} else {
				element.remove_attribute(SUBMIT_ERROR_ATTR)
			};
		}
	}

	fn focus_field(&self, name: &str, scroll: bool) {
		if let Some(element) = control_by_name(&self.form, name) {
			focus_element(&element, scroll);
		}
	}

	fn set_loading(&self, loading_label: Option<&str>, default_label: &str) {
		let submit = self.form.query_selector(SUBMIT_SELECTOR).ok().flatten();

		if let Some(button) = &submit {
			let result = match loading_label {
				Some(label) => {
					if !button.has_attribute(ORIGINAL_TEXT_ATTR) {
						let original = match button.dyn_ref::<HtmlInputElement>() {
							Some(input) => input.value(),
							None => button.inner_html(),
						};
						let _ = button.set_attribute(ORIGINAL_TEXT_ATTR, &original);
					}
					Self::set_button_label(button, label, true)
				}
				None => {
					let original = button
						.get_attribute(ORIGINAL_TEXT_ATTR)
						.filter(|t| !t.trim().is_empty())
						.unwrap_or_else(|| default_label.to_string());
					Self::set_button_label(button, &original, false)
				}
			};
			if let Err(e) = result {
				crate::warn_log!("could not update submit button: {}", e);
			}
		}

		for button in self.buttons() {
			let _ = if loading_label.is_some() {
				button.set_attribute("disabled", "")
			} else {
				button.remove_attribute("disabled")
			};
		}
	}

	fn reset(&self) {
		self.form.reset();
	}

	fn clear_all_errors(&self) {
		for element in form_controls(&self.form) {
			apply_annotation(&element, &FieldAnnotation::Cleared);
			let _ = element.class_list().remove_1(SUCCESS_CLASS);
		}
		for node in query_all(&self.form, &format!(".{}", ERROR_NODE_CLASS)) {
			node.remove();
		}
	}

	fn scroll_to_top(&self) {
		if let Ok(window) = window() {
			let options = ScrollToOptions::new();
			options.set_top(0.0);
			options.set_behavior(ScrollBehavior::Smooth);
			window.scroll_to_with_scroll_to_options(&options);
		}
	}

	fn csrf_token(&self) -> Option<String> {
		control_by_name(&self.form, CSRF_FORM_FIELD)
			.and_then(|el| control_value(&el))
			.filter(|v| !v.is_empty())
			.or_else(crate::csrf::csrf_token)
	}

	fn action(&self) -> Option<String> {
		self.form.get_attribute("action")
	}

	fn method(&self) -> Option<String> {
		self.form.get_attribute("method")
	}

	fn current_path(&self) -> String {
		window()
			.ok()
			.and_then(|w| w.location().pathname().ok())
			.unwrap_or_else(|| "/".to_string())
	}
}

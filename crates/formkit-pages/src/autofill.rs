//! Profile auto-fill for every form of the page

use crate::dom::{dispatch, query_document};
use crate::renderer::DomForm;
use formkit_forms::{FormView, PageContext};
use wasm_bindgen::JsCast;
use web_sys::HtmlFormElement;

/// Fills empty profile fields of every form from the context's user.
///
/// Each filled control receives bubbling `input` and `change` events so that
/// other widgets (state cache, validation) see the new value. Returns the
/// number of controls written.
pub fn autofill_page(context: &PageContext) -> usize {
	if context.current_user.as_ref().and_then(|u| u.profile()).is_none() {
		return 0;
	}

	let mut filled = 0;
	for form in query_document("form") {
		let Ok(form) = form.dyn_into::<HtmlFormElement>() else {
			continue;
		};
		let form = DomForm::new(form);
		for (name, value) in context.autofill(&form.snapshot()) {
			let Some(element) = form.set_value(&name, &value) else {
				continue;
			};
			let _ = dispatch(&element, "input");
			let _ = dispatch(&element, "change");
			filled += 1;
		}
	}
	crate::debug_log!("auto-filled {} fields", filled);
	filled
}
